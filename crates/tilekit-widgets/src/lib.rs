#![forbid(unsafe_code)]

//! Controls for TileKit.

pub mod live_tile;

pub use live_tile::config::{ConfigError, ConfigParse, LiveTileConfig};
pub use live_tile::{
    Advance, Degradation, EnumerableSource, Geometry, IndexedSource, ItemTemplate, ItemsSource,
    LiveTile, LiveTileBuilder, RotationState, SharedList, SlotBinding, SlotRole, TileProperties,
    TileSnapshot, Translation,
};
