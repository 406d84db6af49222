#![forbid(unsafe_code)]

//! TileKit public facade.
//!
//! Hosts implement [`TimerHost`](runtime::TimerHost) and
//! [`AnimationHost`](runtime::AnimationHost), build a
//! [`LiveTile`](widgets::LiveTile) over them, then feed it sizes, lifecycle
//! signals and items. Rendering reads the slot bindings, the translation
//! and the geometry the tile publishes.

pub use tilekit_core as core;
pub use tilekit_runtime as runtime;
pub use tilekit_widgets as widgets;

#[cfg(feature = "tracing-json")]
pub use tilekit_core::logging::init_json_logging;

pub mod prelude;
