//! Types a host application needs to embed a LiveTile.

pub use tilekit_core::{Axis, Direction, Lifecycle, Rect, Size};
pub use tilekit_runtime::{
    AnimationHost, AnimationId, Binding, Change, Easing, FillBehavior, IntervalProvider,
    Observable, PropertyAnimation, Subscription, TimerHost, TimerId, UniformInterval,
};
pub use tilekit_widgets::{
    Advance, ConfigError, Degradation, EnumerableSource, Geometry, IndexedSource, ItemTemplate,
    ItemsSource, LiveTile, LiveTileBuilder, LiveTileConfig, RotationState, SharedList,
    SlotBinding, SlotRole, TileSnapshot, Translation,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use std::time::Duration;
    use tilekit_runtime::VirtualHost;

    #[test]
    fn prelude_is_enough_to_embed_a_tile() {
        let host = Rc::new(VirtualHost::new());
        let tile: LiveTile<&str> = LiveTile::builder(host.clone(), host.clone())
            .config(LiveTileConfig::default().with_direction(Direction::Left))
            .intervals(UniformInterval::seeded(
                Duration::from_secs(5),
                Duration::from_secs(10),
                1,
            ))
            .items_source(vec!["news", "weather"])
            .build();

        let template = ItemTemplate::new(|s: &&str| s.to_uppercase());
        let label: Binding<Option<String>> = tile.current_slot().render_with(&template);

        tile.resize(Size::new(320.0, 120.0));
        tile.mount();
        assert_eq!(label.get().as_deref(), Some("NEWS"));
        assert_eq!(tile.geometry().travel_distance, 320.0);

        assert!(host.fire_next_timer());
        host.finish_animations();
        assert_eq!(tile.current_index(), 1);
        assert_eq!(label.get().as_deref(), Some("WEATHER"));
    }
}
