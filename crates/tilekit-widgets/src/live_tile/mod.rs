#![forbid(unsafe_code)]

//! LiveTile: an auto-rotating content tile.
//!
//! A tile shows one item of a collection at a time. At random intervals it
//! slides the next item in (upward or leftward), then rebinds its two
//! slots so the visible item is always `item_at(current_index)`.
//!
//! # Architecture
//!
//! ```text
//!  TileProperties ──change──▶ LifecycleController ──plan──▶ RotationScheduler
//!        │                                                       │ tick
//!        ├── available_size / direction ──▶ GeometryReactor       ▼
//!        │                                     │ travel   TransitionController
//!        │                                     ▼                 │ animate
//!        └── items_source ──▶ SourceView ──▶ BufferPair ◀── completion
//! ```
//!
//! All host callbacks capture a weak reference to the tile's shared state.
//! Dropping the [`LiveTile`] cancels its timer; callbacks still queued in
//! the host become no-ops.
//!
//! # Invariants
//!
//! 1. At most one rotation timer is pending; `is_running()` reflects it.
//! 2. Each tick advances `current_index` by exactly one.
//! 3. At rest, `current = item_at(current_index)` and
//!    `next = item_at(current_index + 1)`.
//! 4. Fewer than two items never start a slide, and an empty source never
//!    clears the slots.
//! 5. Geometry is recomputed on every size or direction change.
//!
//! # Example
//!
//! ```ignore
//! let host = Rc::new(VirtualHost::new());
//! let tile = LiveTile::new(host.clone(), host.clone());
//! tile.set_items_source(Some(ItemsSource::from(vec!["A", "B", "C"])));
//! tile.resize(Size::new(100.0, 100.0));
//! tile.mount();
//! ```

pub mod config;
pub mod geometry;
pub mod lifecycle;
pub mod scheduler;
pub mod slots;
pub mod source;
pub mod transition;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tilekit_core::{Axis, Direction, Lifecycle, Size};
use tilekit_runtime::{
    AnimationHost, BindingScope, Change, IntervalProvider, Observable, TimerHost,
};
use tracing::{debug, trace};

pub use config::{ConfigError, ConfigParse, LiveTileConfig};
pub use geometry::{Geometry, GeometryReactor};
pub use lifecycle::{LifecycleController, LifecyclePlan, SourceChange};
pub use scheduler::{RotationScheduler, RotationState};
pub use slots::{BufferPair, ItemTemplate, SlotBinding, SlotRole};
pub use source::{EnumerableSource, IndexedSource, ItemsSource, SharedList, SourceView};
pub use transition::{Advance, Degradation, TransitionController, TransitionToken, Translation};

// ---------------------------------------------------------------------------
// Properties and snapshot
// ---------------------------------------------------------------------------

/// The observed inputs of a tile.
pub struct TileProperties<T> {
    pub items_source: Observable<Option<ItemsSource<T>>>,
    pub direction: Observable<Direction>,
    pub available_size: Observable<Size>,
    pub lifecycle: Observable<Lifecycle>,
}

impl<T: 'static> TileProperties<T> {
    fn new(direction: Direction, items_source: Option<ItemsSource<T>>) -> Self {
        Self {
            items_source: Observable::new(items_source),
            direction: Observable::new(direction),
            available_size: Observable::new(Size::ZERO),
            lifecycle: Observable::new(Lifecycle::Unmounted),
        }
    }
}

/// Point-in-time copy of a tile's visible state.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSnapshot<T> {
    pub current_index: u64,
    pub is_running: bool,
    pub current: Option<T>,
    pub next: Option<T>,
    pub translation: Translation,
    pub geometry: Geometry,
    pub transitioning: bool,
}

impl<T: fmt::Display> fmt::Display for TileSnapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn slot<T: fmt::Display>(item: &Option<T>) -> String {
            item.as_ref().map_or_else(|| "-".to_string(), ToString::to_string)
        }
        write!(
            f,
            "index={} running={} current={} next={} offset={} transitioning={} {}",
            self.current_index,
            self.is_running,
            slot(&self.current),
            slot(&self.next),
            self.translation,
            self.transitioning,
            self.geometry
        )
    }
}

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

struct TileCore {
    scheduler: RotationScheduler,
    transition: TransitionController,
    lifecycle: LifecycleController,
}

struct TileShared<T> {
    properties: TileProperties<T>,
    slots: BufferPair<T>,
    translation: Observable<Translation>,
    geometry: GeometryReactor,
    core: RefCell<TileCore>,
    timers: Rc<dyn TimerHost>,
    animations: Rc<dyn AnimationHost>,
}

impl<T: Clone + PartialEq + 'static> TileShared<T> {
    fn source_count(&self) -> usize {
        self.properties
            .items_source
            .with(|source| SourceView::new(source.as_ref()).count())
    }

    fn on_source_changed(self: &Rc<Self>, change: &Change<Option<ItemsSource<T>>>) {
        let kind = SourceChange::classify(change.old.as_ref(), change.new.as_ref());
        let plan = {
            let mut core = self.core.borrow_mut();
            if kind == SourceChange::Replaced {
                core.transition.forget_count();
            }
            core.lifecycle.on_source_changed(kind)
        };
        debug!(change = %kind, count = self.source_count(), "items source changed");
        self.apply(plan);
    }

    fn on_lifecycle_changed(self: &Rc<Self>, change: &Change<Lifecycle>) {
        let plan = match change.new {
            Lifecycle::Mounted => {
                let has_source = self.properties.items_source.with(Option::is_some);
                self.core.borrow_mut().lifecycle.on_mount(has_source)
            }
            Lifecycle::Unmounted => self.core.borrow_mut().lifecycle.on_unmount(),
        };
        debug!(lifecycle = ?change.new, "lifecycle changed");
        self.apply(plan);
    }

    fn on_layout_changed(&self) {
        let size = self.properties.available_size.get();
        let direction = self.properties.direction.get();
        self.geometry.recompute(size, direction);
    }

    fn apply(self: &Rc<Self>, plan: LifecyclePlan) {
        if plan.stop {
            self.stop();
        }
        {
            let mut core = self.core.borrow_mut();
            if plan.reset_index {
                core.scheduler.reset_index();
            }
            if plan.detach_frames {
                core.transition.detach_frames();
            }
        }
        if plan.reset_offset {
            self.translation.set(Translation::ZERO);
        }
        if plan.rebind {
            self.rebind();
        }
        if plan.start {
            self.start();
        }
    }

    fn start(self: &Rc<Self>) -> bool {
        let weak = Rc::downgrade(self);
        let on_tick: scheduler::TickFn = Rc::new(move |generation| {
            if let Some(tile) = weak.upgrade() {
                tile.on_tick(generation);
            }
        });
        self.core
            .borrow_mut()
            .scheduler
            .start(self.timers.as_ref(), on_tick)
    }

    fn stop(&self) -> bool {
        self.core.borrow_mut().scheduler.stop(self.timers.as_ref())
    }

    fn on_tick(self: &Rc<Self>, generation: u64) {
        let ticked = self
            .core
            .borrow_mut()
            .scheduler
            .tick(self.timers.as_ref(), generation);
        if let Some(index) = ticked {
            trace!(index, "rotation tick");
            self.advance(false);
        }
    }

    /// Start a slide towards `item_at(current_index)`. With `step`, the
    /// index moves forward first, once the slide is admitted.
    fn advance(self: &Rc<Self>, step: bool) -> Advance {
        let source = self.properties.items_source.get();
        let view = SourceView::new(source.as_ref());
        let count = view.count();
        let geometry = self.geometry.current();
        let axis = self.properties.direction.get().axis();

        let (index, animation, token) = {
            let mut core = self.core.borrow_mut();
            if let Err(reason) = core.transition.check(count) {
                return Advance::Skipped(reason);
            }
            if step {
                core.scheduler.step_index();
            }
            let animation = core.transition.animation(geometry.travel_distance);
            (core.scheduler.current_index(), animation, core.transition.begin())
        };
        if !geometry.is_sized() {
            debug!(index, reason = %Degradation::UnresizedHost, "sliding with zero travel");
        }

        self.slots.stage_incoming(view.item_at(index));

        let frames = Rc::downgrade(self);
        let done = Rc::downgrade(self);
        let id = self.animations.animate(
            animation,
            Box::new(move |value: f64| {
                if let Some(tile) = frames.upgrade() {
                    tile.on_frame(token, axis, value);
                }
            }),
            Box::new(move || {
                if let Some(tile) = done.upgrade() {
                    tile.on_transition_complete(token);
                }
            }),
        );
        debug!(
            index,
            count,
            travel = geometry.travel_distance,
            animation = id.0,
            "slide started"
        );
        Advance::Animating {
            animation: id,
            travel_distance: geometry.travel_distance,
        }
    }

    fn on_frame(&self, token: TransitionToken, axis: Axis, value: f64) {
        if !self.core.borrow().transition.accepts_frames(token) {
            return;
        }
        self.translation.set(Translation::along(axis, value));
    }

    fn on_transition_complete(&self, token: TransitionToken) {
        if !self.core.borrow_mut().transition.finish(token) {
            trace!("stale slide completion dropped");
            return;
        }
        self.translation.set(Translation::ZERO);
        self.rebind();
        debug!(index = self.core.borrow().scheduler.current_index(), "slide completed");
    }

    fn rebind(&self) {
        let index = self.core.borrow().scheduler.current_index();
        let source = self.properties.items_source.get();
        if !self.slots.bind_from(&SourceView::new(source.as_ref()), index) {
            debug!(index, reason = %Degradation::EmptySource, "slots retained");
        }
    }
}

// ---------------------------------------------------------------------------
// LiveTile
// ---------------------------------------------------------------------------

/// Builder for [`LiveTile`].
pub struct LiveTileBuilder<T> {
    timers: Rc<dyn TimerHost>,
    animations: Rc<dyn AnimationHost>,
    config: LiveTileConfig,
    intervals: Option<Box<dyn IntervalProvider>>,
    items_source: Option<ItemsSource<T>>,
}

impl<T: Clone + PartialEq + 'static> LiveTileBuilder<T> {
    /// Use `config` for direction, interval bounds and slide timing.
    #[must_use]
    pub fn config(mut self, config: LiveTileConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the random interval provider.
    #[must_use]
    pub fn intervals(mut self, intervals: impl IntervalProvider + 'static) -> Self {
        self.intervals = Some(Box::new(intervals));
        self
    }

    /// Initial items source.
    #[must_use]
    pub fn items_source(mut self, source: impl Into<ItemsSource<T>>) -> Self {
        self.items_source = Some(source.into());
        self
    }

    #[must_use]
    pub fn build(self) -> LiveTile<T> {
        let config = self.config;
        let intervals = self
            .intervals
            .unwrap_or_else(|| Box::new(config.interval_provider()));
        let shared = Rc::new(TileShared {
            properties: TileProperties::new(config.direction, self.items_source),
            slots: BufferPair::new(),
            translation: Observable::new(Translation::ZERO),
            geometry: GeometryReactor::new(),
            core: RefCell::new(TileCore {
                scheduler: RotationScheduler::new(intervals),
                transition: TransitionController::new(config.transition, config.easing),
                lifecycle: LifecycleController::new(),
            }),
            timers: self.timers,
            animations: self.animations,
        });
        shared.on_layout_changed();

        let mut scope = BindingScope::new();
        let props = &shared.properties;

        let weak = Rc::downgrade(&shared);
        scope.subscribe(&props.items_source, move |change| {
            if let Some(tile) = weak.upgrade() {
                tile.on_source_changed(change);
            }
        });
        let weak = Rc::downgrade(&shared);
        scope.subscribe(&props.lifecycle, move |change| {
            if let Some(tile) = weak.upgrade() {
                tile.on_lifecycle_changed(change);
            }
        });
        let weak = Rc::downgrade(&shared);
        scope.subscribe(&props.available_size, move |_| {
            if let Some(tile) = weak.upgrade() {
                tile.on_layout_changed();
            }
        });
        let weak = Rc::downgrade(&shared);
        scope.subscribe(&props.direction, move |_| {
            if let Some(tile) = weak.upgrade() {
                tile.on_layout_changed();
            }
        });

        LiveTile {
            shared,
            config,
            _scope: scope,
        }
    }
}

/// An auto-rotating content tile. See the [module docs](self).
pub struct LiveTile<T: Clone + PartialEq + 'static> {
    shared: Rc<TileShared<T>>,
    config: LiveTileConfig,
    _scope: BindingScope,
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> fmt::Debug for LiveTile<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveTile")
            .field("snapshot", &self.snapshot())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + PartialEq + 'static> LiveTile<T> {
    /// Tile with the default configuration.
    #[must_use]
    pub fn new(timers: Rc<dyn TimerHost>, animations: Rc<dyn AnimationHost>) -> Self {
        Self::builder(timers, animations).build()
    }

    #[must_use]
    pub fn builder(
        timers: Rc<dyn TimerHost>,
        animations: Rc<dyn AnimationHost>,
    ) -> LiveTileBuilder<T> {
        LiveTileBuilder {
            timers,
            animations,
            config: LiveTileConfig::default(),
            intervals: None,
            items_source: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &LiveTileConfig {
        &self.config
    }

    /// The observed inputs; setting them directly is equivalent to the
    /// setters below.
    #[must_use]
    pub fn properties(&self) -> &TileProperties<T> {
        &self.shared.properties
    }

    // --- inputs -----------------------------------------------------------

    pub fn set_items_source(&self, source: Option<ItemsSource<T>>) {
        self.shared.properties.items_source.set(source);
    }

    pub fn set_direction(&self, direction: Direction) {
        self.shared.properties.direction.set(direction);
    }

    /// Report the size the host has laid the tile out at.
    pub fn resize(&self, available: Size) {
        self.shared.properties.available_size.set(available);
    }

    pub fn mount(&self) {
        self.shared.properties.lifecycle.set(Lifecycle::Mounted);
    }

    pub fn unmount(&self) {
        self.shared.properties.lifecycle.set(Lifecycle::Unmounted);
    }

    // --- rotation ---------------------------------------------------------

    /// Arm the rotation timer. Returns `false` if already running.
    pub fn start(&self) -> bool {
        self.shared.start()
    }

    /// Cancel the rotation timer. A running slide still completes.
    pub fn stop(&self) -> bool {
        self.shared.stop()
    }

    /// Rotate by one now, as a timer tick would, leaving the pending
    /// timer in place. A skipped advance keeps the index.
    pub fn advance(&self) -> Advance {
        self.shared.advance(true)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.core.borrow().scheduler.is_running()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.shared.core.borrow().lifecycle.is_mounted()
    }

    #[must_use]
    pub fn current_index(&self) -> u64 {
        self.shared.core.borrow().scheduler.current_index()
    }

    #[must_use]
    pub fn rotation_state(&self) -> RotationState {
        self.shared.core.borrow().scheduler.state()
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.shared.core.borrow().transition.is_in_flight()
    }

    /// Number of slides that ran to completion.
    #[must_use]
    pub fn completed_transitions(&self) -> u64 {
        self.shared.core.borrow().transition.completed()
    }

    // --- outputs ----------------------------------------------------------

    #[must_use]
    pub fn slots(&self) -> &BufferPair<T> {
        &self.shared.slots
    }

    #[must_use]
    pub fn current_slot(&self) -> &SlotBinding<T> {
        self.shared.slots.current()
    }

    #[must_use]
    pub fn next_slot(&self) -> &SlotBinding<T> {
        self.shared.slots.next()
    }

    #[must_use]
    pub fn translation(&self) -> Translation {
        self.shared.translation.get()
    }

    #[must_use]
    pub fn observe_translation(&self) -> &Observable<Translation> {
        &self.shared.translation
    }

    #[must_use]
    pub fn geometry(&self) -> Geometry {
        self.shared.geometry.current()
    }

    #[must_use]
    pub fn observe_geometry(&self) -> &Observable<Geometry> {
        self.shared.geometry.observe()
    }

    #[must_use]
    pub fn snapshot(&self) -> TileSnapshot<T> {
        let core = self.shared.core.borrow();
        TileSnapshot {
            current_index: core.scheduler.current_index(),
            is_running: core.scheduler.is_running(),
            current: self.shared.slots.current().item(),
            next: self.shared.slots.next().item(),
            translation: self.shared.translation.get(),
            geometry: self.shared.geometry.current(),
            transitioning: core.transition.is_in_flight(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Drop for LiveTile<T> {
    fn drop(&mut self) {
        if self.shared.stop() {
            trace!("live tile dropped while running");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tilekit_runtime::{FixedInterval, ScriptedIntervals, VirtualHost};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    }

    fn tile_with(
        host: &Rc<VirtualHost>,
        items: Vec<&'static str>,
    ) -> LiveTile<&'static str> {
        init_tracing();
        LiveTile::builder(host.clone(), host.clone())
            .intervals(FixedInterval(Duration::from_secs(5)))
            .items_source(items)
            .build()
    }

    #[test]
    fn mount_binds_slots_and_starts() {
        let host = Rc::new(VirtualHost::new());
        let tile = tile_with(&host, vec!["A", "B", "C"]);
        assert!(!tile.is_running());
        assert_eq!(tile.current_slot().item(), None);

        tile.mount();
        assert!(tile.is_mounted());
        assert!(tile.is_running());
        assert_eq!(tile.current_slot().item(), Some("A"));
        assert_eq!(tile.next_slot().item(), Some("B"));
        assert_eq!(host.pending_timers(), 1);
    }

    #[test]
    fn tick_slides_then_rebinds() {
        let host = Rc::new(VirtualHost::new());
        let tile = tile_with(&host, vec!["A", "B", "C"]);
        tile.resize(Size::new(100.0, 40.0));
        tile.mount();

        host.advance(Duration::from_secs(5));
        assert_eq!(tile.current_index(), 1);
        assert!(tile.is_transitioning());
        assert_eq!(tile.next_slot().item(), Some("B"));

        host.advance(Duration::from_millis(250));
        let mid = tile.translation();
        assert_eq!(mid.x, 0.0);
        assert!(mid.y < 0.0 && mid.y > -40.0, "{mid}");

        host.advance(Duration::from_millis(250));
        assert!(!tile.is_transitioning());
        assert_eq!(tile.translation(), Translation::ZERO);
        assert_eq!(tile.current_slot().item(), Some("B"));
        assert_eq!(tile.next_slot().item(), Some("C"));
        assert_eq!(tile.completed_transitions(), 1);
    }

    #[test]
    fn left_direction_moves_x() {
        let host = Rc::new(VirtualHost::new());
        let tile = tile_with(&host, vec!["A", "B"]);
        tile.set_direction(Direction::Left);
        tile.resize(Size::new(80.0, 30.0));
        tile.mount();

        host.advance(Duration::from_millis(5_100));
        let offset = tile.translation();
        assert!(offset.x < 0.0 && offset.y == 0.0, "{offset}");
        assert_eq!(tile.geometry().travel_distance, 80.0);
    }

    #[test]
    fn single_item_never_animates() {
        let host = Rc::new(VirtualHost::new());
        let tile = tile_with(&host, vec!["solo"]);
        tile.mount();
        host.advance(Duration::from_secs(30));
        assert_eq!(tile.current_index(), 6);
        assert_eq!(host.animations_started(), 0);
        assert_eq!(tile.current_slot().item(), Some("solo"));
        assert_eq!(tile.advance(), Advance::Skipped(Degradation::SingleItemSource));
    }

    #[test]
    fn unsized_host_slides_with_zero_travel() {
        let host = Rc::new(VirtualHost::new());
        let tile = tile_with(&host, vec!["A", "B"]);
        tile.mount();
        match tile.advance() {
            Advance::Animating { travel_distance, .. } => assert_eq!(travel_distance, 0.0),
            other => panic!("expected a slide, got {other:?}"),
        }
    }

    #[test]
    fn manual_advance_slides_in_the_next_item() {
        let host = Rc::new(VirtualHost::new());
        let tile = tile_with(&host, vec!["A", "B", "C"]);
        tile.resize(Size::new(100.0, 100.0));
        tile.mount();

        assert!(tile.advance().is_animating());
        assert_eq!(tile.current_index(), 1);
        assert_eq!(tile.current_slot().item(), Some("A"));
        assert_eq!(tile.next_slot().item(), Some("B"));
        assert_eq!(tile.advance(), Advance::Skipped(Degradation::TransitionInFlight));
        assert_eq!(tile.current_index(), 1);

        host.finish_animations();
        assert_eq!(tile.current_slot().item(), Some("B"));
        assert_eq!(tile.next_slot().item(), Some("C"));
        assert_eq!(host.pending_timers(), 1);
    }

    #[test]
    fn tick_during_slide_is_absorbed() {
        let host = Rc::new(VirtualHost::new());
        let tile = LiveTile::builder(host.clone(), host.clone())
            .config(LiveTileConfig::default().with_transition(Duration::from_secs(2)))
            .intervals(ScriptedIntervals::from_secs(&[5, 1]))
            .items_source(vec![1, 2, 3, 4])
            .build();
        tile.resize(Size::new(10.0, 10.0));
        tile.mount();

        host.advance(Duration::from_secs(6));
        assert_eq!(tile.current_index(), 2);
        assert_eq!(host.animations_started(), 1);

        host.advance(Duration::from_millis(1_500));
        assert_eq!(tile.current_slot().item(), Some(3));
        assert_eq!(tile.next_slot().item(), Some(4));
    }

    #[test]
    fn drop_cancels_timer() {
        let host = Rc::new(VirtualHost::new());
        let tile = tile_with(&host, vec!["A", "B"]);
        tile.mount();
        assert_eq!(host.pending_timers(), 1);
        drop(tile);
        assert_eq!(host.pending_timers(), 0);
        host.advance(Duration::from_secs(60));
    }

    #[test]
    fn drop_mid_slide_is_harmless() {
        let host = Rc::new(VirtualHost::new());
        let tile = tile_with(&host, vec!["A", "B"]);
        tile.resize(Size::new(10.0, 10.0));
        tile.mount();
        host.advance(Duration::from_millis(5_100));
        assert_eq!(host.running_animations(), 1);
        drop(tile);
        host.advance(Duration::from_secs(1));
        assert_eq!(host.running_animations(), 0);
    }

    #[test]
    fn snapshot_display_is_readable() {
        let host = Rc::new(VirtualHost::new());
        let tile = tile_with(&host, vec!["A", "B"]);
        tile.resize(Size::new(100.0, 100.0));
        tile.mount();
        let text = tile.snapshot().to_string();
        assert!(text.starts_with("index=0 running=true current=A next=B"), "{text}");
    }
}
