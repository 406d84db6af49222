#![forbid(unsafe_code)]

//! Test harness for TileKit controls.
//!
//! [`TileHarness`] wires a [`LiveTile`] to a [`VirtualHost`] so tests can
//! drive rotation in virtual time: mount, resize, fire the next tick, let
//! the slide finish, and inspect the resulting [`TileSnapshot`].
//!
//! ```ignore
//! let mut h = TileHarness::new(vec!["A", "B", "C"]);
//! h.mount_at(100.0, 100.0);
//! h.rotate();
//! assert_eq!(h.visible(), (Some("B"), Some("C")));
//! ```

pub mod determinism;
pub mod strategies;
pub mod trace;

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tilekit_core::Size;
use tilekit_runtime::{HostEvent, IntervalProvider, ScriptedIntervals, UniformInterval, VirtualHost};
use tilekit_widgets::{ItemsSource, LiveTile, LiveTileConfig, TileSnapshot};

pub use determinism::fixture_seed;
pub use trace::TileTrace;

/// Tick delay used by [`TileHarness::new`].
pub const DEFAULT_TICK: Duration = Duration::from_secs(5);

/// A [`LiveTile`] driven by a [`VirtualHost`].
pub struct TileHarness<T: Clone + PartialEq + 'static> {
    host: Rc<VirtualHost>,
    tile: LiveTile<T>,
    trace: TileTrace,
}

impl<T: Clone + PartialEq + 'static> TileHarness<T> {
    /// Harness over `items` ticking every [`DEFAULT_TICK`].
    pub fn new(items: Vec<T>) -> Self {
        Self::with_intervals(
            Some(ItemsSource::from(items)),
            LiveTileConfig::default(),
            ScriptedIntervals::new([DEFAULT_TICK]),
        )
    }

    /// Harness drawing real uniform delays from a fixed seed.
    pub fn seeded(items: Vec<T>, config: LiveTileConfig, seed: u64) -> Self {
        let intervals = UniformInterval::seeded(config.min_interval, config.max_interval, seed);
        Self::with_intervals(Some(ItemsSource::from(items)), config, intervals)
    }

    /// Harness with full control over source, config and delays.
    pub fn with_intervals(
        source: Option<ItemsSource<T>>,
        config: LiveTileConfig,
        intervals: impl IntervalProvider + 'static,
    ) -> Self {
        let host = Rc::new(VirtualHost::new());
        let mut builder = LiveTile::builder(host.clone(), host.clone())
            .config(config)
            .intervals(intervals);
        if let Some(source) = source {
            builder = builder.items_source(source);
        }
        Self {
            host,
            tile: builder.build(),
            trace: TileTrace::new(),
        }
    }

    #[must_use]
    pub fn tile(&self) -> &LiveTile<T> {
        &self.tile
    }

    #[must_use]
    pub fn host(&self) -> &VirtualHost {
        &self.host
    }

    /// Report a size and mount the tile.
    pub fn mount_at(&self, width: f64, height: f64) {
        self.tile.resize(Size::new(width, height));
        self.tile.mount();
    }

    /// Advance virtual time by `by`. Returns the number of host callbacks run.
    pub fn advance(&self, by: Duration) -> usize {
        self.host.advance(by)
    }

    /// Fire the next rotation tick and run the resulting slide to completion.
    ///
    /// Returns `false` if no tick was pending.
    pub fn rotate(&self) -> bool {
        let Some(due) = self.host.next_timer_due() else {
            return false;
        };
        self.host.advance_to(due);
        self.host.finish_animations();
        true
    }

    /// [`Self::rotate`] `n` times; returns how many ticks actually fired.
    pub fn rotate_n(&self, n: usize) -> usize {
        (0..n).take_while(|_| self.rotate()).count()
    }

    /// Contents of the `(Current, Next)` slots.
    #[must_use]
    pub fn visible(&self) -> (Option<T>, Option<T>) {
        (self.tile.current_slot().item(), self.tile.next_slot().item())
    }

    #[must_use]
    pub fn snapshot(&self) -> TileSnapshot<T> {
        self.tile.snapshot()
    }

    /// Host events recorded since the last call.
    pub fn take_events(&self) -> Vec<HostEvent> {
        self.host.take_events()
    }

    #[must_use]
    pub fn trace(&self) -> &TileTrace {
        &self.trace
    }
}

impl<T: Clone + PartialEq + fmt::Display + 'static> TileHarness<T> {
    /// Append the current snapshot to the trace under `label`.
    pub fn record(&mut self, label: &str) {
        let snapshot = self.tile.snapshot();
        self.trace.record(label, &snapshot);
    }
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> fmt::Debug for TileHarness<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileHarness")
            .field("now", &self.host.now())
            .field("tile", &self.tile)
            .finish_non_exhaustive()
    }
}
