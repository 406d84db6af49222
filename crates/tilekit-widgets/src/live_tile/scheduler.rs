#![forbid(unsafe_code)]

//! Rotation scheduler: owns the current index and the single pending timer.
//!
//! Each armed timer carries the generation it was armed under. Stopping or
//! re-arming bumps the generation, so a callback that was already queued
//! by the host when the timer was cancelled is recognised as stale and
//! dropped.
//!
//! # Invariants
//!
//! 1. At most one timer is pending at any time.
//! 2. `is_running` holds exactly while a timer is pending.
//! 3. A tick increments `current_index` by exactly one, then re-arms with a
//!    freshly drawn interval.
//! 4. `start` while running is a no-op; `stop` while stopped is a no-op.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tilekit_runtime::{IntervalProvider, TimerHost, TimerId};
use tracing::{debug, trace};

/// Observable state of the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RotationState {
    /// Monotonic rotation counter; taken modulo the item count at lookup.
    pub current_index: u64,
    /// Whether a tick is pending.
    pub is_running: bool,
    /// Delay of the pending tick, `Duration::ZERO` when stopped.
    pub pending_interval: Duration,
}

/// Callback invoked when an armed timer fires, with its generation.
pub type TickFn = Rc<dyn Fn(u64)>;

/// Drives periodic ticks through a [`TimerHost`].
pub struct RotationScheduler {
    state: RotationState,
    timer: Option<TimerId>,
    generation: u64,
    intervals: Box<dyn IntervalProvider>,
    on_tick: Option<TickFn>,
}

impl fmt::Debug for RotationScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotationScheduler")
            .field("state", &self.state)
            .field("timer", &self.timer)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl RotationScheduler {
    /// Create a stopped scheduler at index 0.
    #[must_use]
    pub fn new(intervals: Box<dyn IntervalProvider>) -> Self {
        Self {
            state: RotationState::default(),
            timer: None,
            generation: 0,
            intervals,
            on_tick: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> RotationState {
        self.state
    }

    #[must_use]
    pub fn current_index(&self) -> u64 {
        self.state.current_index
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    /// Generation of the currently armed timer.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Rewind to index 0 without touching the timer.
    pub fn reset_index(&mut self) {
        self.state.current_index = 0;
    }

    /// Move to the next index without touching the pending timer.
    pub fn step_index(&mut self) -> u64 {
        self.state.current_index = self.state.current_index.wrapping_add(1);
        self.state.current_index
    }

    /// Arm the first tick. Returns `false` if already running.
    pub fn start(&mut self, host: &dyn TimerHost, on_tick: TickFn) -> bool {
        if self.state.is_running {
            trace!(generation = self.generation, "start ignored: already running");
            return false;
        }
        self.on_tick = Some(on_tick);
        self.arm(host);
        debug!(
            index = self.state.current_index,
            interval_ms = self.state.pending_interval.as_millis() as u64,
            "rotation started"
        );
        true
    }

    /// Cancel the pending tick. Returns `false` if already stopped.
    pub fn stop(&mut self, host: &dyn TimerHost) -> bool {
        if !self.state.is_running {
            return false;
        }
        if let Some(id) = self.timer.take() {
            host.cancel(id);
        }
        self.generation = self.generation.wrapping_add(1);
        self.on_tick = None;
        self.state.is_running = false;
        self.state.pending_interval = Duration::ZERO;
        debug!(index = self.state.current_index, "rotation stopped");
        true
    }

    /// Handle a fired timer.
    ///
    /// Returns the new index, or `None` if the callback belongs to a timer
    /// that has since been cancelled or replaced.
    pub fn tick(&mut self, host: &dyn TimerHost, generation: u64) -> Option<u64> {
        if !self.state.is_running || generation != self.generation {
            trace!(
                generation,
                current = self.generation,
                "stale tick dropped"
            );
            return None;
        }
        self.timer = None;
        self.state.current_index = self.state.current_index.wrapping_add(1);
        self.arm(host);
        Some(self.state.current_index)
    }

    fn arm(&mut self, host: &dyn TimerHost) {
        let Some(on_tick) = self.on_tick.clone() else {
            return;
        };
        let delay = self.intervals.next_interval();
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let id = host.schedule_once(delay, Box::new(move || on_tick(generation)));
        self.timer = Some(id);
        self.state.is_running = true;
        self.state.pending_interval = delay;
        trace!(timer = id.0, generation, delay_ms = delay.as_millis() as u64, "tick armed");
    }
}
