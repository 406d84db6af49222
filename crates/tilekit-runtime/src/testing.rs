#![forbid(unsafe_code)]

//! Deterministic virtual-time host for tests.
//!
//! [`VirtualHost`] implements both [`TimerHost`] and [`AnimationHost`] on a
//! clock that only moves when the test calls [`VirtualHost::advance`]. Timers
//! fire in due-time order (FIFO on ties); animations deliver a progress
//! value every frame interval (16ms by default) plus one final value, then
//! complete. When a frame and a timer fall on the same instant the frame
//! runs first, so a slide that ends exactly at a tick completes before it.
//!
//! Every scheduling decision is appended to an event log ([`HostEvent`]) so
//! tests can assert on "exactly one timer armed" style properties.
//!
//! # Failure Modes
//!
//! - A timer that keeps re-arming itself with a zero delay would never let
//!   virtual time move; `advance` panics after [`MAX_STEPS_PER_ADVANCE`]
//!   callbacks instead of hanging.

use std::cell::RefCell;
use std::time::Duration;

use crate::animation::PropertyAnimation;
use crate::host::{AnimationHost, AnimationId, TimerHost, TimerId};

/// Default animation frame spacing (about 60 fps).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Upper bound on callbacks run by a single `advance` call.
pub const MAX_STEPS_PER_ADVANCE: usize = 1_000_000;

/// Something the host did, stamped with virtual time.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    TimerScheduled {
        id: TimerId,
        at: Duration,
        delay: Duration,
    },
    TimerCancelled {
        id: TimerId,
        at: Duration,
    },
    TimerFired {
        id: TimerId,
        at: Duration,
    },
    AnimationStarted {
        id: AnimationId,
        at: Duration,
        animation: PropertyAnimation,
    },
    AnimationCompleted {
        id: AnimationId,
        at: Duration,
    },
}

struct PendingTimer {
    id: TimerId,
    due: Duration,
    callback: Box<dyn FnOnce()>,
}

struct RunningAnimation {
    id: AnimationId,
    started_at: Duration,
    next_frame: Duration,
    animation: PropertyAnimation,
    on_progress: Box<dyn FnMut(f64)>,
    on_complete: Box<dyn FnOnce()>,
}

#[derive(Debug, Clone, Copy)]
enum Due {
    Timer(usize),
    Frame(usize),
}

struct HostState {
    now: Duration,
    next_id: u64,
    frame_interval: Duration,
    timers: Vec<PendingTimer>,
    animations: Vec<RunningAnimation>,
    log: Vec<HostEvent>,
}

impl HostState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Earliest pending callback. Timers keep insertion order, so the first
    /// minimum found is the FIFO winner.
    fn next_due(&self) -> Option<(Duration, Due)> {
        let timer = self
            .timers
            .iter()
            .enumerate()
            .min_by_key(|(i, t)| (t.due, *i))
            .map(|(i, t)| (t.due, Due::Timer(i)));
        let frame = self
            .animations
            .iter()
            .enumerate()
            .min_by_key(|(i, a)| (a.next_frame, *i))
            .map(|(i, a)| (a.next_frame, Due::Frame(i)));
        match (timer, frame) {
            (Some(t), Some(f)) => Some(if f.0 <= t.0 { f } else { t }),
            (t, f) => t.or(f),
        }
    }
}

/// Virtual-time [`TimerHost`] + [`AnimationHost`].
pub struct VirtualHost {
    state: RefCell<HostState>,
}

impl Default for VirtualHost {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VirtualHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("VirtualHost")
            .field("now", &state.now)
            .field("pending_timers", &state.timers.len())
            .field("running_animations", &state.animations.len())
            .finish()
    }
}

impl VirtualHost {
    /// Host at virtual time zero with the default frame interval.
    #[must_use]
    pub fn new() -> Self {
        Self::with_frame_interval(DEFAULT_FRAME_INTERVAL)
    }

    /// Host with a custom animation frame spacing.
    ///
    /// # Panics
    ///
    /// Panics if `frame_interval` is zero.
    #[must_use]
    pub fn with_frame_interval(frame_interval: Duration) -> Self {
        assert!(!frame_interval.is_zero(), "frame interval must be non-zero");
        Self {
            state: RefCell::new(HostState {
                now: Duration::ZERO,
                next_id: 0,
                frame_interval,
                timers: Vec::new(),
                animations: Vec::new(),
                log: Vec::new(),
            }),
        }
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Number of timers waiting to fire.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Number of animations that have not completed.
    #[must_use]
    pub fn running_animations(&self) -> usize {
        self.state.borrow().animations.len()
    }

    /// Due time of the earliest pending timer.
    #[must_use]
    pub fn next_timer_due(&self) -> Option<Duration> {
        self.state.borrow().timers.iter().map(|t| t.due).min()
    }

    /// Copy of the event log.
    #[must_use]
    pub fn events(&self) -> Vec<HostEvent> {
        self.state.borrow().log.clone()
    }

    /// Drain the event log.
    pub fn take_events(&self) -> Vec<HostEvent> {
        std::mem::take(&mut self.state.borrow_mut().log)
    }

    /// How many animations were started since the log was last drained.
    #[must_use]
    pub fn animations_started(&self) -> usize {
        self.state
            .borrow()
            .log
            .iter()
            .filter(|e| matches!(e, HostEvent::AnimationStarted { .. }))
            .count()
    }

    /// Move virtual time forward by `by`, running every callback that falls
    /// due on the way. Returns the number of callbacks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        self.advance_to(target)
    }

    /// Move virtual time forward to `target` (no-op if already past it).
    pub fn advance_to(&self, target: Duration) -> usize {
        let mut steps = 0;
        while self.step(target) {
            steps += 1;
            assert!(
                steps < MAX_STEPS_PER_ADVANCE,
                "virtual host made no progress after {steps} callbacks"
            );
        }
        let mut state = self.state.borrow_mut();
        if state.now < target {
            state.now = target;
        }
        steps
    }

    /// Advance to the earliest pending timer and fire it (running any
    /// animation frames that come first). Returns `false` if nothing is
    /// scheduled.
    pub fn fire_next_timer(&self) -> bool {
        match self.next_timer_due() {
            Some(due) => {
                self.advance_to(due);
                true
            }
            None => false,
        }
    }

    /// Run every pending animation to completion without firing timers
    /// scheduled after the last completion.
    pub fn finish_animations(&self) -> usize {
        let mut steps = 0;
        loop {
            let end = {
                let state = self.state.borrow();
                state
                    .animations
                    .iter()
                    .map(|a| a.started_at + a.animation.duration)
                    .max()
            };
            match end {
                Some(end) => steps += self.advance_to(end.max(self.now())),
                None => return steps,
            }
        }
    }

    /// Run one callback due at or before `target`.
    fn step(&self, target: Duration) -> bool {
        let due = {
            let state = self.state.borrow();
            match state.next_due() {
                Some((at, due)) if at <= target => Some((at, due)),
                _ => None,
            }
        };
        let Some((at, due)) = due else {
            return false;
        };
        match due {
            Due::Timer(index) => self.fire_timer(index, at),
            Due::Frame(index) => self.run_frame(index, at),
        }
        true
    }

    fn fire_timer(&self, index: usize, at: Duration) {
        let timer = {
            let mut state = self.state.borrow_mut();
            state.now = state.now.max(at);
            let timer = state.timers.remove(index);
            state.log.push(HostEvent::TimerFired { id: timer.id, at });
            timer
        };
        tracing::trace!(timer = timer.id.0, at_ms = at.as_millis() as u64, "virtual timer fired");
        (timer.callback)();
    }

    fn run_frame(&self, index: usize, at: Duration) {
        let mut anim = {
            let mut state = self.state.borrow_mut();
            state.now = state.now.max(at);
            state.animations.remove(index)
        };
        let elapsed = at.saturating_sub(anim.started_at);
        let done = elapsed >= anim.animation.duration;
        (anim.on_progress)(anim.animation.value_after(elapsed));

        if done {
            self.state
                .borrow_mut()
                .log
                .push(HostEvent::AnimationCompleted { id: anim.id, at });
            tracing::trace!(animation = anim.id.0, "virtual animation completed");
            (anim.on_complete)();
        } else {
            let mut state = self.state.borrow_mut();
            let end = anim.started_at + anim.animation.duration;
            anim.next_frame = (at + state.frame_interval).min(end);
            state.animations.push(anim);
        }
    }
}

impl TimerHost for VirtualHost {
    fn schedule_once(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        let mut state = self.state.borrow_mut();
        let id = TimerId(state.allocate_id());
        let at = state.now;
        state.timers.push(PendingTimer {
            id,
            due: at + delay,
            callback,
        });
        state.log.push(HostEvent::TimerScheduled { id, at, delay });
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(pos) = state.timers.iter().position(|t| t.id == id) else {
            return false;
        };
        state.timers.remove(pos);
        let at = state.now;
        state.log.push(HostEvent::TimerCancelled { id, at });
        true
    }
}

impl AnimationHost for VirtualHost {
    fn animate(
        &self,
        animation: PropertyAnimation,
        on_progress: Box<dyn FnMut(f64)>,
        on_complete: Box<dyn FnOnce()>,
    ) -> AnimationId {
        let mut state = self.state.borrow_mut();
        let id = AnimationId(state.allocate_id());
        let at = state.now;
        let first_frame = (at + state.frame_interval).min(at + animation.duration);
        state.animations.push(RunningAnimation {
            id,
            started_at: at,
            next_frame: first_frame,
            animation,
            on_progress,
            on_complete,
        });
        state.log.push(HostEvent::AnimationStarted { id, at, animation });
        id
    }
}
