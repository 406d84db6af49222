#![forbid(unsafe_code)]

//! Timer and animation facilities borrowed from the host.
//!
//! A control owns no thread and no clock. Everything temporal goes through
//! these two traits, which the embedding platform implements on top of its
//! UI-thread callback queue.
//!
//! # Contract
//!
//! 1. Callbacks never run synchronously inside `schedule_once` or `animate`;
//!    they run later, from the host's queue, on the same thread.
//! 2. A cancelled timer's callback never runs.
//! 3. `on_complete` of an animation runs exactly once, after the last
//!    `on_progress` call.
//!
//! Callbacks are boxed `'static` closures; controls hand out closures that
//! hold only weak references to themselves, so a host may keep a callback
//! alive past the control without leaking it.

use std::fmt;
use std::time::Duration;

use crate::animation::PropertyAnimation;

/// Handle to a scheduled one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Handle to a running property animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "animation#{}", self.0)
    }
}

/// One-shot timers on the host's callback queue.
pub trait TimerHost {
    /// Run `callback` once after `delay`.
    fn schedule_once(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId;

    /// Cancel a pending timer. Returns `false` if it already ran or was
    /// never scheduled.
    fn cancel(&self, id: TimerId) -> bool;
}

/// Scalar property animations on the host's callback queue.
pub trait AnimationHost {
    /// Start `animation`. `on_progress` receives each interpolated value
    /// the host renders; `on_complete` fires once the final value has been
    /// delivered.
    fn animate(
        &self,
        animation: PropertyAnimation,
        on_progress: Box<dyn FnMut(f64)>,
        on_complete: Box<dyn FnOnce()>,
    ) -> AnimationId;
}
