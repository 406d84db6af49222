#![forbid(unsafe_code)]

//! Transition controller: gates advances and describes the slide.
//!
//! A slide animates the shared [`Translation`] from 0 to `-travel` along
//! the direction's axis, then snaps back to 0 while the buffer pair is
//! rebound. Only one slide runs at a time; each is identified by a
//! [`TransitionToken`] so a late completion from a superseded slide is
//! recognised.
//!
//! # Failure Modes
//!
//! None of the conditions below is an error. Each produces an
//! [`Advance::Skipped`] value and a `debug` event:
//!
//! | Condition | Outcome |
//! |-----------|---------|
//! | source absent or empty | `EmptySource`, slots untouched |
//! | one item | `SingleItemSource`, no motion |
//! | slide still running | `TransitionInFlight`, its completion rebinds |
//!
//! An unsized host still animates with zero travel, and a count change
//! between ticks is reported but does not block the advance.

use std::fmt;
use std::time::Duration;

use tilekit_core::Axis;
use tilekit_runtime::{AnimationId, Easing, FillBehavior, PropertyAnimation};
use tracing::debug;

/// Offset applied to both slots.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Translation {
    pub x: f64,
    pub y: f64,
}

impl Translation {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Offset of `value` along `axis`.
    #[must_use]
    pub const fn along(axis: Axis, value: f64) -> Self {
        match axis {
            Axis::Vertical => Self { x: 0.0, y: value },
            Axis::Horizontal => Self { x: value, y: 0.0 },
        }
    }

    #[must_use]
    pub const fn component(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.y,
            Axis::Horizontal => self.x,
        }
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Why an advance did not start a slide, or what it noticed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degradation {
    EmptySource,
    SingleItemSource,
    UnresizedHost,
    SourceMutated { previous: usize, current: usize },
    TransitionInFlight,
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySource => write!(f, "items source is absent or empty"),
            Self::SingleItemSource => write!(f, "items source has a single item"),
            Self::UnresizedHost => write!(f, "host has not reported a size"),
            Self::SourceMutated { previous, current } => {
                write!(f, "item count changed from {previous} to {current}")
            }
            Self::TransitionInFlight => write!(f, "previous slide still running"),
        }
    }
}

/// Result of one `advance()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    /// A slide was handed to the animation host.
    Animating {
        animation: AnimationId,
        travel_distance: f64,
    },
    /// Nothing moved.
    Skipped(Degradation),
}

impl Advance {
    #[must_use]
    pub fn is_animating(&self) -> bool {
        matches!(self, Self::Animating { .. })
    }
}

/// Identifies one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionToken(u64);

#[derive(Debug, Clone, Copy)]
struct InFlight {
    token: TransitionToken,
    frames_detached: bool,
}

/// Tracks the running slide and the counts seen between ticks.
#[derive(Debug)]
pub struct TransitionController {
    duration: Duration,
    easing: Easing,
    in_flight: Option<InFlight>,
    next_token: u64,
    completed: u64,
    last_count: Option<usize>,
}

impl TransitionController {
    #[must_use]
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            in_flight: None,
            next_token: 0,
            completed: 0,
            last_count: None,
        }
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Number of slides that ran to completion.
    #[must_use]
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Decide whether an advance over `count` items may start a slide.
    ///
    /// Records `count` for the next call; a change is logged as
    /// [`Degradation::SourceMutated`] and returned alongside `Ok`.
    pub fn check(&mut self, count: usize) -> Result<Option<Degradation>, Degradation> {
        let mutated = match self.last_count.replace(count) {
            Some(previous) if previous != count => {
                let note = Degradation::SourceMutated {
                    previous,
                    current: count,
                };
                debug!(previous, current = count, "{note}");
                Some(note)
            }
            _ => None,
        };
        let blocked = match count {
            0 => Some(Degradation::EmptySource),
            1 => Some(Degradation::SingleItemSource),
            _ if self.in_flight.is_some() => Some(Degradation::TransitionInFlight),
            _ => None,
        };
        match blocked {
            Some(reason) => {
                debug!(count, reason = %reason, "advance skipped");
                Err(reason)
            }
            None => Ok(mutated),
        }
    }

    /// The slide animation for `travel_distance`.
    #[must_use]
    pub fn animation(&self, travel_distance: f64) -> PropertyAnimation {
        PropertyAnimation::new(0.0, -travel_distance, self.duration)
            .easing(self.easing)
            .fill(FillBehavior::HoldEnd)
    }

    /// Mark a slide as started.
    pub fn begin(&mut self) -> TransitionToken {
        let token = TransitionToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        self.in_flight = Some(InFlight {
            token,
            frames_detached: false,
        });
        token
    }

    /// Whether progress frames of `token` should move the offset.
    #[must_use]
    pub fn accepts_frames(&self, token: TransitionToken) -> bool {
        self.in_flight
            .is_some_and(|f| f.token == token && !f.frames_detached)
    }

    /// Stop applying frames of the running slide; its completion still lands.
    pub fn detach_frames(&mut self) {
        if let Some(flight) = self.in_flight.as_mut() {
            flight.frames_detached = true;
        }
    }

    /// Mark `token` as finished. Returns `false` for a stale token.
    pub fn finish(&mut self, token: TransitionToken) -> bool {
        match self.in_flight {
            Some(flight) if flight.token == token => {
                self.in_flight = None;
                self.completed += 1;
                true
            }
            _ => false,
        }
    }

    /// Forget the recorded count, e.g. after the source was replaced.
    pub fn forget_count(&mut self) {
        self.last_count = None;
    }
}
