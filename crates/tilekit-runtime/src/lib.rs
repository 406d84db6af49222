#![forbid(unsafe_code)]

//! Runtime plumbing for TileKit controls.
//!
//! # Role in TileKit
//! Controls never talk to a platform directly. They observe their inputs
//! through [`reactive::Observable`] properties and borrow time from the host
//! through two narrow facilities:
//!
//! - [`host::TimerHost`]: schedule-once and cancel.
//! - [`host::AnimationHost`]: run a [`animation::PropertyAnimation`] and
//!   report progress plus a single completion.
//!
//! Randomized delays come from an injectable [`interval::IntervalProvider`]
//! so tests can script them.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`); a control and its
//! host share one callback queue.

pub mod animation;
pub mod host;
pub mod interval;
pub mod reactive;
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use animation::{Easing, FillBehavior, PropertyAnimation};
pub use host::{AnimationHost, AnimationId, TimerHost, TimerId};
pub use interval::{FixedInterval, IntervalProvider, ScriptedIntervals, UniformInterval};
pub use reactive::{Binding, BindingScope, Change, Observable, Subscription};
#[cfg(any(test, feature = "test-helpers"))]
pub use testing::{HostEvent, VirtualHost};
