#![forbid(unsafe_code)]

//! Core: value types shared by every TileKit layer.
//!
//! # Role in TileKit
//! `tilekit-core` holds the plain data the other crates agree on: pixel
//! geometry ([`geometry::Size`], [`geometry::Rect`]), the slide
//! [`direction::Direction`], and the host [`lifecycle::Lifecycle`] signal.
//! Nothing here owns timers, callbacks, or shared state; those live in
//! `tilekit-runtime`.

pub mod direction;
pub mod geometry;
pub mod lifecycle;
pub mod logging;

pub use direction::Direction;
pub use geometry::{Axis, Rect, Size};
pub use lifecycle::Lifecycle;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, trace, warn};
