#![forbid(unsafe_code)]

//! Reactive properties for TileKit controls.
//!
//! A control's inputs (items source, direction, available size, lifecycle)
//! are [`Observable`]s. The control registers one callback per input in a
//! [`BindingScope`] and reacts to each [`Change`]; its outputs (slot
//! contents, offset, geometry) are observables too, read by the host
//! directly or through a [`Binding`].
//!
//! Everything is `Rc`/`RefCell` based and lives on one thread.

pub mod binding;
pub mod observable;

pub use binding::{Binding, BindingScope, bind_mapped, bind_observable};
pub use observable::{Change, Observable, Subscription};
