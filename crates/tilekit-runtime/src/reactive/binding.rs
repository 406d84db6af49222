#![forbid(unsafe_code)]

//! Read bindings and per-control subscription scopes.
//!
//! A [`Binding<T>`] is a lazily evaluated view over reactive state. Hosts
//! render a slot by mapping its observable item through an item template:
//!
//! ```ignore
//! use tilekit_runtime::reactive::{Observable, bind_mapped};
//!
//! let item = Observable::new(Some("A"));
//! let label = bind_mapped(&item, |v| v.map(|s| format!("<{s}>")));
//! assert_eq!(label.get().as_deref(), Some("<A>"));
//! ```
//!
//! A [`BindingScope`] owns the subscriptions a control makes on its inputs;
//! dropping it disconnects the control.

use std::fmt;
use std::rc::Rc;

use super::observable::{Change, Observable, Subscription};

/// Read-only view that re-evaluates on every `get()`.
pub struct Binding<T> {
    eval: Rc<dyn Fn() -> T>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            eval: Rc::clone(&self.eval),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Binding").field(&self.get()).finish()
    }
}

impl<T: 'static> Binding<T> {
    pub fn new(eval: impl Fn() -> T + 'static) -> Self {
        Self {
            eval: Rc::new(eval),
        }
    }

    /// Current value; never cached.
    #[must_use]
    pub fn get(&self) -> T {
        (self.eval)()
    }

    /// Compose a further transform.
    pub fn then<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Binding<U> {
        let eval = self.eval;
        Binding::new(move || f(eval()))
    }
}

/// Binding that reads `source` as is.
pub fn bind_observable<T: Clone + PartialEq + 'static>(source: &Observable<T>) -> Binding<T> {
    let source = source.clone();
    Binding::new(move || source.get())
}

/// Binding that reads `source` through `map` without cloning the value.
pub fn bind_mapped<S: Clone + PartialEq + 'static, T: 'static>(
    source: &Observable<S>,
    map: impl Fn(&S) -> T + 'static,
) -> Binding<T> {
    let source = source.clone();
    Binding::new(move || source.with(&map))
}

/// Subscriptions owned by one control.
#[derive(Default)]
pub struct BindingScope {
    subscriptions: Vec<Subscription>,
}

impl BindingScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `sub` alive for the lifetime of the scope.
    pub fn hold(&mut self, sub: Subscription) {
        self.subscriptions.push(sub);
    }

    /// Subscribe to `source` for the lifetime of the scope.
    pub fn subscribe<T: Clone + PartialEq + 'static>(
        &mut self,
        source: &Observable<T>,
        callback: impl Fn(&Change<T>) + 'static,
    ) -> &mut Self {
        self.hold(source.subscribe(callback));
        self
    }

    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Drop every subscription now; the scope stays usable.
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}

impl fmt::Debug for BindingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingScope")
            .field("binding_count", &self.subscriptions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tilekit_core::{Direction, Size};

    #[test]
    fn slot_label_follows_item() {
        let item = Observable::new(Some("weather"));
        let label = bind_mapped(&item, |v| v.map(str::len));
        assert_eq!(label.get(), Some(7));

        item.set(None);
        assert_eq!(label.get(), None);
    }

    #[test]
    fn then_composes_transforms() {
        let size = Observable::new(Size::new(120.0, 40.0));
        let container_height = bind_observable(&size).then(|s| s.height * 2.0);
        assert_eq!(container_height.get(), 80.0);

        size.set(Size::new(120.0, 60.0));
        assert_eq!(container_height.get(), 120.0);
    }

    #[test]
    fn clones_read_the_same_source() {
        let direction = Observable::new(Direction::Up);
        let a = bind_observable(&direction);
        let b = a.clone();
        direction.set(Direction::Left);
        assert_eq!(a.get(), Direction::Left);
        assert_eq!(b.get(), Direction::Left);
        assert_eq!(format!("{a:?}"), "Binding(Left)");
    }

    #[test]
    fn custom_binding_is_never_cached() {
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let b = Binding::new(move || {
            c.set(c.get() + 1);
            c.get()
        });
        assert_eq!((b.get(), b.get()), (1, 2));
    }

    #[test]
    fn scope_disconnects_on_drop() {
        let direction = Observable::new(Direction::Up);
        let seen = Rc::new(Cell::new(0));
        {
            let mut scope = BindingScope::new();
            let s = Rc::clone(&seen);
            scope.subscribe(&direction, move |_| s.set(s.get() + 1));
            direction.set(Direction::Left);
            assert_eq!(direction.subscriber_count(), 1);
        }
        direction.set(Direction::Up);
        assert_eq!(seen.get(), 1);
        assert_eq!(direction.subscriber_count(), 0);
    }

    #[test]
    fn scope_tracks_and_clears_inputs() {
        let size = Observable::new(Size::ZERO);
        let direction = Observable::new(Direction::Up);
        let hits = Rc::new(Cell::new(0));
        let (h1, h2) = (Rc::clone(&hits), Rc::clone(&hits));

        let mut scope = BindingScope::new();
        scope
            .subscribe(&size, move |_| h1.set(h1.get() + 1))
            .subscribe(&direction, move |_| h2.set(h2.get() + 1));
        scope.hold(size.subscribe(|_| {}));
        assert_eq!(scope.binding_count(), 3);
        assert_eq!(format!("{scope:?}"), "BindingScope { binding_count: 3 }");

        size.set(Size::new(1.0, 1.0));
        direction.set(Direction::Left);
        assert_eq!(hits.get(), 2);

        scope.clear();
        assert!(scope.is_empty());
        size.set(Size::ZERO);
        assert_eq!(hits.get(), 2);
    }
}
