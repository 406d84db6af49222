#![forbid(unsafe_code)]

//! Observable properties: the change-notification surface controls watch.
//!
//! An [`Observable<T>`] is a shared, versioned value. Assigning an equal
//! value is ignored; assigning a different one bumps the version and calls
//! every subscriber, in registration order, with a [`Change`] carrying the
//! old and new values.
//!
//! Subscriptions are RAII: dropping the [`Subscription`] removes the
//! callback from the observable immediately.
//!
//! # Failure Modes
//!
//! - The value borrow is released before callbacks run, so a callback may
//!   read or `set()` the observable that notified it. Each differing `set()`
//!   nests another round of notifications; a callback that keeps changing
//!   its own observable recurses until the stack overflows.
//! - The closure passed to `update()` runs under a mutable borrow; touching
//!   the same observable from inside it panics.
//! - A subscription dropped while a notification is being delivered still
//!   receives that notification; it is gone from the next one.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&Change<T>)>;

/// A value transition delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change<T> {
    pub old: T,
    pub new: T,
}

struct Subscriber<T> {
    id: u64,
    callback: Callback<T>,
}

struct Inner<T> {
    value: T,
    version: u64,
    next_id: u64,
    subscribers: Vec<Subscriber<T>>,
}

/// A shared, version-tracked value with change notification.
///
/// Clones are handles to the same value and the same subscriber list.
pub struct Observable<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Default + Clone + PartialEq + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create an observable at version 0 with no subscribers.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                version: 0,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Assign `value`, notifying subscribers if it differs.
    ///
    /// Safe to call from a subscriber; the nested notification completes
    /// before the outer one continues.
    pub fn set(&self, value: T) {
        let old = {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.version += 1;
            std::mem::replace(&mut inner.value, value)
        };
        self.notify(old);
    }

    /// Mutate in place; subscribers are notified only if the result differs.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let old = {
            let mut inner = self.inner.borrow_mut();
            let before = inner.value.clone();
            f(&mut inner.value);
            if inner.value == before {
                return;
            }
            inner.version += 1;
            before
        };
        self.notify(old);
    }

    /// Register `callback` until the returned guard is dropped.
    pub fn subscribe(&self, callback: impl Fn(&Change<T>) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push(Subscriber {
                id,
                callback: Rc::new(callback),
            });
            id
        };
        let weak: Weak<RefCell<Inner<T>>> = Rc::downgrade(&self.inner);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().subscribers.retain(|s| s.id != id);
                }
            })),
        }
    }

    /// Number of value-changing assignments so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self, old: T) {
        let (callbacks, new): (Vec<Callback<T>>, T) = {
            let inner = self.inner.borrow();
            let callbacks = inner
                .subscribers
                .iter()
                .map(|s| Rc::clone(&s.callback))
                .collect();
            (callbacks, inner.value.clone())
        };
        let change = Change { old, new };
        for callback in &callbacks {
            callback(&change);
        }
    }
}

/// Guard returned by [`Observable::subscribe`]; dropping it unsubscribes.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
