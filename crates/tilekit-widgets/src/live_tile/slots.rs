#![forbid(unsafe_code)]

//! Buffer pair: the two slots a tile slides between.
//!
//! The `Current` slot holds the item on screen; the `Next` slot holds the
//! item entering during a slide. Slot contents are observables, so a host
//! renders each slot by subscribing or by reading a [`Binding`] built from
//! its [`ItemTemplate`].
//!
//! # Invariants
//!
//! 1. After a completed slide `current = item_at(i)` and
//!    `next = item_at(i + 1)` for the current index `i`.
//! 2. An empty or absent source never overwrites slot contents.

use std::fmt;
use std::rc::Rc;

use tilekit_runtime::reactive::bind_mapped;
use tilekit_runtime::{Binding, Change, Observable, Subscription};

use super::source::SourceView;

/// Which slot of the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotRole {
    /// Occupies the visible region at rest.
    Current,
    /// Occupies the off-screen region and slides in.
    Next,
}

impl SlotRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Next => "next",
        }
    }
}

/// Host-supplied visual template mapping an item to a rendered value.
pub struct ItemTemplate<T, V> {
    render: Rc<dyn Fn(&T) -> V>,
}

impl<T, V> Clone for ItemTemplate<T, V> {
    fn clone(&self) -> Self {
        Self {
            render: Rc::clone(&self.render),
        }
    }
}

impl<T, V> fmt::Debug for ItemTemplate<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemTemplate").finish_non_exhaustive()
    }
}

impl<T, V> ItemTemplate<T, V> {
    pub fn new(render: impl Fn(&T) -> V + 'static) -> Self {
        Self {
            render: Rc::new(render),
        }
    }

    /// Render one item.
    pub fn render(&self, item: &T) -> V {
        (self.render)(item)
    }
}

/// One slot: an observable item plus its role.
pub struct SlotBinding<T> {
    role: SlotRole,
    item: Observable<Option<T>>,
}

impl<T: fmt::Debug> fmt::Debug for SlotBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotBinding")
            .field("role", &self.role)
            .field("item", &self.item)
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> SlotBinding<T> {
    fn new(role: SlotRole) -> Self {
        Self {
            role,
            item: Observable::new(None),
        }
    }

    #[must_use]
    pub fn role(&self) -> SlotRole {
        self.role
    }

    /// The bound item, `None` until the first successful bind.
    #[must_use]
    pub fn item(&self) -> Option<T> {
        self.item.get()
    }

    /// The underlying observable, for hosts that subscribe.
    #[must_use]
    pub fn observe(&self) -> &Observable<Option<T>> {
        &self.item
    }

    /// Subscribe to content changes.
    pub fn subscribe(&self, callback: impl Fn(&Change<Option<T>>) + 'static) -> Subscription {
        self.item.subscribe(callback)
    }

    /// Live binding of this slot through `template`.
    pub fn render_with<V: 'static>(&self, template: &ItemTemplate<T, V>) -> Binding<Option<V>> {
        let template = template.clone();
        bind_mapped(&self.item, move |item| item.as_ref().map(|it| template.render(it)))
    }

    pub(crate) fn bind(&self, item: Option<T>) {
        self.item.set(item);
    }
}

/// The `Current`/`Next` slot pair.
pub struct BufferPair<T> {
    current: SlotBinding<T>,
    next: SlotBinding<T>,
}

impl<T: fmt::Debug> fmt::Debug for BufferPair<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPair")
            .field("current", &self.current)
            .field("next", &self.next)
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Default for BufferPair<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + PartialEq + 'static> BufferPair<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: SlotBinding::new(SlotRole::Current),
            next: SlotBinding::new(SlotRole::Next),
        }
    }

    #[must_use]
    pub fn current(&self) -> &SlotBinding<T> {
        &self.current
    }

    #[must_use]
    pub fn next(&self) -> &SlotBinding<T> {
        &self.next
    }

    #[must_use]
    pub fn slot(&self, role: SlotRole) -> &SlotBinding<T> {
        match role {
            SlotRole::Current => &self.current,
            SlotRole::Next => &self.next,
        }
    }

    /// Bind `current = item_at(index)`, `next = item_at(index + 1)`.
    ///
    /// Returns `false` and leaves both slots untouched when the source is
    /// absent or empty.
    pub fn bind_from(&self, view: &SourceView<'_, T>, index: u64) -> bool {
        if view.count() == 0 {
            return false;
        }
        self.current.bind(view.item_at(index));
        self.next.bind(view.item_at(index.wrapping_add(1)));
        true
    }

    /// Place the incoming item in the `Next` slot ahead of a slide.
    pub fn stage_incoming(&self, item: Option<T>) {
        if item.is_some() {
            self.next.bind(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live_tile::source::ItemsSource;
    use std::cell::RefCell;

    #[test]
    fn fresh_pair_is_unbound() {
        let pair: BufferPair<&str> = BufferPair::new();
        assert_eq!(pair.current().item(), None);
        assert_eq!(pair.next().item(), None);
        assert_eq!(pair.slot(SlotRole::Next).role(), SlotRole::Next);
    }

    #[test]
    fn bind_from_fills_current_and_next() {
        let source = ItemsSource::from(vec!["A", "B", "C"]);
        let pair = BufferPair::new();
        assert!(pair.bind_from(&SourceView::new(Some(&source)), 2));
        assert_eq!(pair.current().item(), Some("C"));
        assert_eq!(pair.next().item(), Some("A"));
    }

    #[test]
    fn single_item_fills_both_slots() {
        let source = ItemsSource::from(vec!["only"]);
        let pair = BufferPair::new();
        pair.bind_from(&SourceView::new(Some(&source)), 0);
        assert_eq!(pair.current().item(), Some("only"));
        assert_eq!(pair.next().item(), Some("only"));
    }

    #[test]
    fn empty_source_retains_content() {
        let full = ItemsSource::from(vec![1, 2]);
        let empty = ItemsSource::from(Vec::<i32>::new());
        let pair = BufferPair::new();
        pair.bind_from(&SourceView::new(Some(&full)), 0);

        assert!(!pair.bind_from(&SourceView::new(Some(&empty)), 5));
        assert!(!pair.bind_from(&SourceView::new(None), 5));
        assert_eq!(pair.current().item(), Some(1));
        assert_eq!(pair.next().item(), Some(2));
    }

    #[test]
    fn stage_incoming_ignores_none() {
        let pair = BufferPair::new();
        pair.stage_incoming(Some('x'));
        pair.stage_incoming(None);
        assert_eq!(pair.next().item(), Some('x'));
        assert_eq!(pair.current().item(), None);
    }

    #[test]
    fn render_with_tracks_slot_changes() {
        let source = ItemsSource::from(vec![1, 2, 3]);
        let pair = BufferPair::new();
        let template = ItemTemplate::new(|n: &i32| format!("#{n}"));
        let label = pair.current().render_with(&template);
        assert_eq!(label.get(), None);

        pair.bind_from(&SourceView::new(Some(&source)), 1);
        assert_eq!(label.get().as_deref(), Some("#2"));
    }

    #[test]
    fn subscribers_see_old_and_new() {
        let source = ItemsSource::from(vec!["A", "B", "C"]);
        let view = SourceView::new(Some(&source));
        let pair = BufferPair::new();
        let seen = std::rc::Rc::new(RefCell::new(Vec::new()));
        let s = std::rc::Rc::clone(&seen);
        let _sub = pair
            .current()
            .subscribe(move |c| s.borrow_mut().push((c.old, c.new)));

        pair.bind_from(&view, 0);
        pair.bind_from(&view, 0);
        pair.bind_from(&view, 1);
        assert_eq!(
            *seen.borrow(),
            vec![(None, Some("A")), (Some("A"), Some("B"))]
        );
    }
}
