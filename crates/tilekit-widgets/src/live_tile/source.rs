#![forbid(unsafe_code)]

//! Source adapter: one read-only view over heterogeneous collections.
//!
//! Hosts hand a tile either a random-access collection ([`IndexedSource`])
//! or something that can only be walked front to back
//! ([`EnumerableSource`]). [`SourceView`] flattens both into `count()` and
//! `item_at(index)`.
//!
//! # Invariants
//!
//! 1. `item_at(i)` reads index `i mod count()`; it is `None` when the source
//!    is absent or empty.
//! 2. Nothing is cached: every call re-reads the collection, so a caller
//!    mutating a [`SharedList`] between two ticks is observed on the next
//!    lookup (last write wins).
//! 3. [`ItemsSource`] equality is identity of the underlying collection, so
//!    re-assigning the same list is not a "source changed" event.
//!
//! # Performance
//!
//! | Source | `count()` | `item_at()` |
//! |--------|-----------|-------------|
//! | Indexed | O(1) | O(1) + clone |
//! | Enumerable | O(n) traversal | O(n) traversal |

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A collection with a known length and random access.
pub trait IndexedSource<T> {
    /// Number of items right now.
    fn len(&self) -> usize;

    /// Item at `index`, if in bounds.
    fn get(&self, index: usize) -> Option<T>;

    /// Whether the collection is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A collection that can only be enumerated.
pub trait EnumerableSource<T> {
    /// A fresh front-to-back walk over the items.
    fn items(&self) -> Box<dyn Iterator<Item = T> + '_>;
}

impl<T: Clone> IndexedSource<T> for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<T> {
        self.as_slice().get(index).cloned()
    }
}

impl<T: Clone> IndexedSource<T> for RefCell<Vec<T>> {
    fn len(&self) -> usize {
        self.borrow().len()
    }

    fn get(&self, index: usize) -> Option<T> {
        self.borrow().as_slice().get(index).cloned()
    }
}

/// Adapts a closure producing iterators into an [`EnumerableSource`].
struct IterFn<F>(F);

impl<T, I, F> EnumerableSource<T> for IterFn<F>
where
    F: Fn() -> I,
    I: Iterator<Item = T> + 'static,
{
    fn items(&self) -> Box<dyn Iterator<Item = T> + '_> {
        Box::new((self.0)())
    }
}

// ---------------------------------------------------------------------------
// ItemsSource
// ---------------------------------------------------------------------------

/// The `itemsSource` a host assigns to a tile.
pub enum ItemsSource<T> {
    Indexed(Rc<dyn IndexedSource<T>>),
    Enumerable(Rc<dyn EnumerableSource<T>>),
}

impl<T: 'static> ItemsSource<T> {
    /// Wrap a random-access collection.
    pub fn indexed(source: impl IndexedSource<T> + 'static) -> Self {
        Self::Indexed(Rc::new(source))
    }

    /// Wrap an enumerate-only collection.
    pub fn enumerable(source: impl EnumerableSource<T> + 'static) -> Self {
        Self::Enumerable(Rc::new(source))
    }

    /// Enumerable source backed by a closure that yields a fresh iterator
    /// on every walk.
    pub fn from_iter_fn<I>(make: impl Fn() -> I + 'static) -> Self
    where
        I: Iterator<Item = T> + 'static,
    {
        Self::Enumerable(Rc::new(IterFn(make)))
    }

    /// Whether the source supports O(1) counting and lookup.
    #[must_use]
    pub fn is_random_access(&self) -> bool {
        matches!(self, Self::Indexed(_))
    }
}

impl<T: Clone + 'static> From<Vec<T>> for ItemsSource<T> {
    fn from(items: Vec<T>) -> Self {
        Self::indexed(items)
    }
}

impl<T: Clone + 'static> From<&SharedList<T>> for ItemsSource<T> {
    fn from(list: &SharedList<T>) -> Self {
        let inner: Rc<dyn IndexedSource<T>> = list.inner.clone();
        Self::Indexed(inner)
    }
}

impl<T> Clone for ItemsSource<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Indexed(src) => Self::Indexed(Rc::clone(src)),
            Self::Enumerable(src) => Self::Enumerable(Rc::clone(src)),
        }
    }
}

impl<T> PartialEq for ItemsSource<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Indexed(a), Self::Indexed(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            (Self::Enumerable(a), Self::Enumerable(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl<T> fmt::Debug for ItemsSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indexed(src) => f
                .debug_struct("ItemsSource::Indexed")
                .field("len", &src.len())
                .finish(),
            Self::Enumerable(_) => f
                .debug_struct("ItemsSource::Enumerable")
                .finish_non_exhaustive(),
        }
    }
}

// ---------------------------------------------------------------------------
// SharedList
// ---------------------------------------------------------------------------

/// A caller-owned, mutable list a tile can rotate over.
///
/// Clones share storage. Mutations are visible to every tile bound to the
/// list on its next lookup.
pub struct SharedList<T> {
    inner: Rc<RefCell<Vec<T>>>,
}

impl<T> Clone for SharedList<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedList").field(&self.inner.borrow()).finish()
    }
}

impl<T> Default for SharedList<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> SharedList<T> {
    /// Create a list holding `items`.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(items)),
        }
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Append an item.
    pub fn push(&self, item: T) {
        self.inner.borrow_mut().push(item);
    }

    /// Remove and return the item at `index`, if in bounds.
    pub fn remove(&self, index: usize) -> Option<T> {
        let mut items = self.inner.borrow_mut();
        (index < items.len()).then(|| items.remove(index))
    }

    /// Remove every item.
    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }

    /// Swap in a whole new set of items.
    pub fn replace(&self, items: Vec<T>) -> Vec<T> {
        std::mem::replace(&mut *self.inner.borrow_mut(), items)
    }
}

// ---------------------------------------------------------------------------
// SourceView
// ---------------------------------------------------------------------------

/// Normalized `count` / `item_at` over an optional [`ItemsSource`].
pub struct SourceView<'a, T> {
    source: Option<&'a ItemsSource<T>>,
}

impl<'a, T> SourceView<'a, T> {
    /// View over `source` (`None` behaves as an empty collection).
    #[must_use]
    pub fn new(source: Option<&'a ItemsSource<T>>) -> Self {
        Self { source }
    }

    /// Number of items at call time.
    #[must_use]
    pub fn count(&self) -> usize {
        match self.source {
            None => 0,
            Some(ItemsSource::Indexed(src)) => src.len(),
            Some(ItemsSource::Enumerable(src)) => src.items().count(),
        }
    }

    /// Item at `index mod count()`, or `None` for an absent/empty source.
    #[must_use]
    pub fn item_at(&self, index: u64) -> Option<T> {
        let count = self.count();
        if count == 0 {
            return None;
        }
        let slot = (index % count as u64) as usize;
        match self.source? {
            ItemsSource::Indexed(src) => src.get(slot),
            ItemsSource::Enumerable(src) => src.items().nth(slot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn absent_source_is_empty() {
        let view: SourceView<'_, i32> = SourceView::new(None);
        assert_eq!(view.count(), 0);
        assert_eq!(view.item_at(0), None);
        assert_eq!(view.item_at(17), None);
    }

    #[test]
    fn empty_vec_yields_none() {
        let source = ItemsSource::from(Vec::<i32>::new());
        let view = SourceView::new(Some(&source));
        assert_eq!(view.count(), 0);
        assert_eq!(view.item_at(3), None);
    }

    #[test]
    fn indexed_lookup_wraps_modulo_count() {
        let source = ItemsSource::from(vec!["A", "B", "C"]);
        let view = SourceView::new(Some(&source));
        assert_eq!(view.count(), 3);
        assert_eq!(view.item_at(0), Some("A"));
        assert_eq!(view.item_at(2), Some("C"));
        assert_eq!(view.item_at(3), Some("A"));
        assert_eq!(view.item_at(3_000_000_001), Some("C"));
        assert_eq!(view.item_at(u64::MAX), Some("A"));
    }

    #[test]
    fn enumerable_source_is_traversed() {
        let walks = Rc::new(Cell::new(0));
        let w = Rc::clone(&walks);
        let source = ItemsSource::from_iter_fn(move || {
            w.set(w.get() + 1);
            (1..=4).map(|n| n * 10)
        });
        assert!(!source.is_random_access());

        let view = SourceView::new(Some(&source));
        assert_eq!(view.count(), 4);
        assert_eq!(view.item_at(5), Some(20));
        // count() once, then item_at() counts again and walks to the slot.
        assert_eq!(walks.get(), 3);
    }

    #[test]
    fn shared_list_mutations_are_visible() {
        let list = SharedList::new(vec!['a', 'b']);
        let source = ItemsSource::from(&list);
        let view = SourceView::new(Some(&source));
        assert_eq!(view.count(), 2);

        list.push('c');
        assert_eq!(view.count(), 3);
        assert_eq!(view.item_at(2), Some('c'));

        assert_eq!(list.remove(0), Some('a'));
        assert_eq!(list.remove(9), None);
        assert_eq!(view.item_at(0), Some('b'));

        list.clear();
        assert_eq!(view.item_at(0), None);
        assert!(list.is_empty());
    }

    #[test]
    fn equality_is_identity() {
        let list = SharedList::new(vec![1, 2]);
        let a = ItemsSource::from(&list);
        let b = ItemsSource::from(&list.clone());
        assert_eq!(a, b, "same backing list");

        let c = ItemsSource::from(vec![1, 2]);
        let d = ItemsSource::from(vec![1, 2]);
        assert_ne!(c, d, "equal contents, different collections");
        assert_eq!(c, c.clone());
    }

    #[test]
    fn replace_swaps_contents_in_place() {
        let list = SharedList::new(vec![1, 2, 3]);
        let source = ItemsSource::from(&list);
        let old = list.replace(vec![9]);
        assert_eq!(old, vec![1, 2, 3]);
        assert_eq!(SourceView::new(Some(&source)).item_at(4), Some(9));
    }

    #[test]
    fn debug_reports_kind() {
        let source = ItemsSource::from(vec![1, 2, 3]);
        assert!(format!("{source:?}").contains("len: 3"));
        let lazy = ItemsSource::from_iter_fn(|| 0..2);
        assert!(format!("{lazy:?}").contains("Enumerable"));
    }
}
