//! Persistent, structurally shared decision paths.
//!
//! A `DecisionPath` is a singly linked list of decisions stored newest-first.
//! Every cell is reference counted and immutable, so extending a path only
//! allocates one cell and every branch of the search tree shares the common
//! prefix of decisions with its siblings and ancestors.
//!
//! Each cell caches the length of the path it terminates, which makes `len()`
//! O(1). Reconstructing the decisions in the order they were taken is O(n).

use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::rc::Rc;

struct Cell<D> {
    decision: D,
    len: usize,
    parent: Option<Rc<Cell<D>>>,
}

/// An immutable sequence of decisions that shares structure with the paths it
/// was derived from.
pub struct DecisionPath<D> {
    head: Option<Rc<Cell<D>>>,
}

impl<D> DecisionPath<D> {
    /// The canonical zero-length path.
    #[must_use]
    pub const fn empty() -> Self {
        Self { head: None }
    }

    /// Returns a new path whose newest decision is `decision` and whose tail is
    /// `self`. `self` is left untouched and remains usable by other branches.
    #[must_use]
    pub fn push(&self, decision: D) -> Self {
        Self {
            head: Some(Rc::new(Cell {
                decision,
                len: self.len() + 1,
                parent: self.head.clone(),
            })),
        }
    }

    /// Number of decisions on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.head.as_ref().map_or(0, |cell| cell.len)
    }

    /// Returns `true` if no decision has been taken.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// The most recent decision, if any.
    #[must_use]
    pub fn last(&self) -> Option<&D> {
        self.head.as_ref().map(|cell| &cell.decision)
    }

    /// The path without its most recent decision, or `None` for the empty path.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.head.as_ref().map(|cell| Self {
            head: cell.parent.clone(),
        })
    }

    /// Iterates over the decisions from newest to oldest.
    pub fn iter(&self) -> Iter<'_, D> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Returns `true` if both paths are the very same chain of cells.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<D: Clone> DecisionPath<D> {
    /// The decisions in the order they were taken (oldest first).
    #[must_use]
    pub fn to_vec(&self) -> Vec<D> {
        let mut decisions: Vec<D> = self.iter().cloned().collect();
        decisions.reverse();
        decisions
    }
}

impl<D> Default for DecisionPath<D> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<D> Clone for DecisionPath<D> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
        }
    }
}

// Long paths would otherwise be freed recursively, one stack frame per cell.
impl<D> Drop for DecisionPath<D> {
    fn drop(&mut self) {
        let mut head = self.head.take();
        while let Some(cell) = head {
            match Rc::try_unwrap(cell) {
                Ok(mut cell) => head = cell.parent.take(),
                Err(_) => break,
            }
        }
    }
}

impl<D: PartialEq> PartialEq for DecisionPath<D> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.len() == other.len() && self.iter().eq(other.iter()))
    }
}

impl<D: Eq> Eq for DecisionPath<D> {}

impl<D: Hash> Hash for DecisionPath<D> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for decision in self {
            decision.hash(state);
        }
    }
}

impl<D: Debug> Debug for DecisionPath<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut decisions: Vec<&D> = self.iter().collect();
        decisions.reverse();
        f.debug_list().entries(decisions).finish()
    }
}

impl<D> FromIterator<D> for DecisionPath<D> {
    fn from_iter<T: IntoIterator<Item = D>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |path, decision| path.push(decision))
    }
}

impl<'a, D> IntoIterator for &'a DecisionPath<D> {
    type Item = &'a D;
    type IntoIter = Iter<'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Newest-to-oldest iterator over the decisions of a [`DecisionPath`].
pub struct Iter<'a, D> {
    next: Option<&'a Cell<D>>,
}

impl<'a, D> Iterator for Iter<'a, D> {
    type Item = &'a D;

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.next?;
        self.next = cell.parent.as_deref();
        Some(&cell.decision)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.next.map_or(0, |cell| cell.len);
        (remaining, Some(remaining))
    }
}

impl<D> ExactSizeIterator for Iter<'_, D> {}

impl<D> FusedIterator for Iter<'_, D> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_empty_path() {
        let path: DecisionPath<u8> = DecisionPath::empty();
        assert_eq!(path.len(), 0);
        assert!(path.is_empty());
        assert_eq!(path.last(), None);
        assert!(path.parent().is_none());
        assert!(path.to_vec().is_empty());
        assert_eq!(path.iter().count(), 0);
    }

    #[test]
    fn test_push_keeps_order_oldest_first() {
        let path = DecisionPath::empty().push(1).push(2).push(3);
        assert_eq!(path.len(), 3);
        assert_eq!(path.last(), Some(&3));
        assert_eq!(path.to_vec(), vec![1, 2, 3]);
        assert_eq!(path.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(path.iter().len(), 3);
    }

    #[test]
    fn test_siblings_share_parent_without_mutating_it() {
        let parent = DecisionPath::empty().push('a').push('b');
        let left = parent.push('l');
        let right = parent.push('r');

        assert_eq!(parent.to_vec(), vec!['a', 'b']);
        assert_eq!(left.to_vec(), vec!['a', 'b', 'l']);
        assert_eq!(right.to_vec(), vec!['a', 'b', 'r']);
        assert!(left.parent().is_some_and(|p| p.ptr_eq(&parent)));
        assert!(right.parent().is_some_and(|p| p.ptr_eq(&parent)));
    }

    #[test]
    fn test_equality_and_hash_are_by_content() {
        let a: DecisionPath<u32> = [1, 2, 3].into_iter().collect();
        let b = DecisionPath::empty().push(1).push(2).push(3);
        let c: DecisionPath<u32> = [1, 3, 2].into_iter().collect();

        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
        assert_ne!(a, c);
        assert_ne!(a, a.parent().unwrap());

        let set: FxHashSet<DecisionPath<u32>> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_debug_lists_oldest_first() {
        let path: DecisionPath<u8> = [4, 5].into_iter().collect();
        assert_eq!(format!("{path:?}"), "[4, 5]");
    }

    #[test]
    fn test_dropping_a_long_path_does_not_overflow() {
        let path: DecisionPath<u32> = (0..1_000_000).collect();
        assert_eq!(path.len(), 1_000_000);
        drop(path);
    }

    #[test]
    fn test_drop_leaves_shared_prefix_alive() {
        let parent: DecisionPath<u32> = (0..10).collect();
        let child = parent.push(10);
        drop(parent);
        assert_eq!(child.len(), 11);
        assert_eq!(child.to_vec(), (0..=10).collect::<Vec<_>>());
    }
}
