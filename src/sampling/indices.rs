//! Canonical enumeration of subsets with at most two elements.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FusedIterator;

/// An ascending tuple of at most two distinct positions.
///
/// The derived ordering is the canonical enumeration order: the empty set,
/// then singletons by position, then pairs lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SubsetIndex {
    /// The empty subset; its coefficient is the constant offset.
    Empty,
    /// `{i}`; its coefficient is the linear term of variable `i`.
    Single(usize),
    /// `{i, j}` with `i < j`; its coefficient is the pairwise term.
    Pair(usize, usize),
}

impl SubsetIndex {
    /// Number of positions in the subset.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Single(_) => 1,
            Self::Pair(..) => 2,
        }
    }

    /// True for [`SubsetIndex::Empty`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Positions in ascending order.
    pub fn positions(&self) -> impl Iterator<Item = usize> {
        let (first, second) = match *self {
            Self::Empty => (None, None),
            Self::Single(i) => (Some(i), None),
            Self::Pair(i, j) => (Some(i), Some(j)),
        };
        first.into_iter().chain(second)
    }

    /// Position of this subset in the enumeration for `n` variables, or
    /// `None` when it does not belong to that enumeration.
    ///
    /// ```
    /// use qubify::sampling::SubsetIndex;
    ///
    /// assert_eq!(SubsetIndex::Empty.position(3), Some(0));
    /// assert_eq!(SubsetIndex::Single(2).position(3), Some(3));
    /// assert_eq!(SubsetIndex::Pair(1, 2).position(3), Some(6));
    /// assert_eq!(SubsetIndex::Pair(2, 1).position(3), None);
    /// ```
    #[must_use]
    pub fn position(&self, n: usize) -> Option<usize> {
        match *self {
            Self::Empty => Some(0),
            Self::Single(i) if i < n => Some(1 + i),
            Self::Pair(i, j) if i < j && j < n => {
                // pairs starting before i: (n-1) + (n-2) + ... + (n-i)
                let before = i * (2 * n - i - 1) / 2;
                Some(1 + n + before + (j - i - 1))
            }
            _ => None,
        }
    }
}

impl fmt::Display for SubsetIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "()"),
            Self::Single(i) => write!(f, "({i},)"),
            Self::Pair(i, j) => write!(f, "({i}, {j})"),
        }
    }
}

/// Number of subsets of size ≤ 2 of an `n`-element set: `1 + n + n(n-1)/2`.
#[must_use]
pub fn subset_count(n: usize) -> usize {
    1 + n + n * n.saturating_sub(1) / 2
}

/// Iterator over the canonical subset order for `n` variables.
///
/// Cloning the iterator (or calling [`indices`] again) restarts the
/// enumeration; it has no other state.
#[derive(Debug, Clone)]
pub struct IndexEnumerator {
    n: usize,
    next: Option<SubsetIndex>,
    remaining: usize,
}

impl IndexEnumerator {
    /// Enumerator for `n` variables.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            n,
            next: Some(SubsetIndex::Empty),
            remaining: subset_count(n),
        }
    }

    /// Number of variables being enumerated.
    #[must_use]
    pub fn input_size(&self) -> usize {
        self.n
    }

    fn successor(&self, current: SubsetIndex) -> Option<SubsetIndex> {
        let n = self.n;
        match current {
            SubsetIndex::Empty if n > 0 => Some(SubsetIndex::Single(0)),
            SubsetIndex::Single(i) if i + 1 < n => Some(SubsetIndex::Single(i + 1)),
            SubsetIndex::Single(_) if n >= 2 => Some(SubsetIndex::Pair(0, 1)),
            SubsetIndex::Pair(i, j) if j + 1 < n => Some(SubsetIndex::Pair(i, j + 1)),
            SubsetIndex::Pair(i, _) if i + 2 < n => Some(SubsetIndex::Pair(i + 1, i + 2)),
            _ => None,
        }
    }
}

impl Iterator for IndexEnumerator {
    type Item = SubsetIndex;

    fn next(&mut self) -> Option<SubsetIndex> {
        let current = self.next?;
        self.next = self.successor(current);
        self.remaining -= 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for IndexEnumerator {}

impl FusedIterator for IndexEnumerator {}

/// Canonical subset order for `n` variables.
#[must_use]
pub fn indices(n: usize) -> IndexEnumerator {
    IndexEnumerator::new(n)
}
