//! Ranking relations over workspace entries.
//!
//! Value ties are detected with exact `==`, never with a tolerance, so the
//! same input bits always select and order the same entries. Values that are
//! unordered with themselves (NaN) rank behind every ordered value in both
//! modes and among themselves by position, which keeps every relation here a
//! strict total order.

use super::lane::Entry;

/// Strict "ranks ahead of" relation used by selection and sorting.
pub trait Relation<T> {
    fn precedes(&self, a: &Entry<T>, b: &Entry<T>) -> bool;
}

#[inline]
#[allow(clippy::eq_op)]
fn is_unordered<T: PartialEq>(value: &T) -> bool {
    value != value
}

/// Largest value first, equal values by lower index.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompareMax;

/// Smallest value first, equal values by lower index.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompareMin;

/// Lower original index first, values ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexAscending;

impl<T: PartialOrd> Relation<T> for CompareMax {
    #[inline]
    fn precedes(&self, a: &Entry<T>, b: &Entry<T>) -> bool {
        match (is_unordered(&a.value), is_unordered(&b.value)) {
            (false, false) => {
                if a.value == b.value {
                    a.index < b.index
                } else {
                    a.value > b.value
                }
            },
            (false, true) => true,
            (true, false) => false,
            (true, true) => a.index < b.index,
        }
    }
}

impl<T: PartialOrd> Relation<T> for CompareMin {
    #[inline]
    fn precedes(&self, a: &Entry<T>, b: &Entry<T>) -> bool {
        match (is_unordered(&a.value), is_unordered(&b.value)) {
            (false, false) => {
                if a.value == b.value {
                    a.index < b.index
                } else {
                    a.value < b.value
                }
            },
            (false, true) => true,
            (true, false) => false,
            (true, true) => a.index < b.index,
        }
    }
}

impl<T> Relation<T> for IndexAscending {
    #[inline]
    fn precedes(&self, a: &Entry<T>, b: &Entry<T>) -> bool {
        a.index < b.index
    }
}
