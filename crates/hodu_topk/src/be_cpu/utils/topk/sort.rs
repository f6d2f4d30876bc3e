//! Deterministic quicksort / insertion-sort hybrid.
//!
//! Output order depends only on the relation, never on platform sort
//! internals. The routine is allocation-free; recursion always descends into
//! the smaller partition so stack depth stays logarithmic.

use super::{lane::Entry, relation::Relation};

/// Ranges shorter than this are finished with insertion sort.
pub const INSERTION_SORT_THRESHOLD: usize = 10;

/// Insertion sort: each element is swapped leftward while it ranks ahead of
/// its left neighbour.
pub fn insertion_sort<T, R>(data: &mut [Entry<T>], relation: &R)
where
    R: Relation<T> + ?Sized,
{
    for i in 1..data.len() {
        let mut j = i;
        while j > 0 && relation.precedes(&data[j], &data[j - 1]) {
            data.swap(j, j - 1);
            j -= 1;
        }
    }
}

/// Lomuto partition around the last element.
///
/// Returns the pivot's final slot: everything before it ranks ahead of the
/// pivot, everything after does not. `data` must not be empty.
pub fn partition<T, R>(data: &mut [Entry<T>], relation: &R) -> usize
where
    R: Relation<T> + ?Sized,
{
    let pivot = data.len() - 1;
    let mut store = 0;
    for j in 0..pivot {
        if relation.precedes(&data[j], &data[pivot]) {
            data.swap(j, store);
            store += 1;
        }
    }
    data.swap(store, pivot);
    store
}

/// Fully orders `data` by `relation`.
pub fn hybrid_sort<T, R>(mut data: &mut [Entry<T>], relation: &R)
where
    R: Relation<T> + ?Sized,
{
    while data.len() >= INSERTION_SORT_THRESHOLD {
        let q = partition(data, relation);
        let (left, rest) = core::mem::take(&mut data).split_at_mut(q);
        let right = &mut rest[1..];
        if left.len() < right.len() {
            hybrid_sort(left, relation);
            data = right;
        } else {
            hybrid_sort(right, relation);
            data = left;
        }
    }
    insertion_sort(data, relation);
}
