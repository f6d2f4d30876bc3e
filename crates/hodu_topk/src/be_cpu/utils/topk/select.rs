//! Partition-based partial selection (nth-element).

use super::{
    lane::Entry,
    relation::Relation,
    sort::{insertion_sort, partition, INSERTION_SORT_THRESHOLD},
};

/// Reorders `data` so that `data[..k]` holds exactly the `k` entries that rank
/// first under `relation`, in no particular order.
///
/// The remainder stays a permutation of the other entries. Pivots are always
/// the last element of the active window, so the result is fully
/// deterministic. Expected linear time, quadratic in the worst case.
pub fn partial_select<T, R>(data: &mut [Entry<T>], k: usize, relation: &R)
where
    R: Relation<T> + ?Sized,
{
    debug_assert!(k <= data.len());

    // Everything in [0, lo) ranks ahead of [lo, len); everything in [0, hi)
    // ranks ahead of [hi, len).
    let mut lo = 0;
    let mut hi = data.len();
    while lo < k && k < hi {
        let window = &mut data[lo..hi];
        if window.len() < INSERTION_SORT_THRESHOLD {
            insertion_sort(window, relation);
            return;
        }
        let q = lo + partition(window, relation);
        if q < k {
            lo = q + 1;
        } else {
            hi = q;
        }
    }
}
