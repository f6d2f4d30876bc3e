//! Lane gather / scatter between strided buffers and the selection workspace.

use crate::compat::*;
use num_traits::{NumCast, PrimInt};

/// One workspace slot: a copied value and its original position along the axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry<T> {
    pub value: T,
    pub index: usize,
}

impl<T> Entry<T> {
    #[inline]
    pub fn new(value: T, index: usize) -> Self {
        Self { value, index }
    }
}

/// Fills `workspace` with the `len` entries of the lane starting at `offset`.
///
/// Indices run `0..len` in original order; any previous content is dropped.
#[inline]
pub fn gather_lane<T: Copy>(
    input: &[T],
    offset: usize,
    stride: usize,
    len: usize,
    workspace: &mut Vec<Entry<T>>,
) {
    workspace.clear();
    workspace.extend((0..len).map(|i| Entry::new(input[offset + i * stride], i)));
}

/// Writes the entries of `selected` to `values` / `indices`, one every `stride`
/// elements starting at `offset`.
///
/// Every index must be representable in `U`; callers check the axis length up
/// front. Debug builds assert it, release builds saturate to `U::max_value()`.
#[inline]
pub fn scatter_lane<T: Copy, U: PrimInt>(
    selected: &[Entry<T>],
    offset: usize,
    stride: usize,
    values: &mut [T],
    indices: &mut [U],
) {
    let mut pos = offset;
    for entry in selected {
        values[pos] = entry.value;
        let index = <U as NumCast>::from(entry.index);
        debug_assert!(index.is_some(), "index {} does not fit the index type", entry.index);
        indices[pos] = index.unwrap_or_else(U::max_value);
        pos += stride;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_strided_lane() {
        // column 1 of a [3, 4] row-major buffer
        let input: Vec<i32> = (0..12).collect();
        let mut ws = vec![Entry::new(-1, 99)];
        gather_lane(&input, 1, 4, 3, &mut ws);
        assert_eq!(ws, vec![Entry::new(1, 0), Entry::new(5, 1), Entry::new(9, 2)]);
    }

    #[test]
    fn test_scatter_leaves_other_slots() {
        let selected = [Entry::new(7.0f32, 2), Entry::new(3.0, 0)];
        let mut values = vec![0.0f32; 6];
        let mut indices = vec![-1i64; 6];
        scatter_lane(&selected, 1, 3, &mut values, &mut indices);
        assert_eq!(values, vec![0.0, 7.0, 0.0, 0.0, 3.0, 0.0]);
        assert_eq!(indices, vec![-1, 2, -1, -1, 0, -1]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "does not fit the index type")]
    fn test_scatter_rejects_unrepresentable_index() {
        let selected = [Entry::new(1u8, 300)];
        let mut values = vec![0u8; 1];
        let mut indices = vec![0i8; 1];
        scatter_lane(&selected, 0, 1, &mut values, &mut indices);
    }
}
