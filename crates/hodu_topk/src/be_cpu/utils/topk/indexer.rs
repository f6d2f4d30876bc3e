//! Axis-reordering lane indexer
//!
//! Walks every lane of a strided array as if the selection axis were the
//! innermost dimension, without transposing anything. Lanes are enumerated in
//! row-major order of the remaining dimensions.

use crate::types::Layout;
use smallvec::SmallVec;

/// Linear element offset of `coord` under `strides`, starting from `base`.
#[inline]
pub fn linear_offset(coord: &[usize], strides: &[usize], base: usize) -> usize {
    coord
        .iter()
        .zip(strides.iter())
        .fold(base, |acc, (&c, &s)| acc + c * s)
}

/// Offsets of the first element of one lane in the input and output buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneOffsets {
    pub input: usize,
    pub output: usize,
}

#[derive(Debug, Clone)]
pub struct LaneIndexer {
    outer_dims: SmallVec<[usize; 8]>,
    in_outer_strides: SmallVec<[usize; 8]>,
    out_outer_strides: SmallVec<[usize; 8]>,
    in_base: usize,
    in_axis_stride: usize,
    out_axis_stride: usize,
    axis_len: usize,
    lane_count: usize,
}

impl LaneIndexer {
    /// `input` and `out_shape` must already agree everywhere except at `axis`.
    pub fn new(input: &Layout, out_shape: &[usize], axis: usize) -> Self {
        let in_shape = input.get_shape();
        let in_strides = input.get_strides();
        let out_strides = Layout::compute_strides(out_shape);

        let mut outer_dims = SmallVec::new();
        let mut in_outer_strides = SmallVec::new();
        let mut out_outer_strides = SmallVec::new();
        for dim in (0..in_shape.len()).filter(|&d| d != axis) {
            outer_dims.push(in_shape[dim]);
            in_outer_strides.push(in_strides[dim]);
            out_outer_strides.push(out_strides[dim]);
        }
        let lane_count = outer_dims.iter().product();

        tracing::trace!(
            shape = ?in_shape,
            axis,
            lane_count,
            in_axis_stride = in_strides[axis],
            out_axis_stride = out_strides[axis],
            "built lane indexer"
        );

        Self {
            outer_dims,
            in_outer_strides,
            out_outer_strides,
            in_base: input.get_offset(),
            in_axis_stride: in_strides[axis],
            out_axis_stride: out_strides[axis],
            axis_len: in_shape[axis],
            lane_count,
        }
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    pub fn axis_len(&self) -> usize {
        self.axis_len
    }

    pub fn in_axis_stride(&self) -> usize {
        self.in_axis_stride
    }

    pub fn out_axis_stride(&self) -> usize {
        self.out_axis_stride
    }

    /// Offsets of lane number `lane`, counted in enumeration order.
    ///
    /// Stateless, so lanes can be handed out in any order.
    pub fn lane(&self, lane: usize) -> LaneOffsets {
        debug_assert!(lane < self.lane_count);

        let mut rem = lane;
        let mut coord: SmallVec<[usize; 8]> = SmallVec::from_elem(0, self.outer_dims.len());
        for d in (0..self.outer_dims.len()).rev() {
            coord[d] = rem % self.outer_dims[d];
            rem /= self.outer_dims[d];
        }
        LaneOffsets {
            input: linear_offset(&coord, &self.in_outer_strides, self.in_base),
            output: linear_offset(&coord, &self.out_outer_strides, 0),
        }
    }

    /// Lazy pass over every lane, stepping offsets incrementally.
    pub fn lanes(&self) -> Lanes<'_> {
        Lanes {
            indexer: self,
            coord: SmallVec::from_elem(0, self.outer_dims.len()),
            next: LaneOffsets {
                input: self.in_base,
                output: 0,
            },
            remaining: self.lane_count,
        }
    }
}

pub struct Lanes<'a> {
    indexer: &'a LaneIndexer,
    coord: SmallVec<[usize; 8]>,
    next: LaneOffsets,
    remaining: usize,
}

impl Lanes<'_> {
    fn advance(&mut self) {
        let ix = self.indexer;
        for d in (0..self.coord.len()).rev() {
            self.coord[d] += 1;
            self.next.input += ix.in_outer_strides[d];
            self.next.output += ix.out_outer_strides[d];
            if self.coord[d] < ix.outer_dims[d] {
                return;
            }
            // carry: rewind this dimension to zero
            self.next.input -= ix.outer_dims[d] * ix.in_outer_strides[d];
            self.next.output -= ix.outer_dims[d] * ix.out_outer_strides[d];
            self.coord[d] = 0;
        }
    }
}

impl Iterator for Lanes<'_> {
    type Item = LaneOffsets;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Lanes<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Shape;

    fn indexer(shape: &[usize], axis: usize, k: usize) -> LaneIndexer {
        let layout = Layout::from_shape(&Shape::new(shape));
        let out_shape = Shape::new(shape).with_dim(axis, k);
        LaneIndexer::new(&layout, out_shape.dims(), axis)
    }

    #[test]
    fn test_last_axis_lanes() {
        let ix = indexer(&[2, 3], 1, 1);
        assert_eq!(ix.lane_count(), 2);
        assert_eq!(ix.axis_len(), 3);
        assert_eq!(ix.in_axis_stride(), 1);
        assert_eq!(ix.out_axis_stride(), 1);
        let lanes: Vec<_> = ix.lanes().collect();
        assert_eq!(
            lanes,
            vec![
                LaneOffsets { input: 0, output: 0 },
                LaneOffsets { input: 3, output: 1 },
            ]
        );
    }

    #[test]
    fn test_first_axis_lanes() {
        let ix = indexer(&[2, 3], 0, 1);
        assert_eq!(ix.lane_count(), 3);
        assert_eq!(ix.in_axis_stride(), 3);
        assert_eq!(ix.out_axis_stride(), 3);
        let inputs: Vec<_> = ix.lanes().map(|l| l.input).collect();
        let outputs: Vec<_> = ix.lanes().map(|l| l.output).collect();
        assert_eq!(inputs, vec![0, 1, 2]);
        assert_eq!(outputs, vec![0, 1, 2]);
    }

    #[test]
    fn test_middle_axis_lanes() {
        // in strides (12, 4, 1), out shape [2, 2, 4] with strides (8, 4, 1)
        let ix = indexer(&[2, 3, 4], 1, 2);
        assert_eq!(ix.lane_count(), 8);
        assert_eq!(ix.in_axis_stride(), 4);
        assert_eq!(ix.out_axis_stride(), 4);
        let expected: Vec<_> = (0..2)
            .flat_map(|a| {
                (0..4).map(move |c| LaneOffsets {
                    input: a * 12 + c,
                    output: a * 8 + c,
                })
            })
            .collect();
        assert_eq!(ix.lanes().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_random_access_matches_iteration() {
        let ix = indexer(&[3, 2, 5, 2], 2, 3);
        let walked: Vec<_> = ix.lanes().collect();
        let direct: Vec<_> = (0..ix.lane_count()).map(|j| ix.lane(j)).collect();
        assert_eq!(walked.len(), 12);
        assert_eq!(walked, direct);
    }

    #[test]
    fn test_lanes_partition_input() {
        let shape = [2, 3, 4];
        for axis in 0..shape.len() {
            let ix = indexer(&shape, axis, 1);
            let mut seen = vec![false; 24];
            for lane in ix.lanes() {
                for i in 0..ix.axis_len() {
                    let pos = lane.input + i * ix.in_axis_stride();
                    assert!(!seen[pos], "element {pos} visited twice");
                    seen[pos] = true;
                }
            }
            assert!(seen.iter().all(|&s| s));
        }
    }

    #[test]
    fn test_rank_one_and_empty() {
        let ix = indexer(&[7], 0, 3);
        assert_eq!(ix.lanes().collect::<Vec<_>>(), vec![LaneOffsets { input: 0, output: 0 }]);

        let ix = indexer(&[0, 4], 1, 2);
        assert_eq!(ix.lane_count(), 0);
        assert_eq!(ix.lanes().count(), 0);
    }

    #[test]
    fn test_strided_view_offsets() {
        // [3, 2] view onto a transposed [2, 3] buffer, starting at element 1
        let layout = Layout::new(&[3, 2], &[1, 3]).with_offset(1);
        let ix = LaneIndexer::new(&layout, &[3, 1], 1);
        assert_eq!(ix.in_axis_stride(), 3);
        let inputs: Vec<_> = ix.lanes().map(|l| l.input).collect();
        assert_eq!(inputs, vec![1, 2, 3]);
    }

    #[test]
    fn test_linear_offset() {
        assert_eq!(linear_offset(&[1, 2, 3], &[12, 4, 1], 0), 23);
        assert_eq!(linear_offset(&[1, 0], &[1, 3], 5), 6);
    }
}
