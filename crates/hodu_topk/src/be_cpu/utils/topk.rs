//! Top-k along an arbitrary axis
//!
//! This module provides:
//! - `select_top_k`: allocate outputs and run top-k on a row-major buffer
//! - `select_top_k_into`: run top-k from a strided layout into caller buffers
//! - `TopKPlan`: validated per-invocation plan exposing the pure lane kernel
//!
//! Each lane is gathered into a private workspace, partially selected,
//! optionally ordered, and its first `k` entries are written out. Lanes never
//! share mutable state, so they can be scheduled in any order.

mod indexer;
mod lane;
mod relation;
mod select;
mod sort;

pub use indexer::{linear_offset, LaneIndexer, LaneOffsets, Lanes};
pub use lane::{gather_lane, scatter_lane, Entry};
pub use relation::{CompareMax, CompareMin, IndexAscending, Relation};
pub use select::partial_select;
pub use sort::{hybrid_sort, insertion_sort, partition, INSERTION_SORT_THRESHOLD};

use crate::{
    compat::*,
    error::{TopKError, TopKResult},
    op_params::{SortType, TopKParams},
    types::{Layout, Shape},
};
use num_traits::{NumCast, PrimInt};

/// Owned result of [`select_top_k`].
#[derive(Debug, Clone, PartialEq)]
pub struct TopKOutput<T, U> {
    pub values: Vec<T>,
    pub indices: Vec<U>,
    /// Input shape with the selection axis resized to `k`.
    pub shape: Shape,
}

/// Validated description of one top-k invocation.
#[derive(Debug, Clone)]
pub struct TopKPlan {
    indexer: LaneIndexer,
    axis: usize,
    k: usize,
    compute_max: bool,
    sort: SortType,
}

impl TopKPlan {
    /// Checks `params` against `layout` and `out_shape` and builds the lane indexer.
    pub fn new(layout: &Layout, out_shape: &[usize], params: &TopKParams) -> TopKResult<Self> {
        layout.validate()?;

        let shape = Shape::from(layout.get_shape());
        let axis = params.validate(&shape)?;

        let expected = shape.with_dim(axis, params.k);
        if expected.dims() != out_shape {
            return Err(TopKError::ShapeMismatch {
                expected: expected.to_vec(),
                got: out_shape.to_vec(),
            });
        }

        let indexer = LaneIndexer::new(layout, out_shape, axis);
        debug_assert_eq!(indexer.lane_count(), shape.outer_size(axis));

        Ok(Self {
            indexer,
            axis,
            k: params.k,
            compute_max: params.compute_max,
            sort: params.sort,
        })
    }

    pub fn indexer(&self) -> &LaneIndexer {
        &self.indexer
    }

    pub fn axis(&self) -> usize {
        self.axis
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of output elements written per buffer.
    pub fn output_size(&self) -> usize {
        self.indexer.lane_count() * self.k
    }

    /// Ranks one lane: after the call `workspace[..k]` holds the lane's top-k
    /// entries arranged according to the sort policy.
    ///
    /// Pure in everything but `workspace`, which is reused lane to lane by a
    /// single executor.
    pub fn rank_lane<T>(&self, input: &[T], lane: LaneOffsets, workspace: &mut Vec<Entry<T>>)
    where
        T: Copy + PartialOrd,
    {
        gather_lane(
            input,
            lane.input,
            self.indexer.in_axis_stride(),
            self.indexer.axis_len(),
            workspace,
        );
        if self.compute_max {
            self.select_and_order(workspace, &CompareMax);
        } else {
            self.select_and_order(workspace, &CompareMin);
        }
    }

    fn select_and_order<T, R: Relation<T>>(&self, workspace: &mut [Entry<T>], relation: &R) {
        partial_select(workspace, self.k, relation);
        let selected = &mut workspace[..self.k];
        match self.sort {
            SortType::None => {},
            SortType::SortIndices => hybrid_sort(selected, &IndexAscending),
            SortType::SortValues => hybrid_sort(selected, relation),
        }
    }
}

fn check_len(expected: usize, got: usize) -> TopKResult<()> {
    if got < expected {
        return Err(TopKError::SizeMismatch { expected, got });
    }
    Ok(())
}

fn check_index_range<U: PrimInt>(axis_len: usize) -> TopKResult<()> {
    let last = axis_len.saturating_sub(1);
    if <U as NumCast>::from(last).is_none() {
        return Err(TopKError::IndexOverflow {
            axis_len,
            index_dtype: core::any::type_name::<U>().to_string(),
        });
    }
    Ok(())
}

/// Runs top-k over `input` described by `layout`, writing into caller-sized
/// row-major `values` / `indices` buffers of shape `out_shape`.
///
/// All validation happens before the first lane; on error nothing is written.
pub fn select_top_k_into<T, U>(
    input: &[T],
    layout: &Layout,
    out_shape: &[usize],
    params: &TopKParams,
    values: &mut [T],
    indices: &mut [U],
) -> TopKResult<()>
where
    T: Copy + PartialOrd + Send + Sync,
    U: PrimInt + Send + Sync,
{
    let plan = prepare::<T, U>(input, layout, out_shape, params, values.len(), indices.len())
        .inspect_err(|e| tracing::debug!(error = %e, "topk validation failed"))?;

    tracing::debug!(
        shape = ?layout.get_shape(),
        contiguous = layout.is_contiguous(),
        axis = plan.axis,
        k = plan.k,
        compute_max = plan.compute_max,
        sort = %plan.sort,
        lanes = plan.indexer.lane_count(),
        parallel = runs_parallel(&plan),
        "running topk"
    );

    execute(&plan, input, values, indices);
    Ok(())
}

fn prepare<T, U: PrimInt>(
    input: &[T],
    layout: &Layout,
    out_shape: &[usize],
    params: &TopKParams,
    values_len: usize,
    indices_len: usize,
) -> TopKResult<TopKPlan> {
    let plan = TopKPlan::new(layout, out_shape, params)?;
    check_len(layout.required_len()?, input.len())?;
    check_len(plan.output_size(), values_len)?;
    check_len(plan.output_size(), indices_len)?;
    check_index_range::<U>(plan.indexer.axis_len())?;
    Ok(plan)
}

/// Output buffers of `size` elements.
///
/// Values are seeded from the input so no `Default` bound is needed on `T`;
/// an empty input only passes validation when the output is empty too.
pub(crate) fn alloc_outputs<T: Copy, U: PrimInt>(input: &[T], size: usize) -> (Vec<T>, Vec<U>) {
    let values = match input.first() {
        Some(&seed) => vec![seed; size],
        None => Vec::new(),
    };
    (values, vec![U::zero(); size])
}

/// Runs top-k on a row-major contiguous buffer of shape `shape` and returns
/// freshly allocated outputs.
pub fn select_top_k<T, U>(input: &[T], shape: &[usize], params: &TopKParams) -> TopKResult<TopKOutput<T, U>>
where
    T: Copy + PartialOrd + Send + Sync,
    U: PrimInt + Send + Sync,
{
    let shape = Shape::from(shape);
    let layout = Layout::from_shape(&shape);
    let out_shape = params.output_shape(&shape)?;

    let (mut values, mut indices) = alloc_outputs(input, out_shape.size());
    select_top_k_into(input, &layout, out_shape.dims(), params, &mut values, &mut indices)?;

    Ok(TopKOutput {
        values,
        indices,
        shape: out_shape,
    })
}

fn runs_parallel(plan: &TopKPlan) -> bool {
    cfg!(feature = "rayon") && plan.indexer.lane_count() >= 2
}

#[cfg(not(feature = "rayon"))]
fn execute<T, U>(plan: &TopKPlan, input: &[T], values: &mut [T], indices: &mut [U])
where
    T: Copy + PartialOrd + Send + Sync,
    U: PrimInt + Send + Sync,
{
    execute_sequential(plan, input, values, indices);
}

#[cfg(feature = "rayon")]
fn execute<T, U>(plan: &TopKPlan, input: &[T], values: &mut [T], indices: &mut [U])
where
    T: Copy + PartialOrd + Send + Sync,
    U: PrimInt + Send + Sync,
{
    if runs_parallel(plan) {
        execute_parallel(plan, input, values, indices);
    } else {
        execute_sequential(plan, input, values, indices);
    }
}

fn execute_sequential<T, U>(plan: &TopKPlan, input: &[T], values: &mut [T], indices: &mut [U])
where
    T: Copy + PartialOrd,
    U: PrimInt,
{
    let k = plan.k;
    let out_stride = plan.indexer.out_axis_stride();
    let mut workspace = Vec::with_capacity(plan.indexer.axis_len());

    for lane in plan.indexer.lanes() {
        plan.rank_lane(input, lane, &mut workspace);
        scatter_lane(&workspace[..k], lane.output, out_stride, values, indices);
    }
}

#[cfg(feature = "rayon")]
fn execute_parallel<T, U>(plan: &TopKPlan, input: &[T], values: &mut [T], indices: &mut [U])
where
    T: Copy + PartialOrd + Send + Sync,
    U: PrimInt + Send + Sync,
{
    use rayon::prelude::*;

    let k = plan.k;
    let axis_len = plan.indexer.axis_len();
    let size = plan.output_size();

    if plan.indexer.out_axis_stride() == 1 {
        // every dimension after the axis has size 1, so lane j owns the
        // contiguous output range [j * k, (j + 1) * k)
        values[..size]
            .par_chunks_mut(k)
            .zip(indices[..size].par_chunks_mut(k))
            .enumerate()
            .for_each_init(
                || Vec::with_capacity(axis_len),
                |workspace, (j, (lane_values, lane_indices))| {
                    plan.rank_lane(input, plan.indexer.lane(j), workspace);
                    scatter_lane(&workspace[..k], 0, 1, lane_values, lane_indices);
                },
            );
        return;
    }

    // lanes are interleaved in the output: rank into a lane-major staging
    // buffer, then scatter sequentially
    let seed = Entry::new(input[plan.indexer.lane(0).input], 0);
    let mut staged = vec![seed; size];
    staged.par_chunks_mut(k).enumerate().for_each_init(
        || Vec::with_capacity(axis_len),
        |workspace, (j, chunk)| {
            plan.rank_lane(input, plan.indexer.lane(j), workspace);
            chunk.copy_from_slice(&workspace[..k]);
        },
    );

    let out_stride = plan.indexer.out_axis_stride();
    for (lane, chunk) in plan.indexer.lanes().zip(staged.chunks(k)) {
        scatter_lane(chunk, lane.output, out_stride, values, indices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_rejects_wrong_output_shape() {
        let layout = Layout::from_shape(&Shape::from([2, 3]));
        let params = TopKParams::new(2, 1, true, SortType::None);
        let err = TopKPlan::new(&layout, &[2, 3], &params).unwrap_err();
        assert_eq!(
            err,
            TopKError::ShapeMismatch {
                expected: vec![2, 2],
                got: vec![2, 3],
            }
        );
    }

    #[test]
    fn test_rank_lane_external_schedule() {
        // lanes ranked in reverse order by an outside scheduler give the same result
        let input = [1.0f32, 5.0, 2.0, 9.0, 0.0, 4.0];
        let layout = Layout::from_shape(&Shape::from([2, 3]));
        let params = TopKParams::new(2, 1, true, SortType::SortValues);
        let plan = TopKPlan::new(&layout, &[2, 2], &params).unwrap();

        let mut ws = Vec::new();
        let mut ranked = Vec::new();
        for j in (0..plan.indexer().lane_count()).rev() {
            plan.rank_lane(&input, plan.indexer().lane(j), &mut ws);
            ranked.push(ws[..plan.k()].to_vec());
        }
        assert_eq!(ranked[0], vec![Entry::new(9.0, 0), Entry::new(4.0, 2)]);
        assert_eq!(ranked[1], vec![Entry::new(5.0, 1), Entry::new(2.0, 2)]);
    }

    #[test]
    fn test_index_overflow_rejected() {
        let input = vec![0u8; 300];
        let params = TopKParams::new(1, 0, true, SortType::None);
        let err = select_top_k::<u8, i8>(&input, &[300], &params).unwrap_err();
        assert!(matches!(err, TopKError::IndexOverflow { axis_len: 300, .. }));

        let out = select_top_k::<u8, u8>(&input[..256], &[256], &params).unwrap();
        assert_eq!(out.indices, vec![0]);
    }

    #[test]
    fn test_sequential_matches_default_path() {
        let input: Vec<i32> = (0..60).map(|i| (i * 13) % 7).collect();
        let layout = Layout::from_shape(&Shape::from([3, 4, 5]));
        for axis in 0..3 {
            let params = TopKParams::new(2, axis, false, SortType::SortValues);
            let out_shape = params.output_shape(&Shape::from([3, 4, 5])).unwrap();
            let plan = TopKPlan::new(&layout, out_shape.dims(), &params).unwrap();

            let mut seq_values = vec![0; out_shape.size()];
            let mut seq_indices = vec![0i64; out_shape.size()];
            execute_sequential(&plan, &input, &mut seq_values, &mut seq_indices);

            let out = select_top_k::<i32, i64>(&input, &[3, 4, 5], &params).unwrap();
            assert_eq!(out.values, seq_values, "axis {axis}");
            assert_eq!(out.indices, seq_indices, "axis {axis}");
        }
    }
}
