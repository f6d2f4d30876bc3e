use crate::{
    be_cpu::{
        storage::{CpuStorage, StorageElement},
        utils::topk::{alloc_outputs, select_top_k_into},
    },
    compat::*,
    error::{TopKError, TopKResult},
    op_params::TopKParams,
    types::{DType, Layout, Shape},
};
use num_traits::PrimInt;

impl CpuStorage {
    /// Top-k along `params.axis` of the tensor viewed through `layout`.
    ///
    /// Returns `(values, indices)` storages laid out row-major in the output
    /// shape; indices are stored as `index_dtype`, which must be `I32` or `I64`.
    pub fn call_topk(
        &self,
        layout: &Layout,
        params: &TopKParams,
        index_dtype: DType,
    ) -> TopKResult<(CpuStorage, CpuStorage)> {
        if !index_dtype.is_index() {
            return Err(TopKError::UnsupportedDType {
                dtype: index_dtype,
                reason: "topk indices must be i32 or i64".to_string(),
            });
        }

        let shape = Shape::from(layout.get_shape());
        let out_shape = params.output_shape(&shape)?;

        tracing::debug!(
            dtype = %self.dtype(),
            index_dtype = %index_dtype,
            out_shape = %out_shape,
            "dispatching cpu topk"
        );

        macro_rules! call_topk {
            ($input:expr) => {{
                match index_dtype {
                    DType::I64 => topk_typed::<_, i64>($input.as_slice(), layout, &out_shape, params)?,
                    _ => topk_typed::<_, i32>($input.as_slice(), layout, &out_shape, params)?,
                }
            }};
        }

        let outputs = match self {
            Self::F8E4M3(input) => call_topk!(input),
            Self::F8E5M2(input) => call_topk!(input),
            Self::BF16(input) => call_topk!(input),
            Self::F16(input) => call_topk!(input),
            Self::F32(input) => call_topk!(input),
            Self::F64(input) => call_topk!(input),
            Self::U8(input) => call_topk!(input),
            Self::U16(input) => call_topk!(input),
            Self::U32(input) => call_topk!(input),
            Self::U64(input) => call_topk!(input),
            Self::I8(input) => call_topk!(input),
            Self::I16(input) => call_topk!(input),
            Self::I32(input) => call_topk!(input),
            Self::I64(input) => call_topk!(input),
        };

        Ok(outputs)
    }
}

fn topk_typed<T, U>(
    input: &[T],
    layout: &Layout,
    out_shape: &Shape,
    params: &TopKParams,
) -> TopKResult<(CpuStorage, CpuStorage)>
where
    T: StorageElement,
    U: StorageElement + PrimInt,
{
    let (mut values, mut indices) = alloc_outputs::<T, U>(input, out_shape.size());
    select_top_k_into(input, layout, out_shape.dims(), params, &mut values, &mut indices)?;
    Ok((CpuStorage::from_vec(values), CpuStorage::from_vec(indices)))
}
