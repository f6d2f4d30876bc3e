pub use crate::{
    be_cpu::storage::CpuStorage,
    be_cpu::utils::topk::{select_top_k, select_top_k_into, TopKOutput, TopKPlan},
    error::{TopKError, TopKResult},
    op_params::{SortType, TopKParams},
    types::{DType, Layout, Shape},
};
