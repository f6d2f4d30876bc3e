//! Hodu Top-K
//!
//! Axis-wise top-k selection for strided N-dimensional buffers.
//!
//! For every lane along the selection axis the kernels pick the `k` largest
//! (or smallest) entries, optionally order them, and write both the values
//! and their original positions along the axis.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod be_cpu;
pub(crate) mod compat;
pub mod error;
pub mod op_params;
pub mod prelude;
pub mod types;

pub use be_cpu::storage::CpuStorage;
pub use be_cpu::utils::topk::{select_top_k, select_top_k_into, TopKOutput, TopKPlan};
pub use error::{TopKError, TopKResult};
pub use op_params::{SortType, TopKParams};
