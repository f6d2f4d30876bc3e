use crate::{compat::*, types::DType};

/// Main error type for hodu_topk.
///
/// Every variant is raised by boundary validation before the first lane is
/// processed, so an error never leaves partially written output behind.
#[derive(Clone, PartialEq, Eq)]
pub enum TopKError {
    // ===== Parameter Errors =====
    /// Axis outside `[-ndim, ndim)`, or a rank-0 input.
    InvalidAxis { axis: i32, ndim: usize },
    /// `k` is zero or larger than the selected dimension.
    InvalidK { k: usize, dim_size: usize },

    // ===== Shape and Layout Errors =====
    /// Output shape differs from the input shape with the axis replaced by `k`.
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },
    /// A buffer is smaller than its shape or layout requires.
    SizeMismatch { expected: usize, got: usize },
    /// Invalid layout configuration.
    InvalidLayout { reason: String },
    /// The index element type cannot hold every position along the axis.
    IndexOverflow { axis_len: usize, index_dtype: String },

    // ===== DType Errors =====
    /// Data type mismatch between expected and actual dtype.
    DTypeMismatch { expected: DType, got: DType },
    /// Unsupported dtype with reason.
    UnsupportedDType { dtype: DType, reason: String },
}

impl fmt::Display for TopKError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Parameter Errors
            Self::InvalidAxis { axis, ndim } => {
                write!(f, "invalid axis {} for {}-dimensional tensor", axis, ndim)
            },
            Self::InvalidK { k, dim_size } => {
                write!(f, "invalid k {}: expected 1 <= k <= {}", k, dim_size)
            },

            // Shape and Layout Errors
            Self::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {:?}, got {:?}", expected, got)
            },
            Self::SizeMismatch { expected, got } => {
                write!(f, "size mismatch: expected at least {}, got {}", expected, got)
            },
            Self::InvalidLayout { reason } => {
                write!(f, "invalid layout: {}", reason)
            },
            Self::IndexOverflow { axis_len, index_dtype } => {
                write!(
                    f,
                    "index overflow: axis of length {} cannot be indexed with {}",
                    axis_len, index_dtype
                )
            },

            // DType Errors
            Self::DTypeMismatch { expected, got } => {
                write!(f, "dtype mismatch: expected {:?}, got {:?}", expected, got)
            },
            Self::UnsupportedDType { dtype, reason } => {
                write!(f, "unsupported dtype {:?}: {}", dtype, reason)
            },
        }
    }
}

impl fmt::Debug for TopKError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TopKError {}

/// Result type alias for hodu_topk operations.
pub type TopKResult<T> = Result<T, TopKError>;
