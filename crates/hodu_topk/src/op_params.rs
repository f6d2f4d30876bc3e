use crate::{
    compat::*,
    error::{TopKError, TopKResult},
    types::Shape,
};

/// How the `k` selected entries of each lane are arranged in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortType {
    /// Selection order; only the set of entries is guaranteed.
    #[default]
    None,
    /// Ascending by original position along the axis.
    SortIndices,
    /// Best first, ties broken by the lower original position.
    SortValues,
}

impl fmt::Display for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::SortIndices => "sort_indices",
            Self::SortValues => "sort_values",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TopKParams {
    pub k: usize,
    /// Selection axis, negative values count from the last dimension.
    pub axis: i32,
    /// `true` selects the largest values, `false` the smallest.
    pub compute_max: bool,
    pub sort: SortType,
}

impl TopKParams {
    pub fn new(k: usize, axis: i32, compute_max: bool, sort: SortType) -> Self {
        Self {
            k,
            axis,
            compute_max,
            sort,
        }
    }

    /// Checks axis and k against `shape` and returns the normalized axis.
    pub fn validate(&self, shape: &Shape) -> TopKResult<usize> {
        let axis = shape.normalize_axis(self.axis).ok_or(TopKError::InvalidAxis {
            axis: self.axis,
            ndim: shape.ndim(),
        })?;

        let dim_size = shape[axis];
        if self.k == 0 || self.k > dim_size {
            return Err(TopKError::InvalidK { k: self.k, dim_size });
        }

        Ok(axis)
    }

    /// Output shape for `shape`: the selection axis shrinks to `k`.
    pub fn output_shape(&self, shape: &Shape) -> TopKResult<Shape> {
        let axis = self.validate(shape)?;
        Ok(shape.with_dim(axis, self.k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_axis() {
        let shape = Shape::from([2, 3]);
        let params = TopKParams::new(1, -1, true, SortType::None);
        assert_eq!(params.validate(&shape), Ok(1));

        let params = TopKParams::new(1, 2, true, SortType::None);
        assert_eq!(
            params.validate(&shape),
            Err(TopKError::InvalidAxis { axis: 2, ndim: 2 })
        );

        let params = TopKParams::new(1, 0, true, SortType::None);
        assert_eq!(
            params.validate(&Shape::new(&[])),
            Err(TopKError::InvalidAxis { axis: 0, ndim: 0 })
        );
    }

    #[test]
    fn test_validate_k() {
        let shape = Shape::from([2, 3]);
        for k in [0, 4] {
            let params = TopKParams::new(k, 1, false, SortType::SortValues);
            assert_eq!(params.validate(&shape), Err(TopKError::InvalidK { k, dim_size: 3 }));
        }
    }

    #[test]
    fn test_output_shape() {
        let params = TopKParams::new(2, 0, true, SortType::None);
        let out = params.output_shape(&Shape::from([5, 3, 1])).unwrap();
        assert_eq!(out.dims(), &[2, 3, 1]);
    }
}
