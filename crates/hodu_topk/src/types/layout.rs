use crate::{
    compat::*,
    error::{TopKError, TopKResult},
    types::Shape,
};

/// Strided view description of a buffer: dimensions, per-dimension element
/// strides and the element offset of the first entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    shape: Vec<usize>,
    strides: Vec<usize>,
    offset: usize,
}

impl Layout {
    pub fn new(shape: &[usize], strides: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            strides: strides.to_vec(),
            offset: 0,
        }
    }

    pub fn from_shape(shape: &Shape) -> Self {
        Self {
            shape: shape.to_vec(),
            strides: Self::compute_strides(shape.dims()),
            offset: 0,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn get_shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn get_strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn get_offset(&self) -> usize {
        self.offset
    }

    pub fn get_ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn is_contiguous(&self) -> bool {
        if self.get_ndim() == 0 {
            return true;
        }

        let mut expected_stride = 1;
        for i in (0..self.get_ndim()).rev() {
            if self.get_strides()[i] != expected_stride {
                return false;
            }
            expected_stride *= self.get_shape()[i];
        }

        true
    }

    /// Minimum buffer length able to back every element this layout can address.
    ///
    /// Fails with `InvalidLayout` when the furthest addressed element does not
    /// fit in `usize`.
    pub fn required_len(&self) -> TopKResult<usize> {
        if self.shape.contains(&0) {
            return Ok(0);
        }
        let overflow = || TopKError::InvalidLayout {
            reason: format!(
                "shape {:?} with strides {:?} and offset {} overflows usize",
                self.shape, self.strides, self.offset
            ),
        };
        let last = self
            .shape
            .iter()
            .zip(self.strides.iter())
            .try_fold(self.offset, |acc, (&dim, &stride)| {
                (dim - 1).checked_mul(stride).and_then(|span| acc.checked_add(span))
            })
            .ok_or_else(overflow)?;
        last.checked_add(1).ok_or_else(overflow)
    }

    pub fn validate(&self) -> TopKResult<()> {
        if self.shape.len() != self.strides.len() {
            return Err(TopKError::InvalidLayout {
                reason: format!(
                    "shape has {} dimensions but strides has {}",
                    self.shape.len(),
                    self.strides.len()
                ),
            });
        }
        Ok(())
    }

    pub fn compute_strides(shape: &[usize]) -> Vec<usize> {
        if shape.is_empty() {
            return vec![];
        }

        let mut strides = vec![1; shape.len()];
        for i in (0..shape.len() - 1).rev() {
            strides[i] = strides[i + 1] * shape[i + 1];
        }
        strides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_strides() {
        assert_eq!(Layout::compute_strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert_eq!(Layout::compute_strides(&[5]), vec![1]);
        assert!(Layout::compute_strides(&[]).is_empty());
    }

    #[test]
    fn test_required_len() {
        let layout = Layout::from_shape(&Shape::from([2, 3]));
        assert!(layout.is_contiguous());
        assert_eq!(layout.required_len(), Ok(6));

        // transposed view of a [3, 2] buffer, shifted by one element
        let view = Layout::new(&[2, 3], &[1, 2]).with_offset(1);
        assert!(!view.is_contiguous());
        assert_eq!(view.required_len(), Ok(7));

        assert_eq!(Layout::from_shape(&Shape::from([0, 3])).required_len(), Ok(0));
    }

    #[test]
    fn test_required_len_overflow() {
        let layout = Layout::new(&[3, 2], &[usize::MAX / 2, 1]);
        assert!(matches!(layout.required_len(), Err(TopKError::InvalidLayout { .. })));

        let layout = Layout::new(&[2], &[usize::MAX]).with_offset(1);
        assert!(matches!(layout.required_len(), Err(TopKError::InvalidLayout { .. })));

        let layout = Layout::new(&[1], &[1]).with_offset(usize::MAX);
        assert!(matches!(layout.required_len(), Err(TopKError::InvalidLayout { .. })));
    }

    #[test]
    fn test_validate_rank_mismatch() {
        let layout = Layout::new(&[2, 3], &[1]);
        assert!(matches!(layout.validate(), Err(TopKError::InvalidLayout { .. })));
    }
}
