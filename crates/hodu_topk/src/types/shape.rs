use crate::compat::*;
use smallvec::SmallVec;

/// Dimensions of an N-dimensional buffer, row-major.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shape {
    dims: SmallVec<[usize; 8]>,
}

impl Shape {
    #[inline]
    pub fn new(dims: &[usize]) -> Self {
        Self {
            dims: SmallVec::from_slice(dims),
        }
    }

    /// Returns the dimensions as a slice.
    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn to_vec(&self) -> Vec<usize> {
        self.dims.to_vec()
    }

    /// Returns the number of dimensions (rank).
    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Returns the total number of elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.dims.iter().product()
    }

    /// Maps `axis` in `[-ndim, ndim)` to `[0, ndim)`.
    #[inline]
    pub fn normalize_axis(&self, axis: i32) -> Option<usize> {
        let ndim = self.ndim() as i64;
        let axis = axis as i64;
        let normalized = if axis < 0 { ndim + axis } else { axis };

        if normalized >= 0 && normalized < ndim {
            Some(normalized as usize)
        } else {
            None
        }
    }

    /// Returns a copy of this shape with `axis` resized to `size`.
    ///
    /// `axis` must already be normalized.
    #[inline]
    pub fn with_dim(&self, axis: usize, size: usize) -> Self {
        let mut dims = self.dims.clone();
        dims[axis] = size;
        Self { dims }
    }

    /// Product of every dimension except `axis`, i.e. the number of lanes along it.
    #[inline]
    pub fn outer_size(&self, axis: usize) -> usize {
        self.dims
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != axis)
            .map(|(_, &d)| d)
            .product()
    }
}

impl core::ops::Index<usize> for Shape {
    type Output = usize;

    fn index(&self, index: usize) -> &Self::Output {
        &self.dims[index]
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self {
            dims: SmallVec::from_vec(dims),
        }
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self::new(dims)
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Self::new(&dims)
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({:?})", self.dims.as_slice())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, dim) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", dim)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_axis() {
        let shape = Shape::from([2, 3, 4]);
        assert_eq!(shape.normalize_axis(0), Some(0));
        assert_eq!(shape.normalize_axis(-1), Some(2));
        assert_eq!(shape.normalize_axis(-3), Some(0));
        assert_eq!(shape.normalize_axis(3), None);
        assert_eq!(shape.normalize_axis(-4), None);
        assert_eq!(Shape::new(&[]).normalize_axis(0), None);
    }

    #[test]
    fn test_with_dim_and_outer_size() {
        let shape = Shape::from([2, 3, 4]);
        assert_eq!(shape.with_dim(1, 2).dims(), &[2, 2, 4]);
        assert_eq!(shape.outer_size(1), 8);
        assert_eq!(Shape::from([5]).outer_size(0), 1);
        assert_eq!(Shape::from([0, 5]).outer_size(1), 0);
    }
}
