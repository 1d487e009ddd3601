//! Array shapes.
//!
//! Dimension sizes are signed, matching the native library's `int`
//! dimension arrays. A size of zero or less contributes nothing to the
//! element count.

use smallvec::SmallVec;

/// Shape of a multi-dimensional array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dimensions {
    /// Size of each dimension. Empty means scalar (rank 0).
    dims: SmallVec<[i64; 4]>,
}

impl Dimensions {
    /// Create scalar dimensions (rank 0).
    pub fn scalar() -> Self {
        Self { dims: SmallVec::new() }
    }

    /// Create 1D dimensions.
    pub fn d1(size: i64) -> Self {
        Self { dims: smallvec::smallvec![size] }
    }

    /// Create 2D dimensions.
    pub fn d2(rows: i64, cols: i64) -> Self {
        Self { dims: smallvec::smallvec![rows, cols] }
    }

    /// Create from a slice of sizes.
    pub fn from_slice(sizes: &[i64]) -> Self {
        Self { dims: SmallVec::from_slice(sizes) }
    }

    /// Get the rank (number of dimensions).
    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Get the size of a specific dimension.
    pub fn size(&self, dim: usize) -> Option<i64> {
        self.dims.get(dim).copied()
    }

    /// Get all dimension sizes as a slice.
    pub fn sizes(&self) -> &[i64] {
        &self.dims
    }

    /// Total number of elements.
    ///
    /// Product of the positive dimensions; non-positive dimensions are
    /// skipped. A scalar holds one element, a ranked shape with no positive
    /// dimension holds none.
    /// Saturates at `usize::MAX` when the product overflows.
    pub fn num_points(&self) -> usize {
        self.checked_num_points().unwrap_or(usize::MAX)
    }

    /// Total number of elements, or `None` if the product overflows.
    pub fn checked_num_points(&self) -> Option<usize> {
        if self.dims.is_empty() {
            return Some(1);
        }
        let mut positive = self.dims.iter().filter(|&&d| d > 0).peekable();
        if positive.peek().is_none() {
            return Some(0);
        }
        positive.try_fold(1usize, |acc, &d| acc.checked_mul(usize::try_from(d).ok()?))
    }

    /// Check if this represents a scalar (rank 0).
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }

    /// Add a new dimension at the end.
    pub fn push(&mut self, size: i64) {
        self.dims.push(size);
    }
}

impl From<i64> for Dimensions {
    fn from(size: i64) -> Self {
        Self::d1(size)
    }
}

impl From<(i64, i64)> for Dimensions {
    fn from((rows, cols): (i64, i64)) -> Self {
        Self::d2(rows, cols)
    }
}

impl From<Vec<i64>> for Dimensions {
    fn from(v: Vec<i64>) -> Self {
        Self { dims: SmallVec::from_vec(v) }
    }
}

impl From<&[i64]> for Dimensions {
    fn from(v: &[i64]) -> Self {
        Self::from_slice(v)
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, s) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", s)?;
        }
        if self.dims.len() == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar() {
        let d = Dimensions::scalar();
        assert_eq!(d.rank(), 0);
        assert!(d.is_scalar());
        assert_eq!(d.num_points(), 1);
        assert_eq!(format!("{}", d), "()");
    }

    #[test]
    fn test_2d() {
        let d = Dimensions::d2(2, 3);
        assert_eq!(d.rank(), 2);
        assert_eq!(d.size(0), Some(2));
        assert_eq!(d.size(2), None);
        assert_eq!(d.num_points(), 6);
        assert_eq!(format!("{}", d), "(2, 3)");
    }

    #[test]
    fn test_non_positive_dims_are_skipped() {
        assert_eq!(Dimensions::from_slice(&[3, 0, 4]).num_points(), 12);
        assert_eq!(Dimensions::from_slice(&[-1, 5]).num_points(), 5);
        assert_eq!(Dimensions::d1(0).num_points(), 0);
        assert_eq!(Dimensions::from_slice(&[0, -2]).num_points(), 0);
    }

    #[test]
    fn test_num_points_overflow() {
        let d = Dimensions::from_slice(&[i64::MAX, 4]);
        assert_eq!(d.checked_num_points(), None);
        assert_eq!(d.num_points(), usize::MAX);
        assert_eq!(Dimensions::d2(1 << 20, 1 << 20).checked_num_points(), Some(1 << 40));
    }

    #[test]
    fn test_from_conversions() {
        let d1: Dimensions = 100.into();
        assert_eq!(d1.rank(), 1);
        assert_eq!(format!("{}", d1), "(100,)");

        let d2: Dimensions = (8, 6).into();
        assert_eq!(d2.sizes(), &[8, 6]);

        let mut d = Dimensions::scalar();
        d.push(4);
        assert_eq!(d, Dimensions::from(vec![4]));
    }
}
