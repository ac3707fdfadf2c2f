use crate::error::{Result, TensorError};
use std::fmt;

/// A tensor shape, wrapping a vector of dimension sizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    /// Create a new shape from a vector of dimensions.
    pub fn new(dims: Vec<usize>) -> Self {
        Shape { dims }
    }

    /// Create a shape from a slice of dimensions.
    pub fn from_slice(dims: &[usize]) -> Self {
        Shape {
            dims: dims.to_vec(),
        }
    }

    /// Number of dimensions (rank).
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements (product of all dimension sizes).
    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    /// Returns the size of dimension `i`.
    ///
    /// # Panics
    /// Panics if `i >= ndim()`.
    pub fn dim(&self, i: usize) -> usize {
        self.dims[i]
    }

    /// Returns a reference to the underlying dimension sizes.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Element count, or `None` if it does not fit in `usize`.
    pub fn checked_numel(&self) -> Option<usize> {
        checked_product(&self.dims)
    }

    /// Product of the extents from `axis` to the end, or `None` on overflow.
    ///
    /// For a row-major buffer this is the length of one contiguous run when
    /// the buffer is cut along `axis`.
    pub fn checked_size_from(&self, axis: usize) -> Option<usize> {
        checked_product(&self.dims[axis..])
    }

    /// Returns `axis` unchanged if it names a dimension of this shape.
    pub fn check_axis(&self, axis: usize) -> Result<usize> {
        if axis < self.ndim() {
            Ok(axis)
        } else {
            Err(TensorError::InvalidAxis {
                axis,
                ndim: self.ndim(),
            })
        }
    }

    /// Product of the extents strictly before `axis`.
    ///
    /// This is the number of independent rows a row-major buffer splits into
    /// when it is cut along `axis`.
    pub fn outer_size(&self, axis: usize) -> usize {
        self.dims[..axis].iter().product()
    }

    /// Product of the extents strictly after `axis` (the stride of `axis`).
    pub fn inner_size(&self, axis: usize) -> usize {
        self.dims[axis + 1..].iter().product()
    }

    /// Returns a copy of this shape with dimension `axis` replaced by `extent`.
    ///
    /// # Panics
    /// Panics if `axis >= ndim()`.
    pub fn with_dim(&self, axis: usize, extent: usize) -> Shape {
        let mut dims = self.dims.clone();
        dims[axis] = extent;
        Shape { dims }
    }

    /// True if both shapes have the same rank and agree on every dimension
    /// other than `axis`.
    pub fn matches_except(&self, other: &Shape, axis: usize) -> bool {
        self.ndim() == other.ndim()
            && self
                .dims
                .iter()
                .zip(other.dims.iter())
                .enumerate()
                .all(|(i, (a, b))| i == axis || a == b)
    }
}

fn checked_product(dims: &[usize]) -> Option<usize> {
    dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape::new(dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape::from_slice(dims)
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Shape::new(dims.to_vec())
    }
}
