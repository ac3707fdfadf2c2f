use crate::concat;
use crate::dtype::{DType, Element};
use crate::error::{Result, TensorError};
use crate::shape::Shape;

/// A dense, row-major tensor on the CPU.
///
/// Holds contiguous data of element type `T` with an associated shape.
/// `data.len() == shape.numel()` is upheld by every constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T: Element = f32> {
    data: Vec<T>,
    shape: Shape,
}

impl<T: Element> Tensor<T> {
    /// Create a new tensor from data and a shape.
    ///
    /// # Panics
    /// Panics if `data.len() != shape.numel()`.
    pub fn new(data: Vec<T>, shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        assert_eq!(
            data.len(),
            shape.numel(),
            "data length {} does not match shape {} (numel={})",
            data.len(),
            shape,
            shape.numel()
        );
        Tensor { data, shape }
    }

    /// Fallible version of [`Tensor::new`].
    pub fn try_new(data: Vec<T>, shape: impl Into<Shape>) -> Result<Self> {
        let shape = shape.into();
        if data.len() != shape.numel() {
            return Err(TensorError::ShapeMismatch {
                expected: vec![shape.numel()],
                got: vec![data.len()],
            });
        }
        Ok(Tensor { data, shape })
    }

    /// Create a zero-filled tensor with the given shape.
    pub fn zeros(shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        Tensor {
            data: vec![T::zero(); shape.numel()],
            shape,
        }
    }

    /// Returns a reference to the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the tensor's data type.
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Number of elements.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Returns the underlying row-major data.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consumes the tensor, returning its row-major data.
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Consumes the tensor, returning its shape and data.
    pub fn into_parts(self) -> (Shape, Vec<T>) {
        (self.shape, self.data)
    }

    /// Reshape the tensor, returning a new tensor with the same data but
    /// a different shape.
    ///
    /// The total number of elements must remain the same.
    pub fn reshape(&self, new_shape: impl Into<Shape>) -> Result<Tensor<T>> {
        let new_shape = new_shape.into();
        if self.shape.numel() != new_shape.numel() {
            return Err(TensorError::ShapeMismatch {
                expected: self.shape.dims().to_vec(),
                got: new_shape.dims().to_vec(),
            });
        }
        Ok(Tensor {
            data: self.data.clone(),
            shape: new_shape,
        })
    }

    /// Copy out the window `[start, start + len)` along `axis`.
    ///
    /// Every other dimension is kept whole.
    pub fn narrow(&self, axis: usize, start: usize, len: usize) -> Result<Tensor<T>> {
        let axis = self.shape.check_axis(axis)?;
        let extent = self.shape.dim(axis);
        match start.checked_add(len) {
            Some(end) if end <= extent => {}
            _ => {
                return Err(TensorError::OutOfRange {
                    axis,
                    start,
                    len,
                    extent,
                })
            }
        }

        let shape = self.shape.with_dim(axis, len);
        // Non-empty data bounds every partial product of the dims.
        if self.data.is_empty() {
            return Ok(Tensor {
                data: Vec::new(),
                shape,
            });
        }

        let outer = self.shape.outer_size(axis);
        let inner = self.shape.inner_size(axis);
        let src_row = extent * inner;
        let chunk = len * inner;

        let mut data = Vec::with_capacity(outer * chunk);
        for o in 0..outer {
            let begin = o * src_row + start * inner;
            data.extend_from_slice(&self.data[begin..begin + chunk]);
        }

        Ok(Tensor { data, shape })
    }

    /// Concatenate `self` followed by `others` along `axis`.
    ///
    /// See [`concatenate`](crate::concat::concatenate).
    pub fn concat(&self, others: &[Tensor<T>], axis: usize) -> Result<Tensor<T>> {
        let mut inputs = Vec::with_capacity(others.len() + 1);
        inputs.push(self);
        inputs.extend(others.iter());
        concat::concatenate_refs(&inputs, axis, &Default::default())
    }

    /// Split along `axis` into pieces of the given extents.
    ///
    /// See [`split`](crate::concat::split).
    pub fn split(&self, axis: usize, extents: &[usize]) -> Result<Vec<Tensor<T>>> {
        concat::split(self, axis, extents)
    }

    pub(crate) fn from_parts_unchecked(data: Vec<T>, shape: Shape) -> Self {
        debug_assert_eq!(data.len(), shape.numel());
        Tensor { data, shape }
    }
}
