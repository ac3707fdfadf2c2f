use crate::dtype::{DType, Element};
use crate::error::{Result, TensorError};
use crate::shape::Shape;
use crate::storage::CpuStorage;
use crate::tensor::Tensor;

/// A tensor whose element type is chosen at runtime.
///
/// Used where the caller only learns the data type from a layer or binding
/// description. Convert to and from [`Tensor<T>`] with `From` and
/// [`DynTensor::downcast`].
#[derive(Debug, Clone, PartialEq)]
pub struct DynTensor {
    storage: CpuStorage,
    shape: Shape,
}

impl DynTensor {
    /// Wrap existing storage. Fails if the element count does not match.
    pub fn try_new(storage: CpuStorage, shape: impl Into<Shape>) -> Result<Self> {
        let shape = shape.into();
        if storage.len() != shape.numel() {
            return Err(TensorError::ShapeMismatch {
                expected: vec![shape.numel()],
                got: vec![storage.len()],
            });
        }
        Ok(DynTensor { storage, shape })
    }

    /// Zero-filled tensor of the given dtype.
    pub fn zeros(dtype: DType, shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        DynTensor {
            storage: CpuStorage::zeros(dtype, shape.numel()),
            shape,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    pub fn storage(&self) -> &CpuStorage {
        &self.storage
    }

    /// Borrow the data as `&[T]`.
    pub fn as_slice<T: Element>(&self) -> Result<&[T]> {
        self.storage
            .as_slice::<T>()
            .ok_or(TensorError::DTypeMismatch {
                expected: T::DTYPE,
                got: self.dtype(),
            })
    }

    /// Convert into a typed tensor, failing if `T` is not the stored type.
    pub fn downcast<T: Element>(self) -> Result<Tensor<T>> {
        let got = self.dtype();
        match T::unwrap_storage(self.storage) {
            Ok(data) => Ok(Tensor::from_parts_unchecked(data, self.shape)),
            Err(_) => Err(TensorError::DTypeMismatch {
                expected: T::DTYPE,
                got,
            }),
        }
    }
}

impl<T: Element> From<Tensor<T>> for DynTensor {
    fn from(tensor: Tensor<T>) -> Self {
        let (shape, data) = tensor.into_parts();
        DynTensor {
            storage: T::into_storage(data),
            shape,
        }
    }
}
