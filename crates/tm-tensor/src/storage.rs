use half::f16;

use crate::dtype::{DType, Element};

/// CPU-side, type-erased tensor storage.
///
/// One variant per [`DType`]. Typed code goes through [`Element`] to get a
/// concrete slice back out.
#[derive(Debug, Clone, PartialEq)]
pub enum CpuStorage {
    F32(Vec<f32>),
    F16(Vec<f16>),
    QAsymm8(Vec<u8>),
    Signed32(Vec<i32>),
}

impl CpuStorage {
    /// Number of elements in this storage.
    pub fn len(&self) -> usize {
        match self {
            CpuStorage::F32(v) => v.len(),
            CpuStorage::F16(v) => v.len(),
            CpuStorage::QAsymm8(v) => v.len(),
            CpuStorage::Signed32(v) => v.len(),
        }
    }

    /// Returns true if the storage contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the dtype of this storage.
    pub fn dtype(&self) -> DType {
        match self {
            CpuStorage::F32(_) => DType::F32,
            CpuStorage::F16(_) => DType::F16,
            CpuStorage::QAsymm8(_) => DType::QAsymm8,
            CpuStorage::Signed32(_) => DType::Signed32,
        }
    }

    /// Create zero-filled storage for the given dtype and element count.
    pub fn zeros(dtype: DType, n: usize) -> Self {
        match dtype {
            DType::F32 => CpuStorage::F32(vec![0.0; n]),
            DType::F16 => CpuStorage::F16(vec![f16::ZERO; n]),
            DType::QAsymm8 => CpuStorage::QAsymm8(vec![0; n]),
            DType::Signed32 => CpuStorage::Signed32(vec![0; n]),
        }
    }

    /// Wrap a typed vector.
    pub fn from_vec<T: Element>(data: Vec<T>) -> Self {
        T::into_storage(data)
    }

    /// Borrow the data as a typed slice, or `None` if `T` does not match.
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::from_storage(self)
    }
}
