use std::fmt;

use half::f16;

use crate::storage::CpuStorage;

/// Supported data types for tensor storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit floating point.
    F32,
    /// 16-bit floating point (IEEE 754 half-precision, via the `half` crate).
    F16,
    /// 8-bit asymmetric quantized values, stored as raw `u8`.
    ///
    /// Scale and zero-point live with the caller; concatenation copies the
    /// quantized bytes untouched, so every input must share one scale/offset.
    QAsymm8,
    /// 32-bit signed integer.
    Signed32,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::F32 => write!(f, "f32"),
            DType::F16 => write!(f, "f16"),
            DType::QAsymm8 => write!(f, "qasymm8"),
            DType::Signed32 => write!(f, "i32"),
        }
    }
}

/// A scalar type that can live in a [`Tensor`](crate::Tensor).
///
/// Ties a Rust type to its runtime [`DType`] tag and to the matching
/// [`CpuStorage`] variant. Kernels only ever copy elements, so no arithmetic
/// is required.
pub trait Element: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    const DTYPE: DType;

    /// Value used to fill freshly allocated buffers.
    fn zero() -> Self;

    /// Wrap an owned buffer in the matching storage variant.
    fn into_storage(data: Vec<Self>) -> CpuStorage;

    /// Borrow the buffer back out of storage, or `None` if the variant differs.
    fn from_storage(storage: &CpuStorage) -> Option<&[Self]>;

    /// Take the buffer out of storage, handing the storage back if the
    /// variant differs.
    fn unwrap_storage(storage: CpuStorage) -> std::result::Result<Vec<Self>, CpuStorage>;
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident, $zero:expr) => {
        impl Element for $ty {
            const DTYPE: DType = DType::$variant;

            fn zero() -> Self {
                $zero
            }

            fn into_storage(data: Vec<Self>) -> CpuStorage {
                CpuStorage::$variant(data)
            }

            fn from_storage(storage: &CpuStorage) -> Option<&[Self]> {
                match storage {
                    CpuStorage::$variant(v) => Some(v.as_slice()),
                    _ => None,
                }
            }

            fn unwrap_storage(
                storage: CpuStorage,
            ) -> std::result::Result<Vec<Self>, CpuStorage> {
                match storage {
                    CpuStorage::$variant(v) => Ok(v),
                    other => Err(other),
                }
            }
        }
    };
}

impl_element!(f32, F32, 0.0);
impl_element!(f16, F16, f16::ZERO);
impl_element!(u8, QAsymm8, 0);
impl_element!(i32, Signed32, 0);
