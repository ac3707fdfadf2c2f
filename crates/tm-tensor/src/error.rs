use thiserror::Error;

use crate::dtype::DType;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TensorError {
    #[error("no input tensors supplied")]
    EmptyInput,
    #[error("invalid axis {axis} for tensor with {ndim} dimensions")]
    InvalidAxis { axis: usize, ndim: usize },
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },
    #[error("dtype mismatch: expected {expected}, got {got}")]
    DTypeMismatch { expected: DType, got: DType },
    #[error("split extents along axis {axis} sum to {total}, tensor extent is {extent}")]
    InvalidSplit {
        axis: usize,
        extent: usize,
        total: usize,
    },
    #[error("concatenating along axis {axis} overflows usize (first input {dims:?})")]
    SizeOverflow { axis: usize, dims: Vec<usize> },
    #[error("window [{start}, {start}+{len}) out of range for axis {axis} with extent {extent}")]
    OutOfRange {
        axis: usize,
        start: usize,
        len: usize,
        extent: usize,
    },
}

pub type Result<T> = std::result::Result<T, TensorError>;
