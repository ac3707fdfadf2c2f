//! `tm-tensor` - Typed tensors and N-dimensional concatenation for tensor-merge.
//!
//! This crate provides:
//! - A row-major `Tensor<T>` generic over its element type
//! - A runtime-typed `DynTensor` backed by `CpuStorage`
//! - `concatenate` / `split` along any axis, plus `ConcatSpec` for
//!   validating shapes and computing view origins up front
//! - Shape utilities and data type definitions (F32, F16, QAsymm8, Signed32)
//!
//! Enable the `parallel` feature to copy large outputs with rayon.

pub mod concat;
pub mod config;
pub mod dtype;
pub mod dyn_tensor;
pub mod error;
pub mod shape;
pub mod storage;
pub mod tensor;


// Re-export primary types at the crate root for convenience.
pub use concat::{concatenate, concatenate_dyn, concatenate_with, split, ConcatSpec};
pub use config::ConcatConfig;
pub use dtype::{DType, Element};
pub use dyn_tensor::DynTensor;
pub use error::{Result, TensorError};
pub use shape::Shape;
pub use storage::CpuStorage;
pub use tensor::Tensor;
