//! N-dimensional concatenation along an arbitrary axis, and its inverse.
//!
//! A row-major buffer cut along `axis` is a sequence of `outer` rows, where
//! `outer` is the product of the extents before `axis`. Row `o` of input `i`
//! is one contiguous chunk of `extent_i * inner` elements. The output row `o`
//! is the chunks of every input, in input order, laid end to end. For
//! `axis == 0` there is a single row, so each input is one block copy; for
//! inner axes the inputs interleave.

use tracing::{debug, trace};

use crate::config::ConcatConfig;
use crate::dtype::{DType, Element};
use crate::dyn_tensor::DynTensor;
use crate::error::{Result, TensorError};
use crate::shape::Shape;
use crate::storage::CpuStorage;
use crate::tensor::Tensor;

/// Validated description of a concatenation: the input shapes, the axis, and
/// the resulting output shape and per-input view origins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatSpec {
    input_shapes: Vec<Shape>,
    output_shape: Shape,
    axis: usize,
    offsets: Vec<usize>,
}

impl ConcatSpec {
    /// Build a spec for concatenating tensors of `shapes` along `axis`,
    /// inferring the output shape.
    pub fn new(shapes: &[Shape], axis: usize) -> Result<ConcatSpec> {
        let refs: Vec<&Shape> = shapes.iter().collect();
        let layout = plan_layout(&refs, axis)?;

        Ok(ConcatSpec {
            input_shapes: shapes.to_vec(),
            output_shape: layout.shape,
            axis,
            offsets: layout.offsets,
        })
    }

    /// Like [`ConcatSpec::new`], but also checks a caller-declared output
    /// shape against the inferred one.
    pub fn with_output(shapes: &[Shape], output: &Shape, axis: usize) -> Result<ConcatSpec> {
        let spec = ConcatSpec::new(shapes, axis)?;
        if &spec.output_shape != output {
            return Err(TensorError::ShapeMismatch {
                expected: spec.output_shape.dims().to_vec(),
                got: output.dims().to_vec(),
            });
        }
        Ok(spec)
    }

    pub fn input_shapes(&self) -> &[Shape] {
        &self.input_shapes
    }

    pub fn output_shape(&self) -> &Shape {
        &self.output_shape
    }

    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Number of inputs (views into the output).
    pub fn num_views(&self) -> usize {
        self.input_shapes.len()
    }

    /// Offset of each input along the concat axis.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Coordinate in the output where input `i`'s region begins.
    ///
    /// Zero on every axis except the concat axis.
    ///
    /// # Panics
    /// Panics if `i >= num_views()`.
    pub fn view_origin(&self, i: usize) -> Vec<usize> {
        let mut origin = vec![0; self.output_shape.ndim()];
        origin[self.axis] = self.offsets[i];
        origin
    }

    /// View origins of all inputs, in input order.
    pub fn view_origins(&self) -> Vec<Vec<usize>> {
        (0..self.num_views()).map(|i| self.view_origin(i)).collect()
    }

    /// Concatenate `inputs`, which must match this spec's input shapes
    /// one-to-one.
    pub fn apply<T: Element>(&self, inputs: &[Tensor<T>]) -> Result<Tensor<T>> {
        if inputs.len() != self.input_shapes.len() {
            return Err(TensorError::ShapeMismatch {
                expected: vec![self.input_shapes.len()],
                got: vec![inputs.len()],
            });
        }
        for (expected, input) in self.input_shapes.iter().zip(inputs) {
            if expected != input.shape() {
                return Err(TensorError::ShapeMismatch {
                    expected: expected.dims().to_vec(),
                    got: input.shape().dims().to_vec(),
                });
            }
        }
        concatenate(inputs, self.axis)
    }
}

/// Concatenate `inputs` along `axis`, in the order given.
///
/// All inputs must share a rank and agree on every extent except `axis`.
/// The result has the inputs' shape with the `axis` extent replaced by the
/// sum of theirs.
///
/// # Errors
/// - [`TensorError::EmptyInput`] if `inputs` is empty.
/// - [`TensorError::InvalidAxis`] if `axis` is not below the rank.
/// - [`TensorError::ShapeMismatch`] on rank or non-concat extent disagreement.
/// - [`TensorError::SizeOverflow`] if the output extent or size does not fit
///   in `usize`.
///
/// Validation runs before any allocation.
pub fn concatenate<T: Element>(inputs: &[Tensor<T>], axis: usize) -> Result<Tensor<T>> {
    concatenate_with(inputs, axis, &ConcatConfig::default())
}

/// [`concatenate`] with explicit copy tuning.
pub fn concatenate_with<T: Element>(
    inputs: &[Tensor<T>],
    axis: usize,
    config: &ConcatConfig,
) -> Result<Tensor<T>> {
    let refs: Vec<&Tensor<T>> = inputs.iter().collect();
    concatenate_refs(&refs, axis, config)
}

pub(crate) fn concatenate_refs<T: Element>(
    inputs: &[&Tensor<T>],
    axis: usize,
    config: &ConcatConfig,
) -> Result<Tensor<T>> {
    let views: Vec<View<'_, T>> = inputs
        .iter()
        .map(|t| View {
            shape: t.shape(),
            data: t.data(),
        })
        .collect();
    let (shape, data) = concat_views(&views, axis, config)?;
    Ok(Tensor::from_parts_unchecked(data, shape))
}

/// Concatenate tensors whose element type is only known at runtime.
///
/// # Errors
/// As [`concatenate`], plus [`TensorError::DTypeMismatch`] if the inputs do
/// not all share the first input's dtype.
pub fn concatenate_dyn(inputs: &[DynTensor], axis: usize) -> Result<DynTensor> {
    let first = inputs.first().ok_or(TensorError::EmptyInput)?;
    let dtype = first.dtype();
    if let Some(other) = inputs.iter().find(|t| t.dtype() != dtype) {
        return Err(TensorError::DTypeMismatch {
            expected: dtype,
            got: other.dtype(),
        });
    }

    let config = ConcatConfig::default();
    match dtype {
        DType::F32 => concat_dyn_typed::<f32>(inputs, axis, &config),
        DType::F16 => concat_dyn_typed::<half::f16>(inputs, axis, &config),
        DType::QAsymm8 => concat_dyn_typed::<u8>(inputs, axis, &config),
        DType::Signed32 => concat_dyn_typed::<i32>(inputs, axis, &config),
    }
}

fn concat_dyn_typed<T: Element>(
    inputs: &[DynTensor],
    axis: usize,
    config: &ConcatConfig,
) -> Result<DynTensor> {
    let views = inputs
        .iter()
        .map(|t| {
            Ok(View {
                shape: t.shape(),
                data: t.as_slice::<T>()?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let (shape, data) = concat_views(&views, axis, config)?;
    DynTensor::try_new(CpuStorage::from_vec(data), shape)
}

/// Cut `tensor` along `axis` into consecutive pieces with the given extents.
///
/// Inverse of [`concatenate`]: splitting a concatenation by its inputs'
/// extents on `axis` gives the inputs back, in order.
///
/// # Errors
/// - [`TensorError::EmptyInput`] if `extents` is empty.
/// - [`TensorError::InvalidAxis`] if `axis` is not below the rank.
/// - [`TensorError::InvalidSplit`] if `extents` do not sum to the `axis` extent.
pub fn split<T: Element>(
    tensor: &Tensor<T>,
    axis: usize,
    extents: &[usize],
) -> Result<Vec<Tensor<T>>> {
    if extents.is_empty() {
        return Err(TensorError::EmptyInput);
    }
    let axis = tensor.shape().check_axis(axis)?;
    let extent = tensor.shape().dim(axis);
    let total = extents.iter().fold(0usize, |acc, &e| acc.saturating_add(e));
    if total != extent {
        return Err(TensorError::InvalidSplit {
            axis,
            extent,
            total,
        });
    }

    debug!(axis, pieces = extents.len(), input = %tensor.shape(), "splitting tensor");

    let mut start = 0;
    extents
        .iter()
        .map(|&len| {
            let piece = tensor.narrow(axis, start, len);
            start += len;
            piece
        })
        .collect()
}

/// Borrowed shape + data pair the kernel works on, so typed and
/// type-erased tensors share one code path.
struct View<'a, T> {
    shape: &'a Shape,
    data: &'a [T],
}

/// Output shape and copy geometry for one concatenation.
struct Layout {
    shape: Shape,
    /// Start of each input along the concat axis.
    offsets: Vec<usize>,
    /// Output elements per outer row.
    row: usize,
    numel: usize,
}

fn plan_layout(shapes: &[&Shape], axis: usize) -> Result<Layout> {
    let first = shapes.first().ok_or(TensorError::EmptyInput)?;
    let axis = first.check_axis(axis)?;
    let overflow = || TensorError::SizeOverflow {
        axis,
        dims: first.dims().to_vec(),
    };

    let mut offsets = Vec::with_capacity(shapes.len());
    let mut extent = 0usize;
    for shape in shapes {
        if !first.matches_except(shape, axis) {
            return Err(TensorError::ShapeMismatch {
                expected: first.dims().to_vec(),
                got: shape.dims().to_vec(),
            });
        }
        offsets.push(extent);
        extent = extent.checked_add(shape.dim(axis)).ok_or_else(overflow)?;
    }

    let shape = first.with_dim(axis, extent);
    let row = shape.checked_size_from(axis).ok_or_else(overflow)?;
    let numel = shape.checked_numel().ok_or_else(overflow)?;

    Ok(Layout {
        shape,
        offsets,
        row,
        numel,
    })
}

fn concat_views<T: Element>(
    views: &[View<'_, T>],
    axis: usize,
    config: &ConcatConfig,
) -> Result<(Shape, Vec<T>)> {
    let shapes: Vec<&Shape> = views.iter().map(|v| v.shape).collect();
    let Layout {
        shape: out_shape,
        row,
        numel,
        ..
    } = plan_layout(&shapes, axis)?;

    debug!(
        axis,
        inputs = views.len(),
        output = %out_shape,
        "concatenating tensors"
    );

    if numel == 0 {
        return Ok((out_shape, Vec::new()));
    }
    let outer = numel / row;

    // (source buffer, elements contributed per outer row). Each input's run
    // is no longer than the output's, so it fits whenever `row` does.
    let chunks = views
        .iter()
        .map(|v| {
            v.shape
                .checked_size_from(axis)
                .map(|len| (v.data, len))
                .ok_or_else(|| TensorError::SizeOverflow {
                    axis,
                    dims: v.shape.dims().to_vec(),
                })
        })
        .collect::<Result<Vec<(&[T], usize)>>>()?;

    let data = if config.use_parallel(numel, outer) {
        trace!(rows = outer, row_len = row, "parallel row copy");
        copy_rows_parallel(&chunks, outer, row)
    } else {
        trace!(rows = outer, row_len = row, "serial row copy");
        copy_rows(&chunks, outer, numel)
    };

    Ok((out_shape, data))
}

fn copy_rows<T: Element>(chunks: &[(&[T], usize)], outer: usize, numel: usize) -> Vec<T> {
    let mut data = Vec::with_capacity(numel);
    for o in 0..outer {
        for &(src, len) in chunks {
            data.extend_from_slice(&src[o * len..(o + 1) * len]);
        }
    }
    data
}

#[cfg(feature = "parallel")]
fn copy_rows_parallel<T: Element>(
    chunks: &[(&[T], usize)],
    outer: usize,
    row: usize,
) -> Vec<T> {
    use rayon::prelude::*;

    let mut data = vec![T::zero(); outer * row];
    data.par_chunks_mut(row).enumerate().for_each(|(o, dst)| {
        let mut at = 0;
        for &(src, len) in chunks {
            dst[at..at + len].copy_from_slice(&src[o * len..(o + 1) * len]);
            at += len;
        }
    });
    data
}

#[cfg(not(feature = "parallel"))]
fn copy_rows_parallel<T: Element>(
    chunks: &[(&[T], usize)],
    outer: usize,
    row: usize,
) -> Vec<T> {
    copy_rows(chunks, outer, outer * row)
}
