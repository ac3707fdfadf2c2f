//! Two-input merger fixtures: a pair of [2, 3, 2, 2] tensors holding 1..=12
//! each, concatenated along every axis, checked against hand-written output.

use approx::assert_relative_eq;
use half::f16;
use tm_tensor::{concatenate, concatenate_dyn, ConcatSpec, DType, DynTensor, Element, Shape, Tensor};

/// Builds fixture values for a concrete element type.
trait Fixture: Element {
    fn from_i32(v: i32) -> Self;
    fn as_f64(self) -> f64;
}

impl Fixture for f32 {
    fn from_i32(v: i32) -> Self {
        v as f32
    }
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Fixture for f16 {
    fn from_i32(v: i32) -> Self {
        f16::from_f32(v as f32)
    }
    fn as_f64(self) -> f64 {
        self.to_f64()
    }
}

impl Fixture for u8 {
    fn from_i32(v: i32) -> Self {
        v as u8
    }
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Fixture for i32 {
    fn from_i32(v: i32) -> Self {
        v
    }
    fn as_f64(self) -> f64 {
        self as f64
    }
}

const INPUT_SHAPE: [usize; 4] = [2, 3, 2, 2];

fn input_values() -> Vec<i32> {
    (1..=12).chain(1..=12).collect()
}

fn expected_dim0() -> Vec<i32> {
    (0..4).flat_map(|_| 1..=12).collect()
}

fn expected_dim1() -> Vec<i32> {
    expected_dim0()
}

#[rustfmt::skip]
fn expected_dim2() -> Vec<i32> {
    let rows = [
        1, 2, 3, 4, 1, 2, 3, 4,
        5, 6, 7, 8, 5, 6, 7, 8,
        9, 10, 11, 12, 9, 10, 11, 12,
    ];
    rows.iter().chain(rows.iter()).copied().collect()
}

#[rustfmt::skip]
fn expected_dim3() -> Vec<i32> {
    let rows = [
        1, 2, 1, 2, 3, 4, 3, 4,
        5, 6, 5, 6, 7, 8, 7, 8,
        9, 10, 9, 10, 11, 12, 11, 12,
    ];
    rows.iter().chain(rows.iter()).copied().collect()
}

fn fixture_tensor<T: Fixture>(values: &[i32], shape: &[usize]) -> Tensor<T> {
    Tensor::new(
        values.iter().map(|&v| T::from_i32(v)).collect(),
        Shape::from_slice(shape),
    )
}

fn run_merger<T: Fixture>(axis: usize, output_shape: [usize; 4], expected: &[i32]) {
    let input = fixture_tensor::<T>(&input_values(), &INPUT_SHAPE);
    let spec = ConcatSpec::with_output(
        &[input.shape().clone(), input.shape().clone()],
        &Shape::from(output_shape),
        axis,
    )
    .unwrap();

    let out = spec.apply(&[input.clone(), input]).unwrap();
    assert_eq!(out.shape().dims(), &output_shape);
    assert_eq!(out.dtype(), T::DTYPE);
    assert_eq!(out.data().len(), expected.len());
    for (got, &want) in out.data().iter().zip(expected) {
        assert_relative_eq!(got.as_f64(), want as f64);
    }
}

fn run_all_axes<T: Fixture>() {
    run_merger::<T>(0, [4, 3, 2, 2], &expected_dim0());
    run_merger::<T>(1, [2, 6, 2, 2], &expected_dim1());
    run_merger::<T>(2, [2, 3, 4, 2], &expected_dim2());
    run_merger::<T>(3, [2, 3, 2, 4], &expected_dim3());
}

#[test]
fn merger_end_to_end_f32() {
    run_all_axes::<f32>();
}

#[test]
fn merger_end_to_end_f16() {
    run_all_axes::<f16>();
}

#[test]
fn merger_end_to_end_qasymm8() {
    run_all_axes::<u8>();
}

#[test]
fn merger_end_to_end_signed32() {
    run_all_axes::<i32>();
}

fn second_input_values() -> Vec<i32> {
    (13..=24).chain(13..=24).collect()
}

#[rustfmt::skip]
fn expected_distinct(axis: usize) -> Vec<i32> {
    let rows: Vec<i32> = match axis {
        0 => return (1..=12).chain(1..=12).chain(13..=24).chain(13..=24).collect(),
        1 => (1..=12).chain(13..=24).collect(),
        2 => vec![
            1, 2, 3, 4, 13, 14, 15, 16,
            5, 6, 7, 8, 17, 18, 19, 20,
            9, 10, 11, 12, 21, 22, 23, 24,
        ],
        _ => vec![
            1, 2, 13, 14, 3, 4, 15, 16,
            5, 6, 17, 18, 7, 8, 19, 20,
            9, 10, 21, 22, 11, 12, 23, 24,
        ],
    };
    rows.iter().chain(rows.iter()).copied().collect()
}

#[test]
fn merger_distinct_inputs_keep_order() {
    let first = fixture_tensor::<f32>(&input_values(), &INPUT_SHAPE);
    let second = fixture_tensor::<f32>(&second_input_values(), &INPUT_SHAPE);
    let output_shapes = [[4, 3, 2, 2], [2, 6, 2, 2], [2, 3, 4, 2], [2, 3, 2, 4]];

    for (axis, output_shape) in output_shapes.into_iter().enumerate() {
        let spec = ConcatSpec::with_output(
            &[first.shape().clone(), second.shape().clone()],
            &Shape::from(output_shape),
            axis,
        )
        .unwrap();
        let out = spec.apply(&[first.clone(), second.clone()]).unwrap();
        let expected: Vec<f32> = expected_distinct(axis).into_iter().map(|v| v as f32).collect();
        assert_eq!(out.data(), expected.as_slice(), "axis {}", axis);

        let swapped = spec.apply(&[second.clone(), first.clone()]).unwrap();
        assert_ne!(swapped, out, "axis {}", axis);
    }
}

#[test]
fn merger_view_origins_follow_axis() {
    let shape = Shape::from(INPUT_SHAPE);
    for axis in 0..4 {
        let spec = ConcatSpec::new(&[shape.clone(), shape.clone()], axis).unwrap();
        let mut second = vec![0; 4];
        second[axis] = INPUT_SHAPE[axis];
        assert_eq!(spec.view_origins(), vec![vec![0; 4], second]);
    }
}

#[test]
fn merger_declared_output_wrong_axis_rejected() {
    let shape = Shape::from(INPUT_SHAPE);
    // Output declared for axis 0 while concatenating along axis 3.
    let result = ConcatSpec::with_output(
        &[shape.clone(), shape],
        &Shape::from([4, 3, 2, 2]),
        3,
    );
    assert!(result.is_err());
}

#[test]
fn merger_runtime_dtype_qasymm8() {
    let input = fixture_tensor::<u8>(&input_values(), &INPUT_SHAPE);
    let inputs = [DynTensor::from(input.clone()), DynTensor::from(input)];
    let out = concatenate_dyn(&inputs, 3).unwrap();
    assert_eq!(out.dtype(), DType::QAsymm8);
    assert_eq!(out.shape().dims(), &[2, 3, 2, 4]);

    let expected: Vec<u8> = expected_dim3().into_iter().map(|v| v as u8).collect();
    assert_eq!(out.downcast::<u8>().unwrap().into_data(), expected);
}

#[test]
fn merger_generic_entry_point_matches_spec_apply() {
    let input = fixture_tensor::<i32>(&input_values(), &INPUT_SHAPE);
    let out = concatenate(&[input.clone(), input], 2).unwrap();
    assert_eq!(out.data(), expected_dim2().as_slice());
}
