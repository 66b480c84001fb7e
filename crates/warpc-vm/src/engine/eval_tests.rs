use half::f16;
use warpc_core::{Dtype, ExprType, OperatorKind, TypeError};

use super::{LaneValue, Lanes, Mask, RuntimeError, Scalar, binary};

fn ints(dtype: Dtype, values: &[i64]) -> LaneValue {
    Lanes::from_ints(dtype, values).into()
}

fn floats(dtype: Dtype, values: &[f64]) -> LaneValue {
    Lanes::from_floats(dtype, values).into()
}

fn mask(bits: &[bool]) -> LaneValue {
    Mask::new(bits.to_vec()).into()
}

fn eval(op: OperatorKind, lhs: &LaneValue, rhs: &LaneValue) -> LaneValue {
    binary(op, lhs, rhs)
        .unwrap_or_else(|e| panic!("{op}: {e}"))
        .1
}

#[test]
fn mixed_signedness_narrow_unsigned_stays_signed() {
    let z = eval(
        OperatorKind::Mul,
        &ints(Dtype::Int32, &[2, -3]),
        &ints(Dtype::Uint8, &[3, 4]),
    );
    assert_eq!(z, ints(Dtype::Int32, &[6, -12]));
}

#[test]
fn mixed_signedness_wraps_in_unsigned() {
    let z = eval(
        OperatorKind::Add,
        &ints(Dtype::Int32, &[-1]),
        &ints(Dtype::Uint32, &[1]),
    );
    assert_eq!(z, ints(Dtype::Uint32, &[0]));

    let z = eval(
        OperatorKind::Add,
        &ints(Dtype::Uint8, &[200]),
        &ints(Dtype::Uint8, &[100]),
    );
    assert_eq!(z, ints(Dtype::Uint8, &[44]));
}

#[test]
fn integer_remainder_truncates() {
    let x = ints(Dtype::Int32, &[7, -7, 7, -7]);
    let y = ints(Dtype::Int32, &[2, 2, -2, -2]);
    assert_eq!(eval(OperatorKind::Mod, &x, &y), ints(Dtype::Int32, &[1, -1, 1, -1]));
}

#[test]
fn integer_division_is_true_division_in_float32() {
    let x = ints(Dtype::Int16, &[7, -7, 1]);
    let y = ints(Dtype::Int16, &[2, 2, 0]);
    assert_eq!(
        eval(OperatorKind::Div, &x, &y),
        floats(Dtype::Float32, &[3.5, -3.5, f64::INFINITY])
    );
}

#[test]
fn floordiv_is_built_from_truncating_remainder() {
    let z = eval(
        OperatorKind::FloorDiv,
        &ints(Dtype::Int32, &[-7, 7]),
        &ints(Dtype::Int32, &[2, 2]),
    );
    assert_eq!(z, ints(Dtype::Int32, &[-3, 3]));

    let z = eval(
        OperatorKind::FloorDiv,
        &floats(Dtype::Float64, &[-7.0]),
        &floats(Dtype::Float64, &[2.0]),
    );
    assert_eq!(z, floats(Dtype::Float64, &[-3.0]));
}

#[test]
fn integer_division_by_zero_fails_the_launch() {
    let err = binary(
        OperatorKind::FloorDiv,
        &ints(Dtype::Int32, &[1, 2]),
        &ints(Dtype::Int32, &[1, 0]),
    )
    .unwrap_err();
    assert_eq!(err, RuntimeError::DivisionByZero { lane: 1 });

    let err = binary(
        OperatorKind::Mod,
        &ints(Dtype::Uint8, &[0]),
        &ints(Dtype::Uint8, &[0]),
    )
    .unwrap_err();
    assert_eq!(err, RuntimeError::DivisionByZero { lane: 0 });
}

#[test]
fn float_division_by_zero_is_ieee() {
    let z = eval(
        OperatorKind::Div,
        &floats(Dtype::Float32, &[1.0, -1.0]),
        &floats(Dtype::Float32, &[0.0, 0.0]),
    );
    assert_eq!(
        z,
        floats(Dtype::Float32, &[f64::INFINITY, f64::NEG_INFINITY])
    );
}

#[test]
fn half_precision_division_computes_in_float32() {
    let (res, z) = binary(
        OperatorKind::Div,
        &floats(Dtype::Float16, &[1.0]),
        &floats(Dtype::Float16, &[3.0]),
    )
    .unwrap();
    assert_eq!(res.result, ExprType::Scalar(Dtype::Float32));
    let lanes = z.as_lanes().unwrap();
    assert_eq!(lanes.get(0), Some(Scalar::F32(1.0f32 / 3.0)));
}

#[test]
fn float_wins_over_integer() {
    let z = eval(
        OperatorKind::Add,
        &floats(Dtype::Float16, &[1.5]),
        &ints(Dtype::Int64, &[2]),
    );
    assert_eq!(
        z.as_lanes().unwrap().get(0),
        Some(Scalar::F16(f16::from_f64(3.5)))
    );
}

#[test]
fn shifts_are_logical_and_saturate_to_zero() {
    let z = eval(
        OperatorKind::Shl,
        &ints(Dtype::Uint8, &[1, 1, 1]),
        &ints(Dtype::Uint8, &[1, 8, 9]),
    );
    assert_eq!(z, ints(Dtype::Uint8, &[2, 0, 0]));

    // -1 as uint8 is 255.
    let z = eval(
        OperatorKind::Shr,
        &ints(Dtype::Int8, &[-1]),
        &ints(Dtype::Int8, &[4]),
    );
    assert_eq!(z, ints(Dtype::Uint8, &[15]));

    let z = eval(
        OperatorKind::Shl,
        &ints(Dtype::Int32, &[1]),
        &ints(Dtype::Int8, &[31]),
    );
    assert_eq!(z, ints(Dtype::Uint32, &[1 << 31]));

    let z = eval(
        OperatorKind::Shl,
        &ints(Dtype::Uint64, &[3]),
        &ints(Dtype::Uint64, &[63]),
    );
    assert_eq!(z.as_lanes().unwrap().get(0), Some(Scalar::U64(1 << 63)));
}

#[test]
fn bitwise_on_integers() {
    let z = eval(
        OperatorKind::Xor,
        &ints(Dtype::Int16, &[-1, 0b1010]),
        &ints(Dtype::Int16, &[0, 0b0110]),
    );
    assert_eq!(z, ints(Dtype::Int16, &[-1, 0b1100]));
}

#[test]
fn bitwise_on_floats_is_a_type_error() {
    let err = binary(
        OperatorKind::And,
        &floats(Dtype::Float32, &[1.0]),
        &ints(Dtype::Int32, &[1]),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Type(TypeError::UnsupportedOperatorForType { .. })
    ));
}

#[test]
fn comparisons_follow_ieee_for_nan() {
    let x = floats(Dtype::Float32, &[f64::NAN, 1.0]);
    let y = floats(Dtype::Float32, &[f64::NAN, 1.0]);
    assert_eq!(eval(OperatorKind::Eq, &x, &y), mask(&[false, true]));
    assert_eq!(eval(OperatorKind::Ne, &x, &y), mask(&[true, false]));
    assert_eq!(eval(OperatorKind::Lt, &x, &y), mask(&[false, false]));
    assert_eq!(eval(OperatorKind::Ge, &x, &y), mask(&[false, true]));
}

#[test]
fn comparisons_use_the_promoted_type() {
    // int32 -1 converts to uint32 4294967295.
    let z = eval(
        OperatorKind::Lt,
        &ints(Dtype::Int32, &[-1]),
        &ints(Dtype::Uint32, &[1]),
    );
    assert_eq!(z, mask(&[false]));

    let z = eval(
        OperatorKind::Lt,
        &ints(Dtype::Int64, &[-1]),
        &ints(Dtype::Uint8, &[1]),
    );
    assert_eq!(z, mask(&[true]));
}

#[test]
fn masks_combine_logically() {
    let a = mask(&[true, true, false]);
    let b = mask(&[true, false, false]);
    assert_eq!(eval(OperatorKind::And, &a, &b), mask(&[true, false, false]));
    assert_eq!(eval(OperatorKind::Or, &a, &b), mask(&[true, true, false]));
    assert_eq!(eval(OperatorKind::Xor, &a, &b), mask(&[false, true, false]));
    assert_eq!(eval(OperatorKind::Eq, &a, &b), mask(&[true, false, true]));
}

#[test]
fn lane_counts_must_agree() {
    let err = binary(
        OperatorKind::Add,
        &ints(Dtype::Int32, &[1, 2]),
        &ints(Dtype::Int32, &[1, 2, 3]),
    )
    .unwrap_err();
    assert_eq!(
        err,
        RuntimeError::LaneCountMismatch {
            expected: 2,
            found: 3
        }
    );
}
