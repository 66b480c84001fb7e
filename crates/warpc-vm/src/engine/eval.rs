//! Reference lane-wise evaluation of binary operators.
//!
//! Both operands are converted to the resolver's compute type, the operator
//! is applied per lane, and the result has the resolver's result type.

use warpc_core::{Dtype, ExprType, OperatorClass, OperatorKind, Resolution, resolve};

use super::error::RuntimeError;
use super::value::{LaneValue, Lanes, Mask, Scalar};

/// Evaluate `lhs op rhs` lane by lane.
pub fn binary(
    op: OperatorKind,
    lhs: &LaneValue,
    rhs: &LaneValue,
) -> Result<(Resolution, LaneValue), RuntimeError> {
    let res = resolve(op, lhs.ty(), rhs.ty())?;
    if lhs.len() != rhs.len() {
        return Err(RuntimeError::LaneCountMismatch {
            expected: lhs.len(),
            found: rhs.len(),
        });
    }

    let value = match (lhs, rhs, res.compute) {
        (LaneValue::Mask(a), LaneValue::Mask(b), _) => LaneValue::Mask(logical(op, a, b)),
        (LaneValue::Lanes(a), LaneValue::Lanes(b), ExprType::Scalar(compute)) => {
            let a = a.cast(compute);
            let b = b.cast(compute);
            if op.is_compare() {
                LaneValue::Mask(compare(op, &a, &b))
            } else {
                LaneValue::Lanes(arithmetic(op, compute, &a, &b)?)
            }
        }
        _ => unreachable!("resolver accepted {} {op} {}", lhs.ty(), rhs.ty()),
    };
    Ok((res, value))
}

fn logical(op: OperatorKind, a: &Mask, b: &Mask) -> Mask {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| match op {
            OperatorKind::And => x && y,
            OperatorKind::Or => x || y,
            OperatorKind::Xor | OperatorKind::Ne => x != y,
            OperatorKind::Eq => x == y,
            _ => unreachable!("`{op}` on masks"),
        })
        .collect()
}

fn compare(op: OperatorKind, a: &Lanes, b: &Lanes) -> Mask {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| match (x.as_i128(), y.as_i128()) {
            (Some(x), Some(y)) => ordered(op, x, y),
            // IEEE: every ordered comparison with NaN is false, `!=` is true.
            _ => ordered(op, x.as_f64(), y.as_f64()),
        })
        .collect()
}

fn ordered<T: PartialOrd>(op: OperatorKind, x: T, y: T) -> bool {
    match op {
        OperatorKind::Eq => x == y,
        OperatorKind::Ne => x != y,
        OperatorKind::Lt => x < y,
        OperatorKind::Le => x <= y,
        OperatorKind::Gt => x > y,
        OperatorKind::Ge => x >= y,
        _ => unreachable!("`{op}` is not a comparison"),
    }
}

fn arithmetic(
    op: OperatorKind,
    compute: Dtype,
    a: &Lanes,
    b: &Lanes,
) -> Result<Lanes, RuntimeError> {
    let values = a
        .iter()
        .zip(b.iter())
        .enumerate()
        .map(|(lane, (x, y))| {
            if compute.is_float() {
                Ok(float_op(op, compute, x.as_f64(), y.as_f64()))
            } else {
                int_op(op, compute, x, y, lane)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Lanes::from_raw(compute, values))
}

/// Integer lanes are widened to i128; the result wraps back to `compute`.
fn int_op(
    op: OperatorKind,
    compute: Dtype,
    x: Scalar,
    y: Scalar,
    lane: usize,
) -> Result<Scalar, RuntimeError> {
    let (Some(x), Some(y)) = (x.as_i128(), y.as_i128()) else {
        unreachable!("integer compute type with float operands");
    };
    let nonzero = |y: i128| {
        if y == 0 {
            Err(RuntimeError::DivisionByZero { lane })
        } else {
            Ok(y)
        }
    };

    let v = match op {
        OperatorKind::Add => x.wrapping_add(y),
        OperatorKind::Sub => x.wrapping_sub(y),
        OperatorKind::Mul => x.wrapping_mul(y),
        // i128 `%` truncates toward zero. Integer `/` computes in float.
        OperatorKind::Mod => x % nonzero(y)?,
        OperatorKind::FloorDiv => {
            let y = nonzero(y)?;
            (x - x % y) / y
        }
        OperatorKind::And => x & y,
        OperatorKind::Or => x | y,
        OperatorKind::Xor => x ^ y,
        OperatorKind::Shl | OperatorKind::Shr => {
            debug_assert!(compute.is_unsigned());
            let width = i128::from(compute.bit_width());
            if y >= width {
                0
            } else if op == OperatorKind::Shl {
                x << y
            } else {
                x >> y
            }
        }
        _ => unreachable!("`{op}` is not arithmetic"),
    };
    Ok(Scalar::from_i128(compute, v))
}

fn float_op(op: OperatorKind, compute: Dtype, x: f64, y: f64) -> Scalar {
    debug_assert_eq!(op.class(), OperatorClass::Arithmetic);
    let v = match op {
        OperatorKind::Add => x + y,
        OperatorKind::Sub => x - y,
        OperatorKind::Mul => x * y,
        OperatorKind::Div => x / y,
        OperatorKind::Mod => x % y,
        OperatorKind::FloorDiv => (x - x % y) / y,
        _ => unreachable!("`{op}` on floats"),
    };
    Scalar::from_f64(compute, v)
}
