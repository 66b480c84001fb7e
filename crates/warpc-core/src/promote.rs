//! Promotion and legality rules for binary operators.
//!
//! Integer promotion follows C rather than the host numeric library:
//! mixing signed and unsigned operands of equal or wider unsigned width
//! yields the unsigned type, where a numpy-style promotion would widen to a
//! larger signed type.

use crate::dtype::{Dtype, DtypeKind, ExprType};
use crate::operator::{OperatorClass, OperatorKind};

/// Outcome of resolving a binary operator against two operand types.
pub type PromotionOutcome = Result<Resolution, TypeError>;

/// A successful resolution.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize)]
pub struct Resolution {
    /// Type both operands are converted to before the operation executes.
    pub compute: ExprType,
    /// Type of the resulting expression.
    pub result: ExprType,
}

impl Resolution {
    fn scalar(dtype: Dtype) -> Self {
        Self {
            compute: ExprType::Scalar(dtype),
            result: ExprType::Scalar(dtype),
        }
    }

    fn mask(compute: ExprType) -> Self {
        Self {
            compute,
            result: ExprType::Mask,
        }
    }

    /// Scalar compute dtype. `None` when both operands are masks.
    pub fn compute_dtype(&self) -> Option<Dtype> {
        self.compute.dtype()
    }
}

/// Compile-time type errors raised by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("invalid operands of type {lhs} and {rhs} for `{op}`")]
    UnsupportedOperatorForType {
        op: OperatorKind,
        lhs: ExprType,
        rhs: ExprType,
    },

    #[error("cannot use `{op}` on {lhs} and {rhs} because they have different signedness")]
    SignednessMismatch {
        op: OperatorKind,
        lhs: Dtype,
        rhs: Dtype,
    },

    #[error("select branches have different types: {lhs} and {rhs}")]
    DtypeMismatch { lhs: ExprType, rhs: ExprType },

    #[error("select condition must be a mask, found {found}")]
    NonMaskCondition { found: ExprType },
}

impl TypeError {
    /// Operator the error was raised for.
    pub fn operator(&self) -> OperatorKind {
        match self {
            Self::UnsupportedOperatorForType { op, .. } | Self::SignednessMismatch { op, .. } => *op,
            Self::DtypeMismatch { .. } | Self::NonMaskCondition { .. } => OperatorKind::Select,
        }
    }
}

/// Resolve `lhs op rhs`.
///
/// For `select`, `lhs` and `rhs` are the two branch types; the condition is
/// checked separately with [`resolve_select`].
pub fn resolve(op: OperatorKind, lhs: ExprType, rhs: ExprType) -> PromotionOutcome {
    let unsupported = || TypeError::UnsupportedOperatorForType { op, lhs, rhs };

    if op == OperatorKind::Select {
        return select_branches(lhs, rhs);
    }

    let (l, r) = match (lhs, rhs) {
        (ExprType::Scalar(l), ExprType::Scalar(r)) => (l, r),
        (ExprType::Mask, ExprType::Mask) => {
            return match op {
                OperatorKind::And
                | OperatorKind::Or
                | OperatorKind::Xor
                | OperatorKind::Eq
                | OperatorKind::Ne => Ok(Resolution::mask(ExprType::Mask)),
                _ => Err(unsupported()),
            };
        }
        _ => return Err(unsupported()),
    };

    match op.class() {
        OperatorClass::Arithmetic => arithmetic(op, l, r).map(Resolution::scalar),
        OperatorClass::Bitwise => {
            if l.is_float() || r.is_float() {
                return Err(unsupported());
            }
            Ok(Resolution::scalar(integer_promotion(l, r)))
        }
        OperatorClass::Shift => {
            if l.is_float() || r.is_float() {
                return Err(unsupported());
            }
            let width = l.bit_width().max(r.bit_width());
            let compute = Dtype::integer(false, width).unwrap_or(Dtype::Uint64);
            Ok(Resolution::scalar(compute))
        }
        OperatorClass::Compare => Ok(Resolution::mask(common_type(l, r).into())),
        OperatorClass::Select => unreachable!("select handled above"),
    }
}

/// Convenience wrapper over [`resolve`] for two scalar dtypes.
pub fn resolve_dtypes(op: OperatorKind, lhs: Dtype, rhs: Dtype) -> PromotionOutcome {
    resolve(op, lhs.into(), rhs.into())
}

/// Check a full `select(cond, a, b)`. Select never promotes.
pub fn resolve_select(cond: ExprType, a: ExprType, b: ExprType) -> PromotionOutcome {
    if !cond.is_mask() {
        return Err(TypeError::NonMaskCondition { found: cond });
    }
    select_branches(a, b)
}

fn select_branches(a: ExprType, b: ExprType) -> PromotionOutcome {
    if a != b {
        return Err(TypeError::DtypeMismatch { lhs: a, rhs: b });
    }
    Ok(match a {
        ExprType::Scalar(d) => Resolution::scalar(d),
        ExprType::Mask => Resolution::mask(ExprType::Mask),
    })
}

fn arithmetic(op: OperatorKind, l: Dtype, r: Dtype) -> Result<Dtype, TypeError> {
    if op.is_division_like() && l.is_integer() && r.is_integer() && l.is_signed() != r.is_signed()
    {
        return Err(TypeError::SignednessMismatch { op, lhs: l, rhs: r });
    }

    // `/` on integers is true division.
    if op == OperatorKind::Div && l.is_integer() && r.is_integer() {
        return Ok(Dtype::Float32);
    }

    let ty = common_type(l, r);

    // No native 16-bit divide or remainder: compute in float32.
    if op.is_division_like() && ty.is_float() && ty.bit_width() == 16 {
        return Ok(Dtype::Float32);
    }
    Ok(ty)
}

/// Common dtype for two scalar operands, ignoring operator-specific rules.
pub fn common_type(l: Dtype, r: Dtype) -> Dtype {
    match (l.is_float(), r.is_float()) {
        (true, true) => float_promotion(l, r),
        (true, false) => l,
        (false, true) => r,
        (false, false) => integer_promotion(l, r),
    }
}

/// Wider float wins; the two 16-bit formats meet at float32.
pub fn float_promotion(l: Dtype, r: Dtype) -> Dtype {
    debug_assert!(l.is_float() && r.is_float());
    if l == r {
        return l;
    }
    if l.bit_width() == r.bit_width() {
        return Dtype::Float32;
    }
    if l.bit_width() > r.bit_width() { l } else { r }
}

/// C-style integer promotion.
///
/// - same signedness: that signedness, max width
/// - mixed, unsigned at least as wide: unsigned, max width
/// - mixed, unsigned narrower: the wider signed type
pub fn integer_promotion(l: Dtype, r: Dtype) -> Dtype {
    debug_assert!(l.is_integer() && r.is_integer());
    let width = l.bit_width().max(r.bit_width());
    let kind = match (l.kind(), r.kind()) {
        (a, b) if a == b => a,
        _ => {
            let (signed, unsigned) = if l.is_signed() { (l, r) } else { (r, l) };
            if unsigned.bit_width() >= signed.bit_width() {
                DtypeKind::Unsigned
            } else {
                DtypeKind::Signed
            }
        }
    };
    Dtype::from_parts(kind, width, false).unwrap_or(l)
}
