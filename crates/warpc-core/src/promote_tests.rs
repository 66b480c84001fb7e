use crate::promote::{common_type, float_promotion, integer_promotion};
use crate::{Dtype, ExprType, OperatorKind, Resolution, TypeError, resolve, resolve_dtypes, resolve_select};

use Dtype::*;

fn result(op: OperatorKind, l: Dtype, r: Dtype) -> Dtype {
    let res = resolve_dtypes(op, l, r).unwrap_or_else(|e| panic!("{l} {op} {r}: {e}"));
    res.result.dtype().expect("scalar result")
}

#[test]
fn same_signedness_keeps_signedness_and_widens() {
    for op in [OperatorKind::Add, OperatorKind::Sub, OperatorKind::Mul] {
        for a in Dtype::INTEGERS {
            for b in Dtype::INTEGERS.into_iter().filter(|b| b.kind() == a.kind()) {
                let z = result(op, a, b);
                assert_eq!(z.bit_width(), a.bit_width().max(b.bit_width()));
                assert_eq!(z.kind(), a.kind());
            }
        }
    }
}

#[test]
fn mixed_signedness_with_wider_unsigned_is_unsigned() {
    let signed = [Int8, Int16, Int32, Int64];
    let unsigned = [Uint8, Uint16, Uint32, Uint64];
    for a in signed {
        for b in unsigned.into_iter().filter(|b| b.bit_width() >= a.bit_width()) {
            assert_eq!(result(OperatorKind::Mul, a, b), b);
            assert_eq!(result(OperatorKind::Mul, b, a), b);
        }
    }
}

#[test]
fn mixed_signedness_with_narrower_unsigned_stays_signed() {
    assert_eq!(result(OperatorKind::Add, Int32, Uint8), Int32);
    assert_eq!(result(OperatorKind::Sub, Uint16, Int64), Int64);
    assert_eq!(result(OperatorKind::Xor, Int16, Uint8), Int16);
}

#[test]
fn division_rejects_any_signedness_mix() {
    let signed = [Int8, Int16, Int32, Int64];
    let unsigned = [Uint8, Uint16, Uint32, Uint64];
    for op in [OperatorKind::Div, OperatorKind::Mod, OperatorKind::FloorDiv] {
        for a in signed {
            for b in unsigned {
                for (l, r) in [(a, b), (b, a)] {
                    let err = resolve_dtypes(op, l, r).unwrap_err();
                    assert_eq!(err, TypeError::SignednessMismatch { op, lhs: l, rhs: r });
                }
            }
        }
    }
}

#[test]
fn remainder_same_signedness_is_integer() {
    assert_eq!(result(OperatorKind::Mod, Uint64, Uint16), Uint64);
    assert_eq!(result(OperatorKind::Mod, Int8, Int32), Int32);
    assert_eq!(result(OperatorKind::FloorDiv, Int64, Int64), Int64);
}

#[test]
fn integer_true_division_computes_in_float32() {
    for a in Dtype::INTEGERS {
        for b in Dtype::INTEGERS.into_iter().filter(|b| b.kind() == a.kind()) {
            let res = resolve_dtypes(OperatorKind::Div, a, b).unwrap();
            assert_eq!(res.compute, ExprType::Scalar(Float32), "{a} / {b}");
            assert_eq!(res.result, ExprType::Scalar(Float32), "{a} / {b}");
        }
    }
    assert_eq!(result(OperatorKind::Div, Int16, Float64), Float64);
}

#[test]
fn float_wins_over_integer() {
    assert_eq!(result(OperatorKind::Add, Float16, Int64), Float16);
    assert_eq!(result(OperatorKind::Mul, Uint32, Float16), Float16);
    assert_eq!(result(OperatorKind::Sub, Int8, Float64), Float64);
    assert_eq!(result(OperatorKind::Add, BFloat16, Uint8), BFloat16);
}

#[test]
fn wider_float_wins() {
    assert_eq!(result(OperatorKind::Add, Float16, Float32), Float32);
    assert_eq!(result(OperatorKind::Mul, Float64, BFloat16), Float64);
    assert_eq!(result(OperatorKind::Add, Float16, Float16), Float16);
    assert_eq!(result(OperatorKind::Add, BFloat16, BFloat16), BFloat16);
    assert_eq!(result(OperatorKind::Add, Float16, BFloat16), Float32);
}

#[test]
fn sixteen_bit_float_division_computes_in_float32() {
    for op in [OperatorKind::Div, OperatorKind::Mod, OperatorKind::FloorDiv] {
        for (l, r) in [
            (Float16, Float16),
            (BFloat16, BFloat16),
            (Float16, Int16),
            (Int16, BFloat16),
            (Float16, BFloat16),
        ] {
            let res = resolve_dtypes(op, l, r).unwrap();
            assert_eq!(res.compute, ExprType::Scalar(Float32), "{l} {op} {r}");
            assert_eq!(res.result, ExprType::Scalar(Float32));
        }
    }
    // Non-division ops keep the 16-bit type.
    assert_eq!(result(OperatorKind::Mul, Float16, Float16), Float16);
    assert_eq!(result(OperatorKind::Div, Float64, Float16), Float64);
}

#[test]
fn shift_is_always_unsigned_of_max_width() {
    for op in [OperatorKind::Shl, OperatorKind::Shr] {
        for a in Dtype::INTEGERS {
            for b in Dtype::INTEGERS {
                let z = result(op, a, b);
                assert!(z.is_unsigned(), "{a} {op} {b} -> {z}");
                assert_eq!(z.bit_width(), a.bit_width().max(b.bit_width()));
            }
        }
    }
}

#[test]
fn bitwise_with_any_float_operand_is_rejected() {
    for op in [
        OperatorKind::And,
        OperatorKind::Or,
        OperatorKind::Xor,
        OperatorKind::Shl,
        OperatorKind::Shr,
    ] {
        for a in Dtype::ALL {
            for b in Dtype::ALL.into_iter().filter(|b| a.is_float() || b.is_float()) {
                let err = resolve_dtypes(op, a, b).unwrap_err();
                assert!(
                    matches!(err, TypeError::UnsupportedOperatorForType { .. }),
                    "{a} {op} {b}"
                );
            }
        }
    }
}

#[test]
fn bitwise_follows_integer_promotion() {
    assert_eq!(result(OperatorKind::And, Int8, Uint16), Uint16);
    assert_eq!(result(OperatorKind::Or, Int64, Int8), Int64);
    assert_eq!(result(OperatorKind::Xor, Uint32, Uint32), Uint32);
}

#[test]
fn compare_yields_mask_and_accepts_mixed_signedness() {
    for op in [
        OperatorKind::Eq,
        OperatorKind::Ne,
        OperatorKind::Lt,
        OperatorKind::Le,
        OperatorKind::Gt,
        OperatorKind::Ge,
    ] {
        for a in Dtype::ALL {
            for b in Dtype::ALL {
                let res = resolve_dtypes(op, a, b).unwrap();
                assert_eq!(res.result, ExprType::Mask);
                assert_eq!(res.compute, ExprType::Scalar(common_type(a, b)));
            }
        }
    }
    let res = resolve_dtypes(OperatorKind::Lt, Int32, Uint32).unwrap();
    assert_eq!(res.compute_dtype(), Some(Uint32));
}

#[test]
fn masks_combine_logically() {
    let res = resolve(OperatorKind::And, ExprType::Mask, ExprType::Mask).unwrap();
    assert_eq!(res.result, ExprType::Mask);
    assert_eq!(res.compute_dtype(), None);

    let err = resolve(OperatorKind::Add, ExprType::Mask, ExprType::Mask).unwrap_err();
    assert!(matches!(err, TypeError::UnsupportedOperatorForType { .. }));

    let err = resolve(OperatorKind::And, ExprType::Mask, Int32.into()).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"invalid operands of type mask and int32 for `&`");
}

#[test]
fn select_requires_identical_branches() {
    let res = resolve_select(ExprType::Mask, Int64.into(), Int64.into()).unwrap();
    assert_eq!(
        res,
        Resolution {
            compute: Int64.into(),
            result: Int64.into()
        }
    );

    let err = resolve_select(ExprType::Mask, Int32.into(), Uint32.into()).unwrap_err();
    assert_eq!(
        err,
        TypeError::DtypeMismatch {
            lhs: Int32.into(),
            rhs: Uint32.into()
        }
    );
    assert_eq!(err.operator(), OperatorKind::Select);

    let err = resolve_select(Int32.into(), Float32.into(), Float32.into()).unwrap_err();
    assert_eq!(err, TypeError::NonMaskCondition { found: Int32.into() });
}

#[test]
fn select_never_promotes() {
    let err = resolve(OperatorKind::Select, Float16.into(), Float32.into()).unwrap_err();
    assert!(matches!(err, TypeError::DtypeMismatch { .. }));
}

#[test]
fn error_messages() {
    let err = resolve_dtypes(OperatorKind::Div, Int32, Uint32).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"cannot use `/` on int32 and uint32 because they have different signedness"
    );

    let err = resolve_dtypes(OperatorKind::Or, Float32, Int8).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"invalid operands of type float32 and int8 for `|`");
}

#[test]
fn resolution_is_symmetric_in_result_type() {
    for op in OperatorKind::ALL {
        if op == OperatorKind::Select {
            continue;
        }
        for a in Dtype::ALL {
            for b in Dtype::ALL {
                let ab = resolve_dtypes(op, a, b).map(|r| r.result);
                let ba = resolve_dtypes(op, b, a).map(|r| r.result);
                assert_eq!(ab.is_ok(), ba.is_ok(), "{a} {op} {b}");
                if let (Ok(x), Ok(y)) = (ab, ba) {
                    assert_eq!(x, y, "{a} {op} {b}");
                }
            }
        }
    }
}

#[test]
fn promotion_helpers() {
    assert_eq!(integer_promotion(Int8, Uint8), Uint8);
    assert_eq!(integer_promotion(Int64, Uint32), Int64);
    assert_eq!(float_promotion(BFloat16, Float16), Float32);
    assert_eq!(common_type(Uint64, Float16), Float16);
}
