use warpc_core::{Dtype, MaskedOps, TypeError};

use super::{LoweringError, PtxLowering, register_constraint};

#[test]
fn masked_load() {
    let mut lowering = PtxLowering::new();
    let mask = lowering.mask("p", 2);
    let value = lowering
        .load(Dtype::Int32, &"%base".to_owned(), &[0, 1], &mask)
        .unwrap();
    assert_eq!(value.len(), 2);
    assert_eq!(value.dtype(), Dtype::Int32);

    let asm = lowering.finish();
    insta::assert_snapshot!(asm.asm.replace("\r\n", "\n"), @r"
    mov.b32 $0, 0x0;
    @$3 ld.global.b32 $0, [ $2 ];
    mov.b32 $1, 0x0;
    @$5 ld.global.b32 $1, [ $4 + 4 ];
    ");
    assert_eq!(asm.constraints, "=r,=r,l,b,l,b");
    assert_eq!(asm.args, ["%t0", "%t1", "%base", "p0", "%base", "p1"]);
}

#[test]
fn narrow_load_uses_wide_register() {
    let mut lowering = PtxLowering::new();
    let mask = lowering.mask("p", 1);
    lowering
        .load(Dtype::Uint8, &"%base".to_owned(), &[7], &mask)
        .unwrap();

    let asm = lowering.finish();
    assert_eq!(asm.asm, "mov.b16 $0, 0x0;\r\n@$2 ld.global.b8 $0, [ $1 + 7 ];");
    assert_eq!(asm.constraints, "=h,l,b");
}

#[test]
fn masked_store() {
    let mut lowering = PtxLowering::new();
    let values = lowering.input("%v", Dtype::Int8, 2);
    let mask = lowering.mask("q", 2);
    lowering
        .store(&"%base".to_owned(), &[3, 5], &mask, &values)
        .unwrap();

    let asm = lowering.finish();
    insta::assert_snapshot!(asm.asm.replace("\r\n", "\n"), @r"
    @$3 st.global.b8 [ $2 + 3 ], $0;
    @$5 st.global.b8 [ $4 + 5 ], $1;
    ");
    assert_eq!(asm.constraints, "h,h,l,b,l,b");
}

#[test]
fn lane_select() {
    let mut lowering = PtxLowering::new();
    let a = lowering.input("%a", Dtype::Float64, 2);
    let b = lowering.input("%b", Dtype::Float64, 2);
    let mask = lowering.mask("m", 2);
    let out = lowering.select(&mask, &a, &b).unwrap();
    assert_eq!(out.dtype(), Dtype::Float64);

    let asm = lowering.finish();
    assert_eq!(
        asm.asm,
        "selp.b64 $0, $2, $4, $6;\r\nselp.b64 $1, $3, $5, $7;"
    );
    assert_eq!(asm.constraints, "=l,=l,l,l,l,l,b,b");
}

#[test]
fn select_never_promotes() {
    let mut lowering = PtxLowering::new();
    let a = lowering.input("%a", Dtype::Float16, 1);
    let b = lowering.input("%b", Dtype::BFloat16, 1);
    let mask = lowering.mask("m", 1);
    assert_eq!(
        lowering.select(&mask, &a, &b).unwrap_err(),
        LoweringError::Type(TypeError::DtypeMismatch {
            lhs: Dtype::Float16.into(),
            rhs: Dtype::BFloat16.into(),
        })
    );
}

#[test]
fn offsets_too_large_for_a_byte_address_are_rejected() {
    let mut lowering = PtxLowering::new();
    let mask = lowering.mask("p", 2);
    let err = lowering
        .load(Dtype::Int64, &"%base".to_owned(), &[0, usize::MAX / 4], &mask)
        .unwrap_err();
    assert_eq!(
        err,
        LoweringError::OffsetOverflow {
            offset: usize::MAX / 4,
            dtype: Dtype::Int64
        }
    );
    assert!(lowering.builder().is_empty());

    let values = lowering.input("%v", Dtype::Int8, 1);
    let mask = lowering.mask("p", 1);
    let err = lowering
        .store(&"%base".to_owned(), &[usize::MAX], &mask, &values)
        .unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"element offset 18446744073709551615 of int8 does not fit a 64-bit byte offset"
    );
    assert!(lowering.builder().is_empty());
}

#[test]
fn lane_counts_must_agree() {
    let mut lowering = PtxLowering::new();
    let mask = lowering.mask("p", 2);
    let err = lowering
        .load(Dtype::Int32, &"%base".to_owned(), &[0, 1, 2], &mask)
        .unwrap_err();
    assert_eq!(
        err,
        LoweringError::LaneCountMismatch {
            expected: 2,
            found: 3
        }
    );
    assert!(lowering.builder().is_empty());
}

#[test]
fn masked_copy_chains_load_into_store() {
    let mut lowering = PtxLowering::new();
    let mask = lowering.mask("p", 1);
    let value = lowering
        .load(Dtype::Float32, &"%src".to_owned(), &[2], &mask)
        .unwrap();
    lowering
        .store(&"%dst".to_owned(), &[2], &mask, &value)
        .unwrap();

    let asm = lowering.finish();
    assert_eq!(
        asm.asm,
        "mov.b32 $0, 0x0;\r\n@$2 ld.global.b32 $0, [ $1 + 8 ];\r\n@$4 st.global.b32 [ $3 + 8 ], $0;"
    );
    assert_eq!(asm.args, ["%t0", "%src", "p0", "%dst", "p0"]);
}

#[test]
fn register_classes() {
    assert_eq!(register_constraint(Dtype::Int8), "h");
    assert_eq!(register_constraint(Dtype::BFloat16), "h");
    assert_eq!(register_constraint(Dtype::Float32), "r");
    assert_eq!(register_constraint(Dtype::Uint64), "l");
}

#[test]
fn inline_asm_json() {
    let mut lowering = PtxLowering::new();
    let values = lowering.input("%v", Dtype::Int64, 1);
    let mask = lowering.mask("p", 1);
    lowering
        .store(&"%base".to_owned(), &[1], &mask, &values)
        .unwrap();

    let json = serde_json::to_value(lowering.finish()).unwrap();
    assert_eq!(json["asm"], "@$2 st.global.b64 [ $1 + 8 ], $0;");
    assert_eq!(json["constraints"], "l,l,b");
    assert_eq!(json["args"], serde_json::json!(["%v0", "%base", "p0"]));
}
