use warpc_core::Dtype;

use super::dtypes::{DtypeInfo, render_table};

#[test]
fn table() {
    insta::assert_snapshot!(render_table(), @r"
    int8     i8   signed     8
    int16    i16  signed    16
    int32    i32  signed    32
    int64    i64  signed    64
    uint8    u8   unsigned   8
    uint16   u16  unsigned  16
    uint32   u32  unsigned  32
    uint64   u64  unsigned  64
    float16  f16  float     16  e5m10
    bfloat16 bf16 float     16  e8m7
    float32  f32  float     32  e8m23
    float64  f64  float     64  e11m52
    ");
}

#[test]
fn info_json() {
    let info = DtypeInfo::from(Dtype::BFloat16);
    insta::assert_snapshot!(serde_json::to_string(&info).unwrap(), @r#"{"name":"bfloat16","short_name":"bf16","kind":"float","bits":16,"reduced":true,"float_format":{"exponent_bits":8,"mantissa_bits":7}}"#);
}
