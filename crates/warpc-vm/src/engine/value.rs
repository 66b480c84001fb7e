//! Lane values: scalars, homogeneous lane vectors and masks.

use std::fmt;

use half::{bf16, f16};
use serde::Serialize;
use serde::ser::SerializeStruct;
use warpc_core::{Dtype, ExprType};

use super::error::RuntimeError;

/// One value of one dtype.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F16(f16),
    BF16(bf16),
    F32(f32),
    F64(f64),
}

impl Scalar {
    pub fn dtype(self) -> Dtype {
        match self {
            Self::I8(_) => Dtype::Int8,
            Self::I16(_) => Dtype::Int16,
            Self::I32(_) => Dtype::Int32,
            Self::I64(_) => Dtype::Int64,
            Self::U8(_) => Dtype::Uint8,
            Self::U16(_) => Dtype::Uint16,
            Self::U32(_) => Dtype::Uint32,
            Self::U64(_) => Dtype::Uint64,
            Self::F16(_) => Dtype::Float16,
            Self::BF16(_) => Dtype::BFloat16,
            Self::F32(_) => Dtype::Float32,
            Self::F64(_) => Dtype::Float64,
        }
    }

    pub fn zero(dtype: Dtype) -> Self {
        Self::from_i128(dtype, 0)
    }

    /// Integer value, truncated to the dtype's width (two's complement).
    /// Float dtypes round to nearest.
    pub fn from_i128(dtype: Dtype, v: i128) -> Self {
        match dtype {
            Dtype::Int8 => Self::I8(v as i8),
            Dtype::Int16 => Self::I16(v as i16),
            Dtype::Int32 => Self::I32(v as i32),
            Dtype::Int64 => Self::I64(v as i64),
            Dtype::Uint8 => Self::U8(v as u8),
            Dtype::Uint16 => Self::U16(v as u16),
            Dtype::Uint32 => Self::U32(v as u32),
            Dtype::Uint64 => Self::U64(v as u64),
            _ => Self::from_f64(dtype, v as f64),
        }
    }

    /// Float value, rounded to nearest. Integer dtypes truncate toward zero
    /// and saturate; NaN becomes zero.
    pub fn from_f64(dtype: Dtype, v: f64) -> Self {
        match dtype {
            Dtype::Int8 => Self::I8(v as i8),
            Dtype::Int16 => Self::I16(v as i16),
            Dtype::Int32 => Self::I32(v as i32),
            Dtype::Int64 => Self::I64(v as i64),
            Dtype::Uint8 => Self::U8(v as u8),
            Dtype::Uint16 => Self::U16(v as u16),
            Dtype::Uint32 => Self::U32(v as u32),
            Dtype::Uint64 => Self::U64(v as u64),
            Dtype::Float16 => Self::F16(f16::from_f64(v)),
            Dtype::BFloat16 => Self::BF16(bf16::from_f64(v)),
            Dtype::Float32 => Self::F32(v as f32),
            Dtype::Float64 => Self::F64(v),
        }
    }

    /// Exact integer value. `None` for floats.
    pub fn as_i128(self) -> Option<i128> {
        Some(match self {
            Self::I8(v) => v.into(),
            Self::I16(v) => v.into(),
            Self::I32(v) => v.into(),
            Self::I64(v) => v.into(),
            Self::U8(v) => v.into(),
            Self::U16(v) => v.into(),
            Self::U32(v) => v.into(),
            Self::U64(v) => v.into(),
            _ => return None,
        })
    }

    /// Every dtype widens losslessly to f64 except 64-bit integers.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::F16(v) => v.to_f64(),
            Self::BF16(v) => v.to_f64(),
            Self::F32(v) => v.into(),
            Self::F64(v) => v,
            int => int.as_i128().map_or(0.0, |v| v as f64),
        }
    }

    /// Convert to `to` with C conversion semantics.
    pub fn cast(self, to: Dtype) -> Self {
        if self.dtype() == to {
            return self;
        }
        match self.as_i128() {
            Some(v) => Self::from_i128(to, v),
            None => Self::from_f64(to, self.as_f64()),
        }
    }

    pub fn is_nan(self) -> bool {
        self.dtype().is_float() && self.as_f64().is_nan()
    }

    /// Parse a literal as `dtype`. Integers must fit the dtype's range.
    pub fn parse(dtype: Dtype, text: &str) -> Result<Self, RuntimeError> {
        let invalid = || RuntimeError::InvalidLiteral {
            text: text.to_owned(),
            dtype,
        };
        let text = text.trim();
        if dtype.is_float() {
            let v: f64 = text.parse().map_err(|_| invalid())?;
            return Ok(Self::from_f64(dtype, v));
        }
        let v: i128 = text.parse().map_err(|_| invalid())?;
        let scalar = Self::from_i128(dtype, v);
        if scalar.as_i128() != Some(v) {
            return Err(invalid());
        }
        Ok(scalar)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::F16(v) => write!(f, "{v}"),
            Self::BF16(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::U64(v) => serializer.serialize_u64(v),
            s if s.dtype().is_float() => serializer.serialize_f64(s.as_f64()),
            s => serializer.serialize_i64(s.as_i128().map_or(0, |v| v as i64)),
        }
    }
}

/// Per-lane values of a single dtype.
#[derive(Clone, Debug, PartialEq)]
pub struct Lanes {
    dtype: Dtype,
    values: Vec<Scalar>,
}

impl Lanes {
    /// Fails if any value has a dtype other than `dtype`.
    pub fn new(dtype: Dtype, values: Vec<Scalar>) -> Result<Self, RuntimeError> {
        if let Some(bad) = values.iter().find(|v| v.dtype() != dtype) {
            return Err(RuntimeError::DtypeMismatch {
                expected: dtype,
                found: bad.dtype(),
            });
        }
        Ok(Self { dtype, values })
    }

    pub fn splat(value: Scalar, lanes: usize) -> Self {
        Self {
            dtype: value.dtype(),
            values: vec![value; lanes],
        }
    }

    /// Lanes from integer literals, truncated to `dtype`.
    pub fn from_ints(dtype: Dtype, values: &[i64]) -> Self {
        Self {
            dtype,
            values: values
                .iter()
                .map(|&v| Scalar::from_i128(dtype, v.into()))
                .collect(),
        }
    }

    /// Lanes from float literals, rounded to `dtype`.
    pub fn from_floats(dtype: Dtype, values: &[f64]) -> Self {
        Self {
            dtype,
            values: values.iter().map(|&v| Scalar::from_f64(dtype, v)).collect(),
        }
    }

    /// Parse comma-separated literals (`1,2,-3`).
    pub fn parse(dtype: Dtype, text: &str) -> Result<Self, RuntimeError> {
        let values = text
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| Scalar::parse(dtype, s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { dtype, values })
    }

    #[inline]
    pub fn dtype(&self) -> Dtype {
        self.dtype
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, lane: usize) -> Option<Scalar> {
        self.values.get(lane).copied()
    }

    pub fn values(&self) -> &[Scalar] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = Scalar> + '_ {
        self.values.iter().copied()
    }

    pub fn cast(&self, to: Dtype) -> Self {
        Self {
            dtype: to,
            values: self.values.iter().map(|v| v.cast(to)).collect(),
        }
    }

    pub(crate) fn from_raw(dtype: Dtype, values: Vec<Scalar>) -> Self {
        debug_assert!(values.iter().all(|v| v.dtype() == dtype));
        Self { dtype, values }
    }
}

impl fmt::Display for Lanes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}

impl Serialize for Lanes {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Lanes", 2)?;
        s.serialize_field("dtype", &self.dtype)?;
        s.serialize_field("values", &self.values)?;
        s.end()
    }
}

/// Per-lane predicate. Inactive lanes perform no memory access.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Mask(Vec<bool>);

impl Mask {
    pub fn new(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    pub fn all(lanes: usize) -> Self {
        Self(vec![true; lanes])
    }

    pub fn none(lanes: usize) -> Self {
        Self(vec![false; lanes])
    }

    /// Parse `1,0,1` or `t,f,t` (also `true`/`false`).
    pub fn parse(text: &str) -> Result<Self, RuntimeError> {
        text.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| match s {
                "1" | "t" | "true" => Ok(true),
                "0" | "f" | "false" => Ok(false),
                _ => Err(RuntimeError::InvalidMask(s.to_owned())),
            })
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Out-of-range lanes read as inactive.
    #[inline]
    pub fn is_active(&self, lane: usize) -> bool {
        self.0.get(lane).copied().unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.0.iter().filter(|b| **b).count()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<bool> for Mask {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            f.write_str(if *b { "T" } else { "F" })?;
        }
        write!(f, "]")
    }
}

/// Result of a lane-wise expression: values or a mask.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LaneValue {
    Lanes(Lanes),
    Mask(Mask),
}

impl LaneValue {
    pub fn ty(&self) -> ExprType {
        match self {
            Self::Lanes(l) => ExprType::Scalar(l.dtype()),
            Self::Mask(_) => ExprType::Mask,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Lanes(l) => l.len(),
            Self::Mask(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_lanes(&self) -> Option<&Lanes> {
        match self {
            Self::Lanes(l) => Some(l),
            Self::Mask(_) => None,
        }
    }

    pub fn as_mask(&self) -> Option<&Mask> {
        match self {
            Self::Mask(m) => Some(m),
            Self::Lanes(_) => None,
        }
    }
}

impl From<Lanes> for LaneValue {
    fn from(l: Lanes) -> Self {
        Self::Lanes(l)
    }
}

impl From<Mask> for LaneValue {
    fn from(m: Mask) -> Self {
        Self::Mask(m)
    }
}

impl fmt::Display for LaneValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lanes(l) => write!(f, "{l}"),
            Self::Mask(m) => write!(f, "{m}"),
        }
    }
}
