//! The closed set of scalar dtypes.
//!
//! Every value the engine reasons about has one of these twelve dtypes.
//! There are no user-defined dtypes: adding one is a change to this enum,
//! and every exhaustive match in the workspace then has to account for it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Signedness class of a dtype.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DtypeKind {
    Signed,
    Unsigned,
    Float,
}

impl fmt::Display for DtypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signed => write!(f, "signed"),
            Self::Unsigned => write!(f, "unsigned"),
            Self::Float => write!(f, "float"),
        }
    }
}

/// Bit layout of a floating-point dtype (sign bit excluded).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct FloatFormat {
    pub exponent_bits: u32,
    pub mantissa_bits: u32,
}

/// Scalar element type.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Dtype {
    #[serde(rename = "int8")]
    Int8,
    #[serde(rename = "int16")]
    Int16,
    #[serde(rename = "int32")]
    Int32,
    #[serde(rename = "int64")]
    Int64,
    #[serde(rename = "uint8")]
    Uint8,
    #[serde(rename = "uint16")]
    Uint16,
    #[serde(rename = "uint32")]
    Uint32,
    #[serde(rename = "uint64")]
    Uint64,
    #[serde(rename = "float16")]
    Float16,
    /// Reduced-precision 16-bit float: float32's exponent range, 7 mantissa bits.
    #[serde(rename = "bfloat16")]
    BFloat16,
    #[serde(rename = "float32")]
    Float32,
    #[serde(rename = "float64")]
    Float64,
}

impl Dtype {
    /// Every dtype, integers first, in declaration order.
    pub const ALL: [Dtype; 12] = [
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Float16,
        Self::BFloat16,
        Self::Float32,
        Self::Float64,
    ];

    pub const INTEGERS: [Dtype; 8] = [
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
    ];

    pub const FLOATS: [Dtype; 4] = [Self::Float16, Self::BFloat16, Self::Float32, Self::Float64];

    pub const fn kind(self) -> DtypeKind {
        match self {
            Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 => DtypeKind::Signed,
            Self::Uint8 | Self::Uint16 | Self::Uint32 | Self::Uint64 => DtypeKind::Unsigned,
            Self::Float16 | Self::BFloat16 | Self::Float32 | Self::Float64 => DtypeKind::Float,
        }
    }

    /// Storage width in bits. The reduced-precision float reports 16.
    pub const fn bit_width(self) -> u32 {
        match self {
            Self::Int8 | Self::Uint8 => 8,
            Self::Int16 | Self::Uint16 | Self::Float16 | Self::BFloat16 => 16,
            Self::Int32 | Self::Uint32 | Self::Float32 => 32,
            Self::Int64 | Self::Uint64 | Self::Float64 => 64,
        }
    }

    #[inline]
    pub const fn byte_width(self) -> usize {
        (self.bit_width() / 8) as usize
    }

    #[inline]
    pub const fn is_integer(self) -> bool {
        !self.is_float()
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self.kind(), DtypeKind::Float)
    }

    /// Signed integer. Floats are not reported as signed.
    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(self.kind(), DtypeKind::Signed)
    }

    #[inline]
    pub const fn is_unsigned(self) -> bool {
        matches!(self.kind(), DtypeKind::Unsigned)
    }

    /// Whether this is the reduced-precision (bfloat) variant.
    #[inline]
    pub const fn is_reduced(self) -> bool {
        matches!(self, Self::BFloat16)
    }

    pub const fn float_format(self) -> Option<FloatFormat> {
        let (exponent_bits, mantissa_bits) = match self {
            Self::Float16 => (5, 10),
            Self::BFloat16 => (8, 7),
            Self::Float32 => (8, 23),
            Self::Float64 => (11, 52),
            _ => return None,
        };
        Some(FloatFormat {
            exponent_bits,
            mantissa_bits,
        })
    }

    /// Look up a dtype by its attributes.
    ///
    /// `reduced` is only meaningful for 16-bit floats; it must be false elsewhere.
    pub const fn from_parts(kind: DtypeKind, width: u32, reduced: bool) -> Option<Self> {
        match (kind, width, reduced) {
            (DtypeKind::Signed, 8, false) => Some(Self::Int8),
            (DtypeKind::Signed, 16, false) => Some(Self::Int16),
            (DtypeKind::Signed, 32, false) => Some(Self::Int32),
            (DtypeKind::Signed, 64, false) => Some(Self::Int64),
            (DtypeKind::Unsigned, 8, false) => Some(Self::Uint8),
            (DtypeKind::Unsigned, 16, false) => Some(Self::Uint16),
            (DtypeKind::Unsigned, 32, false) => Some(Self::Uint32),
            (DtypeKind::Unsigned, 64, false) => Some(Self::Uint64),
            (DtypeKind::Float, 16, false) => Some(Self::Float16),
            (DtypeKind::Float, 16, true) => Some(Self::BFloat16),
            (DtypeKind::Float, 32, false) => Some(Self::Float32),
            (DtypeKind::Float, 64, false) => Some(Self::Float64),
            _ => None,
        }
    }

    pub const fn integer(signed: bool, width: u32) -> Option<Self> {
        let kind = if signed {
            DtypeKind::Signed
        } else {
            DtypeKind::Unsigned
        };
        Self::from_parts(kind, width, false)
    }

    /// Unsigned integer of the same width. `None` for floats.
    pub const fn to_unsigned(self) -> Option<Self> {
        if self.is_float() {
            return None;
        }
        Self::integer(false, self.bit_width())
    }

    /// Canonical name (`int32`, `bfloat16`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float16 => "float16",
            Self::BFloat16 => "bfloat16",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// Short name (`i32`, `bf16`).
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Int8 => "i8",
            Self::Int16 => "i16",
            Self::Int32 => "i32",
            Self::Int64 => "i64",
            Self::Uint8 => "u8",
            Self::Uint16 => "u16",
            Self::Uint32 => "u32",
            Self::Uint64 => "u64",
            Self::Float16 => "f16",
            Self::BFloat16 => "bf16",
            Self::Float32 => "f32",
            Self::Float64 => "f64",
        }
    }

    /// Accepts both the canonical and the short name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.name() == name || d.short_name() == name)
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dtype `{0}`")]
pub struct ParseDtypeError(pub String);

impl FromStr for Dtype {
    type Err = ParseDtypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ParseDtypeError(s.to_owned()))
    }
}

/// Type attached to an expression: a scalar dtype or a per-lane boolean mask.
///
/// Masks come out of comparisons and feed `select`; they have no dtype of
/// their own.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExprType {
    Scalar(Dtype),
    Mask,
}

impl ExprType {
    pub fn dtype(self) -> Option<Dtype> {
        match self {
            Self::Scalar(d) => Some(d),
            Self::Mask => None,
        }
    }

    pub fn is_mask(self) -> bool {
        matches!(self, Self::Mask)
    }
}

impl From<Dtype> for ExprType {
    fn from(d: Dtype) -> Self {
        Self::Scalar(d)
    }
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(d) => write!(f, "{d}"),
            Self::Mask => write!(f, "mask"),
        }
    }
}
