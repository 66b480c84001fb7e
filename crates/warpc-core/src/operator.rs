//! Operator kinds accepted by the resolver.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operator families. Legality and promotion are decided per family.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorClass {
    Arithmetic,
    Bitwise,
    Shift,
    Compare,
    Select,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorKind {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    FloorDiv,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// Ternary, mask-driven. The resolver sees the two branch types.
    Select,
}

impl OperatorKind {
    pub const ALL: [OperatorKind; 18] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::FloorDiv,
        Self::And,
        Self::Or,
        Self::Xor,
        Self::Shl,
        Self::Shr,
        Self::Eq,
        Self::Ne,
        Self::Lt,
        Self::Le,
        Self::Gt,
        Self::Ge,
        Self::Select,
    ];

    pub const fn class(self) -> OperatorClass {
        match self {
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod | Self::FloorDiv => {
                OperatorClass::Arithmetic
            }
            Self::And | Self::Or | Self::Xor => OperatorClass::Bitwise,
            Self::Shl | Self::Shr => OperatorClass::Shift,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge => {
                OperatorClass::Compare
            }
            Self::Select => OperatorClass::Select,
        }
    }

    /// Division, remainder and floor-division: signedness-sensitive and
    /// without native 16-bit float instructions.
    pub const fn is_division_like(self) -> bool {
        matches!(self, Self::Div | Self::Mod | Self::FloorDiv)
    }

    pub const fn is_compare(self) -> bool {
        matches!(self.class(), OperatorClass::Compare)
    }

    /// Source spelling. `None` for `select`, which is written as a call.
    pub const fn symbol(self) -> Option<&'static str> {
        Some(match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::FloorDiv => "//",
            Self::And => "&",
            Self::Or => "|",
            Self::Xor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Select => return None,
        })
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mod => "mod",
            Self::FloorDiv => "floordiv",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Shl => "shl",
            Self::Shr => "shr",
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Select => "select",
        }
    }

    /// Parse either the name (`floordiv`) or the symbol (`//`).
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s || op.symbol() == Some(s))
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol().unwrap_or(self.name()))
    }
}
