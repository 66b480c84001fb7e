//! Typed expression tree.

use std::fmt;

use rowan::TextRange;
use warpc_core::{ExprType, OperatorKind, Resolution};

use crate::extern_lib::ResolvedCall;

/// An expression whose every node carries a resolved type.
///
/// Only the type checker builds these; a `TypedExpr` exists only for
/// expressions that resolved completely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedExpr {
    kind: TypedKind,
    ty: ExprType,
    span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedKind {
    Operand,
    Binary {
        op: OperatorKind,
        resolution: Resolution,
        lhs: Box<TypedExpr>,
        rhs: Box<TypedExpr>,
    },
    Select {
        cond: Box<TypedExpr>,
        then: Box<TypedExpr>,
        otherwise: Box<TypedExpr>,
    },
    Call {
        call: ResolvedCall,
        args: Vec<TypedExpr>,
    },
}

impl TypedExpr {
    pub(crate) fn new(kind: TypedKind, ty: ExprType, span: TextRange) -> Self {
        Self { kind, ty, span }
    }

    pub fn kind(&self) -> &TypedKind {
        &self.kind
    }

    pub fn ty(&self) -> ExprType {
        self.ty
    }

    pub fn span(&self) -> TextRange {
        self.span
    }

    /// Extern calls in evaluation order (arguments before the call).
    pub fn calls(&self) -> Vec<&ResolvedCall> {
        let mut out = Vec::new();
        self.collect_calls(&mut out);
        out
    }

    fn collect_calls<'a>(&'a self, out: &mut Vec<&'a ResolvedCall>) {
        match &self.kind {
            TypedKind::Operand => {}
            TypedKind::Binary { lhs, rhs, .. } => {
                lhs.collect_calls(out);
                rhs.collect_calls(out);
            }
            TypedKind::Select {
                cond,
                then,
                otherwise,
            } => {
                cond.collect_calls(out);
                then.collect_calls(out);
                otherwise.collect_calls(out);
            }
            TypedKind::Call { call, args } => {
                for arg in args {
                    arg.collect_calls(out);
                }
                out.push(call);
            }
        }
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, nested: bool) -> fmt::Result {
        match &self.kind {
            TypedKind::Operand => write!(f, "{}", self.ty),
            TypedKind::Binary { op, lhs, rhs, .. } => {
                if nested {
                    f.write_str("(")?;
                }
                lhs.write(f, true)?;
                write!(f, " {op} ")?;
                rhs.write(f, true)?;
                if nested {
                    f.write_str(")")?;
                }
                Ok(())
            }
            TypedKind::Select {
                cond,
                then,
                otherwise,
            } => {
                f.write_str("select(")?;
                cond.write(f, false)?;
                f.write_str(", ")?;
                then.write(f, false)?;
                f.write_str(", ")?;
                otherwise.write(f, false)?;
                f.write_str(")")
            }
            TypedKind::Call { call, args } => {
                write!(f, "{}.{}(", call.library, call.name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    arg.write(f, false)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Canonical form: qualified calls, inner binary operations parenthesized.
impl fmt::Display for TypedExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, false)
    }
}
