//! Untyped probe expression tree.

use rowan::TextRange;
use warpc_core::{Dtype, OperatorKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    /// An operand of the named dtype.
    Type(Dtype),
    /// A mask operand.
    Mask,
    Binary {
        op: OperatorKind,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Select {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Call {
        library: Option<Ident>,
        name: Ident,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub text: String,
    pub span: TextRange,
}

impl Expr {
    pub fn new(kind: ExprKind, span: TextRange) -> Self {
        Self { kind, span }
    }

    pub fn binary(op: OperatorKind, lhs: Expr, rhs: Expr) -> Self {
        let span = lhs.span.cover(rhs.span);
        Self::new(
            ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            span,
        )
    }

    /// Direct subexpressions, in source order.
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Type(_) | ExprKind::Mask => Vec::new(),
            ExprKind::Binary { lhs, rhs, .. } => vec![lhs.as_ref(), rhs.as_ref()],
            ExprKind::Select {
                cond,
                then,
                otherwise,
            } => vec![cond.as_ref(), then.as_ref(), otherwise.as_ref()],
            ExprKind::Call { args, .. } => args.iter().collect(),
        }
    }
}
