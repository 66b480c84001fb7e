//! Type checking of probe expressions.

use rowan::TextRange;
use warpc_core::{Dtype, ExprType, TypeError, resolve, resolve_select};

use super::typed::{TypedExpr, TypedKind};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::CompileError;
use crate::extern_lib::{Dispatcher, LinkedLibraries, SignatureRegistry};
use crate::parser::{Expr, ExprKind};

/// A rejected expression, located at the node that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckError {
    pub error: CompileError,
    pub span: TextRange,
    /// Types of the failing node's operands, for context.
    pub operands: Vec<(TextRange, ExprType)>,
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    /// `None` when the expression did not type check.
    pub typed: Option<TypedExpr>,
    pub diagnostics: Diagnostics,
}

/// Resolves every operator and extern call in an expression.
///
/// One checker serves one compilation: extern calls are memoized per call
/// signature across every expression it checks.
pub struct TypeChecker<'c> {
    dispatcher: Dispatcher<'c>,
    widened: Vec<(TextRange, String)>,
}

impl<'c> TypeChecker<'c> {
    pub fn new(registry: &'c SignatureRegistry, libraries: &'c LinkedLibraries) -> Self {
        Self {
            dispatcher: Dispatcher::new(registry, libraries),
            widened: Vec::new(),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher<'c> {
        &self.dispatcher
    }

    /// Check `expr`, reporting the failure and any widened calls as diagnostics.
    pub fn check(&mut self, expr: &Expr) -> CheckResult {
        self.widened.clear();
        let mut diagnostics = Diagnostics::new();

        let typed = match self.infer(expr) {
            Ok(typed) => Some(typed),
            Err(err) => {
                let mut builder = diagnostics
                    .report(diagnostic_kind(&err.error), err.span)
                    .message(err.error.to_string());
                for (range, ty) in &err.operands {
                    builder = builder.related_to(ty.to_string(), *range);
                }
                builder.emit();
                None
            }
        };

        for (range, message) in self.widened.drain(..) {
            diagnostics
                .report(DiagnosticKind::WidenedArgument, range)
                .message(message)
                .emit();
        }

        CheckResult { typed, diagnostics }
    }

    /// Check `expr`, stopping at the first failing node.
    pub fn infer(&mut self, expr: &Expr) -> Result<TypedExpr, CheckError> {
        match &expr.kind {
            ExprKind::Type(dtype) => Ok(TypedExpr::new(
                TypedKind::Operand,
                ExprType::Scalar(*dtype),
                expr.span,
            )),
            ExprKind::Mask => Ok(TypedExpr::new(
                TypedKind::Operand,
                ExprType::Mask,
                expr.span,
            )),
            ExprKind::Binary { op, lhs, rhs } => {
                let lhs = self.infer(lhs)?;
                let rhs = self.infer(rhs)?;
                let resolution = resolve(*op, lhs.ty(), rhs.ty())
                    .map_err(|e| located(e, expr.span, [&lhs, &rhs]))?;
                Ok(TypedExpr::new(
                    TypedKind::Binary {
                        op: *op,
                        resolution,
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                    },
                    resolution.result,
                    expr.span,
                ))
            }
            ExprKind::Select {
                cond,
                then,
                otherwise,
            } => {
                let cond = self.infer(cond)?;
                let then = self.infer(then)?;
                let otherwise = self.infer(otherwise)?;
                let resolution = resolve_select(cond.ty(), then.ty(), otherwise.ty())
                    .map_err(|e| match e {
                        TypeError::NonMaskCondition { .. } => located(e, cond.span(), [&cond]),
                        _ => located(e, expr.span, [&then, &otherwise]),
                    })?;
                Ok(TypedExpr::new(
                    TypedKind::Select {
                        cond: Box::new(cond),
                        then: Box::new(then),
                        otherwise: Box::new(otherwise),
                    },
                    resolution.result,
                    expr.span,
                ))
            }
            ExprKind::Call {
                library,
                name,
                args,
            } => {
                let args = args
                    .iter()
                    .map(|arg| self.infer(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                let library = library.as_ref().map(|lib| lib.text.as_str());

                let fail = |error: CompileError| CheckError {
                    error,
                    span: expr.span,
                    operands: args.iter().map(|a| (a.span(), a.ty())).collect(),
                };

                let dtypes: Option<Vec<Dtype>> = args.iter().map(|a| a.ty().dtype()).collect();
                let Some(dtypes) = dtypes else {
                    let name = match library {
                        Some(lib) => format!("{lib}.{}", name.text),
                        None => name.text.clone(),
                    };
                    return Err(fail(CompileError::UnresolvedOverload {
                        name,
                        args: args.iter().map(TypedExpr::ty).collect(),
                    }));
                };

                let call = self
                    .dispatcher
                    .resolve(library, &name.text, &dtypes)
                    .map_err(fail)?;

                if call.widened {
                    let sig = signature(&call.params, call.ret);
                    self.widened
                        .push((expr.span, format!("`{}` called as {sig}", call.symbol)));
                }

                let ty = ExprType::Scalar(call.ret);
                Ok(TypedExpr::new(TypedKind::Call { call, args }, ty, expr.span))
            }
        }
    }
}

fn located<const N: usize>(
    error: TypeError,
    span: TextRange,
    operands: [&TypedExpr; N],
) -> CheckError {
    CheckError {
        error: error.into(),
        span,
        operands: operands.iter().map(|e| (e.span(), e.ty())).collect(),
    }
}

fn signature(params: &[Dtype], ret: Dtype) -> String {
    let params: Vec<_> = params.iter().map(Dtype::to_string).collect();
    format!("({}) -> {}", params.join(", "), ret)
}

/// Diagnostic kind reported for a type error.
pub fn diagnostic_kind(error: &CompileError) -> DiagnosticKind {
    match error {
        CompileError::Type(TypeError::UnsupportedOperatorForType { .. }) => {
            DiagnosticKind::UnsupportedOperator
        }
        CompileError::Type(TypeError::SignednessMismatch { .. }) => {
            DiagnosticKind::SignednessMismatch
        }
        CompileError::Type(TypeError::DtypeMismatch { .. }) => {
            DiagnosticKind::SelectBranchMismatch
        }
        CompileError::Type(TypeError::NonMaskCondition { .. }) => {
            DiagnosticKind::NonMaskCondition
        }
        CompileError::UnresolvedOverload { .. } => DiagnosticKind::UnresolvedOverload,
        CompileError::MissingExternalSymbol { .. } => DiagnosticKind::MissingExternalSymbol,
    }
}
