//! Type checking: probe expressions to typed expressions.
//!
//! Every operator is resolved with the promotion rules and every extern
//! call with the overload dispatcher. Checking is all-or-nothing: the first
//! failing node rejects the whole expression and nothing is bound.

mod checker;
mod typed;


pub use checker::{CheckError, CheckResult, TypeChecker, diagnostic_kind};
pub use typed::{TypedExpr, TypedKind};
