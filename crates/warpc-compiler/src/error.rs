//! Compile-time type errors.

use warpc_core::{ExprType, TypeError};

/// A rejected expression: an illegal operator application or an extern
/// call that cannot be bound.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("no overload of `{name}` accepts ({})", type_list(.args))]
    UnresolvedOverload { name: String, args: Vec<ExprType> },

    #[error("symbol `{symbol}` not found in linked library `{library}`")]
    MissingExternalSymbol { symbol: String, library: String },
}

fn type_list(args: &[ExprType]) -> String {
    args.iter()
        .map(ExprType::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
