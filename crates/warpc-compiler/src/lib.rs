#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! warpc compiler: probe parser, type checker, extern dispatcher and
//! masked PTX lowering.
//!
//! - `parser` - lexer and expression parser for probe expressions
//! - `check` - type checking against the promotion rules and extern table
//! - `extern_lib` - signature registry, linked libraries, overload dispatch
//! - `asm` - predicated inline PTX builder and the masked lowering
//! - `diagnostics` - error reporting
//! - `session` - configured entry point tying the above together

pub mod asm;
pub mod check;
pub mod diagnostics;
pub mod extern_lib;
pub mod parser;

mod error;
mod options;
mod session;

#[cfg(test)]
mod session_tests;

use std::path::PathBuf;

pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use error::CompileError;
pub use options::CompilerOptions;
pub use session::{Checked, Session, SessionBuilder};

/// Errors surfaced by the compiler facade.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("probe parsing failed with {} errors", .0.error_count())]
    Parse(Diagnostics),

    #[error("type checking failed with {} errors", .0.error_count())]
    Check(Diagnostics),

    #[error("cannot load library `{name}` from `{}`: {message}", .path.display())]
    Library {
        name: String,
        path: PathBuf,
        message: String,
    },
}

impl Error {
    /// Diagnostics carried by parse and check failures.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            Self::Parse(d) | Self::Check(d) => Some(d),
            Self::Library { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
