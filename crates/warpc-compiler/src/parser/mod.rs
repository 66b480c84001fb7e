//! Parser for probe expressions.
//!
//! A probe is a single expression over type placeholders rather than
//! values: `int32 + uint8`, `select(float32 < float32, bf16, bf16)`,
//! `libdevice.pow(float16, float32)`. Lines are parsed independently.

pub mod ast;
mod grammar;
pub mod lexer;


pub use ast::{Expr, ExprKind, Ident};
pub use grammar::MAX_DEPTH;

use crate::diagnostics::Diagnostics;

#[derive(Debug, Clone)]
pub struct ParseResult {
    /// `None` when any error was reported.
    pub expr: Option<Expr>,
    pub diagnostics: Diagnostics,
}

pub fn parse(source: &str) -> ParseResult {
    let tokens = lexer::lex(source);
    let (expr, diagnostics) = grammar::Parser::new(source, tokens).parse();
    ParseResult { expr, diagnostics }
}
