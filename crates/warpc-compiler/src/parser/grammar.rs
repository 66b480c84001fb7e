//! Precedence-climbing parser for probe expressions.
//!
//! Binary operators bind like C: `|` loosest, then `^`, `&`, equality,
//! relational, shifts, additive and multiplicative. All are left
//! associative. A subexpression that fails to parse yields `None` and the
//! parser keeps going, so one pass reports every syntax error.

use rowan::{TextRange, TextSize};
use warpc_core::{Dtype, OperatorKind};

use super::ast::{Expr, ExprKind, Ident};
use super::lexer::{Token, TokenKind, token_text};
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Deepest nesting of parentheses and calls accepted.
pub const MAX_DEPTH: u32 = 128;

pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    depth: u32,
    diagnostics: Diagnostics,
    last_diagnostic_pos: Option<TextSize>,
}

impl<'src> Parser<'src> {
    /// Trivia is dropped up front; spans keep their source offsets.
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens: tokens.into_iter().filter(|t| !t.kind.is_trivia()).collect(),
            pos: 0,
            depth: 0,
            diagnostics: Diagnostics::new(),
            last_diagnostic_pos: None,
        }
    }

    pub fn parse(mut self) -> (Option<Expr>, Diagnostics) {
        if self.eof() {
            self.error(DiagnosticKind::ExpectedExpression, self.current_span());
            return (None, self.diagnostics);
        }

        let expr = self.expr(0);

        if let Some(token) = self.tokens.get(self.pos).copied() {
            let rest = token.span.cover(self.tokens[self.tokens.len() - 1].span);
            let kind = if token.kind == TokenKind::Garbage {
                DiagnosticKind::InvalidToken
            } else {
                DiagnosticKind::TrailingInput
            };
            self.diagnostics
                .report(kind, rest)
                .message(format!("`{}`", token_text(self.source, &token)))
                .emit();
        }

        let expr = if self.diagnostics.has_errors() {
            None
        } else {
            expr
        };
        (expr, self.diagnostics)
    }

    fn current(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn currently_is(&self, kind: TokenKind) -> bool {
        self.current() == Some(kind)
    }

    fn eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn current_span(&self) -> TextRange {
        self.tokens.get(self.pos).map_or_else(
            || TextRange::empty(TextSize::from(self.source.len() as u32)),
            |t| t.span,
        )
    }

    fn bump(&mut self) -> Token {
        let token = self.tokens[self.pos];
        self.pos += 1;
        token
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        self.currently_is(kind).then(|| self.bump())
    }

    /// Report once per position; later errors at the same spot are cascades.
    fn error(&mut self, kind: DiagnosticKind, range: TextRange) {
        if self.last_diagnostic_pos == Some(range.start()) {
            return;
        }
        self.last_diagnostic_pos = Some(range.start());
        self.diagnostics.report(kind, range).emit();
    }

    fn expr(&mut self, min_prec: u8) -> Option<Expr> {
        if self.depth >= MAX_DEPTH {
            let span = self.current_span();
            self.error(DiagnosticKind::NestingTooDeep, span);
            self.pos = self.tokens.len();
            return None;
        }
        self.depth += 1;
        let expr = self.binary(min_prec);
        self.depth -= 1;
        expr
    }

    fn binary(&mut self, min_prec: u8) -> Option<Expr> {
        let mut lhs = self.primary();

        while let Some((op, prec)) = self.current().and_then(binary_op) {
            if prec < min_prec {
                break;
            }
            self.bump();
            let rhs = self.expr(prec + 1);
            lhs = match (lhs, rhs) {
                (Some(l), Some(r)) => Some(Expr::binary(op, l, r)),
                _ => None,
            };
        }

        lhs
    }

    fn primary(&mut self) -> Option<Expr> {
        let span = self.current_span();
        match self.current() {
            Some(TokenKind::ParenOpen) => self.parenthesized(),
            Some(TokenKind::Ident) => self.ident_expr(),
            Some(TokenKind::Garbage) => {
                self.bump();
                self.error(DiagnosticKind::InvalidToken, span);
                None
            }
            // Left for the enclosing list or group to handle.
            None | Some(TokenKind::ParenClose | TokenKind::Comma) => {
                self.error(DiagnosticKind::ExpectedExpression, span);
                None
            }
            Some(_) => {
                self.bump();
                self.error(DiagnosticKind::ExpectedExpression, span);
                None
            }
        }
    }

    fn parenthesized(&mut self) -> Option<Expr> {
        let open = self.bump();
        let inner = self.expr(0);
        match self.eat(TokenKind::ParenClose) {
            Some(close) => inner.map(|e| Expr::new(e.kind, open.span.cover(close.span))),
            None => {
                self.unclosed(open.span);
                None
            }
        }
    }

    fn unclosed(&mut self, open: TextRange) {
        let at = self.current_span();
        if self.last_diagnostic_pos == Some(at.start()) {
            return;
        }
        self.last_diagnostic_pos = Some(at.start());
        self.diagnostics
            .report(DiagnosticKind::UnclosedParen, at)
            .related_to("opened here", open)
            .emit();
    }

    fn ident_expr(&mut self) -> Option<Expr> {
        let token = self.bump();
        let ident = Ident {
            text: token_text(self.source, &token).to_owned(),
            span: token.span,
        };

        if self.currently_is(TokenKind::ParenOpen) {
            return self.call(None, ident);
        }

        if self.currently_is(TokenKind::Dot) {
            self.bump();
            if !self.currently_is(TokenKind::Ident) {
                let span = self.current_span();
                self.last_diagnostic_pos = Some(span.start());
                self.diagnostics
                    .report(DiagnosticKind::ExpectedFunctionName, span)
                    .message(&ident.text)
                    .emit();
                return None;
            }
            let name = self.bump();
            let name = Ident {
                text: token_text(self.source, &name).to_owned(),
                span: name.span,
            };
            if !self.currently_is(TokenKind::ParenOpen) {
                let span = self.current_span();
                self.error(DiagnosticKind::ExpectedArguments, span);
                return None;
            }
            return self.call(Some(ident), name);
        }

        if ident.text == "mask" {
            return Some(Expr::new(ExprKind::Mask, ident.span));
        }
        match Dtype::from_name(&ident.text) {
            Some(dtype) => Some(Expr::new(ExprKind::Type(dtype), ident.span)),
            None => {
                self.last_diagnostic_pos = Some(ident.span.start());
                self.diagnostics
                    .report(DiagnosticKind::UnknownType, ident.span)
                    .message(&ident.text)
                    .emit();
                None
            }
        }
    }

    fn call(&mut self, library: Option<Ident>, name: Ident) -> Option<Expr> {
        let open = self.bump();
        let start = library.as_ref().map_or(name.span, |lib| lib.span);

        let mut args = Vec::new();
        let mut ok = true;
        let close = loop {
            if let Some(close) = self.eat(TokenKind::ParenClose) {
                break Some(close);
            }
            if self.eof() {
                self.unclosed(open.span);
                break None;
            }
            let first = args.is_empty() && ok;
            if !first && self.eat(TokenKind::Comma).is_none() {
                let span = self.current_span();
                self.error(DiagnosticKind::ExpectedComma, span);
                ok = false;
            }
            // `f(a,)` reports the missing argument and stops at `)`.
            match self.expr(0) {
                Some(arg) => args.push(arg),
                None => ok = false,
            }
        };

        let close = close?;
        if !ok {
            return None;
        }
        let span = start.cover(close.span);

        let is_select = library.is_none() && matches!(name.text.as_str(), "select" | "where");
        if !is_select {
            return Some(Expr::new(
                ExprKind::Call {
                    library,
                    name,
                    args,
                },
                span,
            ));
        }

        let Ok([cond, then, otherwise]) = <[Expr; 3]>::try_from(args) else {
            self.diagnostics
                .report(DiagnosticKind::SelectArity, span)
                .emit();
            return None;
        };
        Some(Expr::new(
            ExprKind::Select {
                cond: Box::new(cond),
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            },
            span,
        ))
    }
}

/// Operator and binding power of an infix token.
fn binary_op(kind: TokenKind) -> Option<(OperatorKind, u8)> {
    let entry = match kind {
        TokenKind::Pipe => (OperatorKind::Or, 1),
        TokenKind::Caret => (OperatorKind::Xor, 2),
        TokenKind::Amp => (OperatorKind::And, 3),
        TokenKind::EqEq => (OperatorKind::Eq, 4),
        TokenKind::NotEq => (OperatorKind::Ne, 4),
        TokenKind::Lt => (OperatorKind::Lt, 5),
        TokenKind::LtEq => (OperatorKind::Le, 5),
        TokenKind::Gt => (OperatorKind::Gt, 5),
        TokenKind::GtEq => (OperatorKind::Ge, 5),
        TokenKind::Shl => (OperatorKind::Shl, 6),
        TokenKind::Shr => (OperatorKind::Shr, 6),
        TokenKind::Plus => (OperatorKind::Add, 7),
        TokenKind::Minus => (OperatorKind::Sub, 7),
        TokenKind::Star => (OperatorKind::Mul, 8),
        TokenKind::Slash => (OperatorKind::Div, 8),
        TokenKind::Percent => (OperatorKind::Mod, 8),
        TokenKind::SlashSlash => (OperatorKind::FloorDiv, 8),
        _ => return None,
    };
    Some(entry)
}
