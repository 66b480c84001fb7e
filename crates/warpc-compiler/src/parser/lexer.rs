//! Lexer for probe expressions.
//!
//! Tokens carry only a kind and a span; their text is sliced from the
//! probe source on demand.

use std::ops::Range;

use logos::Logos;
use rowan::TextRange;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    /// Floor division. Longest match wins over `/`.
    #[token("//")]
    SlashSlash,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("&")]
    Amp,

    #[token("|")]
    Pipe,

    #[token("^")]
    Caret,

    #[token("<<")]
    Shl,

    #[token(">>")]
    Shr,

    #[token("==")]
    EqEq,

    #[token("!=")]
    NotEq,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    /// Coalesced lexer errors.
    Garbage,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        self == Self::Whitespace
    }
}

/// A token without its text; see [`token_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: TextRange,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: TextRange) -> Self {
        Self { kind, span }
    }
}

fn text_range(range: Range<usize>) -> TextRange {
    TextRange::new((range.start as u32).into(), (range.end as u32).into())
}

/// Tokenizes source into span-based tokens, whitespace included.
///
/// A run of characters the lexer rejects becomes one `Garbage` token so
/// the parser reports it once.
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut garbage_start: Option<usize> = None;

    for (result, span) in TokenKind::lexer(source).spanned() {
        let Ok(kind) = result else {
            garbage_start.get_or_insert(span.start);
            continue;
        };
        if let Some(start) = garbage_start.take() {
            tokens.push(Token::new(TokenKind::Garbage, text_range(start..span.start)));
        }
        tokens.push(Token::new(kind, text_range(span)));
    }
    if let Some(start) = garbage_start {
        tokens.push(Token::new(TokenKind::Garbage, text_range(start..source.len())));
    }

    tokens
}

#[inline]
pub fn token_text<'s>(source: &'s str, token: &Token) -> &'s str {
    &source[Range::<usize>::from(token.span)]
}
