//! Token definitions for arithc

use crate::utils::Span;

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn eof(span: Span) -> Self {
        Self { kind: TokenKind::Eof, span }
    }
}

/// Token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // ============ Operators ============
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// (
    LParen,
    /// )
    RParen,

    // ============ Literals ============
    /// Integer literal
    IntLit(i64),

    // ============ Special ============
    /// End of input. Always the last token; the parser never moves past it.
    Eof,
}

impl TokenKind {
    /// Map a source character to its operator token
    pub fn from_symbol(c: char) -> Option<TokenKind> {
        match c {
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            _ => None,
        }
    }

    /// The literal character of an operator token
    pub fn symbol(&self) -> Option<char> {
        match self {
            TokenKind::Plus => Some('+'),
            TokenKind::Minus => Some('-'),
            TokenKind::Star => Some('*'),
            TokenKind::Slash => Some('/'),
            TokenKind::LParen => Some('('),
            TokenKind::RParen => Some(')'),
            TokenKind::IntLit(_) | TokenKind::Eof => None,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::IntLit(n) => write!(f, "number {}", n),
            TokenKind::Eof => write!(f, "eof"),
            op => match op.symbol() {
                Some(c) => write!(f, "operator '{}'", c),
                None => Ok(()),
            },
        }
    }
}
