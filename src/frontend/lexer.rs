//! Lexer for arithc
//!
//! Converts an expression into a flat vector of tokens terminated by `Eof`.

use crate::frontend::token::{Token, TokenKind};
use crate::utils::{Error, Result, Span};

/// The lexer state
pub struct Lexer<'a> {
    /// Source expression
    source: &'a str,
    /// Current byte position in source
    pos: usize,
    /// Start position of current token
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            start: 0,
        }
    }

    /// Get the current character without advancing
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    /// Advance to the next character
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Create a span from start to current position
    fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    /// Read a decimal integer literal.
    ///
    /// Overflow is not checked; the value wraps like the target's 64-bit
    /// registers would.
    fn read_number(&mut self) -> Token {
        let mut value: i64 = 0;
        while let Some(c) = self.peek() {
            let Some(digit) = c.to_digit(10) else {
                break;
            };
            value = value.wrapping_mul(10).wrapping_add(digit as i64);
            self.advance();
        }
        self.make_token(TokenKind::IntLit(value))
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return Ok(Token::eof(self.make_span()));
        };

        if c.is_ascii_digit() {
            return Ok(self.read_number());
        }

        if let Some(kind) = TokenKind::from_symbol(c) {
            self.advance();
            return Ok(self.make_token(kind));
        }

        self.advance();
        Err(Error::syntax("cannot tokenize", self.make_span()))
    }

    /// Tokenize the entire source and return all tokens
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            log::trace!("token {:?} at {}", token.kind, token.span.start);
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        debug_assert!(self.is_at_end());
        log::debug!("lexed {} tokens", tokens.len());
        Ok(tokens)
    }
}

/// Tokenize `source` in one call
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).tokenize()
}
