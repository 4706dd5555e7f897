//! Parser for arithc
//!
//! Recursive descent, one method per grammar rule:
//!
//! ```text
//! expr    = mul  ( ("+" | "-") mul )*
//! mul     = primary ( ("*" | "/") primary )*
//! primary = "(" expr ")" | NUMBER
//! ```

use crate::frontend::ast::{BinOp, Expr};
use crate::frontend::token::{Token, TokenKind};
use crate::utils::{Error, Result, Span};

/// Deepest parenthesis nesting accepted
pub const MAX_NESTING: usize = 256;

/// Tallest expression tree accepted; code generation recurses once per level
pub const MAX_DEPTH: usize = 1024;

/// An expression together with the height of its tree
type Parsed = (Expr, usize);

/// The parser. Owns the token sequence and a forward-only cursor into it.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Parentheses currently open
    nesting: usize,
}

impl Parser {
    /// Create a parser from pre-tokenized input.
    ///
    /// A missing trailing `Eof` is supplied so the cursor always has a
    /// sentinel to stop on.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token::eof(Span::point(end)));
        }
        Self {
            tokens,
            pos: 0,
            nesting: 0,
        }
    }

    // ==================== Helper Methods ====================

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.current_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current_kind() == kind {
            return Ok(self.advance());
        }
        let symbol = kind.symbol().unwrap_or('?');
        Err(Error::expected_symbol(symbol, self.current().span))
    }

    fn expect_number(&mut self) -> Result<Parsed> {
        match self.current_kind() {
            TokenKind::IntLit(value) => {
                let token = self.advance();
                Ok((Expr::literal(value, token.span), 1))
            }
            _ => Err(Error::syntax("a number expected", self.current().span)),
        }
    }

    /// Build `left op right`, rejecting trees taller than `MAX_DEPTH`
    fn fold(op: BinOp, op_span: Span, left: Parsed, right: Parsed) -> Result<Parsed> {
        let depth = 1 + left.1.max(right.1);
        if depth > MAX_DEPTH {
            return Err(Error::syntax("expression nested too deeply", op_span));
        }
        Ok((Expr::binary(op, left.0, right.0), depth))
    }

    // ==================== Parsing Methods ====================

    /// Parse the whole token sequence as one expression
    pub fn parse(&mut self) -> Result<Expr> {
        let (expr, depth) = self.parse_expr()?;
        if !self.is_at_end() {
            return Err(Error::syntax(
                "unexpected token after expression",
                self.current().span,
            ));
        }
        log::debug!("parsed expression of depth {}", depth);
        Ok(expr)
    }

    /// expr = mul ( ("+" | "-") mul )*
    fn parse_expr(&mut self) -> Result<Parsed> {
        let mut node = self.parse_mul()?;

        loop {
            let op_span = self.current().span;
            let op = if self.consume(TokenKind::Plus) {
                BinOp::Add
            } else if self.consume(TokenKind::Minus) {
                BinOp::Sub
            } else {
                return Ok(node);
            };
            let right = self.parse_mul()?;
            node = Self::fold(op, op_span, node, right)?;
        }
    }

    /// mul = primary ( ("*" | "/") primary )*
    fn parse_mul(&mut self) -> Result<Parsed> {
        let mut node = self.parse_primary()?;

        loop {
            let op_span = self.current().span;
            let op = if self.consume(TokenKind::Star) {
                BinOp::Mul
            } else if self.consume(TokenKind::Slash) {
                BinOp::Div
            } else {
                return Ok(node);
            };
            let right = self.parse_primary()?;
            node = Self::fold(op, op_span, node, right)?;
        }
    }

    /// primary = "(" expr ")" | NUMBER
    fn parse_primary(&mut self) -> Result<Parsed> {
        let open = self.current().span;
        if self.consume(TokenKind::LParen) {
            if self.nesting == MAX_NESTING {
                return Err(Error::syntax("parentheses nested too deeply", open));
            }
            self.nesting += 1;
            let node = self.parse_expr()?;
            self.expect(TokenKind::RParen)?;
            self.nesting -= 1;
            return Ok(node);
        }

        self.expect_number()
    }
}

/// Parse a token sequence into an expression tree
pub fn parse(tokens: Vec<Token>) -> Result<Expr> {
    Parser::new(tokens).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn parse_str(source: &str) -> Result<Expr> {
        parse(tokenize(source)?)
    }

    fn sexpr(source: &str) -> String {
        parse_str(source).unwrap().to_string()
    }

    #[test]
    fn test_literal() {
        assert_eq!(sexpr("42"), "42");
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(sexpr("1-2-3"), "(- (- 1 2) 3)");
        assert_eq!(sexpr("8/4/2"), "(/ (/ 8 4) 2)");
    }

    #[test]
    fn test_precedence() {
        assert_eq!(sexpr("2+3*4"), "(+ 2 (* 3 4))");
        assert_eq!(sexpr("2*3+4"), "(+ (* 2 3) 4)");
        assert_eq!(sexpr("(2+3)*4"), "(* (+ 2 3) 4)");
    }

    #[test]
    fn test_nested_parens() {
        assert_eq!(sexpr("((1))"), "1");
        assert_eq!(sexpr("2*(3-(4/2))"), "(* 2 (- 3 (/ 4 2)))");
    }

    #[test]
    fn test_spans() {
        let expr = parse_str("1 + 23").unwrap();
        assert_eq!(expr.span(), Span::new(0, 6));
    }

    #[test]
    fn test_unbalanced_paren() {
        let err = parse_str("(1+2").unwrap_err();
        assert_eq!(err.to_string(), "')' expected");
        assert_eq!(err.offset(), Some(4));
    }

    #[test]
    fn test_missing_number() {
        let err = parse_str("1+").unwrap_err();
        assert_eq!(err.to_string(), "a number expected");
        assert_eq!(err.offset(), Some(2));

        let err = parse_str("1+*2").unwrap_err();
        assert_eq!(err.offset(), Some(2));
    }

    #[test]
    fn test_empty_input() {
        let err = parse_str("").unwrap_err();
        assert_eq!(err.to_string(), "a number expected");
        assert_eq!(err.offset(), Some(0));
    }

    #[test]
    fn test_trailing_garbage() {
        let err = parse_str("1 2").unwrap_err();
        assert_eq!(err.offset(), Some(2));

        let err = parse_str("(1+2))").unwrap_err();
        assert_eq!(err.to_string(), "unexpected token after expression");
        assert_eq!(err.offset(), Some(5));
    }

    #[test]
    fn test_unary_minus_rejected() {
        let err = parse_str("-1").unwrap_err();
        assert_eq!(err.to_string(), "a number expected");
        assert_eq!(err.offset(), Some(0));
    }

    #[test]
    fn test_nesting_limit() {
        let ok = format!("{}1{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert_eq!(sexpr(&ok), "1");

        let deep = 60_000;
        let source = format!("{}1{}", "(".repeat(deep), ")".repeat(deep));
        let err = parse_str(&source).unwrap_err();
        assert_eq!(err.to_string(), "parentheses nested too deeply");
        assert_eq!(err.offset(), Some(MAX_NESTING));
    }

    #[test]
    fn test_depth_limit() {
        let ok = format!("1{}", "-1".repeat(MAX_DEPTH - 1));
        assert!(parse_str(&ok).is_ok());

        // the MAX_DEPTH-th operator makes the tree one level too tall
        let source = format!("1{}", "-1".repeat(50_000));
        let err = parse_str(&source).unwrap_err();
        assert_eq!(err.to_string(), "expression nested too deeply");
        assert_eq!(err.offset(), Some(2 * MAX_DEPTH - 1));
    }

    #[test]
    fn test_missing_eof_is_supplied() {
        let mut tokens = tokenize("3").unwrap();
        tokens.pop();
        assert_eq!(parse(tokens).unwrap().to_string(), "3");
    }
}
