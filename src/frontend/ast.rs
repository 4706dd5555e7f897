//! Abstract Syntax Tree definitions for arithc

use std::fmt;

use crate::utils::Span;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn symbol(&self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
        }
    }
}

/// An expression tree. Children are owned exclusively by their parent.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Literal {
        value: i64,
        span: Span,
    },
}

impl Expr {
    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        let span = left.span().merge(&right.span());
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        }
    }

    pub fn literal(value: i64, span: Span) -> Self {
        Expr::Literal { value, span }
    }

    pub fn span(&self) -> Span {
        match self {
            Expr::Binary { span, .. } | Expr::Literal { span, .. } => *span,
        }
    }
}

/// S-expression form, e.g. `(+ 1 (* 2 3))`
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal { value, .. } => write!(f, "{}", value),
            Expr::Binary { op, left, right, .. } => {
                write!(f, "({} {} {})", op.symbol(), left, right)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(v: i64) -> Expr {
        Expr::literal(v, Span::default())
    }

    #[test]
    fn test_display() {
        let e = Expr::binary(BinOp::Add, lit(1), Expr::binary(BinOp::Mul, lit(2), lit(3)));
        assert_eq!(e.to_string(), "(+ 1 (* 2 3))");
    }

    #[test]
    fn test_display_left_fold() {
        let e = Expr::binary(BinOp::Sub, Expr::binary(BinOp::Sub, lit(1), lit(2)), lit(3));
        assert_eq!(e.to_string(), "(- (- 1 2) 3)");
    }

    #[test]
    fn test_binary_span_covers_children() {
        let e = Expr::binary(
            BinOp::Div,
            Expr::literal(7, Span::new(0, 1)),
            Expr::literal(2, Span::new(2, 3)),
        );
        assert_eq!(e.span(), Span::new(0, 3));
    }
}
