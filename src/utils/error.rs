//! Error handling for arithc

use crate::utils::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Compiler error
///
/// Every problem is fatal: the first error produced by any stage aborts
/// the whole pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{message}")]
    Syntax { message: String, span: Span },

    /// The generated program faulted while being simulated (`--emit value`)
    #[error("runtime error: {0}")]
    Runtime(String),
}

impl Error {
    /// Syntax error anchored at `span`
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::Syntax {
            message: message.into(),
            span,
        }
    }

    /// `'X' expected`
    pub fn expected_symbol(symbol: char, span: Span) -> Self {
        Self::syntax(format!("'{}' expected", symbol), span)
    }

    /// Get the span associated with this error
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Syntax { span, .. } => Some(*span),
            Self::Runtime(_) => None,
        }
    }

    /// Byte offset of the error in the source, if it has one
    pub fn offset(&self) -> Option<usize> {
        self.span().map(|s| s.start)
    }
}
