//! Diagnostics
//!
//! Turns a compiler error into a report that can be shown to a human
//! (source line plus caret) or emitted as JSON for tools.

use serde::{Deserialize, Serialize};

use crate::utils::Error;

/// A structured error report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Error code (e.g., "E0001")
    pub code: String,

    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// The source expression the error refers to
    pub source: String,

    pub location: Option<Location>,
}

/// Every diagnostic is fatal, so there is only one severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Byte offset into the source
    pub offset: usize,
    /// Line number, counting from 1
    pub line: usize,
    /// Column in characters within the line, counting from 0
    pub column: usize,
}

impl ErrorReport {
    /// Create an error report from a compiler error
    pub fn from_error(error: &Error, source: &str) -> Self {
        let code = match error {
            Error::Syntax { .. } => "E0001",
            Error::Runtime(_) => "E0002",
        };

        let location = error.offset().map(|offset| locate(source, offset));

        Self {
            code: code.to_string(),
            severity: Severity::Error,
            message: error.to_string(),
            source: source.to_string(),
            location,
        }
    }

    /// Failing source line, a caret under the failing column, then the message
    pub fn render_human(&self) -> String {
        match self.location {
            Some(loc) => {
                let (start, end) = line_bounds(&self.source, loc.offset);
                let line = self.source[start..end].trim_end_matches('\r');
                format!("{}\n{}^ {}", line, " ".repeat(loc.column), self.message)
            }
            None => format!("error: {}", self.message),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.render_human())
    }
}

/// Line and column of a byte offset; snaps back to a char boundary
fn locate(source: &str, offset: usize) -> Location {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let (start, _) = line_bounds(source, offset);
    Location {
        offset,
        line: source[..start].matches('\n').count() + 1,
        column: source[start..offset].chars().count(),
    }
}

/// Byte range of the line holding `offset`, without its newline
fn line_bounds(source: &str, offset: usize) -> (usize, usize) {
    let start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let end = source[offset..].find('\n').map_or(source.len(), |i| offset + i);
    (start, end)
}
