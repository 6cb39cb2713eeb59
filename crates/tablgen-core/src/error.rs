//! Error types for source analysis

use thiserror::Error;

/// Result type alias for parsing and extraction
pub type ParseResult<T> = Result<T, ParseError>;

/// A source unit is not syntactically valid.
///
/// Positions are 1-based. Extraction never produces a partial model when
/// this error is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}
