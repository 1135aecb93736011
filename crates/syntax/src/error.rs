//! Syntax errors

use thiserror::Error;

/// A Go source file could not be tokenized or parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

pub type SyntaxResult<T> = Result<T, SyntaxError>;
