//! Error types for mindmatch-core.

use thiserror::Error;

/// Result type alias using GameError.
pub type Result<T> = std::result::Result<T, GameError>;

/// Rejections produced by the matching engine.
///
/// Only `InvalidInput` is fatal, and only at session construction. The other
/// variants leave the session exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("incomplete submission: {filled} of {total} slots filled")]
    IncompleteSubmission { filled: usize, total: usize },
}

impl GameError {
    pub(crate) fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }
}

/// Errors that can occur while parsing game content.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing ID at line {line}")]
    MissingId { line: usize },

    #[error("missing term at line {line}")]
    MissingTerm { line: usize },

    #[error("missing definition at line {line}")]
    MissingDefinition { line: usize },

    #[error("invalid ID format at line {line}: {value}")]
    InvalidId { line: usize, value: String },

    #[error("duplicate ID {id} at line {line}")]
    DuplicateId { id: i64, line: usize },
}
