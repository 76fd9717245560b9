//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed input and unknown commands.
/// These are independent of transport and configuration concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("syntax error: {details}")]
    Syntax { token: String, details: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("no such command: {path} (available: {})", available.join(", "))]
    NoSuchCommand {
        path: String,
        available: Vec<String>,
    },

    #[error("missing required argument: {0}")]
    MissingArgument(String),
}

impl DomainError {
    /// Create a syntax error for a malformed token.
    pub fn syntax(token: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Syntax {
            token: token.into(),
            details: details.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
