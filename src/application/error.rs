//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add endpoint, remote-service and
/// configuration failures.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("no base URL for service {service}")]
    MissingEndpoint { service: String },

    #[error("client error ({status}): {message}")]
    Client { status: u16, message: String },

    #[error("transport error: {context}")]
    Transport {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// HTTP status carried by a client error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApplicationError::Client { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
