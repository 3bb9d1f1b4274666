//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The request body failed validation. The message is shown as is.
    #[error("{0}")]
    InvalidBody(String),

    /// The API key location is neither `header` nor `query`.
    #[error("unsupported API key location: {0}")]
    UnsupportedApiKeyLocation(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
