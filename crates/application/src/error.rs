//! Application error types

use khabari_domain::DomainError;
use thiserror::Error;

use crate::ports::StorageError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The requested tab does not exist.
    #[error("tab not found: {0}")]
    TabNotFound(String),

    /// No history or saved item exists at the given position.
    #[error("no item at index {0}")]
    ItemNotFound(usize),

    /// Persisted state could not be encoded or decoded.
    #[error("state encoding error: {0}")]
    Encoding(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
