//! Persistence port
//!
//! A key-value boundary for session state. Every write replaces the whole
//! value stored under a key.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error.
    #[error("I/O error on '{key}': {source}")]
    Io {
        /// Key being read or written
        key: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The stored value could not be decoded.
    #[error("corrupt value under '{key}': {message}")]
    Corrupt {
        /// Key being read
        key: String,
        /// Decoder message
        message: String,
    },

    /// The key cannot be mapped onto the backing store.
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

/// Key-value store for persisted session state.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// Returns `None` if nothing was ever stored.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    /// Returns an error if the value cannot be written.
    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StorageError>;
}
