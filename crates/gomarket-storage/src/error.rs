//! Storage error types.

use thiserror::Error;

/// Errors that can occur when talking to a storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend-specific failure.
    #[error("Store operation failed: {0}")]
    Store(String),

    /// Key cannot be stored by this backend.
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
