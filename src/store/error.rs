//! Error types for snapshot storage.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing the snapshot file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O failure while touching the backing file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error serializing a snapshot for writing.
    #[error("serialization error: {0}")]
    Serialize(String),

    /// No snapshot has ever been committed.
    #[error("no snapshot at {path}")]
    NotFound { path: PathBuf },

    /// The backing file exists but does not parse as a snapshot.
    #[error("corrupt snapshot at {path}: {message}")]
    Corrupt { path: PathBuf, message: String },
}

impl StoreError {
    /// Create an I/O error with path context.
    pub fn file_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serialize(message: impl Into<String>) -> Self {
        Self::Serialize(message.into())
    }

    /// Create a not-found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a corrupt-snapshot error with path context.
    pub fn corrupt(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Convenience type alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;
