//! Storage Error Types
//!
//! Errors raised by the external collaborators the core reads from: document
//! sources, file resolvers and filter rule storage.

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    /// The requested document or file does not exist
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// Any other IO failure (permissions, invalid UTF-8, ...)
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Wrap an IO error, mapping `NotFound` to its own variant
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
