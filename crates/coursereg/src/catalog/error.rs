//! Error types for the course catalogue.

use thiserror::Error;

/// Errors that can occur while reading or writing the catalogue.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Opening the database or running a statement failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored or imported document could not be (de)serialized
    #[error("Malformed course document: {0}")]
    Document(#[from] serde_json::Error),

    /// Reading a seed file failed
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The blocking catalogue task panicked or was cancelled
    #[error("Catalogue task failed: {message}")]
    TaskFailed { message: String },
}

impl From<tokio::task::JoinError> for CatalogError {
    fn from(err: tokio::task::JoinError) -> Self {
        CatalogError::TaskFailed {
            message: err.to_string(),
        }
    }
}
