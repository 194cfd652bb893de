//! Error types for credential store operations.

use thiserror::Error;

/// Errors that can occur while reading or mutating the credential store.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Failed to read or write local storage.
    #[error("storage error: {0}")]
    Storage(#[from] logindock_storage::StorageError),

    /// Failed to serialize the collection.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Import text is not valid JSON.
    #[error("import data is not valid JSON: {0}")]
    ImportParse(#[source] serde_json::Error),

    /// Import text is JSON but not a list of environment groups.
    #[error("import data has the wrong shape: {0}")]
    ImportFormat(String),

    /// A required field is blank.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
}

/// Result type for credential store operations.
pub type AccountResult<T> = Result<T, AccountError>;
