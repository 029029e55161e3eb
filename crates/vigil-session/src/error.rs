//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(#[from] vigil_storage::StorageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Domain list cannot be empty")]
    EmptyDomains,

    #[error("Session length must be between 1 and 480 minutes, got {0}")]
    InvalidDuration(i64),
}
