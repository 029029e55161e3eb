//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Storage error: {0}")]
    Storage(#[from] vigil_storage::StorageError),

    #[error("Session error: {0}")]
    Session(#[from] vigil_session::SessionError),
}
