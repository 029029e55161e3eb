//! VIGIL Storage Layer
//!
//! SQLite-based persistence for session state and logs.
//! Multi-key state writes are transactional.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
