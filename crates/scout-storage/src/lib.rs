//! Scout Storage Layer
//!
//! SQLite-backed key/value settings shared by the desktop shell.
//! Secrets never land here; this store only holds plain preferences.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
