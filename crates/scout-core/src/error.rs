//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] scout_storage::StorageError),

    #[error("Panel error: {0}")]
    Panel(#[from] scout_panel::PanelError),

    #[error("Surface error: {0}")]
    Surface(#[from] scout_surface::SurfaceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
