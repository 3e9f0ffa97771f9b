//! Surface error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// The host could not create a window or rendering context
    #[error("Allocation failed for {label}: {reason}")]
    Allocation { label: String, reason: String },

    /// The window or surface was already torn down
    #[error("Stale handle: {0}")]
    StaleHandle(String),

    #[error("Host operation failed: {0}")]
    Operation(String),

    #[error("Failed to clear partition {partition}: {reason}")]
    PartitionClear { partition: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl SurfaceError {
    pub fn allocation(label: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Allocation {
            label: label.into(),
            reason: reason.to_string(),
        }
    }

    /// Stale handles come from ordinary races between user action and async
    /// completion; callers absorb them.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleHandle(_))
    }
}
