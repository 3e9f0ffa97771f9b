//! Panel error types

use thiserror::Error;

use scout_surface::SurfaceError;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Failed to allocate {what}: {source}")]
    Allocation {
        what: &'static str,
        #[source]
        source: SurfaceError,
    },

    #[error("Logout failed: {0}")]
    Logout(#[source] SurfaceError),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Enrichment host is not available")]
    EnrichmentUnavailable,

    #[error("Panel controller has shut down")]
    ShutDown,
}

impl PanelError {
    pub fn allocation(what: &'static str, source: SurfaceError) -> Self {
        Self::Allocation { what, source }
    }
}
