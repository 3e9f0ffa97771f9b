//! Scout Core
//!
//! Wires the settings store, the session partition and the panel
//! controller together for the desktop shell.

mod config;
mod error;
mod scout;

pub use config::Config;
pub use error::CoreError;
pub use scout::Scout;

// Re-export core components
pub use scout_panel::{
    event_channel, spawn_event_loop, HostEventReceiver, HostEventSender, PanelController,
    PanelError, PanelState,
};
pub use scout_storage::{Database, StorageError};
pub use scout_surface::{
    Bounds, ChromeMessage, ContentSize, Host, HostEvent, Isolation, NavigationPolicy,
    PartitionHandle, SurfaceContent, SurfaceError, SurfaceHandle, SurfaceSignal, SurfaceSpec,
    WindowSpec, SANDBOX_BRIDGE_SCRIPT,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
