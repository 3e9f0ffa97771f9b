//! Scout Panel
//!
//! Lifecycle of the two windows that embed the target site:
//! - A permanently hidden enrichment host that gives background extraction
//!   a real layout viewport
//! - A user-facing browser panel stacking a privileged chrome strip over a
//!   sandboxed content surface
//!
//! Both bind the same session partition, so a login in one is visible to
//! the other. `PanelController` is the single entry point for the rest of
//! the application.

pub mod chrome;
mod controller;
mod enrichment;
mod error;
mod event_loop;
pub mod labels;
mod options;
mod panel;
mod routes;
mod state;

pub use controller::PanelController;
pub use enrichment::EnrichmentHost;
pub use error::PanelError;
pub use event_loop::{event_channel, spawn_event_loop, HostEventReceiver, HostEventSender};
pub use options::PanelOptions;
pub use panel::BrowserPanel;
pub use state::PanelState;

pub type Result<T> = std::result::Result<T, PanelError>;
