//! Application state management
use std::sync::Arc;

use scout_core::{HostEvent, HostEventSender, Scout};

/// Thread-safe application state wrapper
pub struct AppState {
    scout: Arc<Scout>,
    events: HostEventSender,
}

impl AppState {
    pub fn new(scout: Scout, events: HostEventSender) -> Self {
        Self {
            scout: Arc::new(scout),
            events,
        }
    }

    pub fn scout(&self) -> Arc<Scout> {
        Arc::clone(&self.scout)
    }

    /// Queue an event for the panel controller
    pub fn dispatch(&self, event: HostEvent) {
        if self.events.send(event).is_err() {
            tracing::warn!("Event loop stopped; dropping event");
        }
    }
}
