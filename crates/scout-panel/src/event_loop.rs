//! Host event pump
//!
//! Host callbacks fire on the UI thread, where the controller lock must not
//! be taken. They only push onto this channel; one task drains it and
//! applies events in arrival order.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use scout_surface::HostEvent;

use crate::controller::PanelController;

pub type HostEventSender = mpsc::UnboundedSender<HostEvent>;
pub type HostEventReceiver = mpsc::UnboundedReceiver<HostEvent>;

pub fn event_channel() -> (HostEventSender, HostEventReceiver) {
    mpsc::unbounded_channel()
}

/// Drain host events into the controller until every sender is dropped.
pub fn spawn_event_loop(
    runtime: &tokio::runtime::Handle,
    controller: PanelController,
    mut events: HostEventReceiver,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        tracing::debug!("Host event loop started");
        while let Some(event) = events.recv().await {
            tracing::trace!(label = %event.label(), kind = event.kind(), "Host event");
            controller.handle_event(event);
        }
        tracing::debug!("Host event loop stopped");
    })
}
