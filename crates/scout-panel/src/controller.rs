//! Panel lifecycle controller
//!
//! Single entry point for opening, hiding and logging out of the embedded
//! site. Owns the enrichment host and the lazily built browser panel, and
//! guarantees at most one of each.
//!
//! Every operation runs under one lock, so control steps are serialized
//! and never interleave. Host calls are fire-and-forget; nothing here waits
//! for a page to load.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use url::Url;

use scout_surface::{
    ChromeMessage, Host, HostEvent, PartitionHandle, PartitionPurpose, PartitionRegistry,
    SurfaceFactory, SurfaceHandle, ESCAPE_KEY,
};

use crate::enrichment::EnrichmentHost;
use crate::error::PanelError;
use crate::options::PanelOptions;
use crate::panel::BrowserPanel;
use crate::routes::{EventRoutes, Owner, Route};
use crate::state::PanelState;
use crate::Result;

/// Content navigation waiting for a freshly shown window to materialize
struct PendingNavigation {
    id: u64,
    url: Url,
    task: JoinHandle<()>,
}

struct ControllerInner {
    options: PanelOptions,
    factory: SurfaceFactory,
    partition: PartitionHandle,
    enrichment: Option<EnrichmentHost>,
    panel: Option<BrowserPanel>,
    state: PanelState,
    routes: EventRoutes,
    pending: Option<PendingNavigation>,
    next_navigation_id: u64,
    /// Set by `shutdown`; nothing is built afterwards
    shut_down: bool,
}

pub struct PanelController {
    inner: Arc<Mutex<ControllerInner>>,
    host: Arc<dyn Host>,
    runtime: Handle,
}

impl PanelController {
    /// Provision the shared partition and create the enrichment host.
    ///
    /// The application cannot run without the enrichment host, so any
    /// failure here should abort startup.
    pub fn start(
        host: Arc<dyn Host>,
        registry: PartitionRegistry,
        options: PanelOptions,
        runtime: Handle,
    ) -> Result<Self> {
        let partition = registry.partition_for(PartitionPurpose::TargetSite);
        let factory = SurfaceFactory::new(Arc::clone(&host), registry);

        let enrichment = EnrichmentHost::create(host.as_ref(), &factory, &partition, &options)
            .inspect_err(|e| tracing::error!(error = %e, "Failed to create enrichment host"))?;

        let mut routes = EventRoutes::default();
        routes.register(enrichment.window_label(), Route::EnrichmentWindow);
        routes.register(&enrichment.surface().label, Route::EnrichmentSurface);

        let inner = ControllerInner {
            options,
            factory,
            partition,
            enrichment: Some(enrichment),
            panel: None,
            state: PanelState::Uninitialized,
            routes,
            pending: None,
            next_navigation_id: 1,
            shut_down: false,
        };

        Ok(Self {
            inner: Arc::new(Mutex::new(inner)),
            host,
            runtime,
        })
    }

    pub fn state(&self) -> PanelState {
        self.inner.lock().state
    }

    pub fn partition(&self) -> PartitionHandle {
        self.inner.lock().partition.clone()
    }

    /// Open the panel, optionally navigating its content surface.
    ///
    /// The first call builds the window; later calls re-show the existing
    /// one. The navigation is issued after the grace period and replaces any
    /// navigation still waiting from an earlier call.
    pub fn open(&self, url: Option<&str>) -> Result<()> {
        let target = url.and_then(parse_content_url);

        let mut inner = self.inner.lock();
        inner.present(self.host.as_ref())?;

        if let Some(target) = target {
            self.schedule_navigation(&mut inner, target);
        }
        Ok(())
    }

    /// Re-show the panel without navigating.
    pub fn show(&self) -> Result<()> {
        self.inner.lock().present(self.host.as_ref())
    }

    /// Hide the panel. Only meaningful while shown.
    pub fn hide(&self) {
        self.inner.lock().hide(self.host.as_ref());
    }

    /// User dismissal; identical to `hide`. The panel survives for the next
    /// `open`.
    pub fn close(&self) {
        self.hide();
    }

    /// Clear the shared partition and send every surface bound to it to the
    /// login page.
    ///
    /// A pending post-open navigation is cancelled first so it cannot land
    /// after the login page.
    pub fn logout(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.cancel_pending();

        let host = self.host.as_ref();
        host.clear_partition(&inner.partition).map_err(|e| {
            tracing::error!(partition = %inner.partition, error = %e, "Partition clear failed");
            PanelError::Logout(e)
        })?;

        let login = inner.options.login_url.clone();
        if let Some(enrichment) = &inner.enrichment {
            if let Err(e) = enrichment.navigate(host, &login) {
                tracing::debug!(error = %e, "Enrichment surface unavailable during logout");
            }
        }
        if let Some(panel) = inner.panel.as_ref().filter(|_| inner.state.has_surfaces()) {
            panel.navigate_content(host, &login);
        }

        tracing::info!(partition = %inner.partition, "Logged out");
        Ok(())
    }

    /// Tear everything down. Called once when the application exits;
    /// later `open`/`show` calls fail with [`PanelError::ShutDown`].
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock();
        let host = self.host.as_ref();

        inner.shut_down = true;
        inner.destroy_panel(Some(host));
        inner.routes.unregister_owner(Owner::Enrichment);
        if let Some(enrichment) = inner.enrichment.take() {
            enrichment.destroy(host);
        }
    }

    /// Handle for the enrichment task collaborator
    pub fn enrichment_surface(&self) -> Option<SurfaceHandle> {
        self.inner.lock().enrichment.as_ref().map(|e| e.surface())
    }

    pub fn enrichment_location(&self) -> Option<String> {
        let inner = self.inner.lock();
        inner.enrichment.as_ref()?.location().map(str::to_string)
    }

    /// Drive the hidden viewport to a page for extraction.
    pub fn navigate_enrichment(&self, url: &str) -> Result<()> {
        let url = Url::parse(url).map_err(|e| {
            PanelError::Surface(scout_surface::SurfaceError::InvalidUrl(format!("{url}: {e}")))
        })?;

        let inner = self.inner.lock();
        let enrichment = inner
            .enrichment
            .as_ref()
            .ok_or(PanelError::EnrichmentUnavailable)?;
        enrichment.navigate(self.host.as_ref(), &url)?;
        Ok(())
    }

    pub fn content_surface(&self) -> Option<SurfaceHandle> {
        self.with_panel(|panel| panel.content())
    }

    pub fn chrome_surface(&self) -> Option<SurfaceHandle> {
        self.with_panel(|panel| panel.chrome())
    }

    pub fn displayed_location(&self) -> Option<String> {
        self.with_panel(|panel| panel.displayed_location().map(str::to_string))
            .flatten()
    }

    pub fn content_location(&self) -> Option<String> {
        self.with_panel(|panel| panel.location().map(str::to_string))
            .flatten()
    }

    fn with_panel<T>(&self, f: impl FnOnce(&BrowserPanel) -> T) -> Option<T> {
        let inner = self.inner.lock();
        if !inner.state.has_surfaces() {
            return None;
        }
        inner.panel.as_ref().map(f)
    }

    /// Apply one host event. Events for torn-down windows or surfaces are
    /// dropped.
    pub fn handle_event(&self, event: HostEvent) {
        let mut inner = self.inner.lock();
        let host = self.host.as_ref();

        let Some(route) = inner.routes.route(event.label()) else {
            tracing::debug!(
                label = %event.label(),
                kind = event.kind(),
                "Dropping event for unregistered label"
            );
            return;
        };

        match (event, route) {
            (HostEvent::Resized { size, .. }, Route::PanelWindow) => {
                if let Some(panel) = inner.panel.as_mut() {
                    panel.sync_bounds(host, Some(size));
                }
            }
            (HostEvent::Resized { .. }, Route::EnrichmentWindow) => {
                if let Some(enrichment) = inner.enrichment.as_mut() {
                    enrichment.sync_bounds(host);
                }
            }
            (HostEvent::Navigated { url, .. }, Route::PanelContent) => {
                if let Some(panel) = inner.panel.as_mut() {
                    panel.forward_location(host, &url);
                }
            }
            (HostEvent::Navigated { .. }, Route::PanelChrome) => {
                if let Some(panel) = inner.panel.as_mut() {
                    panel.chrome_loaded(host);
                }
            }
            (HostEvent::Navigated { url, .. }, Route::EnrichmentSurface) => {
                if let Some(enrichment) = inner.enrichment.as_mut() {
                    enrichment.record_location(url);
                }
            }
            (HostEvent::ChromeMessage { message, .. }, Route::PanelChrome) => {
                tracing::debug!(%message, "Chrome message");
                match message {
                    ChromeMessage::Dismiss | ChromeMessage::Escape => inner.hide(host),
                }
            }
            (HostEvent::ChromeMessage { surface, message }, _) => {
                tracing::warn!(
                    surface = %surface,
                    %message,
                    "Ignoring chrome message from unprivileged surface"
                );
            }
            (HostEvent::KeyDown { key, .. }, Route::PanelChrome | Route::PanelContent) => {
                if key == ESCAPE_KEY {
                    inner.hide(host);
                }
            }
            (HostEvent::CloseRequested { .. }, Route::PanelWindow) => inner.hide(host),
            (HostEvent::WindowDestroyed { window }, Route::PanelWindow) => {
                tracing::warn!(window = %window, "Panel window destroyed by host");
                inner.destroy_panel(None);
            }
            (HostEvent::WindowDestroyed { window }, Route::EnrichmentWindow) => {
                tracing::error!(window = %window, "Enrichment host destroyed by host");
                inner.routes.unregister_owner(Owner::Enrichment);
                inner.enrichment = None;
            }
            (event, route) => {
                tracing::trace!(kind = event.kind(), ?route, "Event not handled");
            }
        }
    }

    fn schedule_navigation(&self, inner: &mut ControllerInner, url: Url) {
        inner.cancel_pending();

        let id = inner.next_navigation_id;
        inner.next_navigation_id += 1;

        let grace = inner.options.navigation_grace;
        let weak: Weak<Mutex<ControllerInner>> = Arc::downgrade(&self.inner);
        let host = Arc::clone(&self.host);

        let task = self.runtime.spawn(async move {
            tokio::time::sleep(grace).await;
            if let Some(inner) = weak.upgrade() {
                inner.lock().fire_pending(id, host.as_ref());
            }
        });

        tracing::debug!(id, url = %url, grace_ms = grace.as_millis() as u64, "Navigation scheduled");
        inner.pending = Some(PendingNavigation { id, url, task });
    }
}

impl Clone for PanelController {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            host: Arc::clone(&self.host),
            runtime: self.runtime.clone(),
        }
    }
}

impl ControllerInner {
    fn transition(&mut self, to: PanelState) -> Result<()> {
        if !self.state.can_transition_to(to) {
            return Err(PanelError::InvalidTransition {
                from: self.state.to_string(),
                to: to.to_string(),
            });
        }

        if self.state != to {
            tracing::debug!(from = %self.state, to = %to, "Panel state transition");
        }
        self.state = to;
        Ok(())
    }

    /// Bring the panel on screen, building it when needed.
    fn present(&mut self, host: &dyn Host) -> Result<()> {
        if self.shut_down {
            tracing::debug!("Present ignored after shutdown");
            return Err(PanelError::ShutDown);
        }

        // A window the host tore down without telling us is rebuilt
        if self.state.has_surfaces()
            && !self
                .panel
                .as_ref()
                .is_some_and(|p| host.window_alive(p.window_label()))
        {
            self.destroy_panel(None);
        }

        if self.state.needs_construction() {
            let panel = BrowserPanel::build(host, &self.factory, &self.partition, &self.options)
                .inspect_err(|e| tracing::error!(error = %e, "Failed to build browser panel"))?;

            self.routes.register(panel.window_label(), Route::PanelWindow);
            self.routes.register(&panel.chrome().label, Route::PanelChrome);
            self.routes.register(&panel.content().label, Route::PanelContent);
            self.panel = Some(panel);
        }

        let Some(panel) = self.panel.as_mut() else {
            return Err(PanelError::InvalidTransition {
                from: self.state.to_string(),
                to: PanelState::Shown.to_string(),
            });
        };

        if let Err(e) = panel.show(host) {
            if !e.is_stale() {
                tracing::error!(error = %e, "Failed to show browser panel");
                if self.state.needs_construction() {
                    self.discard_unshown_panel(host);
                }
                return Err(PanelError::Surface(e));
            }
            tracing::debug!(error = %e, "Panel window vanished while showing");
        }
        self.transition(PanelState::Shown)?;

        tracing::info!(window = %panel_label(&self.panel), "Browser panel shown");
        Ok(())
    }

    fn hide(&mut self, host: &dyn Host) {
        if self.state != PanelState::Shown {
            tracing::debug!(state = %self.state, "Hide ignored");
            return;
        }

        self.cancel_pending();
        if let Some(panel) = &self.panel {
            panel.hide(host, &self.options.main_window_label);
        }
        if self.transition(PanelState::Hidden).is_ok() {
            tracing::info!(window = %panel_label(&self.panel), "Browser panel hidden");
        }
    }

    /// Drop the panel and its routes. With a host, also destroy its window;
    /// without one, the host already did.
    fn destroy_panel(&mut self, host: Option<&dyn Host>) {
        self.cancel_pending();
        self.routes.unregister_owner(Owner::Panel);

        if let Some(panel) = self.panel.take() {
            if let Some(host) = host {
                panel.destroy(host);
            }
        }
        if self.state.has_surfaces() {
            let _ = self.transition(PanelState::Destroyed);
        }
    }

    /// Tear down a panel built by this call that never reached the screen,
    /// so the next `open` starts from scratch.
    fn discard_unshown_panel(&mut self, host: &dyn Host) {
        self.routes.unregister_owner(Owner::Panel);
        if let Some(panel) = self.panel.take() {
            panel.destroy(host);
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
            tracing::debug!(id = pending.id, url = %pending.url, "Pending navigation cancelled");
        }
    }

    fn fire_pending(&mut self, id: u64, host: &dyn Host) {
        if self.pending.as_ref().map(|p| p.id) != Some(id) {
            return;
        }
        let Some(pending) = self.pending.take() else {
            return;
        };

        if self.state != PanelState::Shown {
            tracing::debug!(id, state = %self.state, "Dropping navigation for inactive panel");
            return;
        }

        match &self.panel {
            Some(panel) if host.surface_alive(&panel.content().label) => {
                panel.navigate_content(host, &pending.url);
            }
            _ => tracing::debug!(id, "Dropping navigation for missing content surface"),
        }
    }
}

fn panel_label(panel: &Option<BrowserPanel>) -> &str {
    panel.as_ref().map(|p| p.window_label()).unwrap_or("-")
}

/// Content navigations are limited to web pages
fn parse_content_url(raw: &str) -> Option<Url> {
    match Url::parse(raw.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
        Ok(url) => {
            tracing::warn!(url = %url, "Ignoring non-web URL for panel");
            None
        }
        Err(e) => {
            tracing::warn!(url = %raw, error = %e, "Ignoring invalid URL for panel");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chrome;
    use crate::labels;
    use scout_surface::testing::{FakeHost, HostCall};
    use scout_surface::{Bounds, ContentSize};
    use std::time::Duration;

    const GRACE: Duration = Duration::from_millis(250);

    fn start(host: &Arc<FakeHost>) -> PanelController {
        PanelController::start(
            host.clone(),
            PartitionRegistry::default(),
            PanelOptions::default(),
            Handle::current(),
        )
        .unwrap()
    }

    /// Feed queued host events back into the controller
    fn pump(host: &FakeHost, controller: &PanelController) {
        loop {
            let events = host.take_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                controller.handle_event(event);
            }
        }
    }

    fn creates(host: &FakeHost, label: &str) -> usize {
        host.count_calls(|c| matches!(c, HostCall::CreateWindow(l) if l == label))
    }

    fn navigations(host: &FakeHost, surface: &str) -> Vec<String> {
        host.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Navigate { surface: s, url } if s == surface => Some(url),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_startup_creates_hidden_enrichment_host() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);

        assert_eq!(controller.state(), PanelState::Uninitialized);
        assert_eq!(host.live_window_count(), 1);
        assert!(!host.window(labels::ENRICHMENT_WINDOW).unwrap().visible);

        let handle = controller.enrichment_surface().unwrap();
        assert_eq!(handle.label, labels::ENRICHMENT_SURFACE);
        assert_eq!(handle.partition, Some(controller.partition()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_startup_fails_without_enrichment_window() {
        let host = Arc::new(FakeHost::new());
        host.fail_window(labels::ENRICHMENT_WINDOW);

        let result = PanelController::start(
            host.clone(),
            PartitionRegistry::default(),
            PanelOptions::default(),
            Handle::current(),
        );
        assert!(matches!(result, Err(PanelError::Allocation { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_fresh_panel_navigates_after_grace() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);

        controller.open(Some("https://example.com/jobs/42")).unwrap();
        assert_eq!(controller.state(), PanelState::Shown);

        let window = host.window(labels::PANEL_WINDOW).unwrap();
        assert!(window.visible);
        let (w, h) = (window.size.width, window.size.height);
        assert_eq!(
            host.surface(labels::PANEL_CONTENT).unwrap().bounds,
            Bounds::new(0.0, 48.0, w, h - 48.0)
        );

        // Nothing navigates before the window had time to materialize
        assert!(navigations(&host, labels::PANEL_CONTENT).is_empty());

        tokio::time::sleep(GRACE + Duration::from_millis(10)).await;
        pump(&host, &controller);

        assert_eq!(
            host.surface(labels::PANEL_CONTENT).unwrap().url,
            "https://example.com/jobs/42"
        );
        assert_eq!(
            controller.displayed_location().as_deref(),
            Some("example.com/jobs/42")
        );
        let chrome = host.surface(labels::PANEL_CHROME).unwrap();
        assert_eq!(
            chrome.scripts.last(),
            Some(&chrome::location_script("example.com/jobs/42"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounds_synced_before_show() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);

        controller.open(None).unwrap();

        let calls = host.calls();
        let show = calls
            .iter()
            .position(|c| matches!(c, HostCall::ShowWindow(l) if l == labels::PANEL_WINDOW))
            .unwrap();
        let last_bounds = calls
            .iter()
            .rposition(|c| matches!(c, HostCall::SetBounds { surface, .. } if surface == labels::PANEL_CONTENT))
            .unwrap();
        assert!(last_bounds < show);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_twice_reuses_window() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);

        controller.open(None).unwrap();
        controller.open(None).unwrap();

        assert_eq!(creates(&host, labels::PANEL_WINDOW), 1);
        assert_eq!(
            host.count_calls(|c| matches!(c, HostCall::ComposeSurface { surface, .. } if surface == labels::PANEL_CONTENT)),
            1
        );
        assert_eq!(controller.state(), PanelState::Shown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_open_navigation_wins() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);

        controller.open(Some("https://example.com/jobs/1")).unwrap();
        controller.open(Some("https://example.com/jobs/2")).unwrap();

        tokio::time::sleep(GRACE * 2).await;
        pump(&host, &controller);

        assert_eq!(
            navigations(&host, labels::PANEL_CONTENT),
            vec!["https://example.com/jobs/2".to_string()]
        );
        assert_eq!(host.live_window_count(), 2);
        assert_eq!(creates(&host, labels::PANEL_WINDOW), 1);
        assert_eq!(
            controller.displayed_location().as_deref(),
            Some("example.com/jobs/2")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_hide_then_show_preserves_content() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);

        controller.open(Some("https://example.com/jobs/42")).unwrap();
        tokio::time::sleep(GRACE * 2).await;
        pump(&host, &controller);
        host.clear_calls();

        controller.hide();
        assert_eq!(controller.state(), PanelState::Hidden);
        assert!(!host.window(labels::PANEL_WINDOW).unwrap().visible);
        assert_eq!(
            host.calls().last(),
            Some(&HostCall::FocusWindow("main".to_string()))
        );

        controller.show().unwrap();
        tokio::time::sleep(GRACE * 2).await;

        assert_eq!(controller.state(), PanelState::Shown);
        assert!(navigations(&host, labels::PANEL_CONTENT).is_empty());
        assert_eq!(creates(&host, labels::PANEL_WINDOW), 0);
        assert_eq!(
            host.surface(labels::PANEL_CONTENT).unwrap().url,
            "https://example.com/jobs/42"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_hide_cancels_pending_navigation() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);

        controller.open(Some("https://example.com/jobs/42")).unwrap();
        controller.hide();
        tokio::time::sleep(GRACE * 2).await;

        assert!(navigations(&host, labels::PANEL_CONTENT).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hide_outside_shown_is_noop() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);

        controller.hide();
        assert_eq!(controller.state(), PanelState::Uninitialized);
        assert_eq!(host.count_calls(|c| matches!(c, HostCall::HideWindow(_))), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismissal_paths_hide_never_destroy() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);

        let dismissals = [
            HostEvent::ChromeMessage {
                surface: labels::PANEL_CHROME.to_string(),
                message: ChromeMessage::Dismiss,
            },
            HostEvent::KeyDown {
                surface: labels::PANEL_CHROME.to_string(),
                key: ESCAPE_KEY.to_string(),
            },
            HostEvent::KeyDown {
                surface: labels::PANEL_CONTENT.to_string(),
                key: ESCAPE_KEY.to_string(),
            },
            HostEvent::CloseRequested {
                window: labels::PANEL_WINDOW.to_string(),
            },
        ];

        for event in dismissals {
            controller.open(None).unwrap();
            controller.handle_event(event);
            assert_eq!(controller.state(), PanelState::Hidden);
            assert!(host.window_alive(labels::PANEL_WINDOW));
        }
        assert_eq!(creates(&host, labels::PANEL_WINDOW), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_content_cannot_send_chrome_messages() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);
        controller.open(None).unwrap();

        controller.handle_event(HostEvent::ChromeMessage {
            surface: labels::PANEL_CONTENT.to_string(),
            message: ChromeMessage::Dismiss,
        });
        controller.handle_event(HostEvent::KeyDown {
            surface: labels::PANEL_CONTENT.to_string(),
            key: "Enter".to_string(),
        });
        assert_eq!(controller.state(), PanelState::Shown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_relays_out_surfaces() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);
        controller.open(None).unwrap();

        let event = host.resize(labels::PANEL_WINDOW, ContentSize::new(700.0, 30.0));
        controller.handle_event(event);

        assert_eq!(
            host.surface(labels::PANEL_CHROME).unwrap().bounds,
            Bounds::new(0.0, 0.0, 700.0, 30.0)
        );
        let content = host.surface(labels::PANEL_CONTENT).unwrap().bounds;
        assert_eq!(content.width, 700.0);
        assert_eq!(content.height, 0.0);

        let event = host.resize(labels::PANEL_WINDOW, ContentSize::new(900.0, 600.0));
        controller.handle_event(event.clone());
        controller.handle_event(event);
        assert_eq!(
            host.surface(labels::PANEL_CONTENT).unwrap().bounds,
            Bounds::new(0.0, 48.0, 900.0, 552.0)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_without_panel() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);

        controller.logout().unwrap();

        assert_eq!(
            host.count_calls(|c| matches!(c, HostCall::ClearPartition(p) if p == "persist:linkedin")),
            1
        );
        assert_eq!(
            host.surface(labels::ENRICHMENT_SURFACE).unwrap().url,
            "https://www.linkedin.com/login"
        );
        assert_eq!(controller.state(), PanelState::Uninitialized);
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_navigates_both_surfaces_and_cancels_pending() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);

        controller.open(Some("https://example.com/jobs/42")).unwrap();
        controller.logout().unwrap();
        tokio::time::sleep(GRACE * 2).await;

        assert_eq!(
            navigations(&host, labels::PANEL_CONTENT),
            vec!["https://www.linkedin.com/login".to_string()]
        );
        assert_eq!(
            navigations(&host, labels::ENRICHMENT_SURFACE),
            vec!["https://www.linkedin.com/login".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_clear_failure_is_reported() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);
        host.fail_partition_clear(true);

        assert!(matches!(controller.logout(), Err(PanelError::Logout(_))));
        assert!(navigations(&host, labels::ENRICHMENT_SURFACE).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_allocation_failure_is_retryable() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);
        host.fail_window(labels::PANEL_WINDOW);

        assert!(matches!(
            controller.open(None),
            Err(PanelError::Allocation { .. })
        ));
        assert_eq!(controller.state(), PanelState::Uninitialized);

        host.heal();
        controller.open(None).unwrap();
        assert_eq!(controller.state(), PanelState::Shown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_destroyed_by_host_rebuilds_on_open() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);
        controller.open(Some("https://example.com/a")).unwrap();

        let event = host.destroy_externally(labels::PANEL_WINDOW);
        controller.handle_event(event);
        assert_eq!(controller.state(), PanelState::Destroyed);
        assert!(controller.content_surface().is_none());

        // Late events from the dead surfaces go nowhere
        controller.handle_event(HostEvent::KeyDown {
            surface: labels::PANEL_CONTENT.to_string(),
            key: ESCAPE_KEY.to_string(),
        });
        tokio::time::sleep(GRACE * 2).await;
        assert!(navigations(&host, labels::PANEL_CONTENT).is_empty());

        controller.open(None).unwrap();
        assert_eq!(controller.state(), PanelState::Shown);
        assert_eq!(creates(&host, labels::PANEL_WINDOW), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_chrome_load_repushes_content_location() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);
        controller.open(None).unwrap();
        host.take_events();

        let evals = || host.count_calls(|c| matches!(c, HostCall::Eval { .. }));
        let content_at = |url: &str| HostEvent::Navigated {
            surface: labels::PANEL_CONTENT.to_string(),
            url: url.to_string(),
        };

        controller.handle_event(content_at("https://www.linkedin.com/feed/"));
        assert_eq!(evals(), 1);

        // The chrome finished loading after the first push and shows nothing
        controller.handle_event(HostEvent::Navigated {
            surface: labels::PANEL_CHROME.to_string(),
            url: "tauri://localhost/panel-chrome.html".to_string(),
        });
        assert_eq!(evals(), 2);

        controller.handle_event(content_at("https://www.linkedin.com/feed/"));
        assert_eq!(evals(), 2);
        assert_eq!(
            controller.displayed_location().as_deref(),
            Some("www.linkedin.com/feed/")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_after_shutdown_builds_nothing() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);
        controller.open(None).unwrap();
        controller.shutdown();

        assert!(matches!(
            controller.open(Some("https://example.com/a")),
            Err(PanelError::ShutDown)
        ));
        assert!(matches!(controller.show(), Err(PanelError::ShutDown)));
        tokio::time::sleep(GRACE * 2).await;

        assert_eq!(controller.state(), PanelState::Destroyed);
        assert_eq!(host.live_window_count(), 0);
        assert_eq!(creates(&host, labels::PANEL_WINDOW), 1);
        assert!(navigations(&host, labels::PANEL_CONTENT).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_show_is_reported_not_recorded() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);
        host.fail_show(labels::PANEL_WINDOW);

        assert!(matches!(
            controller.open(Some("https://example.com/a")),
            Err(PanelError::Surface(_))
        ));
        assert_eq!(controller.state(), PanelState::Uninitialized);
        assert!(!host.window_alive(labels::PANEL_WINDOW));
        tokio::time::sleep(GRACE * 2).await;
        assert!(navigations(&host, labels::PANEL_CONTENT).is_empty());

        host.heal();
        controller.open(None).unwrap();
        controller.hide();

        host.fail_show(labels::PANEL_WINDOW);
        assert!(matches!(controller.show(), Err(PanelError::Surface(_))));
        assert_eq!(controller.state(), PanelState::Hidden);
        assert!(host.window_alive(labels::PANEL_WINDOW));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_url_still_opens() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);

        controller.open(Some("javascript:alert(1)")).unwrap();
        tokio::time::sleep(GRACE * 2).await;

        assert_eq!(controller.state(), PanelState::Shown);
        assert!(navigations(&host, labels::PANEL_CONTENT).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_destroys_everything() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);
        controller.open(Some("https://example.com/a")).unwrap();

        controller.shutdown();
        tokio::time::sleep(GRACE * 2).await;

        assert_eq!(controller.state(), PanelState::Destroyed);
        assert_eq!(host.live_window_count(), 0);
        assert!(controller.enrichment_surface().is_none());
        assert!(navigations(&host, labels::PANEL_CONTENT).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_enrichment_navigation_is_tracked() {
        let host = Arc::new(FakeHost::new());
        let controller = start(&host);

        controller
            .navigate_enrichment("https://www.linkedin.com/in/someone/")
            .unwrap();
        pump(&host, &controller);

        assert_eq!(
            controller.enrichment_location().as_deref(),
            Some("https://www.linkedin.com/in/someone/")
        );
        assert!(controller.navigate_enrichment("::").is_err());
    }
}
