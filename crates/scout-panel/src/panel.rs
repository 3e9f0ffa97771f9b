//! Browser panel composition
//!
//! One window with two stacked surfaces: a privileged chrome strip pinned
//! to a bundled document, and a sandboxed content surface showing the
//! target site inside the shared partition.

use url::Url;

use scout_surface::{
    Bounds, BoundsSynchronizer, ContentSize, Host, Isolation, Layout, PartitionHandle, Surface,
    SurfaceContent, SurfaceFactory, SurfaceHandle, WindowSpec,
};

use crate::chrome::{self, CHROME_DOCUMENT};
use crate::error::PanelError;
use crate::labels;
use crate::options::PanelOptions;
use crate::Result;

pub struct BrowserPanel {
    window: String,
    chrome: Surface,
    content: Surface,
    synchronizer: BoundsSynchronizer,
    /// Last location reported by the content surface
    location: Option<String>,
    /// Last text pushed into the chrome
    displayed: Option<String>,
}

impl BrowserPanel {
    /// Create the window hidden, compose both surfaces and lay them out.
    ///
    /// Nothing is left behind on failure.
    pub fn build(
        host: &dyn Host,
        factory: &SurfaceFactory,
        partition: &PartitionHandle,
        options: &PanelOptions,
    ) -> Result<Self> {
        let window = labels::PANEL_WINDOW.to_string();

        let spec = WindowSpec::new(&window, &options.panel_title, options.panel_size)
            .min_size(options.panel_min_size);
        host.create_window(&spec)
            .map_err(|e| PanelError::allocation("panel window", e))?;

        let synchronizer = BoundsSynchronizer::new(Layout::Banded {
            band_height: options.chrome_band_height,
        });
        let initial = synchronizer.layout().compute(options.panel_size);
        let slot = |i: usize| initial.get(i).copied().unwrap_or_default();

        let composed = factory
            .create_surface(
                &window,
                labels::PANEL_CHROME,
                Isolation::Privileged,
                None,
                SurfaceContent::Local(CHROME_DOCUMENT.to_string()),
                slot(0),
            )
            .and_then(|chrome| {
                factory
                    .create_surface(
                        &window,
                        labels::PANEL_CONTENT,
                        Isolation::Sandboxed,
                        Some(partition),
                        SurfaceContent::External(options.home_url.clone()),
                        slot(1),
                    )
                    .map(|content| (chrome, content))
            });

        let (chrome, content) = match composed {
            Ok(pair) => pair,
            Err(e) => {
                let _ = host.destroy_window(&window);
                return Err(PanelError::allocation("panel surface", e));
            }
        };

        let mut panel = Self {
            window,
            chrome,
            content,
            synchronizer,
            location: None,
            displayed: None,
        };
        panel.sync_bounds(host, None);

        tracing::info!(window = %panel.window, partition = %partition, "Browser panel built");
        Ok(panel)
    }

    pub fn window_label(&self) -> &str {
        &self.window
    }

    pub fn chrome(&self) -> SurfaceHandle {
        self.chrome.handle()
    }

    pub fn content(&self) -> SurfaceHandle {
        self.content.handle()
    }

    pub fn chrome_bounds(&self) -> Bounds {
        self.chrome.bounds
    }

    pub fn content_bounds(&self) -> Bounds {
        self.content.bounds
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Text currently shown in the chrome's location field
    pub fn displayed_location(&self) -> Option<&str> {
        self.displayed.as_deref()
    }

    /// Lay both surfaces out against the window's current size, falling
    /// back to `reported` when the host cannot report one.
    pub(crate) fn sync_bounds(&mut self, host: &dyn Host, reported: Option<ContentSize>) {
        let mut surfaces = [&mut self.chrome, &mut self.content];
        let result = match host.content_size(&self.window) {
            Ok(size) => self.synchronizer.apply(host, size, &mut surfaces),
            Err(e) => match reported {
                Some(size) if !e.is_stale() => self.synchronizer.apply(host, size, &mut surfaces),
                _ => Err(e),
            },
        };

        if let Err(e) = result {
            tracing::debug!(window = %self.window, error = %e, "Panel layout skipped");
        }
    }

    /// Lay out, then show and focus the window.
    pub(crate) fn show(&mut self, host: &dyn Host) -> scout_surface::Result<()> {
        self.sync_bounds(host, None);
        host.show_window(&self.window)?;
        host.focus_window(&self.window)?;
        Ok(())
    }

    /// Hide the window and hand focus back to the main window.
    pub(crate) fn hide(&self, host: &dyn Host, main_window: &str) {
        if let Err(e) = host.hide_window(&self.window) {
            tracing::debug!(window = %self.window, error = %e, "Hide skipped");
        }
        if let Err(e) = host.focus_window(main_window) {
            tracing::debug!(window = %main_window, error = %e, "Could not refocus main window");
        }
    }

    pub(crate) fn navigate_content(&self, host: &dyn Host, url: &Url) {
        match host.navigate(&self.content.label, url) {
            Ok(()) => tracing::debug!(surface = %self.content.label, url = %url, "Content navigation"),
            Err(e) => tracing::debug!(
                surface = %self.content.label,
                error = %e,
                "Dropped navigation for stale content surface"
            ),
        }
    }

    /// Push the content surface's new location into the chrome.
    ///
    /// Best effort: a chrome that is gone or mid-teardown is ignored.
    pub(crate) fn forward_location(&mut self, host: &dyn Host, url: &str) {
        self.location = Some(url.to_string());

        let display = chrome::display_location(url);
        if self.displayed.as_deref() == Some(display.as_str()) {
            return;
        }

        match host.eval_script(&self.chrome.label, &chrome::location_script(&display)) {
            Ok(()) => self.displayed = Some(display),
            Err(e) => tracing::debug!(
                surface = %self.chrome.label,
                error = %e,
                "Location forward dropped"
            ),
        }
    }

    /// The chrome document (re)loaded and lost whatever text it showed.
    /// Push the last known content location again.
    pub(crate) fn chrome_loaded(&mut self, host: &dyn Host) {
        self.displayed = None;
        if let Some(url) = self.location.clone() {
            self.forward_location(host, &url);
        }
    }

    pub(crate) fn destroy(self, host: &dyn Host) {
        match host.destroy_window(&self.window) {
            Ok(()) => tracing::info!(window = %self.window, "Browser panel destroyed"),
            Err(e) => tracing::debug!(window = %self.window, error = %e, "Panel window already gone"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_surface::testing::{FakeHost, HostCall};
    use scout_surface::{PartitionPurpose, PartitionRegistry};
    use std::sync::Arc;

    fn build(host: &Arc<FakeHost>) -> Result<BrowserPanel> {
        let registry = PartitionRegistry::default();
        let partition = registry.partition_for(PartitionPurpose::TargetSite);
        let factory = SurfaceFactory::new(host.clone(), registry);
        BrowserPanel::build(host.as_ref(), &factory, &partition, &PanelOptions::default())
    }

    #[test]
    fn test_build_composes_chrome_above_content() {
        let host = Arc::new(FakeHost::new());
        let panel = build(&host).unwrap();

        let window = host.window(labels::PANEL_WINDOW).unwrap();
        assert!(!window.visible);
        assert_eq!(
            window.surfaces,
            vec![labels::PANEL_CHROME.to_string(), labels::PANEL_CONTENT.to_string()]
        );

        let chrome = host.surface(labels::PANEL_CHROME).unwrap();
        assert_eq!(chrome.spec.isolation, Isolation::Privileged);
        assert_eq!(chrome.spec.partition, None);
        assert_eq!(
            chrome.spec.content,
            SurfaceContent::Local(CHROME_DOCUMENT.to_string())
        );

        let content = host.surface(labels::PANEL_CONTENT).unwrap();
        assert_eq!(content.spec.isolation, Isolation::Sandboxed);
        assert!(content.spec.partition.is_some());

        assert_eq!(panel.chrome_bounds(), Bounds::new(0.0, 0.0, 1100.0, 48.0));
        assert_eq!(panel.content_bounds(), Bounds::new(0.0, 48.0, 1100.0, 772.0));
    }

    #[test]
    fn test_failed_content_surface_destroys_window() {
        let host = Arc::new(FakeHost::new());
        host.fail_surface(labels::PANEL_CONTENT);

        assert!(matches!(build(&host), Err(PanelError::Allocation { .. })));
        assert_eq!(host.live_window_count(), 0);
    }

    #[test]
    fn test_forward_location_dedupes() {
        let host = Arc::new(FakeHost::new());
        let mut panel = build(&host).unwrap();

        panel.forward_location(host.as_ref(), "https://example.com/jobs/42?ref=feed");
        panel.forward_location(host.as_ref(), "https://example.com/jobs/42#apply");

        assert_eq!(panel.displayed_location(), Some("example.com/jobs/42"));
        assert_eq!(panel.location(), Some("https://example.com/jobs/42#apply"));
        let evals = host.count_calls(|c| matches!(c, HostCall::Eval { .. }));
        assert_eq!(evals, 1);
    }

    #[test]
    fn test_chrome_reload_repushes_location() {
        let host = Arc::new(FakeHost::new());
        let mut panel = build(&host).unwrap();

        // Pushed before the chrome document was ready to receive it
        panel.forward_location(host.as_ref(), "https://www.linkedin.com/feed/");
        panel.chrome_loaded(host.as_ref());
        panel.forward_location(host.as_ref(), "https://www.linkedin.com/feed/");

        let evals = host.count_calls(|c| matches!(c, HostCall::Eval { .. }));
        assert_eq!(evals, 2);
        assert_eq!(
            host.surface(labels::PANEL_CHROME).unwrap().scripts.last(),
            Some(&chrome::location_script("www.linkedin.com/feed/"))
        );
    }

    #[test]
    fn test_chrome_load_without_location_pushes_nothing() {
        let host = Arc::new(FakeHost::new());
        let mut panel = build(&host).unwrap();

        panel.chrome_loaded(host.as_ref());
        assert_eq!(host.count_calls(|c| matches!(c, HostCall::Eval { .. })), 0);
    }

    #[test]
    fn test_forward_to_destroyed_chrome_is_swallowed() {
        let host = Arc::new(FakeHost::new());
        let mut panel = build(&host).unwrap();
        host.destroy_externally(labels::PANEL_WINDOW);

        panel.forward_location(host.as_ref(), "https://example.com/a");
        assert_eq!(panel.displayed_location(), None);
    }
}
