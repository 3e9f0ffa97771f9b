//! Headless enrichment host
//!
//! The target site only renders content once it believes the page is on
//! screen, so background extraction needs a real, laid-out viewport. This
//! host is a window that is never shown, sized like a desktop browser, with
//! one sandboxed surface bound to the shared partition. It lives from
//! startup until shutdown.

use url::Url;

use scout_surface::{
    Bounds, BoundsSynchronizer, Host, Isolation, Layout, PartitionHandle, Surface, SurfaceContent,
    SurfaceFactory, SurfaceHandle, WindowSpec,
};

use crate::error::PanelError;
use crate::labels;
use crate::options::PanelOptions;
use crate::Result;

pub struct EnrichmentHost {
    window: String,
    surface: Surface,
    synchronizer: BoundsSynchronizer,
    location: Option<String>,
}

impl EnrichmentHost {
    /// Create the hidden window and its surface.
    ///
    /// Failure here is fatal for the application.
    pub fn create(
        host: &dyn Host,
        factory: &SurfaceFactory,
        partition: &PartitionHandle,
        options: &PanelOptions,
    ) -> Result<Self> {
        let window = labels::ENRICHMENT_WINDOW.to_string();
        let viewport = options.enrichment_viewport;

        let spec = WindowSpec::new(&window, "Scout enrichment", viewport)
            .resizable(false)
            .skip_taskbar(true);
        host.create_window(&spec)
            .map_err(|e| PanelError::allocation("enrichment window", e))?;

        let synchronizer = BoundsSynchronizer::new(Layout::Fill);
        let initial = synchronizer
            .layout()
            .compute(viewport)
            .first()
            .copied()
            .unwrap_or_default();

        let surface = match factory.create_surface(
            &window,
            labels::ENRICHMENT_SURFACE,
            Isolation::Sandboxed,
            Some(partition),
            SurfaceContent::Blank,
            initial,
        ) {
            Ok(surface) => surface,
            Err(e) => {
                let _ = host.destroy_window(&window);
                return Err(PanelError::allocation("enrichment surface", e));
            }
        };

        let mut enrichment = Self {
            window,
            surface,
            synchronizer,
            location: None,
        };
        enrichment.sync_bounds(host);

        tracing::info!(
            window = %enrichment.window,
            partition = %partition,
            width = viewport.width,
            height = viewport.height,
            "Enrichment host ready"
        );

        Ok(enrichment)
    }

    pub fn window_label(&self) -> &str {
        &self.window
    }

    /// Handle the enrichment task collaborator drives
    pub fn surface(&self) -> SurfaceHandle {
        self.surface.handle()
    }

    pub fn bounds(&self) -> Bounds {
        self.surface.bounds
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub(crate) fn record_location(&mut self, url: String) {
        self.location = Some(url);
    }

    pub fn navigate(&self, host: &dyn Host, url: &Url) -> scout_surface::Result<()> {
        host.navigate(&self.surface.label, url)?;
        tracing::debug!(surface = %self.surface.label, url = %url, "Enrichment navigation");
        Ok(())
    }

    pub(crate) fn sync_bounds(&mut self, host: &dyn Host) {
        if let Err(e) = self
            .synchronizer
            .sync(host, &self.window, &mut [&mut self.surface])
        {
            tracing::debug!(window = %self.window, error = %e, "Enrichment layout skipped");
        }
    }

    pub(crate) fn destroy(self, host: &dyn Host) {
        match host.destroy_window(&self.window) {
            Ok(()) => tracing::info!(window = %self.window, "Enrichment host destroyed"),
            Err(e) => tracing::debug!(window = %self.window, error = %e, "Enrichment host already gone"),
        }
    }
}
