//! Application state container
//!
//! Owns the resolved configuration and the panel controller for the
//! lifetime of the desktop shell.

use std::sync::Arc;
use tokio::runtime::Handle;

use scout_panel::PanelController;
use scout_storage::Database;
use scout_surface::{Host, PartitionRegistry, SurfaceHandle};

use crate::config::Config;
use crate::Result;

pub struct Scout {
    config: Config,
    controller: PanelController,
}

impl Scout {
    /// Open the settings store and bring up the enrichment host.
    pub fn start(host: Arc<dyn Host>, config: Config, runtime: Handle) -> Result<Self> {
        let db = Database::open(&config.database_path)?;
        Self::with_database(host, config, db, runtime)
    }

    pub fn with_database(
        host: Arc<dyn Host>,
        mut config: Config,
        db: Database,
        runtime: Handle,
    ) -> Result<Self> {
        config.apply_settings(&db)?;
        config.validate()?;

        let registry = PartitionRegistry::new(config.partition_name.clone());
        let controller = PanelController::start(host, registry, config.panel_options()?, runtime)?;

        tracing::info!(
            partition = %config.partition_name,
            database = %config.database_path.display(),
            "Scout started"
        );

        Ok(Self {
            config,
            controller,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn controller(&self) -> &PanelController {
        &self.controller
    }

    pub fn open_panel(&self, url: Option<&str>) -> Result<()> {
        Ok(self.controller.open(url)?)
    }

    pub fn show_panel(&self) -> Result<()> {
        Ok(self.controller.show()?)
    }

    pub fn hide_panel(&self) {
        self.controller.hide();
    }

    pub fn logout(&self) -> Result<()> {
        Ok(self.controller.logout()?)
    }

    pub fn enrichment_surface(&self) -> Option<SurfaceHandle> {
        self.controller.enrichment_surface()
    }

    pub fn shutdown(&self) {
        self.controller.shutdown();
        tracing::info!("Scout shut down");
    }
}
