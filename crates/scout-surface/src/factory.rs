//! Surface factory
//!
//! Creates surfaces bound to a partition under an isolation policy and
//! composes them into a window.

use std::sync::Arc;

use crate::bounds::Bounds;
use crate::error::SurfaceError;
use crate::host::Host;
use crate::partition::{PartitionHandle, PartitionRegistry};
use crate::surface::{Isolation, Surface, SurfaceContent, SurfaceSpec};
use crate::Result;

pub struct SurfaceFactory {
    host: Arc<dyn Host>,
    registry: PartitionRegistry,
}

impl SurfaceFactory {
    pub fn new(host: Arc<dyn Host>, registry: PartitionRegistry) -> Self {
        Self { host, registry }
    }

    pub fn registry(&self) -> &PartitionRegistry {
        &self.registry
    }

    /// Create a surface inside `window` at `bounds`.
    ///
    /// Privileged surfaces may only host bundled documents. Any failure to
    /// allocate is reported as [`SurfaceError::Allocation`].
    pub fn create_surface(
        &self,
        window: &str,
        label: impl Into<String>,
        isolation: Isolation,
        partition: Option<&PartitionHandle>,
        content: SurfaceContent,
        bounds: Bounds,
    ) -> Result<Surface> {
        let label = label.into();

        if isolation == Isolation::Privileged && matches!(content, SurfaceContent::External(_)) {
            return Err(SurfaceError::allocation(
                label,
                "privileged surfaces may only host bundled documents",
            ));
        }

        if let Some(partition) = partition {
            if self.registry.mark_bound(partition) {
                if let Err(e) = self.host.provision_partition(partition) {
                    self.registry.forget(partition);
                    return Err(SurfaceError::allocation(label, e));
                }
            }
        }

        let spec = SurfaceSpec {
            label,
            isolation,
            partition: partition.cloned(),
            content,
        };

        self.host
            .compose_surface(window, &spec, bounds)
            .map_err(|e| match e {
                SurfaceError::Allocation { .. } => e,
                other => SurfaceError::allocation(spec.label.clone(), other),
            })?;

        tracing::debug!(
            window = %window,
            surface = %spec.label,
            isolation = %spec.isolation,
            partition = ?spec.partition.as_ref().map(|p| p.name()),
            "Composed surface"
        );

        Ok(Surface::from_spec(&spec, bounds))
    }
}
