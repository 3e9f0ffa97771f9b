//! The host environment seam
//!
//! A `Host` creates top-level windows, composes independently rendered
//! surfaces into them at pixel rectangles, and owns named storage
//! partitions. Windows and surfaces are addressed by label.
//!
//! Operations on a window or surface that no longer exists return
//! [`SurfaceError::StaleHandle`](crate::SurfaceError::StaleHandle).
//! Navigation, script evaluation and storage clearing are fire-and-forget:
//! returning `Ok` means the request was handed to the host, not that a page
//! finished loading.

use url::Url;

use crate::bounds::{Bounds, ContentSize};
use crate::partition::PartitionHandle;
use crate::surface::{SurfaceSpec, WindowSpec};
use crate::Result;

pub trait Host: Send + Sync + 'static {
    fn create_window(&self, spec: &WindowSpec) -> Result<()>;

    /// Compose a surface into `window`, above any surfaces added earlier.
    fn compose_surface(&self, window: &str, spec: &SurfaceSpec, bounds: Bounds) -> Result<()>;

    fn content_size(&self, window: &str) -> Result<ContentSize>;

    fn set_surface_bounds(&self, surface: &str, bounds: Bounds) -> Result<()>;

    fn show_window(&self, window: &str) -> Result<()>;

    fn hide_window(&self, window: &str) -> Result<()>;

    fn focus_window(&self, window: &str) -> Result<()>;

    /// Destroy a window together with every surface composed into it.
    fn destroy_window(&self, window: &str) -> Result<()>;

    fn navigate(&self, surface: &str, url: &Url) -> Result<()>;

    fn eval_script(&self, surface: &str, script: &str) -> Result<()>;

    /// Prepare backing storage for a partition before its first surface binds.
    fn provision_partition(&self, partition: &PartitionHandle) -> Result<()>;

    /// Wipe cookies, storage and cache of a partition.
    fn clear_partition(&self, partition: &PartitionHandle) -> Result<()>;

    fn window_alive(&self, window: &str) -> bool;

    fn surface_alive(&self, surface: &str) -> bool;
}
