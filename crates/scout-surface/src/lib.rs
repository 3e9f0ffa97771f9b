//! Scout Surface Model
//!
//! Leaf types for composing independently rendered web surfaces inside
//! host windows:
//! - Named session partitions shared between surfaces
//! - Surface creation with a privileged/sandboxed isolation policy
//! - Bounds layout for stacked surfaces
//! - The `Host` trait the windowing environment implements

mod bounds;
mod error;
mod events;
mod factory;
mod host;
mod partition;
mod signal;
mod surface;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use bounds::{Bounds, BoundsSynchronizer, ContentSize, Layout};
pub use error::SurfaceError;
pub use events::{ChromeMessage, HostEvent, ESCAPE_KEY};
pub use factory::SurfaceFactory;
pub use host::Host;
pub use partition::{PartitionHandle, PartitionPurpose, PartitionRegistry, DEFAULT_PARTITION};
pub use signal::{SurfaceSignal, SANDBOX_BRIDGE_SCRIPT, SIGNAL_SCHEME};
pub use surface::{
    Isolation, NavigationPolicy, Surface, SurfaceContent, SurfaceHandle, SurfaceSpec, WindowSpec,
};

pub type Result<T> = std::result::Result<T, SurfaceError>;
