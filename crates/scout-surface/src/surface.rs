//! Surface and window descriptions

use serde::{Deserialize, Serialize};
use url::Url;

use crate::bounds::{Bounds, ContentSize};
use crate::partition::PartitionHandle;

/// What a surface's scripts may reach in the host process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Isolation {
    /// Trusted local UI; may message the host
    Privileged,
    /// Untrusted web content; no host capabilities
    Sandboxed,
}

impl Isolation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Isolation::Privileged => "privileged",
            Isolation::Sandboxed => "sandboxed",
        }
    }

    pub fn allows_host_messages(&self) -> bool {
        matches!(self, Isolation::Privileged)
    }
}

impl std::fmt::Display for Isolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Initial document of a surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SurfaceContent {
    /// A document bundled with the application, by relative path
    Local(String),
    /// A remote page
    External(Url),
    Blank,
}

impl SurfaceContent {
    /// URL string as a host would report it after loading
    pub fn initial_url(&self) -> String {
        match self {
            SurfaceContent::Local(path) => format!("local://app/{}", path.trim_start_matches('/')),
            SurfaceContent::External(url) => url.to_string(),
            SurfaceContent::Blank => "about:blank".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSpec {
    pub label: String,
    pub isolation: Isolation,
    pub partition: Option<PartitionHandle>,
    pub content: SurfaceContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub label: String,
    pub title: String,
    /// Initial content-area size
    pub size: ContentSize,
    pub visible: bool,
    pub resizable: bool,
    pub skip_taskbar: bool,
    pub min_size: Option<ContentSize>,
}

impl WindowSpec {
    /// A hidden, resizable window
    pub fn new(label: impl Into<String>, title: impl Into<String>, size: ContentSize) -> Self {
        Self {
            label: label.into(),
            title: title.into(),
            size,
            visible: false,
            resizable: true,
            skip_taskbar: false,
            min_size: None,
        }
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn skip_taskbar(mut self, skip: bool) -> Self {
        self.skip_taskbar = skip;
        self
    }

    pub fn min_size(mut self, size: ContentSize) -> Self {
        self.min_size = Some(size);
        self
    }
}

/// A surface composed into a window, owned by whatever composed it
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub label: String,
    pub isolation: Isolation,
    pub partition: Option<PartitionHandle>,
    pub bounds: Bounds,
}

impl Surface {
    pub fn from_spec(spec: &SurfaceSpec, bounds: Bounds) -> Self {
        Self {
            label: spec.label.clone(),
            isolation: spec.isolation,
            partition: spec.partition.clone(),
            bounds,
        }
    }

    pub fn handle(&self) -> SurfaceHandle {
        SurfaceHandle {
            label: self.label.clone(),
            partition: self.partition.clone(),
        }
    }
}

/// Cheap, cloneable reference handed to collaborators that drive a surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceHandle {
    pub label: String,
    pub partition: Option<PartitionHandle>,
}

/// Which navigations a surface may perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationPolicy {
    /// Pinned to one bundled document
    FixedDocument(String),
    /// Ordinary web content
    Web,
}

impl NavigationPolicy {
    pub fn for_content(content: &SurfaceContent) -> Self {
        match content {
            SurfaceContent::Local(path) => {
                NavigationPolicy::FixedDocument(path.trim_start_matches('/').to_string())
            }
            _ => NavigationPolicy::Web,
        }
    }

    pub fn allows(&self, url: &Url) -> bool {
        match self {
            NavigationPolicy::FixedDocument(document) => {
                is_local_origin(url) && url.path().trim_start_matches('/') == document
            }
            NavigationPolicy::Web => {
                matches!(url.scheme(), "http" | "https") || url.as_str() == "about:blank"
            }
        }
    }
}

/// Origins under which the application serves its bundled documents
fn is_local_origin(url: &Url) -> bool {
    match url.scheme() {
        "tauri" | "local" => true,
        "http" | "https" => matches!(url.host_str(), Some("tauri.localhost" | "localhost")),
        _ => false,
    }
}
