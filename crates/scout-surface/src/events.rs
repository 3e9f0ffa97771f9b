//! Events delivered by the host environment

use serde::{Deserialize, Serialize};

use crate::bounds::ContentSize;

pub const ESCAPE_KEY: &str = "Escape";

/// Messages a privileged chrome surface may send to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChromeMessage {
    /// The dismiss control was clicked
    Dismiss,
    /// Escape was pressed while the chrome had focus
    Escape,
}

impl ChromeMessage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChromeMessage::Dismiss => "dismiss",
            ChromeMessage::Escape => "escape",
        }
    }
}

impl std::fmt::Display for ChromeMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ChromeMessage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dismiss" | "close" => Ok(ChromeMessage::Dismiss),
            "escape" => Ok(ChromeMessage::Escape),
            _ => Err(format!("Unknown chrome message: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A window's content area changed size
    Resized { window: String, size: ContentSize },
    /// A surface's location changed, including same-document navigations
    Navigated { surface: String, url: String },
    ChromeMessage {
        surface: String,
        message: ChromeMessage,
    },
    KeyDown { surface: String, key: String },
    /// The user asked the OS to close a window
    CloseRequested { window: String },
    /// The host tore a window down
    WindowDestroyed { window: String },
}

impl HostEvent {
    /// Label of the window or surface the event originated from
    pub fn label(&self) -> &str {
        match self {
            HostEvent::Resized { window, .. }
            | HostEvent::CloseRequested { window }
            | HostEvent::WindowDestroyed { window } => window,
            HostEvent::Navigated { surface, .. }
            | HostEvent::ChromeMessage { surface, .. }
            | HostEvent::KeyDown { surface, .. } => surface,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            HostEvent::Resized { .. } => "resized",
            HostEvent::Navigated { .. } => "navigated",
            HostEvent::ChromeMessage { .. } => "chrome-message",
            HostEvent::KeyDown { .. } => "key-down",
            HostEvent::CloseRequested { .. } => "close-requested",
            HostEvent::WindowDestroyed { .. } => "window-destroyed",
        }
    }
}
