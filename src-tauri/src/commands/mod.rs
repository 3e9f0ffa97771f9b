//! Tauri IPC Commands
//!
//! These commands bridge the main UI and the panel chrome to the Rust core.

use serde::{Deserialize, Serialize};

pub mod diagnostics;
pub mod panel;

pub fn ui_webview_label(window_label: &str) -> String {
    format!("ui-{window_label}")
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for CommandResult<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}
