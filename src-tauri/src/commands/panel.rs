//! Browser panel commands
use serde::{Deserialize, Serialize};
use tauri::{AppHandle, Manager, State, Webview};

use scout_core::{ChromeMessage, HostEvent};

use super::CommandResult;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct PanelStatus {
    pub state: String,
    pub partition: String,
    pub location: Option<String>,
    pub enrichment_surface: Option<String>,
}

// Panel operations run off the UI thread: they take the controller lock and
// wait on window calls the UI thread services.

#[tauri::command]
pub async fn panel_open(app: AppHandle, url: Option<String>) -> CommandResult<()> {
    let scout = app.state::<AppState>().scout();
    scout.open_panel(url.as_deref()).into()
}

#[tauri::command]
pub async fn panel_show(app: AppHandle) -> CommandResult<()> {
    app.state::<AppState>().scout().show_panel().into()
}

#[tauri::command]
pub async fn panel_hide(app: AppHandle) -> CommandResult<()> {
    app.state::<AppState>().scout().hide_panel();
    CommandResult::ok(())
}

#[tauri::command]
pub async fn panel_logout(app: AppHandle) -> CommandResult<()> {
    app.state::<AppState>().scout().logout().into()
}

#[tauri::command]
pub async fn panel_status(app: AppHandle) -> CommandResult<PanelStatus> {
    let scout = app.state::<AppState>().scout();
    let controller = scout.controller();
    CommandResult::ok(PanelStatus {
        state: controller.state().to_string(),
        partition: scout.config().partition_name.clone(),
        location: controller.content_location(),
        enrichment_surface: controller.enrichment_surface().map(|s| s.label),
    })
}

/// Message from the panel chrome. The sender's label travels with it and
/// the controller ignores messages from anything but the chrome surface.
#[tauri::command]
pub fn panel_chrome_message(
    webview: Webview,
    state: State<AppState>,
    message: String,
) -> CommandResult<()> {
    let message = match message.parse::<ChromeMessage>() {
        Ok(m) => m,
        Err(e) => return CommandResult::err(e),
    };

    state.dispatch(HostEvent::ChromeMessage {
        surface: webview.label().to_string(),
        message,
    });
    CommandResult::ok(())
}
