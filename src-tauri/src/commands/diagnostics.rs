use tauri::Webview;

use super::CommandResult;

#[tauri::command]
pub fn frontend_ready(webview: Webview) -> CommandResult<()> {
    tracing::info!(webview = %webview.label(), "Frontend ready");
    CommandResult::ok(())
}
