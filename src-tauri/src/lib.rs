//! Scout - Tauri Application
//!
//! Hosts the main UI, the hidden enrichment viewport and the on-demand
//! LinkedIn browser panel. Rust owns all window state.

mod commands;
mod host;
mod state;

use std::sync::Arc;

use host::TauriHost;
use scout_core::{Config, Scout};
use state::AppState;
use tauri::webview::WebviewBuilder;
use tauri::window::WindowBuilder;
use tauri::{LogicalPosition, LogicalSize, Manager, WebviewUrl, WindowEvent};

const MAIN_WINDOW: &str = "main";

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging
    scout_core::init_logging();

    tauri::Builder::default()
        .setup(|app| {
            let runtime = tauri::async_runtime::handle().inner().clone();
            let (events, receiver) = scout_core::event_channel();

            // Enrichment host comes up here; failure aborts startup
            let host = Arc::new(TauriHost::new(app.handle().clone(), events.clone())?);
            let config = Config::new(app.path().app_local_data_dir()?);
            let scout = Scout::start(host, config, runtime.clone())?;
            scout_core::spawn_event_loop(&runtime, scout.controller().clone(), receiver);

            let state = AppState::new(scout, events);
            let scout = state.scout();
            app.manage(state);

            let window = WindowBuilder::new(app, MAIN_WINDOW)
                .title("Scout")
                .inner_size(1280.0, 800.0)
                .min_inner_size(800.0, 600.0)
                .center()
                .build()?;

            // The hidden host windows would otherwise keep the app alive
            let app_handle = app.handle().clone();
            window.on_window_event(move |event| {
                if let WindowEvent::Destroyed = event {
                    let scout = Arc::clone(&scout);
                    let app_handle = app_handle.clone();
                    tauri::async_runtime::spawn(async move {
                        scout.shutdown();
                        app_handle.exit(0);
                    });
                }
            });

            let ui_webview = WebviewBuilder::new(
                commands::ui_webview_label(MAIN_WINDOW),
                WebviewUrl::App("index.html".into()),
            )
            .auto_resize()
            .enable_clipboard_access();

            let ui_webview = window.add_child(
                ui_webview,
                LogicalPosition::new(0.0, 0.0),
                LogicalSize::new(1280.0, 800.0),
            )?;
            let _ = ui_webview.show();

            tracing::info!("Scout started");

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Diagnostics
            commands::diagnostics::frontend_ready,
            // Panel commands
            commands::panel::panel_open,
            commands::panel::panel_show,
            commands::panel::panel_hide,
            commands::panel::panel_logout,
            commands::panel::panel_status,
            commands::panel::panel_chrome_message,
        ])
        .run(tauri::generate_context!())
        .expect("error while running Scout");
}
