//! Tauri-backed windowing host
//!
//! Windows are native Tauri windows; surfaces are child webviews. Every
//! callback Tauri fires on the UI thread is turned into a `HostEvent` and
//! pushed onto the controller's channel, never handled in place.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use tauri::webview::{NewWindowResponse, PageLoadEvent, WebviewBuilder};
use tauri::window::WindowBuilder;
use tauri::{AppHandle, LogicalPosition, LogicalSize, Manager, WebviewUrl, WindowEvent};
use url::Url;

use scout_core::{
    Bounds, ContentSize, Host, HostEvent, HostEventSender, Isolation, NavigationPolicy,
    PartitionHandle, SurfaceContent, SurfaceError, SurfaceSignal, SurfaceSpec, WindowSpec,
    SANDBOX_BRIDGE_SCRIPT,
};

type HostResult<T> = std::result::Result<T, SurfaceError>;

pub struct TauriHost {
    app: AppHandle,
    events: HostEventSender,
    partitions_dir: PathBuf,
    /// Partition each composed surface is bound to
    bindings: Mutex<HashMap<String, PartitionHandle>>,
}

impl TauriHost {
    pub fn new(app: AppHandle, events: HostEventSender) -> tauri::Result<Self> {
        let partitions_dir = app.path().app_data_dir()?.join("webview-partitions");
        Ok(Self {
            app,
            events,
            partitions_dir,
            bindings: Mutex::new(HashMap::new()),
        })
    }

    fn partition_dir(&self, partition: &PartitionHandle) -> PathBuf {
        self.partitions_dir.join(partition.storage_key())
    }

    fn window(&self, label: &str) -> HostResult<tauri::Window> {
        self.app
            .get_window(label)
            .ok_or_else(|| SurfaceError::StaleHandle(label.to_string()))
    }

    fn webview(&self, label: &str) -> HostResult<tauri::Webview> {
        self.app
            .get_webview(label)
            .ok_or_else(|| SurfaceError::StaleHandle(label.to_string()))
    }

    fn webview_url(content: &SurfaceContent) -> HostResult<WebviewUrl> {
        match content {
            SurfaceContent::Local(path) => Ok(WebviewUrl::App(path.into())),
            SurfaceContent::External(url) => Ok(WebviewUrl::External(url.clone())),
            SurfaceContent::Blank => "about:blank"
                .parse::<Url>()
                .map(WebviewUrl::External)
                .map_err(|e| SurfaceError::InvalidUrl(e.to_string())),
        }
    }

    fn send(events: &HostEventSender, event: HostEvent) {
        if events.send(event).is_err() {
            tracing::debug!("Host event dropped; event loop stopped");
        }
    }
}

fn logical_size(window: &tauri::Window, size: tauri::PhysicalSize<u32>) -> ContentSize {
    let scale = window.scale_factor().unwrap_or(1.0);
    let logical = size.to_logical::<f64>(scale);
    ContentSize::new(logical.width, logical.height)
}

fn host_error(e: tauri::Error) -> SurfaceError {
    SurfaceError::Operation(e.to_string())
}

impl Host for TauriHost {
    fn create_window(&self, spec: &WindowSpec) -> HostResult<()> {
        if self.app.get_window(&spec.label).is_some() {
            return Err(SurfaceError::Operation(format!(
                "window already exists: {}",
                spec.label
            )));
        }

        let mut builder = WindowBuilder::new(&self.app, &spec.label)
            .title(&spec.title)
            .inner_size(spec.size.width, spec.size.height)
            .visible(spec.visible)
            .resizable(spec.resizable)
            .skip_taskbar(spec.skip_taskbar);
        if let Some(min) = spec.min_size {
            builder = builder.min_inner_size(min.width, min.height);
        }

        let window = builder
            .build()
            .map_err(|e| SurfaceError::allocation(&spec.label, e))?;

        let label = spec.label.clone();
        let events = self.events.clone();
        let observed = window.clone();
        window.on_window_event(move |event| match event {
            WindowEvent::Resized(size) => Self::send(
                &events,
                HostEvent::Resized {
                    window: label.clone(),
                    size: logical_size(&observed, *size),
                },
            ),
            WindowEvent::CloseRequested { api, .. } => {
                // Host-managed windows are only ever torn down explicitly
                api.prevent_close();
                Self::send(
                    &events,
                    HostEvent::CloseRequested {
                        window: label.clone(),
                    },
                );
            }
            WindowEvent::Destroyed => Self::send(
                &events,
                HostEvent::WindowDestroyed {
                    window: label.clone(),
                },
            ),
            _ => {}
        });

        tracing::debug!(window = %spec.label, visible = spec.visible, "Window created");
        Ok(())
    }

    fn compose_surface(&self, window: &str, spec: &SurfaceSpec, bounds: Bounds) -> HostResult<()> {
        let parent = self.window(window)?;
        let url = Self::webview_url(&spec.content)?;
        let policy = NavigationPolicy::for_content(&spec.content);
        let sandboxed = spec.isolation == Isolation::Sandboxed;

        let mut builder = WebviewBuilder::new(&spec.label, url).transparent(false);
        if let Some(partition) = &spec.partition {
            builder = builder.data_directory(self.partition_dir(partition));
        }
        if sandboxed {
            builder = builder.initialization_script_for_all_frames(SANDBOX_BRIDGE_SCRIPT);
        }

        let label = spec.label.clone();
        let events = self.events.clone();
        builder = builder.on_navigation(move |url| {
            if SurfaceSignal::is_signal(url) {
                match SurfaceSignal::from_url(url).filter(|_| sandboxed) {
                    Some(signal) => Self::send(&events, signal.into_event(label.as_str())),
                    None => tracing::debug!(surface = %label, url = %url, "Ignoring signal"),
                }
                return false;
            }

            let allowed = policy.allows(url);
            if !allowed {
                tracing::warn!(surface = %label, url = %url, "Navigation blocked");
            }
            allowed
        });

        let label = spec.label.clone();
        let events = self.events.clone();
        builder = builder.on_page_load(move |_webview, payload| {
            if matches!(payload.event(), PageLoadEvent::Finished) {
                Self::send(
                    &events,
                    HostEvent::Navigated {
                        surface: label.clone(),
                        url: payload.url().to_string(),
                    },
                );
            }
        });

        // Catches single-page navigations that bypass the history wrappers
        let label = spec.label.clone();
        let events = self.events.clone();
        builder = builder.on_document_title_changed(move |webview, _title| {
            if let Ok(url) = webview.url() {
                Self::send(
                    &events,
                    HostEvent::Navigated {
                        surface: label.clone(),
                        url: url.to_string(),
                    },
                );
            }
        });

        // Popups stay inside the shared session: load them in place
        let label = spec.label.clone();
        let app = self.app.clone();
        let popup_policy = NavigationPolicy::for_content(&spec.content);
        builder = builder.on_new_window(move |url, _features| {
            if sandboxed && popup_policy.allows(&url) {
                if let Some(webview) = app.get_webview(&label) {
                    let _ = webview.navigate(url);
                }
            } else {
                tracing::debug!(surface = %label, url = %url, "New window denied");
            }
            NewWindowResponse::Deny
        });

        let webview = parent
            .add_child(
                builder,
                LogicalPosition::new(bounds.x, bounds.y),
                LogicalSize::new(bounds.width, bounds.height),
            )
            .map_err(|e| SurfaceError::allocation(&spec.label, e))?;

        if let Some(partition) = &spec.partition {
            self.bindings
                .lock()
                .insert(spec.label.clone(), partition.clone());
        }

        tracing::debug!(
            window = %window,
            surface = %webview.label(),
            isolation = %spec.isolation,
            "Surface composed"
        );
        Ok(())
    }

    fn content_size(&self, window: &str) -> HostResult<ContentSize> {
        let window = self.window(window)?;
        let size = window.inner_size().map_err(host_error)?;
        Ok(logical_size(&window, size))
    }

    fn set_surface_bounds(&self, surface: &str, bounds: Bounds) -> HostResult<()> {
        let webview = self.webview(surface)?;
        webview
            .set_position(LogicalPosition::new(bounds.x, bounds.y))
            .map_err(host_error)?;
        webview
            .set_size(LogicalSize::new(bounds.width, bounds.height))
            .map_err(host_error)?;
        Ok(())
    }

    fn show_window(&self, window: &str) -> HostResult<()> {
        self.window(window)?.show().map_err(host_error)
    }

    fn hide_window(&self, window: &str) -> HostResult<()> {
        self.window(window)?.hide().map_err(host_error)
    }

    fn focus_window(&self, window: &str) -> HostResult<()> {
        self.window(window)?.set_focus().map_err(host_error)
    }

    fn destroy_window(&self, window: &str) -> HostResult<()> {
        let target = self.window(window)?;
        let children: Vec<String> = target
            .webviews()
            .iter()
            .map(|w| w.label().to_string())
            .collect();
        target.destroy().map_err(host_error)?;

        let mut bindings = self.bindings.lock();
        for label in children {
            bindings.remove(&label);
        }
        Ok(())
    }

    fn navigate(&self, surface: &str, url: &Url) -> HostResult<()> {
        self.webview(surface)?
            .navigate(url.clone())
            .map_err(host_error)
    }

    fn eval_script(&self, surface: &str, script: &str) -> HostResult<()> {
        self.webview(surface)?.eval(script).map_err(host_error)
    }

    fn provision_partition(&self, partition: &PartitionHandle) -> HostResult<()> {
        let dir = self.partition_dir(partition);
        std::fs::create_dir_all(&dir)
            .map_err(|e| SurfaceError::allocation(partition.name(), e))?;
        tracing::debug!(partition = %partition, dir = %dir.display(), "Partition storage ready");
        Ok(())
    }

    fn clear_partition(&self, partition: &PartitionHandle) -> HostResult<()> {
        let clear_error = |reason: String| SurfaceError::PartitionClear {
            partition: partition.name().to_string(),
            reason,
        };

        let bound: Vec<String> = self
            .bindings
            .lock()
            .iter()
            .filter(|(_, p)| *p == partition)
            .map(|(label, _)| label.clone())
            .collect();

        // Any live webview on the partition clears the whole store
        if let Some(webview) = bound.iter().find_map(|label| self.app.get_webview(label)) {
            return webview
                .clear_all_browsing_data()
                .map_err(|e| clear_error(e.to_string()));
        }

        let dir = self.partition_dir(partition);
        match std::fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(clear_error(e.to_string())),
        }
    }

    fn window_alive(&self, window: &str) -> bool {
        self.app.get_window(window).is_some()
    }

    fn surface_alive(&self, surface: &str) -> bool {
        self.app.get_webview(surface).is_some()
    }
}
