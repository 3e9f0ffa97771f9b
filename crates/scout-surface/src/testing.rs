//! In-memory host for tests
//!
//! Records every call, keeps torn-down windows and surfaces around for
//! inspection, and queues the events a real host would emit.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use url::Url;

use crate::bounds::{Bounds, ContentSize};
use crate::error::SurfaceError;
use crate::events::HostEvent;
use crate::host::Host;
use crate::partition::PartitionHandle;
use crate::surface::{SurfaceSpec, WindowSpec};
use crate::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    CreateWindow(String),
    ComposeSurface { window: String, surface: String },
    SetBounds { surface: String, bounds: Bounds },
    ShowWindow(String),
    HideWindow(String),
    FocusWindow(String),
    DestroyWindow(String),
    Navigate { surface: String, url: String },
    Eval { surface: String, script: String },
    ProvisionPartition(String),
    ClearPartition(String),
}

#[derive(Debug, Clone)]
pub struct FakeWindow {
    pub spec: WindowSpec,
    pub size: ContentSize,
    pub visible: bool,
    pub alive: bool,
    /// Surface labels in stacking order
    pub surfaces: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FakeSurface {
    pub spec: SurfaceSpec,
    pub window: String,
    pub bounds: Bounds,
    /// Currently loaded location
    pub url: String,
    pub scripts: Vec<String>,
    pub alive: bool,
}

#[derive(Default)]
struct FakeState {
    windows: HashMap<String, FakeWindow>,
    surfaces: HashMap<String, FakeSurface>,
    calls: Vec<HostCall>,
    events: Vec<HostEvent>,
    failing_windows: HashSet<String>,
    failing_surfaces: HashSet<String>,
    failing_shows: HashSet<String>,
    fail_clear: bool,
}

#[derive(Default)]
pub struct FakeHost {
    state: Mutex<FakeState>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make creation of the named window fail
    pub fn fail_window(&self, label: &str) {
        self.state.lock().failing_windows.insert(label.to_string());
    }

    /// Make composition of the named surface fail
    pub fn fail_surface(&self, label: &str) {
        self.state.lock().failing_surfaces.insert(label.to_string());
    }

    /// Make showing the named window fail while it stays alive
    pub fn fail_show(&self, label: &str) {
        self.state.lock().failing_shows.insert(label.to_string());
    }

    pub fn heal(&self) {
        let mut state = self.state.lock();
        state.failing_windows.clear();
        state.failing_surfaces.clear();
        state.failing_shows.clear();
        state.fail_clear = false;
    }

    pub fn fail_partition_clear(&self, fail: bool) {
        self.state.lock().fail_clear = fail;
    }

    /// Resize a window as a user drag would, returning the event the host
    /// would deliver.
    pub fn resize(&self, window: &str, size: ContentSize) -> HostEvent {
        if let Some(w) = self.state.lock().windows.get_mut(window) {
            w.size = size;
        }
        HostEvent::Resized {
            window: window.to_string(),
            size,
        }
    }

    /// Tear a window down behind the application's back
    pub fn destroy_externally(&self, window: &str) -> HostEvent {
        let mut state = self.state.lock();
        Self::tear_down(&mut state, window);
        HostEvent::WindowDestroyed {
            window: window.to_string(),
        }
    }

    pub fn window(&self, label: &str) -> Option<FakeWindow> {
        self.state.lock().windows.get(label).cloned()
    }

    pub fn surface(&self, label: &str) -> Option<FakeSurface> {
        self.state.lock().surfaces.get(label).cloned()
    }

    pub fn live_window_count(&self) -> usize {
        self.state.lock().windows.values().filter(|w| w.alive).count()
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.state.lock().calls.clone()
    }

    pub fn count_calls(&self, predicate: impl Fn(&HostCall) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Drain events queued since the last call
    pub fn take_events(&self) -> Vec<HostEvent> {
        std::mem::take(&mut self.state.lock().events)
    }

    fn tear_down(state: &mut FakeState, window: &str) {
        let Some(w) = state.windows.get_mut(window) else {
            return;
        };
        w.alive = false;
        w.visible = false;
        let labels = w.surfaces.clone();
        for label in labels {
            if let Some(s) = state.surfaces.get_mut(&label) {
                s.alive = false;
            }
        }
    }

    fn live_window<'a>(state: &'a mut FakeState, label: &str) -> Result<&'a mut FakeWindow> {
        state
            .windows
            .get_mut(label)
            .filter(|w| w.alive)
            .ok_or_else(|| SurfaceError::StaleHandle(label.to_string()))
    }

    fn live_surface<'a>(state: &'a mut FakeState, label: &str) -> Result<&'a mut FakeSurface> {
        state
            .surfaces
            .get_mut(label)
            .filter(|s| s.alive)
            .ok_or_else(|| SurfaceError::StaleHandle(label.to_string()))
    }
}

impl Host for FakeHost {
    fn create_window(&self, spec: &WindowSpec) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(HostCall::CreateWindow(spec.label.clone()));

        if state.failing_windows.contains(&spec.label) {
            return Err(SurfaceError::allocation(&spec.label, "injected failure"));
        }
        if state.windows.get(&spec.label).is_some_and(|w| w.alive) {
            return Err(SurfaceError::Operation(format!(
                "window already exists: {}",
                spec.label
            )));
        }

        state.windows.insert(
            spec.label.clone(),
            FakeWindow {
                spec: spec.clone(),
                size: spec.size,
                visible: spec.visible,
                alive: true,
                surfaces: Vec::new(),
            },
        );
        Ok(())
    }

    fn compose_surface(&self, window: &str, spec: &SurfaceSpec, bounds: Bounds) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(HostCall::ComposeSurface {
            window: window.to_string(),
            surface: spec.label.clone(),
        });

        if state.failing_surfaces.contains(&spec.label) {
            return Err(SurfaceError::allocation(&spec.label, "injected failure"));
        }
        Self::live_window(&mut state, window)?
            .surfaces
            .push(spec.label.clone());

        let url = spec.content.initial_url();
        state.surfaces.insert(
            spec.label.clone(),
            FakeSurface {
                spec: spec.clone(),
                window: window.to_string(),
                bounds,
                url: url.clone(),
                scripts: Vec::new(),
                alive: true,
            },
        );
        state.events.push(HostEvent::Navigated {
            surface: spec.label.clone(),
            url,
        });
        Ok(())
    }

    fn content_size(&self, window: &str) -> Result<ContentSize> {
        let mut state = self.state.lock();
        Ok(Self::live_window(&mut state, window)?.size)
    }

    fn set_surface_bounds(&self, surface: &str, bounds: Bounds) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(HostCall::SetBounds {
            surface: surface.to_string(),
            bounds,
        });
        Self::live_surface(&mut state, surface)?.bounds = bounds;
        Ok(())
    }

    fn show_window(&self, window: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(HostCall::ShowWindow(window.to_string()));
        if state.failing_shows.contains(window) {
            return Err(SurfaceError::Operation(format!("cannot show {window}")));
        }
        Self::live_window(&mut state, window)?.visible = true;
        Ok(())
    }

    fn hide_window(&self, window: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(HostCall::HideWindow(window.to_string()));
        Self::live_window(&mut state, window)?.visible = false;
        Ok(())
    }

    fn focus_window(&self, window: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(HostCall::FocusWindow(window.to_string()));
        Self::live_window(&mut state, window)?;
        Ok(())
    }

    fn destroy_window(&self, window: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(HostCall::DestroyWindow(window.to_string()));
        Self::live_window(&mut state, window)?;
        Self::tear_down(&mut state, window);
        Ok(())
    }

    fn navigate(&self, surface: &str, url: &Url) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(HostCall::Navigate {
            surface: surface.to_string(),
            url: url.to_string(),
        });
        Self::live_surface(&mut state, surface)?.url = url.to_string();
        state.events.push(HostEvent::Navigated {
            surface: surface.to_string(),
            url: url.to_string(),
        });
        Ok(())
    }

    fn eval_script(&self, surface: &str, script: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(HostCall::Eval {
            surface: surface.to_string(),
            script: script.to_string(),
        });
        Self::live_surface(&mut state, surface)?
            .scripts
            .push(script.to_string());
        Ok(())
    }

    fn provision_partition(&self, partition: &PartitionHandle) -> Result<()> {
        self.state
            .lock()
            .calls
            .push(HostCall::ProvisionPartition(partition.name().to_string()));
        Ok(())
    }

    fn clear_partition(&self, partition: &PartitionHandle) -> Result<()> {
        let mut state = self.state.lock();
        state
            .calls
            .push(HostCall::ClearPartition(partition.name().to_string()));
        if state.fail_clear {
            return Err(SurfaceError::PartitionClear {
                partition: partition.name().to_string(),
                reason: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn window_alive(&self, window: &str) -> bool {
        self.state
            .lock()
            .windows
            .get(window)
            .is_some_and(|w| w.alive)
    }

    fn surface_alive(&self, surface: &str) -> bool {
        self.state
            .lock()
            .surfaces
            .get(surface)
            .is_some_and(|s| s.alive)
    }
}
