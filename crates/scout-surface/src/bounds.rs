//! Bounds layout for surfaces stacked in a window
//!
//! Rectangles are logical pixels relative to the parent window's content
//! area. Layout is a pure function of the content-area size, so applying it
//! repeatedly with an unchanged size yields identical rectangles.

use serde::{Deserialize, Serialize};

use crate::host::Host;
use crate::surface::Surface;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Size of a window's content area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentSize {
    pub width: f64,
    pub height: f64,
}

impl ContentSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Negative or NaN dimensions collapse to zero
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.max(0.0),
            height: self.height.max(0.0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum Layout {
    /// A single surface covering the whole content area
    Fill,
    /// A fixed-height band on top, the remainder below it
    Banded { band_height: f64 },
}

impl Layout {
    /// Number of surfaces this layout positions
    pub fn slots(&self) -> usize {
        match self {
            Layout::Fill => 1,
            Layout::Banded { .. } => 2,
        }
    }

    /// Compute one rectangle per slot, in stacking order.
    pub fn compute(&self, size: ContentSize) -> Vec<Bounds> {
        let size = size.clamped();

        match *self {
            Layout::Fill => vec![Bounds::new(0.0, 0.0, size.width, size.height)],
            Layout::Banded { band_height } => {
                let band = band_height.max(0.0).min(size.height);
                let remainder = (size.height - band).max(0.0);
                vec![
                    Bounds::new(0.0, 0.0, size.width, band),
                    Bounds::new(0.0, band, size.width, remainder),
                ]
            }
        }
    }
}

/// Applies a [`Layout`] to the surfaces composed in one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsSynchronizer {
    layout: Layout,
}

impl BoundsSynchronizer {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Read the window's current content size from the host and lay out
    /// `surfaces` against it. Returns the size that was honored.
    pub fn sync(
        &self,
        host: &dyn Host,
        window: &str,
        surfaces: &mut [&mut Surface],
    ) -> Result<ContentSize> {
        let size = host.content_size(window)?;
        self.apply(host, size, surfaces)?;
        Ok(size)
    }

    /// Lay out `surfaces` for an explicit content size.
    ///
    /// A surface torn down between scheduling and applying is skipped.
    pub fn apply(
        &self,
        host: &dyn Host,
        size: ContentSize,
        surfaces: &mut [&mut Surface],
    ) -> Result<()> {
        if surfaces.len() != self.layout.slots() {
            tracing::warn!(
                expected = self.layout.slots(),
                actual = surfaces.len(),
                "Surface count does not match layout"
            );
        }

        for (surface, bounds) in surfaces.iter_mut().zip(self.layout.compute(size)) {
            match host.set_surface_bounds(&surface.label, bounds) {
                Ok(()) => surface.bounds = bounds,
                Err(e) if e.is_stale() => {
                    tracing::debug!(surface = %surface.label, "Skipping layout of stale surface");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }
}
