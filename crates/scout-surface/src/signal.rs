//! Signals from sandboxed surfaces
//!
//! Sandboxed content has no message channel to the host. Its bridge script
//! instead navigates to the reserved `scout-signal:` scheme; the host vetoes
//! that navigation and decodes it here.

use url::Url;

use crate::events::{HostEvent, ESCAPE_KEY};

pub const SIGNAL_SCHEME: &str = "scout-signal";

/// Installed into every frame of a sandboxed surface.
///
/// Escape is signalled from any frame. Location changes that do not load a
/// new document (history API, fragment changes) are signalled from the top
/// frame only.
pub const SANDBOX_BRIDGE_SCRIPT: &str = r#"(() => {
  try {
    const signal = (target) => {
      try { window.top.location.href = target; } catch {
        try { window.location.href = target; } catch {}
      }
    };

    window.addEventListener('keydown', (event) => {
      if (event.key !== 'Escape' || event.defaultPrevented) return;
      signal('scout-signal://escape');
    }, true);

    if (window.top !== window) return;

    let last = String(location.href);
    const report = () => {
      const current = String(location.href);
      if (current === last) return;
      last = current;
      signal('scout-signal://location?u=' + encodeURIComponent(current));
    };

    for (const name of ['pushState', 'replaceState']) {
      const original = history[name];
      if (typeof original !== 'function') continue;
      history[name] = function (...args) {
        const result = original.apply(this, args);
        try { report(); } catch {}
        return result;
      };
    }
    window.addEventListener('popstate', report);
    window.addEventListener('hashchange', report);
  } catch {}
})();"#;

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceSignal {
    Escape,
    /// Same-document location change
    Location(Url),
}

impl SurfaceSignal {
    /// Whether the navigation target belongs to the signal channel. Such
    /// navigations are always vetoed, decodable or not.
    pub fn is_signal(url: &Url) -> bool {
        url.scheme() == SIGNAL_SCHEME
    }

    pub fn from_url(url: &Url) -> Option<Self> {
        if !Self::is_signal(url) {
            return None;
        }

        match url.host_str()? {
            "escape" => Some(SurfaceSignal::Escape),
            "location" => {
                let (_, raw) = url.query_pairs().find(|(key, _)| key == "u")?;
                let location = Url::parse(&raw).ok()?;
                matches!(location.scheme(), "http" | "https")
                    .then_some(SurfaceSignal::Location(location))
            }
            _ => None,
        }
    }

    pub fn into_event(self, surface: impl Into<String>) -> HostEvent {
        let surface = surface.into();
        match self {
            SurfaceSignal::Escape => HostEvent::KeyDown {
                surface,
                key: ESCAPE_KEY.to_string(),
            },
            SurfaceSignal::Location(url) => HostEvent::Navigated {
                surface,
                url: url.to_string(),
            },
        }
    }
}
