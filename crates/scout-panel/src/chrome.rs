//! Chrome surface document contract
//!
//! The chrome strip is a bundled document with no network access. It
//! exposes `window.scoutChrome.setLocation(text)` for the host to push the
//! content surface's location, and sends `dismiss`/`escape` messages back
//! through the host's message channel.

use url::Url;

/// Bundled document path loaded by the chrome surface
pub const CHROME_DOCUMENT: &str = "panel-chrome.html";

/// Text shown in the chrome's location field: host and path only.
///
/// Query strings and fragments are dropped so tracking parameters and
/// tokens never appear in trusted UI.
pub fn display_location(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };

    match parsed.host_str() {
        Some(host) => {
            let path = parsed.path();
            if path == "/" || path.is_empty() {
                host.to_string()
            } else {
                format!("{}{}", host, path)
            }
        }
        None => format!("{}:{}", parsed.scheme(), parsed.path()),
    }
}

/// Script that updates the chrome's location field
pub fn location_script(display: &str) -> String {
    let text = serde_json::to_string(display).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        "window.scoutChrome && window.scoutChrome.setLocation({});",
        text
    )
}
