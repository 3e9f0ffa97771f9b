use std::time::Duration;
use url::Url;

use scout_surface::ContentSize;

/// Geometry, timing and target-site endpoints for the panel and the
/// enrichment host.
#[derive(Debug, Clone)]
pub struct PanelOptions {
    /// Page the content surface loads when first composed
    pub home_url: Url,
    pub login_url: Url,
    pub panel_title: String,
    pub panel_size: ContentSize,
    pub panel_min_size: ContentSize,
    pub enrichment_viewport: ContentSize,
    pub chrome_band_height: f64,
    /// Delay between showing a freshly opened panel and navigating it
    pub navigation_grace: Duration,
    /// Window that regains focus when the panel hides
    pub main_window_label: String,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            home_url: Url::parse("https://www.linkedin.com/feed/").expect("valid default URL"),
            login_url: Url::parse("https://www.linkedin.com/login").expect("valid default URL"),
            panel_title: "LinkedIn".to_string(),
            panel_size: ContentSize::new(1100.0, 820.0),
            panel_min_size: ContentSize::new(480.0, 360.0),
            enrichment_viewport: ContentSize::new(1280.0, 900.0),
            chrome_band_height: 48.0,
            navigation_grace: Duration::from_millis(250),
            main_window_label: "main".to_string(),
        }
    }
}
