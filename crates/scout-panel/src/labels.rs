//! Fixed window and surface labels

pub const PANEL_WINDOW: &str = "scout-panel";
pub const PANEL_CHROME: &str = "scout-panel-chrome";
pub const PANEL_CONTENT: &str = "scout-panel-content";

pub const ENRICHMENT_WINDOW: &str = "scout-enrichment";
pub const ENRICHMENT_SURFACE: &str = "scout-enrichment-content";
