//! Application configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use scout_panel::PanelOptions;
use scout_storage::Database;
use scout_surface::{ContentSize, DEFAULT_PARTITION};

use crate::error::CoreError;
use crate::Result;

/// Settings key overriding the session partition name
pub const PARTITION_SETTING: &str = "session.partition";

/// Allowed chrome band heights, in logical pixels
const CHROME_BAND_RANGE: std::ops::RangeInclusive<f64> = 44.0..=48.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Session partition shared by the panel and the enrichment host
    pub partition_name: String,
    /// Page the panel's content surface starts on
    pub home_url: String,
    /// Page every surface is sent to after logout
    pub login_url: String,
    pub enrichment_viewport: ContentSize,
    pub panel_size: ContentSize,
    pub chrome_band_height: f64,
    pub navigation_grace_ms: u64,
    /// Window that regains focus when the panel hides
    pub main_window_label: String,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("scout.db"),
            partition_name: DEFAULT_PARTITION.to_string(),
            home_url: "https://www.linkedin.com/feed/".to_string(),
            login_url: "https://www.linkedin.com/login".to_string(),
            enrichment_viewport: ContentSize::new(1280.0, 900.0),
            panel_size: ContentSize::new(1100.0, 820.0),
            chrome_band_height: 48.0,
            navigation_grace_ms: 250,
            main_window_label: "main".to_string(),
        }
    }

    /// Fallback data directory when no application path resolver is at hand
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Scout"))
            .unwrap_or_else(|| PathBuf::from(".scout"))
    }

    pub fn validate(&self) -> Result<()> {
        if !CHROME_BAND_RANGE.contains(&self.chrome_band_height) {
            return Err(CoreError::Config(format!(
                "chrome band height {} outside {}..={}",
                self.chrome_band_height,
                CHROME_BAND_RANGE.start(),
                CHROME_BAND_RANGE.end()
            )));
        }
        for (name, size) in [
            ("enrichment viewport", self.enrichment_viewport),
            ("panel size", self.panel_size),
        ] {
            if size.is_empty() {
                return Err(CoreError::Config(format!(
                    "{name} must be non-empty, got {}x{}",
                    size.width, size.height
                )));
            }
        }
        if self.partition_name.trim().is_empty() {
            return Err(CoreError::Config("partition name is empty".to_string()));
        }
        web_url("home_url", &self.home_url)?;
        web_url("login_url", &self.login_url)?;
        Ok(())
    }

    /// Apply persisted overrides from the settings store.
    pub fn apply_settings(&mut self, db: &Database) -> Result<()> {
        if let Some(partition) = db.get_setting(PARTITION_SETTING)? {
            let partition = partition.trim();
            if partition.is_empty() {
                tracing::warn!(key = PARTITION_SETTING, "Ignoring empty partition setting");
            } else {
                tracing::info!(partition = %partition, "Using configured session partition");
                self.partition_name = partition.to_string();
            }
        }
        Ok(())
    }

    pub fn panel_options(&self) -> Result<PanelOptions> {
        Ok(PanelOptions {
            home_url: web_url("home_url", &self.home_url)?,
            login_url: web_url("login_url", &self.login_url)?,
            panel_size: self.panel_size,
            enrichment_viewport: self.enrichment_viewport,
            chrome_band_height: self.chrome_band_height,
            navigation_grace: Duration::from_millis(self.navigation_grace_ms),
            main_window_label: self.main_window_label.clone(),
            ..PanelOptions::default()
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

fn web_url(field: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| CoreError::Config(format!("{field}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CoreError::Config(format!(
            "{field}: unsupported scheme {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new(PathBuf::from("/tmp/scout-test"))
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = config();
        config.validate().unwrap();
        assert_eq!(config.partition_name, "persist:linkedin");
        assert_eq!(config.database_path, PathBuf::from("/tmp/scout-test/scout.db"));

        let options = config.panel_options().unwrap();
        assert_eq!(options.navigation_grace, Duration::from_millis(250));
        assert_eq!(options.chrome_band_height, 48.0);
        assert_eq!(options.login_url.as_str(), "https://www.linkedin.com/login");
    }

    #[test]
    fn test_band_height_range() {
        let mut config = config();
        config.chrome_band_height = 44.0;
        assert!(config.validate().is_ok());

        config.chrome_band_height = 60.0;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = config();
        config.enrichment_viewport = ContentSize::new(0.0, 900.0);
        assert!(config.validate().is_err());

        let mut config = self::config();
        config.login_url = "file:///etc/passwd".to_string();
        assert!(config.validate().is_err());

        let mut config = self::config();
        config.partition_name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partition_override_from_settings() {
        let db = Database::open_in_memory().unwrap();
        let mut config = config();

        config.apply_settings(&db).unwrap();
        assert_eq!(config.partition_name, "persist:linkedin");

        db.set_setting(PARTITION_SETTING, "persist:work").unwrap();
        config.apply_settings(&db).unwrap();
        assert_eq!(config.partition_name, "persist:work");
    }
}
