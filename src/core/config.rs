use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub yahoo: Option<YahooProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            yahoo: Some(YahooProviderConfig {
                base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Default USD amount for the quick conversion.
    #[serde(default = "default_amount")]
    pub amount: f64,
    /// Default history window for the chart, in days (7, 30 or 365).
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    /// Whether the dashboard command starts in auto-refresh mode.
    #[serde(default)]
    pub auto_refresh: bool,
}

fn default_amount() -> f64 {
    100.0
}

fn default_window_days() -> u32 {
    365
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            amount: default_amount(),
            window_days: default_window_days(),
            auto_refresh: false,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location. A missing file is not an
    /// error; the defaults apply.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "penwatch", "penwatch")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  yahoo:
    base_url: "http://example.com/yahoo"
amount: 250.0
window_days: 30
auto_refresh: true
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(
            config.providers.yahoo.unwrap().base_url,
            "http://example.com/yahoo"
        );
        assert_eq!(config.amount, 250.0);
        assert_eq!(config.window_days, 30);
        assert!(config.auto_refresh);
    }

    #[test]
    fn test_config_defaults_apply() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(
            config.providers.yahoo.unwrap().base_url,
            DEFAULT_YAHOO_BASE_URL
        );
        assert_eq!(config.amount, 100.0);
        assert_eq!(config.window_days, 365);
        assert!(!config.auto_refresh);
    }

    #[test]
    fn test_load_from_missing_path_is_error() {
        let result = AppConfig::load_from_path("/nonexistent/penwatch/config.yaml");
        assert!(result.is_err());
    }
}
