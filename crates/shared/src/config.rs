//! Configuration management for the theme scraper.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Wiki API settings
    pub wiki: WikiConfig,

    /// Output file settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Wiki API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// Site base URL
    pub base_url: String,

    /// Path of the wiki below the base URL
    pub wiki_path: String,

    /// Name of the page listing every year page
    pub index_page: String,

    /// User-Agent sent with every request
    pub user_agent: String,

    /// Request timeout in seconds (None = wait indefinitely)
    pub timeout_seconds: Option<u64>,

    /// Abort the whole run when any year page fails
    pub fail_fast: bool,
}

/// Output file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output JSON file path
    pub path: String,

    /// Pretty-print the JSON array
    pub pretty: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log directory path
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.reddit.com".to_string(),
            wiki_path: "/r/AnimeThemes/wiki".to_string(),
            index_page: "year_index".to_string(),
            user_agent: "animethemes-scraper 1.0".to_string(),
            timeout_seconds: None,
            fail_fast: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "output.json".to_string(),
            pretty: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            default_level: "info".to_string(),
            console: true,
            file: false,
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Get the output file path
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.wiki.base_url, "https://www.reddit.com");
        assert_eq!(config.wiki.index_page, "year_index");
        assert_eq!(config.wiki.user_agent, "animethemes-scraper 1.0");
        assert_eq!(config.wiki.timeout_seconds, None);
        assert!(!config.wiki.fail_fast);
        assert_eq!(config.output.path, "output.json");
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_save_and_load_config() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");

        let mut original_config = Config::default();
        original_config.wiki.timeout_seconds = Some(15);
        original_config.output.pretty = true;
        original_config.save(&config_path)?;

        assert!(config_path.exists());

        let loaded_config = Config::from_file(&config_path)?;
        assert_eq!(loaded_config.wiki.base_url, original_config.wiki.base_url);
        assert_eq!(loaded_config.wiki.timeout_seconds, Some(15));
        assert!(loaded_config.output.pretty);

        Ok(())
    }

    #[test]
    fn test_partial_config() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "[wiki]\nfail_fast = true\n\n[output]\npath = \"out/themes.json\"\n",
        )?;

        let config = Config::from_file(&config_path)?;
        assert!(config.wiki.fail_fast);
        assert_eq!(config.wiki.wiki_path, "/r/AnimeThemes/wiki");
        assert_eq!(config.output_path(), PathBuf::from("out/themes.json"));
        assert!(config.logging.console);

        Ok(())
    }

    #[test]
    fn test_malformed_config_is_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[wiki\nbase_url = ")?;

        assert!(Config::from_file(&config_path).is_err());

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        // Should return default config without error
        assert_eq!(config.output.path, "output.json");
    }
}
