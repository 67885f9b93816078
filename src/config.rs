use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::api::LevelKeyFormat;

/// Environment variable that overrides `api_url` from the config file.
pub const API_URL_ENV: &str = "SQLSPELL_API_URL";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub level_key_format: LevelKeyFormat,
    #[serde(default = "default_restore_fullscreen")]
    pub restore_fullscreen: bool,
    #[serde(default = "default_editor_percent")]
    pub default_editor_percent: f64,
}

fn default_api_url() -> String {
    "http://localhost:3000/api".to_string()
}
fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_restore_fullscreen() -> bool {
    true
}
fn default_editor_percent() -> f64 {
    65.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            theme: default_theme(),
            request_timeout_secs: default_request_timeout_secs(),
            level_key_format: LevelKeyFormat::default(),
            restore_fullscreen: default_restore_fullscreen(),
            default_editor_percent: default_editor_percent(),
        }
    }
}

impl Config {
    /// Load the config file, then apply the environment override for the
    /// API URL. The first run writes the defaults out so there is a file
    /// to edit.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env_override(std::env::var(API_URL_ENV).ok());
        config.normalize();
        Ok(config)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            return Ok(toml::from_str::<Config>(&content)?);
        }
        let config = Config::default();
        match config.save_to(path) {
            Ok(()) => tracing::info!(path = %path.display(), "wrote default config"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not write default config"),
        }
        Ok(config)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sqlspell")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn apply_env_override(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
    }

    /// Trim a trailing slash from the base URL and pull the editor split
    /// back into the range the resizer accepts.
    pub fn normalize(&mut self) {
        while self.api_url.ends_with('/') {
            self.api_url.pop();
        }
        if !self.default_editor_percent.is_finite() {
            self.default_editor_percent = default_editor_percent();
        }
        self.default_editor_percent = self.default_editor_percent.clamp(
            crate::session::resize::MIN_PANE_PERCENT,
            100.0 - crate::session::resize::MIN_PANE_PERCENT,
        );
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.level_key_format, LevelKeyFormat::Delimited);
        assert!(config.restore_fullscreen);
        assert_eq!(config.default_editor_percent, 65.0);
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
api_url = "https://example.test/prod"
level_key_format = "concatenated"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_url, "https://example.test/prod");
        assert_eq!(config.level_key_format, LevelKeyFormat::Concatenated);
        assert_eq!(config.theme, "terminal-default");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.api_url, deserialized.api_url);
        assert_eq!(config.level_key_format, deserialized.level_key_format);
    }

    #[test]
    fn test_env_override_replaces_url() {
        let mut config = Config::default();
        config.apply_env_override(Some("https://gateway.test".to_string()));
        assert_eq!(config.api_url, "https://gateway.test");
    }

    #[test]
    fn test_blank_env_override_is_ignored() {
        let mut config = Config::default();
        config.apply_env_override(Some("  ".to_string()));
        assert_eq!(config.api_url, default_api_url());
        config.apply_env_override(None);
        assert_eq!(config.api_url, default_api_url());
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let mut config = Config::default();
        config.api_url = "https://gateway.test/v1/".to_string();
        config.normalize();
        assert_eq!(config.endpoint("/sqlspell"), "https://gateway.test/v1/sqlspell");
        assert_eq!(config.endpoint("leveldata"), "https://gateway.test/v1/leveldata");
    }

    #[test]
    fn test_normalize_clamps_editor_percent() {
        let mut config = Config::default();
        config.default_editor_percent = 95.0;
        config.normalize();
        assert_eq!(config.default_editor_percent, 80.0);

        config.default_editor_percent = f64::NAN;
        config.normalize();
        assert_eq!(config.default_editor_percent, 65.0);
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sqlspell").join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.api_url, default_api_url());

        let written: Config = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.theme, config.theme);
        assert_eq!(written.request_timeout_secs, config.request_timeout_secs);
    }

    #[test]
    fn test_existing_file_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "theme = \"catppuccin-mocha\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(fs::read_to_string(&path).unwrap(), "theme = \"catppuccin-mocha\"\n");
    }

    #[test]
    fn test_saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.level_key_format = LevelKeyFormat::Concatenated;
        config.restore_fullscreen = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.level_key_format, LevelKeyFormat::Concatenated);
        assert!(!loaded.restore_fullscreen);
    }
}
