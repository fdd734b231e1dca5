//! Configuration management for vendeta.
//!
//! Loads settings from `<config dir>/vendeta/config.toml` or uses defaults.
//! Every field has a default, so a partial file is fine.

use crate::data::RiddleCatalog;
use crate::game::NoticeTiming;
use crate::scan::PermissionPolicy;
use crate::VendetaError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Game configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Riddle catalog file; the built-in hunt is used when unset
    #[serde(default)]
    pub riddles_path: Option<PathBuf>,
}

/// Camera configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default)]
    pub permission: PermissionPolicy,
}

/// UI timing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long short notices stay visible
    #[serde(default = "default_short_notice_ms")]
    pub short_notice_ms: u64,

    /// How long long notices stay visible
    #[serde(default = "default_long_notice_ms")]
    pub long_notice_ms: u64,

    /// Event loop tick
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

/// Longest a notice may stay on screen (one hour)
pub const MAX_NOTICE_MS: u64 = 60 * 60 * 1000;

fn default_short_notice_ms() -> u64 {
    2000
}

fn default_long_notice_ms() -> u64 {
    3500
}

fn default_tick_ms() -> u64 {
    100
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            short_notice_ms: default_short_notice_ms(),
            long_notice_ms: default_long_notice_ms(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl UiConfig {
    pub fn notice_timing(&self) -> NoticeTiming {
        NoticeTiming::from_millis(self.short_notice_ms, self.long_notice_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,

    #[serde(default)]
    pub camera: CameraConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vendeta").join("config.toml"))
    }

    /// Parse configuration from TOML
    pub fn from_toml_str(contents: &str) -> Result<Self, VendetaError> {
        let config: Config =
            toml::from_str(contents).map_err(|e| VendetaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path; the file must exist
    pub fn load_from(path: &Path) -> Result<Self, VendetaError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| VendetaError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Load from the default location, falling back to defaults when absent
    pub fn load() -> Result<Self, VendetaError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                info!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
            None => {
                warn!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<(), VendetaError> {
        if self.ui.tick_ms == 0 {
            return Err(VendetaError::Config("ui.tick_ms must be positive".to_string()));
        }
        if self.ui.long_notice_ms > MAX_NOTICE_MS {
            return Err(VendetaError::Config(format!(
                "ui.long_notice_ms must not exceed {}",
                MAX_NOTICE_MS
            )));
        }
        if self.ui.short_notice_ms > self.ui.long_notice_ms {
            return Err(VendetaError::Config(
                "ui.short_notice_ms must not exceed ui.long_notice_ms".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the riddle catalog this config points at
    pub fn riddle_catalog(&self) -> Result<RiddleCatalog, VendetaError> {
        match &self.game.riddles_path {
            Some(path) => RiddleCatalog::load(path),
            None => Ok(RiddleCatalog::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.camera.permission, PermissionPolicy::Ask);
        assert_eq!(config.ui.short_notice_ms, 2000);
        assert_eq!(config.ui.long_notice_ms, 3500);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [camera]
            permission = "granted"

            [ui]
            tick_ms = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.camera.permission, PermissionPolicy::Granted);
        assert_eq!(config.ui.tick_ms, 50);
        assert_eq!(config.ui.long_notice_ms, 3500);
        assert!(config.game.riddles_path.is_none());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(Config::from_toml_str("[camera]\npermission = \"maybe\"").is_err());
        assert!(Config::from_toml_str("[ui]\ntick_ms = 0").is_err());
        assert!(
            Config::from_toml_str("[ui]\nshort_notice_ms = 5000\nlong_notice_ms = 1000").is_err()
        );
    }

    #[test]
    fn oversized_notice_duration_is_rejected() {
        let err = Config::from_toml_str(
            "[ui]\nshort_notice_ms = 1\nlong_notice_ms = 9000000000000000000",
        )
        .unwrap_err();
        assert!(matches!(err, VendetaError::Config(_)));
        assert!(err.to_string().contains("long_notice_ms"));

        let config =
            Config::from_toml_str(&format!("[ui]\nlong_notice_ms = {}", MAX_NOTICE_MS)).unwrap();
        assert_eq!(config.ui.long_notice_ms, MAX_NOTICE_MS);
    }

    #[test]
    fn builtin_catalog_without_path() {
        let catalog = Config::default().riddle_catalog().unwrap();
        assert_eq!(catalog, RiddleCatalog::builtin());
    }

    #[test]
    fn catalog_path_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("hunt.toml");
        fs::write(
            &catalog_path,
            "[[riddle]]\nclue = \"Under the stairs\"\nanswer = \"STAIRS\"\n",
        )
        .unwrap();

        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            format!("[game]\nriddles_path = {:?}\n", catalog_path.display().to_string()),
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        let catalog = config.riddle_catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).answer, "STAIRS");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, VendetaError::Config(_)));
    }
}
