//! `Config` struct and its persistence methods.
//!
//! Covers:
//! - `load` / `load_from` / `save` / `save_to` (YAML file I/O with atomic write)
//! - XDG-compliant path helpers (`config_path`, `config_dir`)
//! - Semantic validation of field combinations

use crate::error::ConfigError;
use crate::types::LogLevel;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings controlling whether closures stay pending (and can be undone).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoConfig {
    /// Keep closed tabs in a pending state so they can be restored
    #[serde(default = "crate::defaults::bool_true")]
    pub enabled: bool,

    /// Allow pending closures in off-the-record (incognito) tab lists.
    /// Off-the-record tabs are committed immediately when this is false.
    #[serde(default = "crate::defaults::bool_false")]
    pub off_the_record_pending_closures: bool,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            enabled: crate::defaults::bool_true(),
            off_the_record_pending_closures: crate::defaults::bool_false(),
        }
    }
}

/// Settings controlling confirmation dialogs shown before destroying groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogConfig {
    /// Allow removal flows to show confirmation dialogs at all
    #[serde(default = "crate::defaults::bool_true")]
    pub enabled: bool,

    /// The user ticked "don't ask again" on the delete-group dialog; the
    /// dialog answers itself with an immediate continue.
    #[serde(default = "crate::defaults::bool_false")]
    pub skip_delete_group_confirmation: bool,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            enabled: crate::defaults::bool_true(),
            skip_delete_group_confirmation: crate::defaults::bool_false(),
        }
    }
}

/// Top-level configuration for tabclose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub undo: UndoConfig,

    #[serde(default)]
    pub dialogs: DialogConfig,

    /// Debug log level (overridden by `DEBUG_LEVEL` and `--log-level`)
    #[serde(default = "crate::defaults::log_level")]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            undo: UndoConfig::default(),
            dialogs: DialogConfig::default(),
            log_level: crate::defaults::log_level(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, creating it if missing.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            log::info!("Loading existing config from {:?}", config_path);
            Self::load_from(&config_path)
        } else {
            log::info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            if let Err(e) = config.save() {
                log::error!("Failed to save default config: {}", e);
                return Err(e);
            }
            log::info!("Default config created successfully");
            Ok(config)
        }
    }

    /// Load and validate configuration from an explicit YAML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(ConfigError::from)?;
        let config: Config = serde_yaml_ng::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(ConfigError::from)?;
        }

        let yaml = serde_yaml_ng::to_string(self).map_err(ConfigError::from)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml).map_err(ConfigError::from)?;
        fs::rename(&temp_path, path).map_err(ConfigError::from)?;

        Ok(())
    }

    /// Reject field combinations that cannot be honoured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.undo.enabled && self.undo.off_the_record_pending_closures {
            return Err(ConfigError::Validation(
                "undo.off_the_record_pending_closures requires undo.enabled".to_string(),
            ));
        }
        if !self.dialogs.enabled && self.dialogs.skip_delete_group_confirmation {
            log::warn!(
                "dialogs.skip_delete_group_confirmation has no effect while dialogs are disabled"
            );
        }
        Ok(())
    }

    /// Get the configuration file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Get the configuration directory path
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("tabclose")
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            // Use XDG convention on all platforms: ~/.config/tabclose
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("tabclose")
            } else {
                PathBuf::from(".")
            }
        }
    }
}
