//! Configuration file management.
//!
//! Reads and writes the persisted store configuration (`config.toml`). The file
//! is loaded once per process and is read-only afterwards; its values become
//! defaults for [`Options`](crate::core::options::Options).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Persisted store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Ask for more data after creating a secret
    pub ask_for_more: bool,
    /// Copy passwords to the clipboard after generating or showing them
    pub auto_clip: bool,
    /// Import missing recipient keys automatically
    pub auto_import: bool,
    /// Sync the store after each write
    pub auto_sync: bool,
    /// Seconds before the clipboard is cleared
    pub clip_timeout: u64,
    /// Worker count for bulk operations
    pub concurrency: usize,
    /// Offer to edit the recipient list before encrypting
    pub edit_recipients: bool,
    /// Export recipient public keys into the store
    pub export_keys: bool,
    /// Skip the recipient confirmation before encrypting
    pub no_confirm: bool,
    /// Never page long output
    pub no_pager: bool,
    /// Show desktop notifications
    pub notifications: bool,
    /// Hide the password when showing a secret
    pub safe_content: bool,
    /// Include symbols in generated passwords
    pub use_symbols: bool,
    /// Store root; defaults to `~/.coffer/store`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Editor for multi-line input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ask_for_more: false,
            auto_clip: true,
            auto_import: true,
            auto_sync: true,
            clip_timeout: 45,
            concurrency: 1,
            edit_recipients: false,
            export_keys: true,
            no_confirm: false,
            no_pager: false,
            notifications: true,
            safe_content: false,
            use_symbols: false,
            path: None,
            editor: None,
        }
    }
}

impl StoreConfig {
    /// Location of the config file.
    ///
    /// `$COFFER_CONFIG` wins over `<config_dir>/coffer/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoDirectory` if the platform config directory is unknown.
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(constants::ENV_CONFIG) {
            return Ok(PathBuf::from(path));
        }
        let dir = dirs::config_dir().ok_or(ConfigError::NoDirectory("config"))?;
        Ok(dir.join(constants::APP_DIR).join(constants::CONFIG_FILE))
    }

    /// Load the config from its default location.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load the config from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile`, `ConfigError::Parse` or
    /// `ConfigError::InvalidValue`.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            debug!("no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        config.validate()?;

        debug!(?config, "config loaded");
        Ok(config)
    }

    /// Write the config to an explicit path, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the write fails.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "saving config");

        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` on the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "concurrency",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if let Some(editor) = &self.editor {
            if editor.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "editor",
                    reason: "cannot be empty".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Root directory of the secret store.
    ///
    /// `$COFFER_STORE` wins over `path`, which wins over `~/.coffer/store`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoDirectory` if HOME cannot be determined.
    pub fn store_root(&self) -> Result<PathBuf> {
        if let Ok(path) = std::env::var(constants::ENV_STORE) {
            return Ok(PathBuf::from(path));
        }
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoDirectory("home"))?;
        Ok(home.join(constants::STORE_DIR))
    }
}
