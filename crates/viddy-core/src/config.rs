//! Centralized configuration for the Viddy client core.
//!
//! Constant groups live on unit structs; `TileConfig` is the runtime
//! configuration that can be loaded from disk.

use crate::error::{Result, ViddyError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "Viddy";
    pub const PROTOCOL_SCHEME: &'static str = "viddy";
    pub const LAUNCHER_BINARY: &'static str = "viddy-launcher";
}

/// Shared directory and file names.
pub struct PathsConfig;

impl PathsConfig {
    pub const DATA_DIR_NAME: &'static str = "viddy";
    pub const SETTINGS_DB_NAME: &'static str = "settings.sqlite";
    pub const TILES_DIR_NAME: &'static str = "tiles";
    pub const DESKTOP_ENTRY_PREFIX: &'static str = "viddy-";
    pub const LEGACY_LOCAL_ROOT: &'static str = "ms-appdata:///Local";
}

/// Settings containers and well-known keys.
pub struct SettingsConfig;

impl SettingsConfig {
    pub const PINNED_ITEMS_CONTAINER: &'static str = "pinned-items";
    pub const APP_CONTAINER: &'static str = "app";
    pub const LAUNCHED_COUNT_KEY: &'static str = "LaunchedCountSetting";
    pub const BUSY_TIMEOUT_MS: u32 = 5_000;
}

/// Message bus sizing.
pub struct MessagingConfig;

impl MessagingConfig {
    /// Notifications buffered per subscriber before the oldest are dropped.
    pub const BUS_CAPACITY: usize = 64;
}

/// How `(kind, key)` pairs are folded into a single identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyEncoding {
    /// `Kind_Key`; injective because no kind name contains `_`.
    #[default]
    Separated,
    /// Bare `KindKey`. Ambiguous, but matches identifiers written by
    /// earlier releases.
    Concatenated,
}

impl KeyEncoding {
    pub const SEPARATOR: char = '_';
}

/// Runtime configuration for tile identifiers, icons and links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TileConfig {
    /// Scheme used for deep links and tile arguments.
    pub protocol_scheme: String,
    /// Root that icon URLs are templated under.
    pub local_file_root: String,
    /// Identifier encoding.
    pub key_encoding: KeyEncoding,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            protocol_scheme: AppConfig::PROTOCOL_SCHEME.to_string(),
            local_file_root: PathsConfig::LEGACY_LOCAL_ROOT.to_string(),
            key_encoding: KeyEncoding::default(),
        }
    }
}

impl TileConfig {
    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ViddyError::io_with_path(e, path))?;
        let config: TileConfig = serde_json::from_str(&contents).map_err(|e| ViddyError::Json {
            message: format!("Failed to parse {}: {}", path.display(), e),
            source: Some(e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Point icon URLs at a directory on disk.
    pub fn with_local_dir(mut self, dir: &Path) -> Self {
        self.local_file_root = match url::Url::from_directory_path(dir) {
            Ok(url) => url.as_str().trim_end_matches('/').to_string(),
            Err(()) => dir.display().to_string(),
        };
        self
    }

    /// Check that the scheme can appear in an absolute URI.
    pub fn validate(&self) -> Result<()> {
        let scheme = &self.protocol_scheme;
        let valid = scheme
            .chars()
            .next()
            .map(|c| c.is_ascii_alphabetic())
            .unwrap_or(false)
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

        if !valid {
            return Err(ViddyError::Config {
                message: format!("Invalid protocol scheme: {:?}", scheme),
            });
        }
        if self.local_file_root.trim().is_empty() {
            return Err(ViddyError::Config {
                message: "local_file_root must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
