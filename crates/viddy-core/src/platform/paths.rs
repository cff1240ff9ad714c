//! Platform-specific locations for settings, tile icons and launcher
//! entries.

use crate::config::PathsConfig;
use crate::error::{Result, ViddyError};
use std::path::{Path, PathBuf};

/// Per-user data directory for the app.
///
/// # Platform Behavior
/// - **Linux**: `~/.local/share/viddy`
/// - **Windows**: `%APPDATA%/viddy`
/// - **macOS**: `~/Library/Application Support/viddy`
pub fn data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().ok_or_else(|| ViddyError::Config {
        message: "Could not determine data directory".to_string(),
    })?;
    Ok(base.join(PathsConfig::DATA_DIR_NAME))
}

/// Settings database inside `data_dir`.
pub fn settings_db_path(data_dir: &Path) -> PathBuf {
    data_dir.join(PathsConfig::SETTINGS_DB_NAME)
}

/// Directory tile icons are written to inside `data_dir`.
pub fn tiles_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(PathsConfig::TILES_DIR_NAME)
}

/// Directory the desktop environment reads launcher entries from.
///
/// # Platform Behavior
/// - **Linux**: `~/.local/share/applications` (XDG spec)
/// - **Windows**: `%APPDATA%/Microsoft/Windows/Start Menu/Programs`
/// - **macOS**: `~/Applications`
pub fn apps_dir() -> Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = dirs::home_dir().ok_or_else(|| ViddyError::Config {
            message: "Could not determine home directory".to_string(),
        })?;
        Ok(home.join(".local").join("share").join("applications"))
    }

    #[cfg(target_os = "windows")]
    {
        let data_dir = dirs::data_dir().ok_or_else(|| ViddyError::Config {
            message: "Could not determine app data directory".to_string(),
        })?;
        Ok(data_dir
            .join("Microsoft")
            .join("Windows")
            .join("Start Menu")
            .join("Programs"))
    }

    #[cfg(target_os = "macos")]
    {
        let home = dirs::home_dir().ok_or_else(|| ViddyError::Config {
            message: "Could not determine home directory".to_string(),
        })?;
        Ok(home.join("Applications"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    {
        Err(ViddyError::Config {
            message: "Unsupported platform for launcher entries".to_string(),
        })
    }
}
