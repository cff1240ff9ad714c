//! Shortcut host backed by freedesktop launcher entries.

use super::desktop_entry::{quote_exec_arg, DesktopEntry};
use crate::config::{AppConfig, PathsConfig};
use crate::error::{Result, ViddyError};
use crate::tiles::{Shortcut, ShortcutHost, ShortcutId};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

const KEY_TILE_ID: &str = "X-Viddy-TileId";
const KEY_ARGUMENTS: &str = "X-Viddy-Arguments";
const KEY_SQUARE_ICON: &str = "X-Viddy-SquareIcon";
const KEY_WIDE_ICON: &str = "X-Viddy-WideIcon";
const KEY_SHOW_WIDE_NAME: &str = "X-Viddy-ShowWideName";

/// Writes one `.desktop` file per shortcut into an applications directory.
///
/// Each entry's `Exec` line runs `<launcher> activate <arguments>`, so
/// launching it routes through the same activation path as a tile tap.
#[derive(Debug, Clone)]
pub struct DesktopShortcutHost {
    apps_dir: PathBuf,
    launcher: PathBuf,
}

impl DesktopShortcutHost {
    pub fn new(apps_dir: impl Into<PathBuf>, launcher: impl Into<PathBuf>) -> Self {
        Self {
            apps_dir: apps_dir.into(),
            launcher: launcher.into(),
        }
    }

    pub fn apps_dir(&self) -> &Path {
        &self.apps_dir
    }

    /// Path of the entry for a shortcut id.
    pub fn entry_path(&self, id: &ShortcutId) -> PathBuf {
        self.apps_dir.join(format!(
            "{}{}.desktop",
            PathsConfig::DESKTOP_ENTRY_PREFIX,
            urlencoding::encode(id.as_str())
        ))
    }

    fn to_entry(&self, shortcut: &Shortcut) -> DesktopEntry {
        let exec = format!(
            "{} activate {}",
            quote_exec_arg(&self.launcher.to_string_lossy()),
            quote_exec_arg(&shortcut.arguments)
        );

        let mut entry = DesktopEntry::application(shortcut.display_name.clone(), exec)
            .with_comment(format!("Open in {}", AppConfig::APP_NAME))
            .with_icon(icon_path(&shortcut.square_icon))
            .with_extension(KEY_TILE_ID, shortcut.id.as_str())
            .with_extension(KEY_ARGUMENTS, shortcut.arguments.clone())
            .with_extension(KEY_SQUARE_ICON, shortcut.square_icon.clone())
            .with_extension(KEY_SHOW_WIDE_NAME, shortcut.show_wide_name.to_string());
        if let Some(ref wide) = shortcut.wide_icon {
            entry = entry.with_extension(KEY_WIDE_ICON, wide.clone());
        }
        entry
    }

    /// Rebuild a shortcut from an entry this host wrote. Foreign entries
    /// yield `None`.
    fn from_entry(entry: DesktopEntry) -> Option<Shortcut> {
        let id = entry.extension(KEY_TILE_ID)?.to_string();
        let arguments = entry.extension(KEY_ARGUMENTS).unwrap_or_default().to_string();
        let square_icon = entry
            .extension(KEY_SQUARE_ICON)
            .map(str::to_string)
            .unwrap_or_else(|| entry.icon.clone());

        let mut shortcut = Shortcut::new(
            ShortcutId::new(id),
            entry.name.clone(),
            arguments,
            square_icon,
        );
        if let Some(wide) = entry.extension(KEY_WIDE_ICON) {
            let show_name = entry.extension(KEY_SHOW_WIDE_NAME) == Some("true");
            shortcut = shortcut.with_wide_icon(wide, show_name);
        }
        Some(shortcut)
    }
}

/// Launchers want a path or icon name, not a URL.
fn icon_path(icon: &str) -> String {
    Url::parse(icon)
        .ok()
        .filter(|url| url.scheme() == "file")
        .and_then(|url| url.to_file_path().ok())
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| icon.to_string())
}

#[async_trait]
impl ShortcutHost for DesktopShortcutHost {
    async fn exists(&self, id: &ShortcutId) -> Result<bool> {
        Ok(self.entry_path(id).is_file())
    }

    async fn request_create(&self, shortcut: &Shortcut) -> Result<bool> {
        let path = self.entry_path(&shortcut.id);
        self.to_entry(shortcut).write_to_file(&path)?;
        info!("Created launcher entry {}", path.display());
        Ok(true)
    }

    async fn find_all(&self) -> Result<Vec<Shortcut>> {
        let read_dir = match fs::read_dir(&self.apps_dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ViddyError::io_with_path(e, &self.apps_dir)),
        };

        let mut shortcuts = Vec::new();
        for dir_entry in read_dir {
            let path = dir_entry?.path();
            let is_ours = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| {
                    n.starts_with(PathsConfig::DESKTOP_ENTRY_PREFIX) && n.ends_with(".desktop")
                })
                .unwrap_or(false);
            if !is_ours {
                continue;
            }

            match DesktopEntry::read_from_file(&path) {
                Ok(entry) => {
                    if let Some(shortcut) = Self::from_entry(entry) {
                        shortcuts.push(shortcut);
                    }
                }
                Err(e) => warn!("Skipping unreadable launcher entry {}: {}", path.display(), e),
            }
        }

        shortcuts.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(shortcuts)
    }

    async fn request_delete(&self, shortcut: &Shortcut) -> Result<bool> {
        let path = self.entry_path(&shortcut.id);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed launcher entry {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ViddyError::io_with_path(e, &path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn host(dir: &TempDir) -> DesktopShortcutHost {
        DesktopShortcutHost::new(dir.path().join("applications"), "/usr/bin/viddy-launcher")
    }

    fn channel_shortcut() -> Shortcut {
        Shortcut::new(
            ShortcutId::new("Channel_a/b"),
            "Cats & Dogs",
            "viddy://?tileType=Channel&id=a%2Fb",
            "file:///tmp/tiles/Channel_a/b.png",
        )
        .with_wide_icon("file:///tmp/tiles/Channel_a/bWide.png", true)
    }

    #[tokio::test]
    async fn test_create_and_find_all() {
        let temp_dir = TempDir::new().unwrap();
        let host = host(&temp_dir);
        let shortcut = channel_shortcut();

        assert!(host.request_create(&shortcut).await.unwrap());
        assert!(host.exists(&shortcut.id).await.unwrap());
        assert!(host
            .entry_path(&shortcut.id)
            .ends_with("viddy-Channel_a%2Fb.desktop"));

        let all = host.find_all().await.unwrap();
        assert_eq!(all, vec![shortcut]);
    }

    #[tokio::test]
    async fn test_exec_line_escapes_arguments() {
        let temp_dir = TempDir::new().unwrap();
        let host = host(&temp_dir);
        let shortcut = channel_shortcut();
        host.request_create(&shortcut).await.unwrap();

        let entry = DesktopEntry::read_from_file(&host.entry_path(&shortcut.id)).unwrap();
        assert_eq!(
            entry.exec,
            "\"/usr/bin/viddy-launcher\" activate \"viddy://?tileType=Channel&id=a%%2Fb\""
        );
        assert_eq!(entry.icon, "/tmp/tiles/Channel_a/b.png");
    }

    #[tokio::test]
    async fn test_foreign_entries_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let host = host(&temp_dir);
        fs::create_dir_all(host.apps_dir()).unwrap();
        fs::write(
            host.apps_dir().join("viddy-other.desktop"),
            "[Desktop Entry]\nName=Other\nExec=x\n",
        )
        .unwrap();
        fs::write(host.apps_dir().join("firefox.desktop"), "[Desktop Entry]\nName=F\n").unwrap();

        assert!(host.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert!(host(&temp_dir).find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let host = host(&temp_dir);
        let shortcut = channel_shortcut();
        host.request_create(&shortcut).await.unwrap();

        assert!(host.request_delete(&shortcut).await.unwrap());
        assert!(!host.request_delete(&shortcut).await.unwrap());
        assert!(!host.exists(&shortcut.id).await.unwrap());
    }
}
