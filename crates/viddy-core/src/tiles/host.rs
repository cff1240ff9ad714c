//! Launcher shortcuts: the platform collaborator trait and the manager that
//! shields callers from its failures.

use super::scheme::ShortcutId;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// A launcher entry bound to an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub id: ShortcutId,
    pub display_name: String,
    /// Handed back verbatim on activation.
    pub arguments: String,
    pub square_icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wide_icon: Option<String>,
    /// Show the display name on the wide face.
    #[serde(default)]
    pub show_wide_name: bool,
}

impl Shortcut {
    pub fn new(
        id: ShortcutId,
        display_name: impl Into<String>,
        arguments: impl Into<String>,
        square_icon: impl Into<String>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            arguments: arguments.into(),
            square_icon: square_icon.into(),
            wide_icon: None,
            show_wide_name: false,
        }
    }

    /// Add a wide face.
    pub fn with_wide_icon(mut self, wide_icon: impl Into<String>, show_name: bool) -> Self {
        self.wide_icon = Some(wide_icon.into());
        self.show_wide_name = show_name;
        self
    }
}

/// Platform shortcut manager.
///
/// Implementations may fail in any method; [`ShortcutManager`] turns those
/// failures into `false`.
#[async_trait]
pub trait ShortcutHost: Send + Sync {
    /// Whether a shortcut with this id is currently registered.
    async fn exists(&self, id: &ShortcutId) -> Result<bool>;

    /// Register a shortcut. `Ok(false)` means the platform declined.
    async fn request_create(&self, shortcut: &Shortcut) -> Result<bool>;

    /// Every shortcut this app currently has registered.
    async fn find_all(&self) -> Result<Vec<Shortcut>>;

    /// Remove a previously enumerated shortcut.
    async fn request_delete(&self, shortcut: &Shortcut) -> Result<bool>;
}

/// Failure-absorbing wrapper around a [`ShortcutHost`].
#[derive(Clone)]
pub struct ShortcutManager {
    host: Arc<dyn ShortcutHost>,
}

impl ShortcutManager {
    pub fn new(host: Arc<dyn ShortcutHost>) -> Self {
        Self { host }
    }

    /// Pin state. A host failure reads as "not pinned".
    pub async fn exists(&self, id: &ShortcutId) -> bool {
        match self.try_exists(id).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!("Failed to query shortcut {}: {}", id, e);
                false
            }
        }
    }

    /// Create a shortcut. Never fails; a platform error reports `false`.
    pub async fn create(&self, shortcut: &Shortcut) -> bool {
        match self.host.request_create(shortcut).await {
            Ok(true) => {
                debug!("Created shortcut {}", shortcut.id);
                true
            }
            Ok(false) => {
                warn!("Platform declined to create shortcut {}", shortcut.id);
                false
            }
            Err(e) => {
                error!("Error creating shortcut {}: {}", shortcut.id, e);
                false
            }
        }
    }

    /// Delete by id. `false` when the id is not registered or deletion fails.
    ///
    /// Deletion goes through enumeration because hosts may only delete
    /// handles they handed out.
    pub async fn delete(&self, id: &ShortcutId) -> bool {
        if id.as_str().is_empty() {
            return false;
        }

        let shortcuts = self.find_all().await;
        let Some(shortcut) = shortcuts.into_iter().find(|s| &s.id == id) else {
            debug!("No shortcut {} to delete", id);
            return false;
        };

        match self.host.request_delete(&shortcut).await {
            Ok(deleted) => deleted,
            Err(e) => {
                error!("Error deleting shortcut {}: {}", id, e);
                false
            }
        }
    }

    /// Pin state with host failures passed through.
    pub async fn try_exists(&self, id: &ShortcutId) -> Result<bool> {
        self.host.exists(id).await
    }

    /// Registered shortcuts with host failures passed through.
    pub async fn try_find_all(&self) -> Result<Vec<Shortcut>> {
        self.host.find_all().await
    }

    /// Currently registered shortcuts; empty on host failure.
    pub async fn find_all(&self) -> Vec<Shortcut> {
        match self.try_find_all().await {
            Ok(shortcuts) => shortcuts,
            Err(e) => {
                warn!("Failed to enumerate shortcuts: {}", e);
                Vec::new()
            }
        }
    }
}
