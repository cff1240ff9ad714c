//! In-process shortcut registry for hosts without a launcher integration.

use super::host::{Shortcut, ShortcutHost};
use super::scheme::ShortcutId;
use crate::error::{Result, ViddyError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Shortcut host that keeps registrations in memory.
///
/// Creation can be switched to "declined" to model a user dismissing the
/// platform's pin confirmation, and the whole host can be taken offline so
/// every call fails.
#[derive(Debug)]
pub struct MemoryShortcutHost {
    shortcuts: Mutex<BTreeMap<ShortcutId, Shortcut>>,
    accepting: AtomicBool,
    available: AtomicBool,
}

impl MemoryShortcutHost {
    pub fn new() -> Self {
        Self {
            shortcuts: Mutex::new(BTreeMap::new()),
            accepting: AtomicBool::new(true),
            available: AtomicBool::new(true),
        }
    }

    /// Whether subsequent create requests are accepted.
    pub fn set_accepting(&self, accepting: bool) {
        self.accepting.store(accepting, Ordering::SeqCst);
    }

    /// While unavailable, every host call returns an error.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Drop a shortcut as if the user removed it from the launcher.
    pub fn remove_externally(&self, id: &ShortcutId) -> bool {
        self.lock()
            .map(|mut shortcuts| shortcuts.remove(id).is_some())
            .unwrap_or(false)
    }

    /// Snapshot of a registered shortcut.
    pub fn get(&self, id: &ShortcutId) -> Option<Shortcut> {
        self.lock().ok().and_then(|shortcuts| shortcuts.get(id).cloned())
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<ShortcutId, Shortcut>>> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(ViddyError::shortcut("query", "shortcut host unavailable"));
        }
        self.shortcuts
            .lock()
            .map_err(|_| ViddyError::shortcut("lock", "shortcut registry lock poisoned"))
    }
}

impl Default for MemoryShortcutHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShortcutHost for MemoryShortcutHost {
    async fn exists(&self, id: &ShortcutId) -> Result<bool> {
        Ok(self.lock()?.contains_key(id))
    }

    async fn request_create(&self, shortcut: &Shortcut) -> Result<bool> {
        if !self.accepting.load(Ordering::SeqCst) {
            return Ok(false);
        }
        self.lock()?.insert(shortcut.id.clone(), shortcut.clone());
        Ok(true)
    }

    async fn find_all(&self) -> Result<Vec<Shortcut>> {
        Ok(self.lock()?.values().cloned().collect())
    }

    async fn request_delete(&self, shortcut: &Shortcut) -> Result<bool> {
        Ok(self.lock()?.remove(&shortcut.id).is_some())
    }
}
