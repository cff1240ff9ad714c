//! One-time services started by the first activation.

use crate::config::SettingsConfig;
use crate::error::Result;
use crate::settings::{read_json, write_json, SettingsStore};
use crate::tiles::PinningService;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Work run once per process before the first navigation.
#[async_trait]
pub trait StartupTask: Send + Sync {
    fn name(&self) -> &str;

    async fn start(&self) -> Result<()>;
}

/// Counts launches for the review prompt.
pub struct LaunchCounter {
    settings: Arc<dyn SettingsStore>,
}

impl LaunchCounter {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self { settings }
    }

    pub async fn count(&self) -> Result<u64> {
        let count = read_json(self.settings.as_ref(), SettingsConfig::LAUNCHED_COUNT_KEY).await?;
        Ok(count.unwrap_or(0))
    }
}

#[async_trait]
impl StartupTask for LaunchCounter {
    fn name(&self) -> &str {
        "launch-counter"
    }

    async fn start(&self) -> Result<()> {
        let count = self.count().await?.saturating_add(1);
        write_json(self.settings.as_ref(), SettingsConfig::LAUNCHED_COUNT_KEY, &count).await?;
        debug!("Launch count is now {}", count);
        Ok(())
    }
}

/// Drops stored records whose tile was removed outside the app.
pub struct PinnedItemSweep {
    pinning: PinningService,
}

impl PinnedItemSweep {
    pub fn new(pinning: PinningService) -> Self {
        Self { pinning }
    }
}

#[async_trait]
impl StartupTask for PinnedItemSweep {
    fn name(&self) -> &str {
        "pinned-item-sweep"
    }

    async fn start(&self) -> Result<()> {
        let removed = self.pinning.prune_orphaned_payloads().await?;
        if removed > 0 {
            info!("Startup sweep removed {} stale pinned item(s)", removed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localisation::ResourceStrings;
    use crate::models::{EntityKind, Video};
    use crate::settings::SqliteSettingsStore;
    use crate::tiles::{MemoryShortcutHost, PinnedItemStore, ShortcutManager, TileScheme};

    #[tokio::test]
    async fn test_launch_counter_increments() {
        let settings = Arc::new(SqliteSettingsStore::open_in_memory().unwrap());
        let counter = LaunchCounter::new(settings);

        assert_eq!(counter.count().await.unwrap(), 0);
        counter.start().await.unwrap();
        counter.start().await.unwrap();
        assert_eq!(counter.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_sweep_removes_orphans() {
        let host = Arc::new(MemoryShortcutHost::new());
        let settings = Arc::new(SqliteSettingsStore::open_in_memory().unwrap());
        let pinning = PinningService::new(
            TileScheme::default(),
            PinnedItemStore::new(settings),
            ShortcutManager::new(host.clone()),
            Arc::new(ResourceStrings::english()),
        );

        assert!(pinning.pin_video(&Video::new("1", "Kept")).await);
        assert!(pinning.pin_video(&Video::new("2", "Gone")).await);
        host.remove_externally(&pinning.scheme().tile_id(EntityKind::Video, "2"));

        PinnedItemSweep::new(pinning.clone()).start().await.unwrap();

        let ids = pinning.store().ids().await.unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].as_str(), "Video_1");
    }

    #[tokio::test]
    async fn test_sweep_fails_without_removing_when_host_down() {
        let host = Arc::new(MemoryShortcutHost::new());
        let settings = Arc::new(SqliteSettingsStore::open_in_memory().unwrap());
        let pinning = PinningService::new(
            TileScheme::default(),
            PinnedItemStore::new(settings),
            ShortcutManager::new(host.clone()),
            Arc::new(ResourceStrings::english()),
        );
        assert!(pinning.pin_video(&Video::new("1", "Kept")).await);

        host.set_available(false);
        assert!(PinnedItemSweep::new(pinning.clone()).start().await.is_err());

        let ids = pinning.store().ids().await.unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].as_str(), "Video_1");
    }
}
