//! Pin, unpin and query operations per entity kind.

use super::host::{Shortcut, ShortcutManager};
use super::scheme::{ShortcutId, TileScheme};
use super::store::{PinnedItemStore, PinnedPayload, PinnedRecord};
use crate::error::Result;
use crate::localisation::{Localizer, StringKeys};
use crate::models::{Channel, EntityKind, User, Video};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Public pinning surface.
///
/// A tile and its persisted record are written and removed together. Pin
/// state is always read from the shortcut host, never from the store.
#[derive(Clone)]
pub struct PinningService {
    scheme: TileScheme,
    store: PinnedItemStore,
    shortcuts: ShortcutManager,
    strings: Arc<dyn Localizer>,
}

impl PinningService {
    pub fn new(
        scheme: TileScheme,
        store: PinnedItemStore,
        shortcuts: ShortcutManager,
        strings: Arc<dyn Localizer>,
    ) -> Self {
        Self {
            scheme,
            store,
            shortcuts,
            strings,
        }
    }

    pub fn scheme(&self) -> &TileScheme {
        &self.scheme
    }

    pub fn store(&self) -> &PinnedItemStore {
        &self.store
    }

    // ========================================
    // Queries
    // ========================================

    pub async fn is_pinned(&self, kind: EntityKind, key: &str) -> bool {
        self.shortcuts.exists(&self.scheme.tile_id(kind, key)).await
    }

    pub async fn is_video_record_pinned(&self) -> bool {
        self.is_pinned(EntityKind::VideoRecordShortcut, "").await
    }

    pub async fn is_video_pinned(&self, video_id: &str) -> bool {
        self.is_pinned(EntityKind::Video, video_id).await
    }

    pub async fn is_channel_pinned(&self, channel_id: &str) -> bool {
        self.is_pinned(EntityKind::Channel, channel_id).await
    }

    pub async fn is_user_pinned(&self, user_id: &str) -> bool {
        self.is_pinned(EntityKind::User, user_id).await
    }

    /// The record persisted for a tile. Missing records are `PinnedPayload::None`.
    pub async fn get_pinned_item_details(
        &self,
        kind: EntityKind,
        key: &str,
    ) -> Result<PinnedPayload> {
        self.store
            .load_payload(kind, &self.scheme.tile_id(kind, key))
            .await
    }

    /// Typed variant of [`get_pinned_item_details`](Self::get_pinned_item_details).
    pub async fn load<T: PinnedRecord>(&self, key: &str) -> Result<Option<T>> {
        self.store.load(&self.scheme.tile_id(T::KIND, key)).await
    }

    /// Name of the icon file an icon producer should write for a tile.
    pub fn pin_file_name(&self, kind: EntityKind, key: &str, wide: bool) -> String {
        self.scheme.file_name(kind, key, wide)
    }

    // ========================================
    // Record shortcut
    // ========================================

    pub async fn pin_video_record(&self) -> bool {
        let name = self.strings.get_string(StringKeys::RECORD_VIDEO);
        self.pin_tile(EntityKind::VideoRecordShortcut, "", name, PinnedPayload::None, false)
            .await
    }

    pub async fn unpin_video_record(&self) -> bool {
        self.unpin(EntityKind::VideoRecordShortcut, "").await
    }

    /// Flip the record shortcut. Returns the pin state afterwards.
    pub async fn toggle_video_record(&self) -> bool {
        if self.is_video_record_pinned().await {
            self.unpin_video_record().await;
        } else {
            self.pin_video_record().await;
        }
        self.is_video_record_pinned().await
    }

    // ========================================
    // Entities
    // ========================================

    /// Pin a video. Blank titles show the localised "Untitled" string.
    pub async fn pin_video(&self, video: &Video) -> bool {
        let name = if video.is_untitled() {
            self.strings.get_string(StringKeys::UNTITLED)
        } else {
            video.title.clone()
        };
        self.pin_record(video, name, false).await
    }

    pub async fn unpin_video(&self, video_id: &str) -> bool {
        self.unpin(EntityKind::Video, video_id).await
    }

    pub async fn pin_channel(&self, channel: &Channel) -> bool {
        self.pin_record(channel, channel.title.clone(), true).await
    }

    pub async fn unpin_channel(&self, channel_id: &str) -> bool {
        self.unpin(EntityKind::Channel, channel_id).await
    }

    pub async fn pin_user(&self, user: &User) -> bool {
        self.pin_record(user, user.username.clone(), true).await
    }

    pub async fn unpin_user(&self, user_id: &str) -> bool {
        self.unpin(EntityKind::User, user_id).await
    }

    async fn pin_record<T: PinnedRecord + Clone>(
        &self,
        record: &T,
        display_name: String,
        include_wide: bool,
    ) -> bool {
        let key = record.entity_key();
        if key.is_empty() {
            warn!("Refusing to pin {} with an empty id", T::KIND);
            return false;
        }
        self.pin_tile(
            T::KIND,
            key,
            display_name,
            record.clone().into_payload(),
            include_wide,
        )
        .await
    }

    /// Save the record, then ask the host for the tile.
    ///
    /// The record may outlive a failed creation; callers must treat a
    /// `false` result as "not pinned".
    async fn pin_tile(
        &self,
        kind: EntityKind,
        key: &str,
        display_name: String,
        payload: PinnedPayload,
        include_wide: bool,
    ) -> bool {
        let id = self.scheme.tile_id(kind, key);

        if kind.has_payload() {
            if let Err(e) = self.store.save_payload(&id, &payload).await {
                error!("Failed to save pinned item {}: {}", id, e);
                return false;
            }
        }

        let mut shortcut = Shortcut::new(
            id.clone(),
            display_name,
            self.scheme.activation_arguments(kind, key),
            self.scheme.icon_url(kind, key),
        );
        if include_wide {
            shortcut = shortcut.with_wide_icon(self.scheme.wide_icon_url(kind, key), true);
        }

        let created = self.shortcuts.create(&shortcut).await;
        if created {
            info!("Pinned {}", id);
        }
        created
    }

    /// Delete the tile and purge its record.
    ///
    /// The record is purged whatever the deletion outcome, so the store
    /// never grows across pin/unpin cycles.
    async fn unpin(&self, kind: EntityKind, key: &str) -> bool {
        let id = self.scheme.tile_id(kind, key);
        let deleted = self.shortcuts.delete(&id).await;

        if kind.has_payload() {
            if let Err(e) = self.store.remove(&id).await {
                warn!("Failed to remove pinned item {}: {}", id, e);
            }
        }

        if deleted {
            info!("Unpinned {}", id);
        }
        deleted
    }

    // ========================================
    // Housekeeping
    // ========================================

    /// Remove records whose tile no longer exists, e.g. after the user
    /// unpinned from the launcher. Returns how many were removed.
    ///
    /// # Errors
    /// Any host failure aborts the sweep before a record is removed.
    pub async fn prune_orphaned_payloads(&self) -> Result<usize> {
        let live: HashSet<ShortcutId> = self
            .shortcuts
            .try_find_all()
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();

        let mut orphaned = Vec::new();
        for id in self.store.ids().await? {
            if live.contains(&id) || self.shortcuts.try_exists(&id).await? {
                continue;
            }
            orphaned.push(id);
        }

        let mut removed = 0;
        for id in orphaned {
            if self.store.remove(&id).await? {
                removed += 1;
            }
        }

        if removed > 0 {
            info!("Pruned {} orphaned pinned item(s)", removed);
        }
        Ok(removed)
    }
}
