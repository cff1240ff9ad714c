//! Persistence of the domain record behind each pinned tile.

use super::scheme::ShortcutId;
use crate::error::Result;
use crate::models::{Channel, EntityKind, User, Video};
use crate::settings::{read_json, write_json, SettingsStore};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// The record associated with a tile, if its kind carries one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "item")]
pub enum PinnedPayload {
    /// Record-shortcut tiles, and tiles whose record is missing.
    #[default]
    None,
    Video(Video),
    Channel(Channel),
    User(User),
}

impl PinnedPayload {
    pub fn is_none(&self) -> bool {
        matches!(self, PinnedPayload::None)
    }

    /// Kind of the wrapped record.
    pub fn kind(&self) -> Option<EntityKind> {
        match self {
            PinnedPayload::None => None,
            PinnedPayload::Video(_) => Some(EntityKind::Video),
            PinnedPayload::Channel(_) => Some(EntityKind::Channel),
            PinnedPayload::User(_) => Some(EntityKind::User),
        }
    }
}

/// A record type that can be pinned; fixes the kind at the type level.
pub trait PinnedRecord: Serialize + DeserializeOwned + Send + Sync {
    const KIND: EntityKind;

    /// Key of the entity within its kind.
    fn entity_key(&self) -> &str;

    fn into_payload(self) -> PinnedPayload;
}

impl PinnedRecord for Video {
    const KIND: EntityKind = EntityKind::Video;

    fn entity_key(&self) -> &str {
        &self.video_id
    }

    fn into_payload(self) -> PinnedPayload {
        PinnedPayload::Video(self)
    }
}

impl PinnedRecord for Channel {
    const KIND: EntityKind = EntityKind::Channel;

    fn entity_key(&self) -> &str {
        &self.channel_id
    }

    fn into_payload(self) -> PinnedPayload {
        PinnedPayload::Channel(self)
    }
}

impl PinnedRecord for User {
    const KIND: EntityKind = EntityKind::User;

    fn entity_key(&self) -> &str {
        &self.user_id
    }

    fn into_payload(self) -> PinnedPayload {
        PinnedPayload::User(self)
    }
}

/// Tile-keyed record storage on top of a [`SettingsStore`].
///
/// Records are stored as plain JSON of the record itself, keyed by the
/// tile identifier.
#[derive(Clone)]
pub struct PinnedItemStore {
    settings: Arc<dyn SettingsStore>,
}

impl PinnedItemStore {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self { settings }
    }

    /// Upsert a record. An existing entry is replaced, never merged.
    pub async fn save<T: PinnedRecord>(&self, id: &ShortcutId, record: &T) -> Result<()> {
        write_json(self.settings.as_ref(), id.as_str(), record).await?;
        debug!("Saved pinned {} under {}", T::KIND, id);
        Ok(())
    }

    /// Upsert whatever `payload` wraps. `PinnedPayload::None` stores nothing.
    pub async fn save_payload(&self, id: &ShortcutId, payload: &PinnedPayload) -> Result<()> {
        match payload {
            PinnedPayload::None => Ok(()),
            PinnedPayload::Video(video) => self.save(id, video).await,
            PinnedPayload::Channel(channel) => self.save(id, channel).await,
            PinnedPayload::User(user) => self.save(id, user).await,
        }
    }

    /// Typed load. Absent entries yield `Ok(None)`.
    pub async fn load<T: PinnedRecord>(&self, id: &ShortcutId) -> Result<Option<T>> {
        read_json(self.settings.as_ref(), id.as_str()).await
    }

    /// Load the record for a tile of `kind`.
    pub async fn load_payload(&self, kind: EntityKind, id: &ShortcutId) -> Result<PinnedPayload> {
        let payload = match kind {
            EntityKind::VideoRecordShortcut => None,
            EntityKind::Video => self.load::<Video>(id).await?.map(PinnedPayload::Video),
            EntityKind::Channel => self.load::<Channel>(id).await?.map(PinnedPayload::Channel),
            EntityKind::User => self.load::<User>(id).await?.map(PinnedPayload::User),
        };
        Ok(payload.unwrap_or_default())
    }

    pub async fn contains(&self, id: &ShortcutId) -> Result<bool> {
        self.settings.contains(id.as_str()).await
    }

    /// Remove a record. No-op when absent; returns whether one existed.
    pub async fn remove(&self, id: &ShortcutId) -> Result<bool> {
        self.settings.remove(id.as_str()).await
    }

    /// Identifiers of every stored record.
    pub async fn ids(&self) -> Result<Vec<ShortcutId>> {
        let keys = self.settings.keys().await?;
        Ok(keys.into_iter().map(ShortcutId::new).collect())
    }
}
