//! Process-wide notifications published ahead of navigation.
//!
//! Pages subscribe to the [`MessageBus`] and pick up whatever the launch
//! path published for them while they load.

use crate::config::MessagingConfig;
use crate::models::{EntityKind, SharedFile};
use crate::tiles::PinnedPayload;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

/// A notification on the bus.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// Pin state may have changed; bound UI should re-query.
    PinStateChanged,
    /// Record restored from a tile tap. `payload` is `None` when the record
    /// was missing.
    EntityDetail {
        kind: EntityKind,
        payload: PinnedPayload,
    },
    /// Search requested through a deep link.
    ProtocolSearch { query: String, include_nsfw: bool },
    /// Entity requested through a deep link; the destination fetches it.
    ProtocolEntity { kind: EntityKind, id: String },
    /// A video handed to the app for upload.
    VideoFile { file: SharedFile },
    /// A picked image for the profile editor.
    ProfileImage { file: SharedFile },
}

/// Broadcast channel for [`Notification`]s.
#[derive(Debug, Clone)]
pub struct MessageBus {
    sender: broadcast::Sender<Notification>,
}

impl MessageBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Publish to every current subscriber. Returns how many received it;
    /// publishing with no subscribers is not an error.
    pub fn publish(&self, notification: Notification) -> usize {
        match self.sender.send(notification) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(notification)) => {
                debug!("No subscribers for {:?}", notification);
                0
            }
        }
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new(MessagingConfig::BUS_CAPACITY)
    }
}

/// Platform notification center holding delivered toasts.
pub trait NotificationHistory: Send + Sync {
    /// Clear a delivered notification. Unknown ids are ignored.
    fn remove(&self, notification_id: &str);
}
