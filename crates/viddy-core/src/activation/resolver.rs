//! Normalises activation input into a destination and a notification.

use super::link::{query_value, DeepLink, NOTIFICATION_ID_KEY};
use crate::error::{Result, ViddyError};
use crate::messaging::Notification;
use crate::models::EntityKind;
use crate::tiles::{PinnedItemStore, PinnedPayload, TileScheme, TILE_ID_KEY, TILE_TYPE_KEY};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

/// Page an activation lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Main,
    VideoRecord,
    Channel,
    Profile,
    VideoPlayer,
    Search,
    UploadVideo,
}

/// Result of resolving one activation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivationOutcome {
    pub destination: Destination,
    /// Published before navigating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    /// Delivered notification the activation came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismiss_notification: Option<String>,
}

impl ActivationOutcome {
    pub fn to(destination: Destination) -> Self {
        Self {
            destination,
            notification: None,
            dismiss_notification: None,
        }
    }

    pub fn main() -> Self {
        Self::to(Destination::Main)
    }

    pub fn with_notification(mut self, notification: Notification) -> Self {
        self.notification = Some(notification);
        self
    }
}

/// Whether launch arguments came from a tile tap.
pub fn is_from_secondary_tile(arguments: &str) -> bool {
    !arguments.is_empty() && arguments.contains(TILE_TYPE_KEY)
}

fn has_host(url: &Url) -> bool {
    url.host_str().map(|h| !h.is_empty()).unwrap_or(false)
}

/// Resolves protocol links and tile arguments.
#[derive(Clone)]
pub struct ActivationResolver {
    scheme: TileScheme,
    store: PinnedItemStore,
}

impl ActivationResolver {
    pub fn new(scheme: TileScheme, store: PinnedItemStore) -> Self {
        Self { scheme, store }
    }

    /// Resolve a host-routed protocol link. Never fails: anything that
    /// cannot be routed lands on `Main`.
    pub fn resolve_protocol(&self, url: &Url) -> ActivationOutcome {
        let mut outcome = if url.scheme() != self.scheme.protocol_scheme() {
            warn!("Ignoring link with foreign scheme: {}", url);
            ActivationOutcome::main()
        } else {
            match DeepLink::from_url(url) {
                Ok(Some(link)) => Self::outcome_for_link(link),
                Ok(None) => {
                    debug!("Unrecognized link host in {}", url);
                    ActivationOutcome::main()
                }
                Err(e) => {
                    warn!("{}", e);
                    ActivationOutcome::main()
                }
            }
        };

        outcome.dismiss_notification =
            query_value(url, NOTIFICATION_ID_KEY).filter(|id| !id.is_empty());
        outcome
    }

    /// [`resolve_protocol`](Self::resolve_protocol) for raw input.
    pub fn resolve_protocol_str(&self, uri: &str) -> ActivationOutcome {
        match Url::parse(uri) {
            Ok(url) => self.resolve_protocol(&url),
            Err(e) => {
                warn!("Malformed protocol URI {:?}: {}", uri, e);
                ActivationOutcome::main()
            }
        }
    }

    fn outcome_for_link(link: DeepLink) -> ActivationOutcome {
        match link {
            DeepLink::Record => ActivationOutcome::to(Destination::VideoRecord),
            DeepLink::Search {
                query,
                include_nsfw,
            } => ActivationOutcome::to(Destination::Search).with_notification(
                Notification::ProtocolSearch {
                    query,
                    include_nsfw,
                },
            ),
            DeepLink::User { id } => ActivationOutcome::to(Destination::Profile)
                .with_notification(Notification::ProtocolEntity {
                    kind: EntityKind::User,
                    id,
                }),
            DeepLink::Channel { id } => ActivationOutcome::to(Destination::Channel)
                .with_notification(Notification::ProtocolEntity {
                    kind: EntityKind::Channel,
                    id,
                }),
            DeepLink::Video { id } => ActivationOutcome::to(Destination::VideoPlayer)
                .with_notification(Notification::ProtocolEntity {
                    kind: EntityKind::Video,
                    id,
                }),
        }
    }

    /// Resolve the arguments of a tile tap.
    ///
    /// # Errors
    /// `UnrecognizedTileType` for a `tileType` outside [`EntityKind`];
    /// `MalformedActivation` when the arguments do not parse or lack an
    /// `id`. A missing stored record is not an error.
    pub async fn resolve_tile_arguments(&self, arguments: &str) -> Result<ActivationOutcome> {
        let url = Url::parse(arguments).map_err(|e| ViddyError::MalformedActivation {
            message: format!("{:?}: {}", arguments, e),
        })?;

        let tile_type =
            query_value(&url, TILE_TYPE_KEY).ok_or_else(|| ViddyError::MalformedActivation {
                message: format!("{:?} has no {}", arguments, TILE_TYPE_KEY),
            })?;
        let kind: EntityKind = tile_type.parse()?;

        if kind == EntityKind::VideoRecordShortcut {
            return Ok(ActivationOutcome::to(Destination::VideoRecord));
        }

        let key = query_value(&url, TILE_ID_KEY)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ViddyError::MalformedActivation {
                message: format!("{:?} has no {}", arguments, TILE_ID_KEY),
            })?;

        let payload = match self
            .store
            .load_payload(kind, &self.scheme.tile_id(kind, &key))
            .await
        {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to load pinned {} {}: {}", kind, key, e);
                PinnedPayload::None
            }
        };
        if payload.is_none() {
            debug!("No stored record for pinned {} {}", kind, key);
        }

        let destination = match kind {
            EntityKind::Channel => Destination::Channel,
            EntityKind::User => Destination::Profile,
            EntityKind::Video => Destination::VideoPlayer,
            EntityKind::VideoRecordShortcut => Destination::VideoRecord,
        };
        Ok(ActivationOutcome::to(destination)
            .with_notification(Notification::EntityDetail { kind, payload }))
    }

    /// Resolve launch arguments of any shape.
    ///
    /// Host-routed links under the app scheme win, then tile arguments,
    /// then `Main`. Malformed tile arguments fall back to `Main`; an
    /// unrecognized tile type is returned as an error.
    pub async fn resolve_launch_arguments(&self, arguments: &str) -> Result<ActivationOutcome> {
        let arguments = arguments.trim();
        if arguments.is_empty() {
            return Ok(ActivationOutcome::main());
        }

        if let Ok(url) = Url::parse(arguments) {
            if url.scheme() == self.scheme.protocol_scheme() && has_host(&url) {
                return Ok(self.resolve_protocol(&url));
            }
        }

        if !is_from_secondary_tile(arguments) {
            debug!("Launch arguments not routable: {:?}", arguments);
            return Ok(ActivationOutcome::main());
        }

        match self.resolve_tile_arguments(arguments).await {
            Err(e) if e.is_recoverable() => {
                warn!("Falling back to main page: {}", e);
                Ok(ActivationOutcome::main())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Channel, Video};
    use crate::settings::SqliteSettingsStore;
    use crate::tiles::ShortcutId;
    use std::sync::Arc;

    fn tile_id(kind: EntityKind, key: &str) -> ShortcutId {
        TileScheme::default().tile_id(kind, key)
    }

    fn resolver() -> ActivationResolver {
        let store = PinnedItemStore::new(Arc::new(SqliteSettingsStore::open_in_memory().unwrap()));
        ActivationResolver::new(TileScheme::default(), store)
    }

    #[test]
    fn test_is_from_secondary_tile() {
        assert!(!is_from_secondary_tile(""));
        assert!(!is_from_secondary_tile("https://x/y?other=1"));
        assert!(is_from_secondary_tile("https://x/y?tileType=Video&id=1"));
    }

    #[test]
    fn test_protocol_search() {
        let outcome = resolver().resolve_protocol_str("viddy://search?query=cats&nsfw=true");
        assert_eq!(outcome.destination, Destination::Search);
        assert_eq!(
            outcome.notification,
            Some(Notification::ProtocolSearch {
                query: "cats".to_string(),
                include_nsfw: true
            })
        );
    }

    #[test]
    fn test_protocol_video() {
        let outcome = resolver().resolve_protocol_str("viddy://video?id=42");
        assert_eq!(outcome.destination, Destination::VideoPlayer);
        assert_eq!(
            outcome.notification,
            Some(Notification::ProtocolEntity {
                kind: EntityKind::Video,
                id: "42".to_string()
            })
        );
    }

    #[test]
    fn test_protocol_fallbacks() {
        let resolver = resolver();
        assert_eq!(resolver.resolve_protocol_str("viddy://nowhere"), ActivationOutcome::main());
        assert_eq!(resolver.resolve_protocol_str("viddy://user"), ActivationOutcome::main());
        assert_eq!(resolver.resolve_protocol_str("not a uri"), ActivationOutcome::main());
        assert_eq!(
            resolver.resolve_protocol_str("other://video?id=1"),
            ActivationOutcome::main()
        );
    }

    #[test]
    fn test_protocol_notification_id() {
        let outcome = resolver().resolve_protocol_str("viddy://record?notificationId=n-9");
        assert_eq!(outcome.destination, Destination::VideoRecord);
        assert_eq!(outcome.dismiss_notification.as_deref(), Some("n-9"));
    }

    #[tokio::test]
    async fn test_tile_restores_payload() {
        let resolver = resolver();
        let channel = Channel::new("7", "X");
        resolver
            .store
            .save(&tile_id(EntityKind::Channel, "7"), &channel)
            .await
            .unwrap();

        let outcome = resolver
            .resolve_tile_arguments("viddy://?tileType=Channel&id=7")
            .await
            .unwrap();
        assert_eq!(outcome.destination, Destination::Channel);
        assert_eq!(
            outcome.notification,
            Some(Notification::EntityDetail {
                kind: EntityKind::Channel,
                payload: PinnedPayload::Channel(channel)
            })
        );
    }

    #[tokio::test]
    async fn test_tile_missing_payload_passes_through() {
        let outcome = resolver()
            .resolve_tile_arguments("viddy://?tileType=Video&id=404")
            .await
            .unwrap();
        assert_eq!(outcome.destination, Destination::VideoPlayer);
        assert_eq!(
            outcome.notification,
            Some(Notification::EntityDetail {
                kind: EntityKind::Video,
                payload: PinnedPayload::None
            })
        );
    }

    #[tokio::test]
    async fn test_tile_record_shortcut() {
        let outcome = resolver()
            .resolve_tile_arguments("viddy://?tileType=VideoRecordShortcut&id=")
            .await
            .unwrap();
        assert_eq!(outcome, ActivationOutcome::to(Destination::VideoRecord));
    }

    #[tokio::test]
    async fn test_unknown_tile_type_fails() {
        let resolver = resolver();
        let err = resolver
            .resolve_tile_arguments("viddy://?tileType=NotAKind&id=1")
            .await
            .unwrap_err();
        assert!(matches!(err, ViddyError::UnrecognizedTileType { .. }));

        let err = resolver
            .resolve_launch_arguments("viddy://?tileType=NotAKind&id=1")
            .await
            .unwrap_err();
        assert!(matches!(err, ViddyError::UnrecognizedTileType { .. }));
    }

    #[tokio::test]
    async fn test_launch_argument_precedence() {
        let resolver = resolver();
        resolver
            .store
            .save(&tile_id(EntityKind::Video, "1"), &Video::new("1", "Clip"))
            .await
            .unwrap();

        let outcome = resolver.resolve_launch_arguments("").await.unwrap();
        assert_eq!(outcome, ActivationOutcome::main());

        let outcome = resolver
            .resolve_launch_arguments("viddy://channel?id=3&tileType=Video")
            .await
            .unwrap();
        assert_eq!(outcome.destination, Destination::Channel);

        let outcome = resolver
            .resolve_launch_arguments("viddy://?tileType=Video&id=1")
            .await
            .unwrap();
        assert_eq!(outcome.destination, Destination::VideoPlayer);

        let outcome = resolver.resolve_launch_arguments("tileType=Video").await.unwrap();
        assert_eq!(outcome, ActivationOutcome::main());

        let outcome = resolver
            .resolve_launch_arguments("viddy://?tileType=User")
            .await
            .unwrap();
        assert_eq!(outcome, ActivationOutcome::main());
    }
}
