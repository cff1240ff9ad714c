//! Viddy Core - pinned shortcuts and deep-link activation routing for the
//! Viddy video client.
//!
//! The crate creates and removes launcher shortcuts ("tiles") bound to
//! videos, channels, users and the record screen, keeps the record behind
//! each tile so it can be shown without a network round trip, and resolves
//! inbound activations (tile taps, deep links, shares) into a navigation
//! plus a notification published ahead of it.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use viddy_core::activation::ActivationResolver;
//! use viddy_core::launch::{LaunchOrchestrator, LifecycleEvent};
//! use viddy_core::messaging::MessageBus;
//!
//! let resolver = ActivationResolver::new(scheme.clone(), store.clone());
//! let orchestrator = LaunchOrchestrator::new(resolver, MessageBus::default(), navigator, history);
//!
//! let request = orchestrator
//!     .handle(LifecycleEvent::Launched {
//!         arguments: "viddy://?tileType=Channel&id=7".to_string(),
//!     })
//!     .await?;
//! ```

pub mod activation;
pub mod config;
pub mod error;
pub mod launch;
pub mod localisation;
pub mod messaging;
pub mod models;
pub mod platform;
pub mod settings;
pub mod tiles;

// Re-export commonly used types
pub use activation::{ActivationOutcome, ActivationResolver, DeepLink, Destination};
pub use config::{KeyEncoding, TileConfig};
pub use error::{Result, ViddyError};
pub use launch::{LaunchOrchestrator, LifecycleEvent, NavigationRequest, Navigator};
pub use localisation::{Localizer, ResourceStrings};
pub use messaging::{MessageBus, Notification, NotificationHistory};
pub use models::{Channel, EntityKind, SharedFile, User, Video};
pub use platform::DesktopShortcutHost;
pub use settings::{SettingsStore, SqliteSettingsStore};
pub use tiles::{PinnedItemStore, PinnedPayload, PinningService, ShortcutId, TileScheme};
