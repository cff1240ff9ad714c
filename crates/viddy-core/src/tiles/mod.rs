//! Pinned tiles.
//!
//! - `scheme` - identifiers, icon URLs, file names and tile arguments
//! - `store` - the record persisted for each tile
//! - `host` - the platform shortcut collaborator and its failure-absorbing
//!   manager
//! - `memory` - an in-process shortcut host
//! - `service` - pin/unpin/query per entity kind
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use viddy_core::localisation::ResourceStrings;
//! use viddy_core::models::Video;
//! use viddy_core::settings::SqliteSettingsStore;
//! use viddy_core::tiles::*;
//!
//! let service = PinningService::new(
//!     TileScheme::default(),
//!     PinnedItemStore::new(Arc::new(SqliteSettingsStore::open_in_memory()?)),
//!     ShortcutManager::new(Arc::new(MemoryShortcutHost::new())),
//!     Arc::new(ResourceStrings::english()),
//! );
//! service.pin_video(&Video::new("42", "Cats")).await;
//! ```

mod host;
mod memory;
mod scheme;
mod service;
mod store;

pub use host::{Shortcut, ShortcutHost, ShortcutManager};
pub use memory::MemoryShortcutHost;
pub use scheme::{ShortcutId, TileScheme, TILE_ID_KEY, TILE_TYPE_KEY};
pub use service::PinningService;
pub use store::{PinnedItemStore, PinnedPayload, PinnedRecord};
