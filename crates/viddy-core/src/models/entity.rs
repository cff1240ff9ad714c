//! The closed set of pinnable entity kinds.

use crate::error::ViddyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pinnable entity categories.
///
/// The names returned by [`EntityKind::as_str`] are what appears in tile
/// identifiers, icon file names and the `tileType` activation argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    VideoRecordShortcut,
    Video,
    Channel,
    User,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::VideoRecordShortcut,
        EntityKind::Video,
        EntityKind::Channel,
        EntityKind::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::VideoRecordShortcut => "VideoRecordShortcut",
            EntityKind::Video => "Video",
            EntityKind::Channel => "Channel",
            EntityKind::User => "User",
        }
    }

    /// Whether a domain record is persisted alongside the shortcut.
    pub fn has_payload(&self) -> bool {
        !matches!(self, EntityKind::VideoRecordShortcut)
    }
}

impl FromStr for EntityKind {
    type Err = ViddyError;

    /// Exact, case-sensitive match against the closed set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ViddyError::UnrecognizedTileType {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
