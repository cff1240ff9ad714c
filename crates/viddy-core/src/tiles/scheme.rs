//! Deterministic naming for tiles: identifiers, icon URLs, file names and
//! activation arguments.
//!
//! Every derivation folds `(kind, key)` through the same stem so that a
//! tile's identifier, its icon URLs and its icon files always agree.

use crate::config::{KeyEncoding, TileConfig};
use crate::models::EntityKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Query key marking activation arguments that came from a pinned tile.
pub const TILE_TYPE_KEY: &str = "tileType";

/// Query key carrying the entity key in tile arguments and deep links.
pub const TILE_ID_KEY: &str = "id";

/// Identifier of a pinned shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortcutId(String);

impl ShortcutId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ShortcutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortcutId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Pure naming functions parameterised by [`TileConfig`].
#[derive(Debug, Clone)]
pub struct TileScheme {
    config: TileConfig,
}

impl TileScheme {
    pub fn new(config: TileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TileConfig {
        &self.config
    }

    pub fn protocol_scheme(&self) -> &str {
        &self.config.protocol_scheme
    }

    /// The shared `(kind, key)` encoding.
    fn stem(&self, kind: EntityKind, key: &str) -> String {
        if key.is_empty() {
            return kind.as_str().to_string();
        }
        match self.config.key_encoding {
            KeyEncoding::Separated => format!("{}{}{}", kind, KeyEncoding::SEPARATOR, key),
            KeyEncoding::Concatenated => format!("{}{}", kind, key),
        }
    }

    fn root(&self) -> &str {
        self.config.local_file_root.trim_end_matches('/')
    }

    /// Identifier of the tile for an entity.
    pub fn tile_id(&self, kind: EntityKind, key: &str) -> ShortcutId {
        ShortcutId(self.stem(kind, key))
    }

    /// Square icon URL.
    pub fn icon_url(&self, kind: EntityKind, key: &str) -> String {
        format!("{}/{}", self.root(), self.file_name(kind, key, false))
    }

    /// Wide icon URL. Only meaningful for tiles created with a wide face.
    pub fn wide_icon_url(&self, kind: EntityKind, key: &str) -> String {
        format!("{}/{}", self.root(), self.file_name(kind, key, true))
    }

    /// File backing [`icon_url`](Self::icon_url) or
    /// [`wide_icon_url`](Self::wide_icon_url) under the local root.
    pub fn file_name(&self, kind: EntityKind, key: &str, wide: bool) -> String {
        if wide {
            format!("{}Wide.png", self.stem(kind, key))
        } else {
            format!("{}.png", self.stem(kind, key))
        }
    }

    /// Arguments the platform hands back when the tile is tapped.
    ///
    /// The authority is left empty so the string never reads as a
    /// host-routed deep link.
    pub fn activation_arguments(&self, kind: EntityKind, key: &str) -> String {
        format!(
            "{}://?{}={}&{}={}",
            self.config.protocol_scheme,
            TILE_TYPE_KEY,
            kind,
            TILE_ID_KEY,
            urlencoding::encode(key)
        )
    }
}

impl Default for TileScheme {
    fn default() -> Self {
        Self::new(TileConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tile_id_format() {
        let scheme = TileScheme::default();
        assert_eq!(scheme.tile_id(EntityKind::Video, "12").as_str(), "Video_12");
        assert_eq!(
            scheme.tile_id(EntityKind::VideoRecordShortcut, "").as_str(),
            "VideoRecordShortcut"
        );
    }

    #[test]
    fn test_tile_id_injective() {
        let scheme = TileScheme::default();
        let keys = ["", "1", "12", "2", "User", "_1", "1_2", "Record"];
        let mut seen = HashSet::new();
        for kind in EntityKind::ALL {
            for key in keys {
                assert!(
                    seen.insert(scheme.tile_id(kind, key)),
                    "collision for {}/{}",
                    kind,
                    key
                );
            }
        }
    }

    #[test]
    fn test_concatenated_encoding_matches_legacy_keys() {
        let scheme = TileScheme::new(TileConfig {
            key_encoding: KeyEncoding::Concatenated,
            ..TileConfig::default()
        });
        assert_eq!(scheme.tile_id(EntityKind::Channel, "7").as_str(), "Channel7");
        assert_eq!(scheme.file_name(EntityKind::Channel, "7", true), "Channel7Wide.png");
    }

    #[test]
    fn test_icon_urls_share_the_stem() {
        let scheme = TileScheme::default();
        let id = scheme.tile_id(EntityKind::User, "abc");
        assert_eq!(
            scheme.icon_url(EntityKind::User, "abc"),
            format!("ms-appdata:///Local/{}.png", id)
        );
        assert_eq!(
            scheme.wide_icon_url(EntityKind::User, "abc"),
            format!("ms-appdata:///Local/{}Wide.png", id)
        );
        assert_eq!(scheme.file_name(EntityKind::User, "abc", false), "User_abc.png");
    }

    #[test]
    fn test_activation_arguments() {
        let scheme = TileScheme::default();
        assert_eq!(
            scheme.activation_arguments(EntityKind::Video, "a b"),
            "viddy://?tileType=Video&id=a%20b"
        );
    }
}
