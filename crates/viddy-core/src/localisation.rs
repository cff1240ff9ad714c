//! Localised display strings.

use crate::error::{Result, ViddyError};
use std::collections::HashMap;
use std::path::Path;

/// Well-known string resource keys.
pub struct StringKeys;

impl StringKeys {
    pub const UNTITLED: &'static str = "Untitled";
    pub const RECORD_VIDEO: &'static str = "RecordVideo";
}

/// Lookup of localised strings by resource key.
pub trait Localizer: Send + Sync {
    /// The string for `key`. An empty key yields an empty string.
    fn get_string(&self, key: &str) -> String;
}

/// Key → string table.
///
/// Unknown keys resolve to the key itself so a missing translation still
/// renders something readable.
#[derive(Debug, Clone)]
pub struct ResourceStrings {
    strings: HashMap<String, String>,
}

impl ResourceStrings {
    /// The built-in English strings.
    pub fn english() -> Self {
        let strings = [
            (StringKeys::UNTITLED, "Untitled"),
            (StringKeys::RECORD_VIDEO, "Record video"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self { strings }
    }

    /// English defaults overlaid with a JSON object of translations.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ViddyError::io_with_path(e, path))?;
        let overrides: HashMap<String, String> =
            serde_json::from_str(&contents).map_err(|e| ViddyError::Json {
                message: format!("Failed to parse {}: {}", path.display(), e),
                source: Some(e),
            })?;

        let mut strings = Self::english();
        strings.strings.extend(overrides);
        Ok(strings)
    }
}

impl Default for ResourceStrings {
    fn default() -> Self {
        Self::english()
    }
}

impl Localizer for ResourceStrings {
    fn get_string(&self, key: &str) -> String {
        if key.is_empty() {
            return String::new();
        }
        self.strings
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
