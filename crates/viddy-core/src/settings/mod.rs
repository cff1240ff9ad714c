//! Local key-value settings.
//!
//! The [`SettingsStore`] trait is the persistence collaborator the pinning
//! code depends on. Values are JSON strings; [`read_json`] and
//! [`write_json`] add typed (de)serialization on top.

mod sqlite;

pub use sqlite::SqliteSettingsStore;

use crate::error::{Result, ViddyError};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

/// String-keyed settings container.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Whether an entry exists under `key`.
    async fn contains(&self, key: &str) -> Result<bool>;

    /// Raw value under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any existing entry.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the entry under `key`. Returns whether one existed.
    async fn remove(&self, key: &str) -> Result<bool>;

    /// All keys in this container.
    async fn keys(&self) -> Result<Vec<String>>;
}

/// Read and deserialize the value under `key`.
pub async fn read_json<T: DeserializeOwned>(
    store: &dyn SettingsStore,
    key: &str,
) -> Result<Option<T>> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };

    let value = serde_json::from_str(&raw).map_err(|e| ViddyError::Json {
        message: format!("Failed to parse setting {}: {}", key, e),
        source: Some(e),
    })?;
    Ok(Some(value))
}

/// Serialize `value` and store it under `key`.
pub async fn write_json<T: Serialize + ?Sized>(
    store: &dyn SettingsStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value).map_err(|e| ViddyError::Json {
        message: format!("Failed to serialize setting {}: {}", key, e),
        source: Some(e),
    })?;
    store.set(key, &raw).await
}
