//! SQLite-backed settings store.

use super::SettingsStore;
use crate::config::SettingsConfig;
use crate::error::{Result, ViddyError};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// SQLite settings store.
///
/// Entries are isolated by container; handles for different containers
/// share one connection. Thread-safe via an internal mutex.
#[derive(Clone)]
pub struct SqliteSettingsStore {
    conn: Arc<Mutex<Connection>>,
    container: String,
}

impl SqliteSettingsStore {
    /// Open (or create) the settings database at `db_path`.
    ///
    /// The returned handle addresses the app container.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ViddyError::Io {
                message: format!("Failed to create settings directory: {}", e),
                path: Some(parent.to_path_buf()),
                source: Some(e),
            })?;
        }

        let conn = Connection::open(db_path).map_err(|e| ViddyError::Database {
            message: format!("Failed to open settings database: {}", e),
            source: Some(e),
        })?;

        conn.execute_batch(&format!(
            "PRAGMA journal_mode=WAL;\n\
             PRAGMA busy_timeout={};\n\
             PRAGMA synchronous=NORMAL;",
            SettingsConfig::BUSY_TIMEOUT_MS,
        ))
        .map_err(|e| ViddyError::Database {
            message: format!("Failed to set pragmas: {}", e),
            source: Some(e),
        })?;

        Self::from_connection(conn)
    }

    /// Open a throwaway in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        Self::ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            container: SettingsConfig::APP_CONTAINER.to_string(),
        })
    }

    fn ensure_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                container TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (container, key)
            );
            "#,
        )
        .map_err(|e| ViddyError::Database {
            message: format!("Failed to initialize settings schema: {}", e),
            source: Some(e),
        })?;
        Ok(())
    }

    /// A handle scoped to another container of the same database.
    pub fn container(&self, name: &str) -> Self {
        Self {
            conn: self.conn.clone(),
            container: name.to_string(),
        }
    }

    pub fn container_name(&self) -> &str {
        &self.container
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| ViddyError::Database {
            message: "Failed to acquire settings connection lock".to_string(),
            source: None,
        })
    }
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn contains(&self, key: &str) -> Result<bool> {
        let conn = self.lock_conn()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM settings WHERE container = ?1 AND key = ?2",
                params![self.container, key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM settings WHERE container = ?1 AND key = ?2",
                params![self.container, key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        let now = Utc::now().to_rfc3339();
        conn.execute(
            r#"
            INSERT INTO settings (container, key, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(container, key) DO UPDATE SET
                value = ?3,
                updated_at = ?4
            "#,
            params![self.container, key, value, now],
        )?;
        debug!("Stored setting {}/{}", self.container, key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let conn = self.lock_conn()?;
        let rows = conn.execute(
            "DELETE FROM settings WHERE container = ?1 AND key = ?2",
            params![self.container, key],
        )?;
        Ok(rows > 0)
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let conn = self.lock_conn()?;
        let mut stmt =
            conn.prepare("SELECT key FROM settings WHERE container = ?1 ORDER BY key")?;
        let keys = stmt
            .query_map(params![self.container], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}
