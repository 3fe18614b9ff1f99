use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{PersistentStore, StorageError};

mod migrate;

/// Storage key custom banks are saved under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "grammar_master_banks";

/// Blob store backed by a single `SQLite` row per key.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    key: String,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteStore {
    /// Connect to `SQLite` using the given URL, storing under `DEFAULT_STORAGE_KEY`.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let mut options = SqlitePoolOptions::new().max_connections(1);
        if is_memory_url(database_url) {
            // An in-memory database dies with its last connection; never let
            // the pool reap or recycle it.
            options = options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = options
            .acquire_timeout(Duration::from_secs(5))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA journal_mode = WAL;")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query("PRAGMA busy_timeout = 5000;")
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        Ok(Self {
            pool,
            key: DEFAULT_STORAGE_KEY.to_owned(),
        })
    }

    /// Use a different storage key on the same database.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if migration queries fail.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }

    /// Connect and migrate in one step.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection or migrations cannot be
    /// completed.
    pub async fn open(database_url: &str) -> Result<Self, SqliteInitError> {
        let store = Self::connect(database_url).await?;
        store.migrate().await?;
        Ok(store)
    }
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

#[async_trait]
impl PersistentStore for SqliteStore {
    async fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        let row = sqlx::query("SELECT value FROM blobs WHERE key = ?1")
            .bind(&self.key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let value: Vec<u8> = row
            .try_get("value")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(Some(value))
    }

    async fn save(&self, bytes: &[u8]) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO blobs (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(&self.key)
        .bind(bytes)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        log::debug!("saved {} bytes under key {}", bytes.len(), self.key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqliteStore>();
    }

    #[test]
    fn memory_urls_are_detected() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite:file:memdb_x?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite:///var/data/banks.db?mode=rwc"));
    }

    #[tokio::test]
    async fn memory_pool_keeps_its_connection() {
        let store = SqliteStore::open("sqlite::memory:").await.unwrap();
        let options = store.pool().options();
        assert_eq!(options.get_min_connections(), 1);
        assert!(options.get_idle_timeout().is_none());
        assert!(options.get_max_lifetime().is_none());

        store.save(b"[]").await.unwrap();
        for _ in 0..3 {
            drop(store.pool().acquire().await.unwrap());
        }
        store.save(b"[1]").await.unwrap();
        assert_eq!(store.load().await.unwrap().as_deref(), Some(&b"[1]"[..]));
    }
}
