//! `SQLite`-backed key-value handle.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sqlx::SqlitePool;

use kvsource_app::ports::ConnectionHandle;

use crate::error::StorageError;

const UPSERT: &str =
    "INSERT INTO kv (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value";
const SELECT_BY_KEY: &str = "SELECT value FROM kv WHERE key = ?";
const DELETE_BY_KEY: &str = "DELETE FROM kv WHERE key = ?";
const SELECT_KEYS: &str = "SELECT key FROM kv ORDER BY key";
const COUNT: &str = "SELECT COUNT(*) FROM kv";

/// Live handle to one open storage file.
///
/// Clones share the same connection; closing any of them (through the
/// engine) closes all.
#[derive(Debug, Clone)]
pub struct SqliteKvStore {
    pool: SqlitePool,
    path: Arc<PathBuf>,
}

impl SqliteKvStore {
    pub(crate) fn new(pool: SqlitePool, path: PathBuf) -> Self {
        Self {
            pool,
            path: Arc::new(path),
        }
    }

    /// Insert or replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Database`] if the write fails.
    pub async fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        sqlx::query(UPSERT)
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Database`] if the read fails.
    pub async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let row: Option<(Vec<u8>,)> = sqlx::query_as(SELECT_BY_KEY)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    /// Remove `key`; returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Database`] if the delete fails.
    pub async fn remove(&self, key: &[u8]) -> Result<bool, StorageError> {
        let result = sqlx::query(DELETE_BY_KEY)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every key, in byte order.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Database`] if the read fails.
    pub async fn keys(&self) -> Result<Vec<Vec<u8>>, StorageError> {
        let rows: Vec<(Vec<u8>,)> = sqlx::query_as(SELECT_KEYS)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(key,)| key).collect())
    }

    /// Number of stored entries.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Database`] if the read fails.
    pub async fn len(&self) -> Result<u64, StorageError> {
        let (count,): (i64,) = sqlx::query_as(COUNT).fetch_one(&self.pool).await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns [`StorageError::Database`] if the read fails.
    pub async fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len().await? == 0)
    }

    pub(crate) async fn shutdown(self) -> Result<(), StorageError> {
        sqlx::query("PRAGMA optimize").execute(&self.pool).await?;
        self.pool.close().await;
        Ok(())
    }
}

impl ConnectionHandle for SqliteKvStore {
    fn location(&self) -> &Path {
        &self.path
    }
}
