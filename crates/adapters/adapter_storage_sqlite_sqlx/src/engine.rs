//! `SQLite` engine: opens a storage file, runs migrations, shuts it down.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteLockingMode, SqlitePoolOptions};

use kvsource_app::ports::StorageEngine;

use crate::error::StorageError;
use crate::store::SqliteKvStore;

/// Opens [`SqliteKvStore`] handles.
///
/// Each handle owns a single connection in exclusive locking mode, so a
/// second process (or a second handle) cannot use the same file while it
/// is open.
#[derive(Debug, Clone)]
pub struct SqliteEngine {
    busy_timeout: Duration,
}

impl Default for SqliteEngine {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
        }
    }
}

impl SqliteEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How long to wait for a lock held by someone else before failing.
    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}

impl StorageEngine for SqliteEngine {
    type Handle = SqliteKvStore;
    type Error = StorageError;

    fn open(&self, path: &Path) -> impl Future<Output = Result<SqliteKvStore, StorageError>> + Send {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .locking_mode(SqliteLockingMode::Exclusive)
            .busy_timeout(self.busy_timeout);
        let path = path.to_path_buf();
        async move {
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?;

            sqlx::migrate!("./migrations").run(&pool).await?;

            tracing::debug!(path = %path.display(), "sqlite storage ready");
            Ok(SqliteKvStore::new(pool, path))
        }
    }

    fn close(&self, handle: SqliteKvStore) -> impl Future<Output = Result<(), StorageError>> + Send {
        handle.shutdown()
    }
}
