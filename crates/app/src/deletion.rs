//! Delete-on-exit list for datasources configured with `delete = true`.
//!
//! Closing such a datasource does not remove its file immediately; the path
//! is queued here and removed when the host calls [`DeleteOnExit::purge`]
//! during shutdown, or when the list is dropped. Nothing is removed if the
//! process is killed.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;

/// Files scheduled for removal at process exit.
#[derive(Debug, Default)]
pub struct DeleteOnExit {
    paths: Mutex<Vec<PathBuf>>,
}

impl DeleteOnExit {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `path` for removal. Scheduling the same path twice is a no-op.
    pub fn schedule(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut paths = self.paths.lock();
        if !paths.contains(&path) {
            tracing::debug!(path = %path.display(), "scheduled storage file for deletion on exit");
            paths.push(path);
        }
    }

    /// Whether `path` is waiting for removal.
    #[must_use]
    pub fn is_scheduled(&self, path: &Path) -> bool {
        self.paths.lock().iter().any(|p| p == path)
    }

    /// Paths waiting for removal, in scheduling order.
    #[must_use]
    pub fn pending(&self) -> Vec<PathBuf> {
        self.paths.lock().clone()
    }

    /// Remove every scheduled file and clear the list.
    ///
    /// Best-effort: a file that is already gone counts as removed, any
    /// other failure is logged and otherwise ignored. Returns how many
    /// files were actually deleted.
    pub fn purge(&self) -> usize {
        let paths = std::mem::take(&mut *self.paths.lock());
        let mut removed = 0;
        for path in paths {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "deleted storage file");
                    removed += 1;
                }
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => {
                    tracing::warn!(%err, path = %path.display(), "failed to delete storage file");
                }
            }
        }
        removed
    }
}

impl Drop for DeleteOnExit {
    fn drop(&mut self) {
        self.purge();
    }
}
