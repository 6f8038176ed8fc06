//! Shared application state for axum handlers.

use kvsource_app::monitor::DatasourceMonitor;
use kvsource_app::ports::ConnectionHandle;

/// Application state shared across all axum handlers.
///
/// Generic over the handle type to avoid dynamic dispatch. `Clone` is
/// implemented manually so the handle type itself only needs what the
/// monitor needs.
pub struct AppState<H> {
    /// Read-only view of the open datasources.
    pub monitor: DatasourceMonitor<H>,
}

impl<H> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            monitor: self.monitor.clone(),
        }
    }
}

impl<H: ConnectionHandle> AppState<H> {
    /// Create a new application state around `monitor`.
    pub fn new(monitor: DatasourceMonitor<H>) -> Self {
        Self { monitor }
    }
}
