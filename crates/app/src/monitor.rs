//! Read-only monitoring view over the connection registry.

use std::sync::Arc;

use kvsource_domain::monitor::OpenDatasource;
use kvsource_domain::name::DatasourceName;

use crate::ports::ConnectionHandle;
use crate::registry::ConnectionRegistry;

/// Diagnostic introspection of the currently open datasources.
///
/// Holds a shared reference to the registry and never mutates it.
pub struct DatasourceMonitor<H> {
    registry: Arc<ConnectionRegistry<H>>,
}

impl<H> Clone for DatasourceMonitor<H> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<H: ConnectionHandle> DatasourceMonitor<H> {
    #[must_use]
    pub fn new(registry: Arc<ConnectionRegistry<H>>) -> Self {
        Self { registry }
    }

    /// Number of open datasources.
    #[must_use]
    pub fn size(&self) -> usize {
        self.registry.len()
    }

    /// Names of the open datasources, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<DatasourceName> {
        self.registry.names()
    }

    /// Every open datasource, sorted by name.
    #[must_use]
    pub fn open_datasources(&self) -> Vec<OpenDatasource> {
        self.registry
            .snapshot()
            .into_iter()
            .map(|(name, handle, opened_at)| OpenDatasource {
                name,
                location: handle.location().to_path_buf(),
                opened_at,
            })
            .collect()
    }

    /// The open datasource called `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<OpenDatasource> {
        self.open_datasources()
            .into_iter()
            .find(|open| open.name.as_str() == name)
    }
}
