//! Configuration port: where datasource names and properties come from.

use kvsource_domain::datasource::DatasourceConfig;
use kvsource_domain::name::DatasourceName;

/// Source of datasource configuration.
///
/// Configuration is resolved up front by the host, so lookups are
/// synchronous and infallible.
pub trait ConfigResolver: Send + Sync {
    /// Every known datasource, default first, then in configuration order.
    fn datasource_names(&self) -> Vec<DatasourceName>;

    /// Properties for `name`, or `None` when nothing is configured.
    fn configuration_for(&self, name: &DatasourceName) -> Option<DatasourceConfig>;
}

impl<T: ConfigResolver> ConfigResolver for std::sync::Arc<T> {
    fn datasource_names(&self) -> Vec<DatasourceName> {
        (**self).datasource_names()
    }

    fn configuration_for(&self, name: &DatasourceName) -> Option<DatasourceConfig> {
        (**self).configuration_for(name)
    }
}
