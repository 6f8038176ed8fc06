//! In-memory [`ConfigResolver`] built once from already-loaded settings.

use kvsource_domain::datasource::DatasourceConfig;
use kvsource_domain::name::DatasourceName;

use crate::ports::ConfigResolver;

/// Ordered, immutable datasource configuration.
///
/// The default datasource is always enumerated first, whether or not it
/// has a configuration; the others follow in insertion order.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigResolver {
    default: Option<DatasourceConfig>,
    named: Vec<(DatasourceName, DatasourceConfig)>,
}

impl StaticConfigResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration of the default datasource.
    #[must_use]
    pub fn with_default(mut self, config: DatasourceConfig) -> Self {
        self.default = Some(config);
        self
    }

    /// Add (or replace, keeping its position) a named datasource.
    ///
    /// Passing the default name is the same as [`with_default`](Self::with_default).
    #[must_use]
    pub fn with(mut self, name: DatasourceName, config: DatasourceConfig) -> Self {
        if name.is_default() {
            self.default = Some(config);
        } else if let Some(slot) = self.named.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = config;
        } else {
            self.named.push((name, config));
        }
        self
    }
}

impl ConfigResolver for StaticConfigResolver {
    fn datasource_names(&self) -> Vec<DatasourceName> {
        std::iter::once(DatasourceName::default())
            .chain(self.named.iter().map(|(name, _)| name.clone()))
            .collect()
    }

    fn configuration_for(&self, name: &DatasourceName) -> Option<DatasourceConfig> {
        if name.is_default() {
            return self.default.clone();
        }
        self.named
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, config)| config.clone())
    }
}
