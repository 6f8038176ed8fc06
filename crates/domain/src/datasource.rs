//! Datasource configuration: the resolved property bag for one name.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Storage file used when a datasource does not set `name`.
pub const DEFAULT_STORAGE_NAME: &str = "db.bin";

/// Properties of one configured datasource.
///
/// Every recognised key is optional; accessors apply the defaults. Keys the
/// core does not recognise are kept in [`extra`](Self::extra) so bootstrap
/// hooks can read them. A config with no keys at all counts as *empty*,
/// which the factory treats as "not configured".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasourceConfig {
    /// Storage path, absolute or relative to the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Schedule the storage file for deletion on process exit after close.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<bool>,
    /// Open this datasource during the startup sweep.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_on_startup: Option<bool>,
    /// Unrecognised properties.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl DatasourceConfig {
    /// Create a builder for constructing a [`DatasourceConfig`].
    #[must_use]
    pub fn builder() -> DatasourceConfigBuilder {
        DatasourceConfigBuilder::default()
    }

    /// `true` when no property at all is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.delete.is_none()
            && self.connect_on_startup.is_none()
            && self.extra.is_empty()
    }

    /// Configured storage name, or [`DEFAULT_STORAGE_NAME`].
    #[must_use]
    pub fn storage_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_STORAGE_NAME)
    }

    #[must_use]
    pub fn delete_on_close(&self) -> bool {
        self.delete.unwrap_or(false)
    }

    #[must_use]
    pub fn connect_on_startup(&self) -> bool {
        self.connect_on_startup.unwrap_or(false)
    }

    /// Resolve the storage path against `working_dir` when it is relative.
    #[must_use]
    pub fn resolve_path(&self, working_dir: &Path) -> PathBuf {
        let path = Path::new(self.storage_name());
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            working_dir.join(path)
        }
    }
}

/// Step-by-step builder for [`DatasourceConfig`].
#[derive(Debug, Default)]
pub struct DatasourceConfigBuilder {
    inner: DatasourceConfig,
}

impl DatasourceConfigBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.inner.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn delete(mut self, delete: bool) -> Self {
        self.inner.delete = Some(delete);
        self
    }

    #[must_use]
    pub fn connect_on_startup(mut self, connect: bool) -> Self {
        self.inner.connect_on_startup = Some(connect);
        self
    }

    #[must_use]
    pub fn property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.inner.extra.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn build(self) -> DatasourceConfig {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_apply_defaults_when_keys_missing() {
        let config = DatasourceConfig::default();
        assert!(config.is_empty());
        assert_eq!(config.storage_name(), "db.bin");
        assert!(!config.delete_on_close());
        assert!(!config.connect_on_startup());
    }

    #[test]
    fn should_not_be_empty_when_only_extra_property_set() {
        let config = DatasourceConfig::builder()
            .property("cache_size", serde_json::json!(64))
            .build();
        assert!(!config.is_empty());
    }

    #[test]
    fn should_resolve_relative_path_under_working_dir() {
        let config = DatasourceConfig::builder().name("relative/db.bin").build();
        let path = config.resolve_path(Path::new("/srv/app"));
        assert_eq!(path, PathBuf::from("/srv/app/relative/db.bin"));
    }

    #[test]
    fn should_keep_absolute_path_untouched() {
        let config = DatasourceConfig::builder().name("/var/lib/kv.bin").build();
        let path = config.resolve_path(Path::new("/srv/app"));
        assert_eq!(path, PathBuf::from("/var/lib/kv.bin"));
    }

    #[test]
    fn should_collect_unknown_keys_into_extra() {
        let config: DatasourceConfig = serde_json::from_value(serde_json::json!({
            "name": "alt.bin",
            "connect_on_startup": true,
            "pool": "small",
        }))
        .unwrap();
        assert_eq!(config.storage_name(), "alt.bin");
        assert!(config.connect_on_startup());
        assert_eq!(config.extra.get("pool"), Some(&serde_json::json!("small")));
    }
}
