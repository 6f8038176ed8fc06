//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `kvsource.toml` in the working directory (or the file named by
//! `KVSOURCE_CONFIG`). Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use serde::Deserialize;

use kvsource_app::config::StaticConfigResolver;
use kvsource_domain::datasource::DatasourceConfig;
use kvsource_domain::name::DatasourceName;

/// Config file read when `KVSOURCE_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "kvsource.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Monitoring HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// The default datasource.
    pub datasource: Option<DatasourceConfig>,
    /// Additional named datasources, in file order.
    pub datasources: toml::Table,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Serve the monitoring API at all.
    pub enabled: bool,
    /// Address to bind to (e.g. `127.0.0.1`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("KVSOURCE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("KVSOURCE_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("KVSOURCE_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("KVSOURCE_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("KVSOURCE_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.enabled && self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        self.resolver().map(|_| ())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Build the ordered datasource configuration.
    ///
    /// A `[datasources.default]` table is layered over `[datasource]`.
    ///
    /// # Errors
    ///
    /// Returns an error if a datasource name is blank or its table does not
    /// have the expected shape.
    pub fn resolver(&self) -> Result<StaticConfigResolver, ConfigError> {
        let mut default = self.datasource.clone();
        let mut named = Vec::with_capacity(self.datasources.len());

        for (key, value) in &self.datasources {
            let name = DatasourceName::new(key.as_str())
                .map_err(|err| ConfigError::Validation(err.to_string()))?;
            let config: DatasourceConfig =
                value
                    .clone()
                    .try_into()
                    .map_err(|source| ConfigError::Datasource {
                        name: key.clone(),
                        source,
                    })?;
            if name.is_default() {
                default = Some(match default {
                    Some(base) => layer(base, config),
                    None => config,
                });
            } else {
                named.push((name, config));
            }
        }

        let mut resolver = StaticConfigResolver::new();
        if let Some(config) = default {
            resolver = resolver.with_default(config);
        }
        for (name, config) in named {
            resolver = resolver.with(name, config);
        }
        Ok(resolver)
    }
}

fn layer(mut base: DatasourceConfig, over: DatasourceConfig) -> DatasourceConfig {
    base.name = over.name.or(base.name);
    base.delete = over.delete.or(base.delete);
    base.connect_on_startup = over.connect_on_startup.or(base.connect_on_startup);
    base.extra.extend(over.extra);
    base
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 3900,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "kvsourced=info,kvsource=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// A `[datasources.<name>]` table has the wrong shape.
    #[error("invalid configuration for datasource '{name}'")]
    Datasource {
        name: String,
        #[source]
        source: toml::de::Error,
    },
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
