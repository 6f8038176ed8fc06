//! Connection factory: opens and shuts down engine instances for one
//! resolved datasource configuration, emitting lifecycle events around
//! each step.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kvsource_domain::datasource::DatasourceConfig;
use kvsource_domain::error::{KvSourceError, NotConfiguredError};
use kvsource_domain::event::{Event, EventKind};
use kvsource_domain::name::DatasourceName;

use crate::deletion::DeleteOnExit;
use crate::ports::{ConnectionHandle, DatasourceBootstrap, EventPublisher, StorageEngine};

type Bootstrap<H> = Arc<dyn DatasourceBootstrap<H>>;

/// Creates and destroys engine handles.
///
/// Holds no state about which datasources are open; that is the
/// [`ConnectionRegistry`](crate::registry::ConnectionRegistry)'s job.
pub struct ConnectionFactory<E: StorageEngine, P> {
    engine: E,
    publisher: P,
    bootstraps: Vec<Bootstrap<E::Handle>>,
    deletions: Arc<DeleteOnExit>,
    working_dir: PathBuf,
}

impl<E, P> ConnectionFactory<E, P>
where
    E: StorageEngine,
    P: EventPublisher<E::Handle>,
{
    /// Create a factory resolving relative storage paths against `working_dir`.
    pub fn new(
        engine: E,
        publisher: P,
        deletions: Arc<DeleteOnExit>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            engine,
            publisher,
            bootstraps: Vec::new(),
            deletions,
            working_dir: working_dir.into(),
        }
    }

    /// Register a hook run after every open and before every close.
    #[must_use]
    pub fn with_bootstrap(mut self, hook: impl DatasourceBootstrap<E::Handle> + 'static) -> Self {
        self.bootstraps.push(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    #[must_use]
    pub fn deletions(&self) -> &Arc<DeleteOnExit> {
        &self.deletions
    }

    /// Open the engine for `name` using `config`.
    ///
    /// Emits `ConnectStart`, then `ConfigurationSetup` once the engine is
    /// open, runs every bootstrap `init`, and finally emits `ConnectEnd`.
    /// Missing parent directories of the storage file are created first.
    ///
    /// # Errors
    ///
    /// - [`KvSourceError::InvalidArgument`] if `name` is blank (nothing emitted)
    /// - [`KvSourceError::NotConfigured`] if `config` is missing or empty
    /// - [`KvSourceError::Open`] if the directory or the engine cannot be
    ///   opened, or a bootstrap hook fails (the handle is closed again)
    #[tracing::instrument(skip(self, config))]
    pub async fn open(
        &self,
        name: &str,
        config: Option<&DatasourceConfig>,
    ) -> Result<E::Handle, KvSourceError> {
        let name = DatasourceName::new(name)?;
        let config = require_config(&name, config)?;

        self.emit(EventKind::ConnectStart {
            name: name.clone(),
            config: config.clone(),
        })
        .await;

        let path = config.resolve_path(&self.working_dir);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| KvSourceError::open(name.clone(), err))?;
        }

        let handle = self
            .engine
            .open(&path)
            .await
            .map_err(|err| KvSourceError::open(name.clone(), err))?;
        tracing::info!(datasource = %name, path = %path.display(), "datasource opened");

        self.emit(EventKind::ConfigurationSetup {
            name: name.clone(),
            config: config.clone(),
            handle: handle.clone(),
        })
        .await;

        for hook in &self.bootstraps {
            if let Err(err) = hook.init(&name, &handle) {
                if let Err(close_err) = self.engine.close(handle).await {
                    tracing::warn!(%close_err, datasource = %name, "failed to close datasource after bootstrap failure");
                }
                return Err(KvSourceError::open(name, err));
            }
        }

        self.emit(EventKind::ConnectEnd {
            name,
            config,
            handle: handle.clone(),
        })
        .await;

        Ok(handle)
    }

    /// Shut down `handle`, previously opened for `name`.
    ///
    /// Emits `DisconnectStart`, runs every bootstrap `destroy` (failures are
    /// logged only), closes the engine, schedules the storage file for
    /// deletion on exit when `delete = true`, then emits `DisconnectEnd`.
    ///
    /// # Errors
    ///
    /// - [`KvSourceError::InvalidArgument`] if `name` is blank (nothing emitted)
    /// - [`KvSourceError::NotConfigured`] if `config` is missing or empty
    /// - [`KvSourceError::Close`] if the engine fails to shut down
    #[tracing::instrument(skip(self, config, handle))]
    pub async fn close(
        &self,
        name: &str,
        config: Option<&DatasourceConfig>,
        handle: E::Handle,
    ) -> Result<(), KvSourceError> {
        let name = DatasourceName::new(name)?;
        let config = require_config(&name, config)?;

        self.emit(EventKind::DisconnectStart {
            name: name.clone(),
            config: config.clone(),
            handle: handle.clone(),
        })
        .await;

        for hook in &self.bootstraps {
            if let Err(err) = hook.destroy(&name, &handle) {
                tracing::warn!(%err, datasource = %name, "bootstrap destroy hook failed");
            }
        }

        let location = handle.location().to_path_buf();
        self.engine
            .close(handle)
            .await
            .map_err(|err| KvSourceError::close(name.clone(), err))?;
        tracing::info!(datasource = %name, path = %location.display(), "datasource closed");

        if config.delete_on_close() {
            self.deletions.schedule(location);
        }

        self.emit(EventKind::DisconnectEnd { name, config }).await;

        Ok(())
    }

    async fn emit(&self, kind: EventKind<E::Handle>) {
        self.publisher.publish(Event::new(kind)).await;
    }
}

fn require_config(
    name: &DatasourceName,
    config: Option<&DatasourceConfig>,
) -> Result<DatasourceConfig, KvSourceError> {
    match config {
        Some(config) if !config.is_empty() => Ok(config.clone()),
        _ => Err(NotConfiguredError { name: name.clone() }.into()),
    }
}
