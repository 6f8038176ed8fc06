//! Connection handler: lazy open, run work, leave open.

use std::sync::Arc;

use tokio::sync::Mutex;

use kvsource_domain::error::KvSourceError;
use kvsource_domain::name::DatasourceName;

use crate::ports::{ConfigResolver, DatasourceHandler, EventPublisher, StorageEngine};
use crate::registry::ConnectionRegistry;
use crate::services::connection_factory::ConnectionFactory;

/// Opens datasources on first use and dispatches work to them.
///
/// Connections are never closed implicitly: once opened, a datasource
/// stays in the registry until [`close`](Self::close) is called.
pub struct ConnectionHandler<E: StorageEngine, P, C> {
    factory: Arc<ConnectionFactory<E, P>>,
    registry: Arc<ConnectionRegistry<E::Handle>>,
    resolver: C,
    // Serialises opens and closes so two callers never race to open the
    // same name twice.
    open_lock: Mutex<()>,
}

impl<E, P, C> ConnectionHandler<E, P, C>
where
    E: StorageEngine,
    P: EventPublisher<E::Handle>,
    C: ConfigResolver,
{
    /// Create a handler over the given factory, registry and configuration.
    pub fn new(
        factory: Arc<ConnectionFactory<E, P>>,
        registry: Arc<ConnectionRegistry<E::Handle>>,
        resolver: C,
    ) -> Self {
        Self {
            factory,
            registry,
            resolver,
            open_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<ConnectionRegistry<E::Handle>> {
        &self.registry
    }

    #[must_use]
    pub fn factory(&self) -> &Arc<ConnectionFactory<E, P>> {
        &self.factory
    }

    #[must_use]
    pub fn resolver(&self) -> &C {
        &self.resolver
    }

    /// Return the open handle for `name`, opening it first if needed.
    ///
    /// # Errors
    ///
    /// Returns [`KvSourceError::InvalidArgument`] for a blank name, or
    /// whatever [`ConnectionFactory::open`] fails with. Nothing is retried.
    pub async fn get_or_create(&self, name: &str) -> Result<E::Handle, KvSourceError> {
        let name = DatasourceName::new(name)?;
        if let Some(handle) = self.registry.get(name.as_str()) {
            return Ok(handle);
        }

        let _guard = self.open_lock.lock().await;
        // Another caller may have opened it while we waited.
        if let Some(handle) = self.registry.get(name.as_str()) {
            return Ok(handle);
        }

        let config = self.resolver.configuration_for(&name);
        let handle = self.factory.open(name.as_str(), config.as_ref()).await?;
        self.registry.set(name, handle.clone());
        Ok(handle)
    }

    /// Run `work` against `name`, opening the datasource if needed.
    ///
    /// `work` runs synchronously on the calling task and its result is
    /// returned unchanged. The datasource remains open afterwards.
    ///
    /// # Errors
    ///
    /// Same as [`get_or_create`](Self::get_or_create); `work` is not called
    /// when the datasource cannot be opened.
    pub async fn with_connection<F, R>(&self, name: &str, work: F) -> Result<R, KvSourceError>
    where
        F: FnOnce(&DatasourceName, &E::Handle) -> R,
    {
        let name = DatasourceName::new(name)?;
        let handle = self.get_or_create(name.as_str()).await?;
        tracing::debug!(datasource = %name, "executing work on datasource");
        Ok(work(&name, &handle))
    }

    /// [`with_connection`](Self::with_connection) on the default datasource.
    ///
    /// # Errors
    ///
    /// Same as [`with_connection`](Self::with_connection).
    pub async fn with_default_connection<F, R>(&self, work: F) -> Result<R, KvSourceError>
    where
        F: FnOnce(&DatasourceName, &E::Handle) -> R,
    {
        self.with_connection(DatasourceName::DEFAULT, work).await
    }

    /// Close `name` if it is open; a no-op otherwise.
    ///
    /// The handle leaves the registry before the factory shuts it down, so
    /// concurrent callers never receive a handle that is being closed. If
    /// the shutdown fails the handle is registered again.
    ///
    /// # Errors
    ///
    /// Returns [`KvSourceError::InvalidArgument`] for a blank name, or
    /// whatever [`ConnectionFactory::close`] fails with.
    pub async fn close(&self, name: &str) -> Result<(), KvSourceError> {
        let name = DatasourceName::new(name)?;
        let _guard = self.open_lock.lock().await;
        let Some((handle, opened_at)) = self.registry.take(name.as_str()) else {
            return Ok(());
        };

        let config = self.resolver.configuration_for(&name);
        if let Err(err) = self
            .factory
            .close(name.as_str(), config.as_ref(), handle.clone())
            .await
        {
            self.registry.restore(name, handle, opened_at);
            return Err(err);
        }
        Ok(())
    }

    /// [`close`](Self::close) on the default datasource.
    ///
    /// # Errors
    ///
    /// Same as [`close`](Self::close).
    pub async fn close_default(&self) -> Result<(), KvSourceError> {
        self.close(DatasourceName::DEFAULT).await
    }
}

impl<E, P, C> DatasourceHandler for ConnectionHandler<E, P, C>
where
    E: StorageEngine,
    P: EventPublisher<E::Handle>,
    C: ConfigResolver,
{
    type Handle = E::Handle;

    async fn with_datasource<F, R>(&self, name: &str, work: F) -> Result<R, KvSourceError>
    where
        F: FnOnce(&DatasourceName, &Self::Handle) -> R + Send,
        R: Send,
    {
        self.with_connection(name, work).await
    }

    async fn close_datasource(&self, name: &str) -> Result<(), KvSourceError> {
        self.close(name).await
    }
}
