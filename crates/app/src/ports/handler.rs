//! Handler port: run units of work against named datasources.
//!
//! [`DatasourceHandler`] is what the core exposes to callers.
//! [`DatasourceAware`] lets any type that *holds* a handler pick up the same
//! methods by implementing a single accessor.

use std::future::Future;

use kvsource_domain::error::KvSourceError;
use kvsource_domain::name::DatasourceName;

use crate::ports::storage::ConnectionHandle;

/// Lazily opens datasources and runs callbacks against them.
pub trait DatasourceHandler: Send + Sync {
    /// Live handle type handed to callbacks.
    type Handle: ConnectionHandle;

    /// Open `name` if needed, then run `work` with the live handle.
    ///
    /// The datasource stays open afterwards.
    fn with_datasource<F, R>(
        &self,
        name: &str,
        work: F,
    ) -> impl Future<Output = Result<R, KvSourceError>> + Send
    where
        F: FnOnce(&DatasourceName, &Self::Handle) -> R + Send,
        R: Send;

    /// Close `name` if it is open.
    fn close_datasource(&self, name: &str) -> impl Future<Output = Result<(), KvSourceError>> + Send;

    /// [`with_datasource`](Self::with_datasource) on the default datasource.
    fn with_default_datasource<F, R>(
        &self,
        work: F,
    ) -> impl Future<Output = Result<R, KvSourceError>> + Send
    where
        F: FnOnce(&DatasourceName, &Self::Handle) -> R + Send,
        R: Send,
    {
        self.with_datasource(DatasourceName::DEFAULT, work)
    }

    /// [`close_datasource`](Self::close_datasource) on the default datasource.
    fn close_default_datasource(&self) -> impl Future<Output = Result<(), KvSourceError>> + Send {
        self.close_datasource(DatasourceName::DEFAULT)
    }
}

/// Delegate methods for types that hold a [`DatasourceHandler`].
///
/// ```ignore
/// struct NotesRepository {
///     handler: Arc<MyHandler>,
/// }
///
/// impl DatasourceAware for NotesRepository {
///     type Handler = MyHandler;
///
///     fn datasource_handler(&self) -> &MyHandler {
///         &self.handler
///     }
/// }
///
/// // `repo.with_datasource("notes", |_, db| ...)` now works.
/// ```
pub trait DatasourceAware {
    type Handler: DatasourceHandler;

    fn datasource_handler(&self) -> &Self::Handler;

    fn with_datasource<F, R>(
        &self,
        name: &str,
        work: F,
    ) -> impl Future<Output = Result<R, KvSourceError>> + Send
    where
        F: FnOnce(&DatasourceName, &<Self::Handler as DatasourceHandler>::Handle) -> R + Send,
        R: Send,
    {
        self.datasource_handler().with_datasource(name, work)
    }

    fn with_default_datasource<F, R>(
        &self,
        work: F,
    ) -> impl Future<Output = Result<R, KvSourceError>> + Send
    where
        F: FnOnce(&DatasourceName, &<Self::Handler as DatasourceHandler>::Handle) -> R + Send,
        R: Send,
    {
        self.datasource_handler().with_default_datasource(work)
    }

    fn close_datasource(&self, name: &str) -> impl Future<Output = Result<(), KvSourceError>> + Send {
        self.datasource_handler().close_datasource(name)
    }

    fn close_default_datasource(&self) -> impl Future<Output = Result<(), KvSourceError>> + Send {
        self.datasource_handler().close_default_datasource()
    }
}
