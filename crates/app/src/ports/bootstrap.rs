//! Bootstrap port: hooks run right after open and right before close.

use kvsource_domain::error::BoxError;
use kvsource_domain::name::DatasourceName;

/// Per-datasource initialisation and teardown hook.
///
/// Hooks are registered on the
/// [`ConnectionFactory`](crate::services::connection_factory::ConnectionFactory)
/// and run synchronously, in registration order.
pub trait DatasourceBootstrap<H>: Send + Sync {
    /// Called once the engine is open. An error aborts the open.
    ///
    /// # Errors
    ///
    /// Any error makes the factory close the handle again and fail the open.
    fn init(&self, name: &DatasourceName, handle: &H) -> Result<(), BoxError>;

    /// Called before the engine is shut down. Errors are logged only.
    ///
    /// # Errors
    ///
    /// Returned errors never prevent the shutdown.
    fn destroy(&self, name: &DatasourceName, handle: &H) -> Result<(), BoxError> {
        let _ = (name, handle);
        Ok(())
    }
}

impl<H, T: DatasourceBootstrap<H>> DatasourceBootstrap<H> for std::sync::Arc<T> {
    fn init(&self, name: &DatasourceName, handle: &H) -> Result<(), BoxError> {
        (**self).init(name, handle)
    }

    fn destroy(&self, name: &DatasourceName, handle: &H) -> Result<(), BoxError> {
        (**self).destroy(name, handle)
    }
}
