//! Storage port: the embedded key-value engine.
//!
//! The engine itself is an external collaborator: it knows how to open a
//! storage file and hand back a live handle, and how to shut that handle
//! down. Everything else (naming, configuration, lifecycle) lives here.

use std::future::Future;
use std::path::Path;

/// A live capability to one opened engine instance.
///
/// Handles are cheaply cloneable references to the same underlying
/// instance; the registry keeps the authoritative copy.
pub trait ConnectionHandle: Clone + Send + Sync + 'static {
    /// Absolute path of the backing storage file.
    fn location(&self) -> &Path;
}

/// Opens and shuts down engine instances.
pub trait StorageEngine: Send + Sync {
    /// Handle type returned by [`open`](Self::open).
    type Handle: ConnectionHandle;
    /// Engine-specific failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Open (creating if missing) the storage file at `path`.
    ///
    /// The parent directory is guaranteed to exist.
    fn open(&self, path: &Path) -> impl Future<Output = Result<Self::Handle, Self::Error>> + Send;

    /// Shut down `handle`, releasing the storage file.
    fn close(&self, handle: Self::Handle) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

impl<T: StorageEngine> StorageEngine for std::sync::Arc<T> {
    type Handle = T::Handle;
    type Error = T::Error;

    fn open(&self, path: &Path) -> impl Future<Output = Result<Self::Handle, Self::Error>> + Send {
        (**self).open(path)
    }

    fn close(&self, handle: Self::Handle) -> impl Future<Output = Result<(), Self::Error>> + Send {
        (**self).close(handle)
    }
}
