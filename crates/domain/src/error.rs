//! Common error types used across the workspace.
//!
//! [`KvSourceError`] is the only error that crosses port boundaries. Each
//! adapter defines its own typed error and gets boxed into the
//! [`Open`](KvSourceError::Open) / [`Close`](KvSourceError::Close) variants.

use crate::name::DatasourceName;

/// Type-erased source error, as produced by storage engines and hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error for every datasource operation.
#[derive(Debug, thiserror::Error)]
pub enum KvSourceError {
    /// An argument was rejected before any IO took place.
    #[error("invalid argument")]
    InvalidArgument(#[from] InvalidArgumentError),

    /// The requested datasource has no configuration.
    #[error("datasource not configured")]
    NotConfigured(#[from] NotConfiguredError),

    /// The storage engine could not be opened.
    #[error("failed to open datasource '{name}'")]
    Open {
        name: DatasourceName,
        #[source]
        source: BoxError,
    },

    /// The storage engine could not be shut down.
    #[error("failed to close datasource '{name}'")]
    Close {
        name: DatasourceName,
        #[source]
        source: BoxError,
    },
}

impl KvSourceError {
    /// Wrap an engine failure raised while opening `name`.
    pub fn open(name: DatasourceName, source: impl Into<BoxError>) -> Self {
        Self::Open {
            name,
            source: source.into(),
        }
    }

    /// Wrap an engine failure raised while closing `name`.
    pub fn close(name: DatasourceName, source: impl Into<BoxError>) -> Self {
        Self::Close {
            name,
            source: source.into(),
        }
    }
}

/// Argument validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidArgumentError {
    /// A string argument was empty or whitespace only.
    #[error("argument '{argument}' must not be blank")]
    Blank { argument: &'static str },
}

/// The named datasource has no (or an empty) configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("datasource '{name}' is not configured")]
pub struct NotConfiguredError {
    pub name: DatasourceName,
}
