//! # kvsource-app
//!
//! Application layer: datasource use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `StorageEngine` / `ConnectionHandle`: open and shut down the embedded engine
//!   - `ConfigResolver`: enumerate datasource names and resolve their config
//!   - `EventPublisher`: deliver lifecycle notifications to the host
//!   - `DatasourceBootstrap`: per-datasource init/destroy hooks
//! - Define **driving/inbound ports**:
//!   - `DatasourceHandler`: run work against a named datasource
//!   - `DatasourceAware`: delegate methods for any type holding a handler
//! - Provide the core services: `ConnectionFactory`, `ConnectionHandler`,
//!   `LifecycleCoordinator`
//! - Provide **in-process infrastructure** that doesn't need IO beyond the
//!   filesystem: connection registry, event bus, delete-on-exit list,
//!   monitoring view, static config resolver
//!
//! ## Dependency rule
//! Depends on `kvsource-domain` only (plus `tokio::sync` for locks and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod config;
pub mod deletion;
pub mod event_bus;
pub mod monitor;
pub mod ports;
pub mod registry;
pub mod services;
