//! # kvsource-adapter-storage-sqlite-sqlx
//!
//! Embedded key-value engine backed by a single `SQLite` file, using
//! [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `StorageEngine` port defined in `kvsource-app::ports::storage`
//! - Own the file while open (one connection, exclusive locking mode)
//! - Run the embedded schema migration on open
//! - Expose a small byte-oriented key-value API on the handle
//!
//! ## Dependency rule
//! Depends on `kvsource-app` (for port traits) only.
//! The `app` and `domain` crates must never reference this adapter.

pub mod engine;
pub mod error;
pub mod store;

pub use engine::SqliteEngine;
pub use error::StorageError;
pub use store::SqliteKvStore;
