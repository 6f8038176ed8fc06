//! # kvsource-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **read-only JSON monitoring API** over the connection registry
//!   (`/api/datasources`, `/api/datasources/{name}`)
//! - Serve a `/health` probe
//! - Map application results into HTTP responses
//!
//! ## Dependency rule
//! Depends on `kvsource-app` (for the monitor and port traits) and
//! `kvsource-domain` (for response types). Never leaks axum types into the
//! domain, and never mutates datasource state.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
