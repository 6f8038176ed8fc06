//! # kvsource-domain
//!
//! Pure domain model for kvsource, the named-datasource layer in front of an
//! embedded key-value engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **datasource names** (non-blank keys, with a well-known default)
//! - Define **datasource configuration** (storage path, delete-on-close,
//!   connect-on-startup, plus free-form extra properties)
//! - Define **lifecycle events** emitted around connect/disconnect
//! - Define the **monitoring view** of an open datasource
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod datasource;
pub mod event;
pub mod monitor;
pub mod name;
