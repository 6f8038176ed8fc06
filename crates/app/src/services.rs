//! Application services: the datasource lifecycle core.
//!
//! Each service accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete
//! engines and hosts. The composition root builds them bottom-up:
//! factory → handler (with registry and resolver) → lifecycle coordinator.

pub mod connection_factory;
pub mod connection_handler;
pub mod lifecycle;

#[cfg(test)]
pub(crate) mod fakes;
