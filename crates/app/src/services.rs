//! Application services: use-case implementations.
//!
//! Each service owns one page's domain state and accepts an
//! [`EventPublisher`](crate::ports::EventPublisher) via a generic parameter
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod device_service;
pub mod media_service;
pub mod zone_service;
