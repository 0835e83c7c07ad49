//! # orchard-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **driven port** `EventPublisher` that receives every state change
//! - Define **driving** use-case services, one per control page:
//!   - `ZoneService`: master switch, saving mode, modes, zone toggles and setpoints
//!   - `DeviceService`: add, remove, select devices
//!   - `MediaService`: music player and broadcast system
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//! - Seed the session with its initial state and aggregate every page in
//!   a `ControlPanel`
//!
//! ## Dependency rule
//! Depends on `orchard-domain` only (plus `tokio::sync` for channels).
//! Every call is synchronous: a mutation completes, publishes its event,
//! and returns before the next one starts.

pub mod event_bus;
pub mod panel;
pub mod ports;
pub mod seed;
pub mod services;
