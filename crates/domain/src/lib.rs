//! # orchard-domain
//!
//! Pure state model for the orchard control panel.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, bounds, timestamps
//! - Define **SystemState** (master switch, saving mode, mode label per subsystem)
//! - Define the **Zone** trait and the per-subsystem zone types
//!   (climate, irrigation, lighting)
//! - Define the **cascade rules** that propagate system transitions to zones
//! - Own every subsystem's state in a **ZoneController** that enforces the
//!   invariants after each mutation
//! - Define the **device registry** and the **media** player
//! - Define **Events** (state-change records)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! Publishing events and driving the controllers live in the `app` crate.

pub mod bounds;
pub mod error;
pub mod id;
pub mod mode;
pub mod time;

pub mod cascade;
pub mod controller;
pub mod system;
pub mod zone;

pub mod climate;
pub mod device;
pub mod event;
pub mod irrigation;
pub mod lighting;
pub mod media;
