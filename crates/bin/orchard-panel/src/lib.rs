//! # orchard-panel
//!
//! Composition root for the orchard control panel: configuration, the
//! line-oriented command shell, and the wiring between the two.
//!
//! ## Dependency rule
//! This is the **only** crate that depends on both `orchard-domain` and
//! `orchard-app` for wiring purposes. No domain logic belongs here.

pub mod command;
pub mod config;
pub mod shell;
