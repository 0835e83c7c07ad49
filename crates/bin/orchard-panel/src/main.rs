//! # orchard-panel
//!
//! Orchard control shell.
//!
//! Composition root that wires the control pages to the event bus and
//! reads commands from stdin, one per line.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise logging
//! - Seed the session and construct the control panel
//! - Print a JSON snapshot after every command
//! - Log published events

use std::io::BufRead;

use anyhow::Context;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tracing_subscriber::EnvFilter;

use orchard_app::event_bus::InProcessEventBus;
use orchard_app::panel::ControlPanel;
use orchard_app::seed::Session;
use orchard_domain::event::Event;
use orchard_panel::command::{Command, HELP};
use orchard_panel::config::Config;
use orchard_panel::shell::{self, Outcome};

fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let bus = InProcessEventBus::new(config.events.capacity);
    let mut events = bus.subscribe();
    let mut panel = ControlPanel::new(Session::orchard()?, bus);
    tracing::info!("orchard panel ready, type `help` for commands");

    for line in std::io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let outcome = Command::parse(&line)
            .map_err(anyhow::Error::from)
            .and_then(|command| shell::execute(&mut panel, command).map_err(anyhow::Error::from));
        match outcome {
            Ok(Outcome::Snapshot(value)) => {
                let rendered = if config.output.pretty {
                    serde_json::to_string_pretty(&value)?
                } else {
                    serde_json::to_string(&value)?
                };
                println!("{rendered}");
            }
            Ok(Outcome::Help) => println!("{HELP}"),
            Ok(Outcome::Quit) => break,
            Err(err) => println!("error: {err}"),
        }
        drain(&mut events);
    }

    tracing::info!("session closed");
    Ok(())
}

fn drain(events: &mut broadcast::Receiver<Event>) {
    loop {
        match events.try_recv() {
            Ok(event) => tracing::debug!(
                subsystem = %event.subsystem,
                event_type = ?event.event_type,
                data = %event.data,
                "event published"
            ),
            Err(TryRecvError::Lagged(skipped)) => tracing::warn!(skipped, "event log lagged"),
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}
