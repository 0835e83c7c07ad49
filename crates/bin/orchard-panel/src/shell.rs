//! Shell: runs parsed commands against a [`ControlPanel`] and renders the
//! affected page.

use serde::Serialize;
use serde_json::Value;

use orchard_app::panel::ControlPanel;
use orchard_app::ports::EventPublisher;
use orchard_app::services::zone_service::ZoneService;
use orchard_domain::controller::ZoneController;
use orchard_domain::device::DeviceRegistry;
use orchard_domain::error::{NotFoundError, OrchardError};
use orchard_domain::event::Subsystem;
use orchard_domain::id::{DeviceId, ZoneId};
use orchard_domain::irrigation::{IrrigationZone, Reservoir};
use orchard_domain::media::{Broadcast, Player, format_clock};
use orchard_domain::mode::{ControlMode, LightingMode};
use orchard_domain::zone::Zone;

use crate::command::{
    Command, DeviceAction, MediaAction, SystemAction, SystemMode, Target, ZoneAction,
};

/// What the caller should do after a command ran.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Print this JSON snapshot.
    Snapshot(Value),
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Orchard(#[from] OrchardError),
    #[error("failed to render snapshot")]
    Render(#[from] serde_json::Error),
    #[error("the {page} page has no {action}")]
    Unsupported {
        page: Subsystem,
        action: &'static str,
    },
}

#[derive(Serialize)]
struct IrrigationPage<'a> {
    #[serde(flatten)]
    control: &'a ZoneController<IrrigationZone>,
    reservoir: &'a Reservoir,
}

#[derive(Serialize)]
struct MediaPage<'a> {
    player: &'a Player,
    /// Play head as `m:ss`.
    position: String,
    broadcast: &'a Broadcast,
}

/// Run one command.
///
/// # Errors
///
/// Returns [`ShellError::Orchard`] when the domain rejects the command;
/// the panel is left unchanged in that case.
pub fn execute<P: EventPublisher>(
    panel: &mut ControlPanel<P>,
    command: Command,
) -> Result<Outcome, ShellError> {
    let page = match command {
        Command::Help => return Ok(Outcome::Help),
        Command::Quit => return Ok(Outcome::Quit),
        Command::Status => return Ok(Outcome::Snapshot(serde_json::to_value(panel.overview())?)),
        Command::Show(page) => page,
        Command::System { page, action } => {
            run_system(panel, page, action)?;
            page
        }
        Command::Zone { page, zone, action } => {
            run_zone(panel, page, &zone, action)?;
            page
        }
        Command::Preset(preset) => {
            panel.lighting.apply_preset(preset)?;
            Subsystem::Lighting
        }
        Command::Device(DeviceAction::List(kind)) => {
            let devices: Vec<_> = panel.devices.registry().filter(kind).collect();
            return Ok(Outcome::Snapshot(serde_json::to_value(devices)?));
        }
        Command::Device(action) => {
            run_device(panel, &action)?;
            Subsystem::Devices
        }
        Command::Media(action) => {
            run_media(panel, action)?;
            Subsystem::Media
        }
    };
    Ok(Outcome::Snapshot(snapshot(panel, page)?))
}

/// Render one page as JSON.
///
/// # Errors
///
/// Returns an error if serialisation fails.
pub fn snapshot<P: EventPublisher>(
    panel: &ControlPanel<P>,
    page: Subsystem,
) -> Result<Value, serde_json::Error> {
    match page {
        Subsystem::Climate => serde_json::to_value(panel.climate.control()),
        Subsystem::Irrigation => serde_json::to_value(IrrigationPage {
            control: panel.irrigation.control(),
            reservoir: &panel.reservoir,
        }),
        Subsystem::AdvancedIrrigation => serde_json::to_value(IrrigationPage {
            control: panel.advanced_irrigation.control(),
            reservoir: &panel.reservoir,
        }),
        Subsystem::Lighting => serde_json::to_value(panel.lighting.control()),
        Subsystem::Devices => serde_json::to_value(panel.devices.registry()),
        Subsystem::Media => {
            let player = panel.media.player();
            serde_json::to_value(MediaPage {
                player,
                position: format_clock(player.position_secs()),
                broadcast: panel.media.broadcast(),
            })
        }
    }
}

fn run_system<P: EventPublisher>(
    panel: &mut ControlPanel<P>,
    page: Subsystem,
    action: SystemAction,
) -> Result<(), ShellError> {
    match page {
        Subsystem::Climate => system(&mut panel.climate, page, action, control_mode),
        Subsystem::Irrigation => system(&mut panel.irrigation, page, action, control_mode),
        Subsystem::AdvancedIrrigation => {
            system(&mut panel.advanced_irrigation, page, action, control_mode)
        }
        Subsystem::Lighting => system(&mut panel.lighting, page, action, lighting_mode),
        Subsystem::Devices | Subsystem::Media => Err(ShellError::Unsupported {
            page,
            action: "master switch",
        }),
    }
}

fn control_mode(mode: SystemMode) -> Option<ControlMode> {
    match mode {
        SystemMode::Control(mode) => Some(mode),
        SystemMode::Lighting(_) => None,
    }
}

fn lighting_mode(mode: SystemMode) -> Option<LightingMode> {
    match mode {
        SystemMode::Lighting(mode) => Some(mode),
        SystemMode::Control(_) => None,
    }
}

fn system<Z, P>(
    service: &mut ZoneService<Z, P>,
    page: Subsystem,
    action: SystemAction,
    convert: fn(SystemMode) -> Option<Z::SystemMode>,
) -> Result<(), ShellError>
where
    Z: Zone,
    Z::SystemMode: Serialize,
    P: EventPublisher,
{
    match action {
        SystemAction::Power => {
            service.toggle_enabled()?;
        }
        SystemAction::Saving => {
            service.toggle_saving_mode()?;
        }
        SystemAction::Mode(mode) => {
            let mode = convert(mode).ok_or(ShellError::Unsupported {
                page,
                action: "such mode",
            })?;
            service.set_system_mode(mode)?;
        }
    }
    Ok(())
}

fn run_zone<P: EventPublisher>(
    panel: &mut ControlPanel<P>,
    page: Subsystem,
    target: &Target,
    action: ZoneAction,
) -> Result<(), ShellError> {
    match page {
        Subsystem::Climate => {
            let service = &mut panel.climate;
            let id = zone_id(service.control(), target)?;
            match action {
                ZoneAction::Temperature(value) => {
                    service.set_target_temperature(id, value)?;
                }
                ZoneAction::Humidity(value) => {
                    service.set_target_humidity(id, value)?;
                }
                other => zone(service, page, id, other)?,
            }
        }
        Subsystem::Irrigation | Subsystem::AdvancedIrrigation => {
            let service = if page == Subsystem::Irrigation {
                &mut panel.irrigation
            } else {
                &mut panel.advanced_irrigation
            };
            let id = zone_id(service.control(), target)?;
            match action {
                ZoneAction::Threshold(value) => {
                    service.set_threshold(id, value)?;
                }
                ZoneAction::WaterSaving(enabled) => {
                    service.set_water_saving(id, enabled)?;
                }
                other => zone(service, page, id, other)?,
            }
        }
        Subsystem::Lighting => {
            let service = &mut panel.lighting;
            let id = zone_id(service.control(), target)?;
            match action {
                ZoneAction::Brightness(value) => {
                    service.set_brightness(id, value)?;
                }
                other => zone(service, page, id, other)?,
            }
        }
        Subsystem::Devices | Subsystem::Media => {
            return Err(ShellError::Unsupported {
                page,
                action: "zones",
            });
        }
    }
    Ok(())
}

fn zone<Z, P>(
    service: &mut ZoneService<Z, P>,
    page: Subsystem,
    id: ZoneId,
    action: ZoneAction,
) -> Result<(), ShellError>
where
    Z: Zone,
    Z::SystemMode: Serialize,
    P: EventPublisher,
{
    match action {
        ZoneAction::Toggle => {
            service.toggle_active(id)?;
        }
        ZoneAction::Mode(mode) => service.set_zone_mode(id, mode)?,
        _ => {
            return Err(ShellError::Unsupported {
                page,
                action: "such setpoint",
            });
        }
    }
    Ok(())
}

fn run_device<P: EventPublisher>(
    panel: &mut ControlPanel<P>,
    action: &DeviceAction,
) -> Result<(), ShellError> {
    let service = &mut panel.devices;
    match action {
        DeviceAction::Add => {
            service.add_placeholder()?;
        }
        DeviceAction::Remove(target) => {
            let id = device_id(service.registry(), target)?;
            service.remove_device(id)?;
        }
        DeviceAction::Select(target) => {
            let id = device_id(service.registry(), target)?;
            service.select_device(id)?;
        }
        DeviceAction::Deselect => service.clear_selection(),
        DeviceAction::List(_) => {}
    }
    Ok(())
}

fn run_media<P: EventPublisher>(
    panel: &mut ControlPanel<P>,
    action: MediaAction,
) -> Result<(), ShellError> {
    let media = &mut panel.media;
    match action {
        MediaAction::PlayPause => {
            media.play_pause()?;
        }
        MediaAction::Next => media.next_track()?,
        MediaAction::Previous => media.previous_track()?,
        MediaAction::Volume(percent) => {
            media.set_volume(percent)?;
        }
        MediaAction::Seek(secs) => {
            media.seek(secs)?;
        }
        MediaAction::Shuffle => {
            media.toggle_shuffle()?;
        }
        MediaAction::Repeat => {
            media.toggle_repeat()?;
        }
        MediaAction::Broadcast => {
            media.toggle_broadcast()?;
        }
        MediaAction::BroadcastVolume(percent) => {
            media.set_broadcast_volume(percent)?;
        }
    }
    Ok(())
}

fn zone_id<Z: Zone>(control: &ZoneController<Z>, target: &Target) -> Result<ZoneId, OrchardError> {
    let zone = match target {
        Target::Position(position) => position
            .checked_sub(1)
            .and_then(|index| control.zones().get(index)),
        Target::Name(name) => control.zone_by_name(name),
    };
    zone.map(Zone::id).ok_or_else(|| not_found("Zone", target))
}

fn device_id(registry: &DeviceRegistry, target: &Target) -> Result<DeviceId, OrchardError> {
    let device = match target {
        Target::Position(position) => position
            .checked_sub(1)
            .and_then(|index| registry.devices().get(index)),
        Target::Name(name) => registry.device_by_name(name),
    };
    device
        .map(|device| device.id)
        .ok_or_else(|| not_found("Device", target))
}

fn not_found(entity: &'static str, target: &Target) -> OrchardError {
    NotFoundError {
        entity,
        id: target.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchard_app::event_bus::InProcessEventBus;
    use orchard_app::seed::Session;

    fn panel() -> ControlPanel<InProcessEventBus> {
        ControlPanel::new(Session::orchard().unwrap(), InProcessEventBus::new(64))
    }

    fn run(panel: &mut ControlPanel<InProcessEventBus>, line: &str) -> Result<Outcome, ShellError> {
        execute(panel, Command::parse(line).unwrap())
    }

    fn value(outcome: Outcome) -> Value {
        match outcome {
            Outcome::Snapshot(value) => value,
            other => panic!("expected snapshot, got {other:?}"),
        }
    }

    #[test]
    fn should_resolve_zone_by_position_and_name() {
        let mut panel = panel();
        let by_position = value(run(&mut panel, "climate zone 3 toggle").unwrap());
        assert_eq!(by_position["zones"][2]["active"], true);

        let by_name = value(run(&mut panel, "climate zone STORAGE toggle").unwrap());
        assert_eq!(by_name["zones"][2]["active"], false);
    }

    #[test]
    fn should_report_unknown_zone() {
        let mut panel = panel();
        let err = run(&mut panel, "lighting zone 9 toggle").unwrap_err();
        assert!(matches!(err, ShellError::Orchard(OrchardError::NotFound(_))));
        assert_eq!(err.to_string(), "Zone #9 not found");

        assert!(run(&mut panel, "lighting zone 0 toggle").is_err());
    }

    #[test]
    fn should_include_reservoir_in_irrigation_pages() {
        let panel = panel();
        let page = snapshot(&panel, Subsystem::AdvancedIrrigation).unwrap();
        assert_eq!(page["reservoir"]["water_level"], 85.0);
        assert!(page["zones"].is_array());
        assert_eq!(page["system"]["saving_mode"], true);
    }

    #[test]
    fn should_list_devices_by_kind() {
        let mut panel = panel();
        let cameras = value(run(&mut panel, "devices list camera").unwrap());
        assert_eq!(cameras.as_array().map(Vec::len), Some(1));
        assert_eq!(cameras[0]["name"], "Camera-E5");
    }

    #[test]
    fn should_add_and_select_devices() {
        let mut panel = panel();
        run(&mut panel, "devices add").unwrap();
        assert!(panel.devices.registry().device_by_name("Device-6").is_some());

        run(&mut panel, "devices select valve-b2").unwrap();
        assert_eq!(
            panel.devices.registry().selected().map(|d| d.name.as_str()),
            Some("Valve-B2")
        );
    }

    #[test]
    fn should_render_media_page() {
        let mut panel = panel();
        let page = value(run(&mut panel, "media next").unwrap());
        assert_eq!(page["player"]["position_secs"], 0);
        assert_eq!(page["position"], "0:00");
        assert_eq!(page["broadcast"]["volume"], 85);
    }

    #[test]
    fn should_pass_through_help_and_quit() {
        let mut panel = panel();
        assert_eq!(run(&mut panel, "help").unwrap(), Outcome::Help);
        assert_eq!(run(&mut panel, "quit").unwrap(), Outcome::Quit);
    }
}
