//! Command parsing: one shell line into a typed [`Command`].

use std::fmt;

use orchard_domain::device::DeviceKind;
use orchard_domain::event::Subsystem;
use orchard_domain::lighting::LightingPreset;
use orchard_domain::mode::{ControlMode, LightingMode, UnknownVariant};

pub const HELP: &str = "\
status                                   dashboard overview
show <page>                              print one page
<page> power                             toggle the master switch
<page> saving                            toggle eco / water / energy saving
<page> mode <mode>                       set the system mode
<page> zone <zone> toggle                switch a zone on or off
<page> zone <zone> mode auto|manual      set a zone's mode
climate zone <zone> temp <celsius>
climate zone <zone> humidity <percent>
<irrigation> zone <zone> threshold <percent>
<irrigation> zone <zone> water-saving on|off
lighting zone <zone> brightness <percent>
lighting preset day|night
devices add | remove <device> | select <device> | deselect | list [kind]
media play | next | prev | volume <percent> | seek <secs>
media shuffle | repeat | broadcast | broadcast-volume <percent>
help | quit

pages: climate, irrigation, advanced-irrigation, lighting, devices, media
zones and devices are addressed by 1-based position or by name";

/// A zone or device reference: 1-based position or case-insensitive name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Position(usize),
    Name(String),
}

impl Target {
    fn parse(token: &str) -> Self {
        match token.parse() {
            Ok(position) => Self::Position(position),
            Err(_) => Self::Name(token.to_string()),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(position) => write!(f, "#{position}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// A system mode, typed for the page it targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemMode {
    Control(ControlMode),
    Lighting(LightingMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemAction {
    Power,
    Saving,
    Mode(SystemMode),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoneAction {
    Toggle,
    Mode(ControlMode),
    Temperature(f64),
    Humidity(f64),
    Threshold(f64),
    WaterSaving(bool),
    Brightness(f64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceAction {
    Add,
    Remove(Target),
    Select(Target),
    Deselect,
    List(Option<DeviceKind>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaAction {
    PlayPause,
    Next,
    Previous,
    Volume(f64),
    Seek(u32),
    Shuffle,
    Repeat,
    Broadcast,
    BroadcastVolume(f64),
}

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Status,
    Show(Subsystem),
    Help,
    Quit,
    System {
        page: Subsystem,
        action: SystemAction,
    },
    Zone {
        page: Subsystem,
        zone: Target,
        action: ZoneAction,
    },
    Preset(LightingPreset),
    Device(DeviceAction),
    Media(MediaAction),
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?}, type `help` for a list")]
    Unknown(String),
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("invalid {what}: {value:?}")]
    Invalid { what: &'static str, value: String },
    #[error("`{action}` is not available on the {page} page")]
    Unsupported { page: Subsystem, action: String },
    #[error("unexpected trailing input {0:?}")]
    Trailing(String),
}

impl From<UnknownVariant> for CommandError {
    fn from(err: UnknownVariant) -> Self {
        Self::Invalid {
            what: "value",
            value: err.0,
        }
    }
}

struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn required(&mut self, what: &'static str) -> Result<&'a str, CommandError> {
        self.inner.next().ok_or(CommandError::Missing(what))
    }

    fn optional(&mut self) -> Option<&'a str> {
        self.inner.next()
    }

    fn number<T: std::str::FromStr>(&mut self, what: &'static str) -> Result<T, CommandError> {
        let token = self.required(what)?;
        token.parse().map_err(|_| CommandError::Invalid {
            what,
            value: token.to_string(),
        })
    }

    fn finish<T>(mut self, value: T) -> Result<T, CommandError> {
        match self.inner.next() {
            None => Ok(value),
            Some(extra) => Err(CommandError::Trailing(extra.to_string())),
        }
    }
}

impl Command {
    /// Parse one line of shell input.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] describing the first problem found.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut tokens = Tokens {
            inner: line.split_whitespace(),
        };
        let head = tokens.optional().ok_or(CommandError::Empty)?;
        let command = match head {
            "status" => Self::Status,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            "show" => Self::Show(tokens.required("page")?.parse()?),
            "devices" => Self::Device(parse_device(&mut tokens)?),
            "media" => Self::Media(parse_media(&mut tokens)?),
            other => {
                let page: Subsystem = other
                    .parse()
                    .map_err(|_| CommandError::Unknown(other.to_string()))?;
                parse_page(page, &mut tokens)?
            }
        };
        tokens.finish(command)
    }
}

fn parse_page(page: Subsystem, tokens: &mut Tokens<'_>) -> Result<Command, CommandError> {
    let verb = tokens.required("action")?;
    let action = match verb {
        "power" => SystemAction::Power,
        "saving" => SystemAction::Saving,
        "mode" => {
            let mode = tokens.required("mode")?;
            SystemAction::Mode(match page {
                Subsystem::Lighting => SystemMode::Lighting(mode.parse()?),
                _ => SystemMode::Control(mode.parse()?),
            })
        }
        "preset" if page == Subsystem::Lighting => {
            return Ok(Command::Preset(match tokens.required("preset")? {
                "day" => LightingPreset::Day,
                "night" => LightingPreset::Night,
                other => {
                    return Err(CommandError::Invalid {
                        what: "preset",
                        value: other.to_string(),
                    });
                }
            }));
        }
        "zone" => {
            let zone = Target::parse(tokens.required("zone")?);
            let action = parse_zone_action(page, tokens)?;
            return Ok(Command::Zone { page, zone, action });
        }
        other => return Err(unsupported(page, other)),
    };
    Ok(Command::System { page, action })
}

fn parse_zone_action(page: Subsystem, tokens: &mut Tokens<'_>) -> Result<ZoneAction, CommandError> {
    let irrigation = matches!(page, Subsystem::Irrigation | Subsystem::AdvancedIrrigation);
    let verb = tokens.required("zone action")?;
    Ok(match verb {
        "toggle" => ZoneAction::Toggle,
        "mode" => ZoneAction::Mode(tokens.required("mode")?.parse()?),
        "temp" if page == Subsystem::Climate => ZoneAction::Temperature(tokens.number("temperature")?),
        "humidity" if page == Subsystem::Climate => ZoneAction::Humidity(tokens.number("humidity")?),
        "threshold" if irrigation => ZoneAction::Threshold(tokens.number("threshold")?),
        "water-saving" if irrigation => ZoneAction::WaterSaving(match tokens.required("on|off")? {
            "on" => true,
            "off" => false,
            other => {
                return Err(CommandError::Invalid {
                    what: "switch",
                    value: other.to_string(),
                });
            }
        }),
        "brightness" if page == Subsystem::Lighting => {
            ZoneAction::Brightness(tokens.number("brightness")?)
        }
        other => return Err(unsupported(page, other)),
    })
}

fn parse_device(tokens: &mut Tokens<'_>) -> Result<DeviceAction, CommandError> {
    Ok(match tokens.required("device action")? {
        "add" => DeviceAction::Add,
        "remove" => DeviceAction::Remove(Target::parse(tokens.required("device")?)),
        "select" => DeviceAction::Select(Target::parse(tokens.required("device")?)),
        "deselect" => DeviceAction::Deselect,
        "list" => DeviceAction::List(tokens.optional().map(str::parse).transpose()?),
        other => return Err(unsupported(Subsystem::Devices, other)),
    })
}

fn parse_media(tokens: &mut Tokens<'_>) -> Result<MediaAction, CommandError> {
    Ok(match tokens.required("media action")? {
        "play" | "pause" => MediaAction::PlayPause,
        "next" => MediaAction::Next,
        "prev" => MediaAction::Previous,
        "volume" => MediaAction::Volume(tokens.number("volume")?),
        "seek" => MediaAction::Seek(tokens.number("position")?),
        "shuffle" => MediaAction::Shuffle,
        "repeat" => MediaAction::Repeat,
        "broadcast" => MediaAction::Broadcast,
        "broadcast-volume" => MediaAction::BroadcastVolume(tokens.number("volume")?),
        other => return Err(unsupported(Subsystem::Media, other)),
    })
}

fn unsupported(page: Subsystem, action: &str) -> CommandError {
    CommandError::Unsupported {
        page,
        action: action.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_global_commands() {
        assert_eq!(Command::parse("status").unwrap(), Command::Status);
        assert_eq!(Command::parse("  help ").unwrap(), Command::Help);
        assert_eq!(Command::parse("exit").unwrap(), Command::Quit);
        assert_eq!(
            Command::parse("show advanced-irrigation").unwrap(),
            Command::Show(Subsystem::AdvancedIrrigation)
        );
    }

    #[test]
    fn should_type_system_mode_by_page() {
        assert_eq!(
            Command::parse("lighting mode night").unwrap(),
            Command::System {
                page: Subsystem::Lighting,
                action: SystemAction::Mode(SystemMode::Lighting(LightingMode::Night)),
            }
        );
        assert_eq!(
            Command::parse("climate mode manual").unwrap(),
            Command::System {
                page: Subsystem::Climate,
                action: SystemAction::Mode(SystemMode::Control(ControlMode::Manual)),
            }
        );
        assert!(Command::parse("climate mode night").is_err());
    }

    #[test]
    fn should_parse_zone_by_position_or_name() {
        assert_eq!(
            Command::parse("climate zone 2 temp 23.5").unwrap(),
            Command::Zone {
                page: Subsystem::Climate,
                zone: Target::Position(2),
                action: ZoneAction::Temperature(23.5),
            }
        );
        assert_eq!(
            Command::parse("irrigation zone pears water-saving on").unwrap(),
            Command::Zone {
                page: Subsystem::Irrigation,
                zone: Target::Name("pears".to_string()),
                action: ZoneAction::WaterSaving(true),
            }
        );
    }

    #[test]
    fn should_reject_setpoint_on_wrong_page() {
        let err = Command::parse("lighting zone 1 temp 20").unwrap_err();
        assert!(matches!(
            err,
            CommandError::Unsupported {
                page: Subsystem::Lighting,
                ..
            }
        ));
        assert!(Command::parse("climate preset day").is_err());
    }

    #[test]
    fn should_parse_preset() {
        assert_eq!(
            Command::parse("lighting preset night").unwrap(),
            Command::Preset(LightingPreset::Night)
        );
        assert!(Command::parse("lighting preset custom").is_err());
    }

    #[test]
    fn should_parse_device_actions() {
        assert_eq!(
            Command::parse("devices list camera").unwrap(),
            Command::Device(DeviceAction::List(Some(DeviceKind::Camera)))
        );
        assert_eq!(
            Command::parse("devices list").unwrap(),
            Command::Device(DeviceAction::List(None))
        );
        assert_eq!(
            Command::parse("devices select Temp-A1").unwrap(),
            Command::Device(DeviceAction::Select(Target::Name("Temp-A1".to_string())))
        );
    }

    #[test]
    fn should_parse_media_actions() {
        assert_eq!(
            Command::parse("media seek 90").unwrap(),
            Command::Media(MediaAction::Seek(90))
        );
        assert_eq!(
            Command::parse("media broadcast-volume 60").unwrap(),
            Command::Media(MediaAction::BroadcastVolume(60.0))
        );
    }

    #[test]
    fn should_report_missing_and_invalid_arguments() {
        assert_eq!(Command::parse(""), Err(CommandError::Empty));
        assert_eq!(
            Command::parse("media volume"),
            Err(CommandError::Missing("volume"))
        );
        assert!(matches!(
            Command::parse("media volume loud"),
            Err(CommandError::Invalid { what: "volume", .. })
        ));
        assert!(matches!(
            Command::parse("garden power"),
            Err(CommandError::Unknown(_))
        ));
    }

    #[test]
    fn should_reject_trailing_input() {
        assert_eq!(
            Command::parse("status now"),
            Err(CommandError::Trailing("now".to_string()))
        );
    }
}
