//! Operating modes for systems and zones.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Automatic or manual control, used per zone and as the system-wide label
/// for climate and irrigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    #[default]
    Auto,
    Manual,
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Manual => f.write_str("manual"),
        }
    }
}

impl FromStr for ControlMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "manual" => Ok(Self::Manual),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// System-wide lighting mode.
///
/// `Day` and `Night` carry a preset that is written to every zone when the
/// mode is selected. `Custom` is a label only and leaves zones untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightingMode {
    #[default]
    Day,
    Night,
    Custom,
}

impl fmt::Display for LightingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => f.write_str("day"),
            Self::Night => f.write_str("night"),
            Self::Custom => f.write_str("custom"),
        }
    }
}

impl FromStr for LightingMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "night" => Ok(Self::Night),
            "custom" => Ok(Self::Custom),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Returned when parsing a name that matches no variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value {0:?}")]
pub struct UnknownVariant(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_zone_mode_to_auto() {
        assert_eq!(ControlMode::default(), ControlMode::Auto);
    }

    #[test]
    fn should_parse_control_mode_from_lowercase_name() {
        assert_eq!("manual".parse::<ControlMode>().unwrap(), ControlMode::Manual);
    }

    #[test]
    fn should_reject_unknown_control_mode() {
        let err = "turbo".parse::<ControlMode>().unwrap_err();
        assert_eq!(err, UnknownVariant("turbo".to_string()));
    }

    #[test]
    fn should_parse_custom_lighting_mode() {
        assert_eq!("custom".parse::<LightingMode>().unwrap(), LightingMode::Custom);
    }

    #[test]
    fn should_roundtrip_lighting_mode_through_serde_json() {
        let json = serde_json::to_string(&LightingMode::Night).unwrap();
        assert_eq!(json, "\"night\"");
        let parsed: LightingMode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, LightingMode::Night);
    }
}
