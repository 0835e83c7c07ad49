//! Event: an immutable record of a state change on one control page.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::id::EventId;
use crate::mode::UnknownVariant;
use crate::time::{Timestamp, now};

/// The control page an event originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Subsystem {
    Climate,
    Irrigation,
    AdvancedIrrigation,
    Lighting,
    Devices,
    Media,
}

impl Subsystem {
    pub const ALL: [Self; 6] = [
        Self::Climate,
        Self::Irrigation,
        Self::AdvancedIrrigation,
        Self::Lighting,
        Self::Devices,
        Self::Media,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Climate => "climate",
            Self::Irrigation => "irrigation",
            Self::AdvancedIrrigation => "advanced-irrigation",
            Self::Lighting => "lighting",
            Self::Devices => "devices",
            Self::Media => "media",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subsystem {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|subsystem| subsystem.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// What kind of change happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SystemToggled,
    SavingModeToggled,
    SystemModeChanged,
    ZoneToggled,
    ZoneModeChanged,
    SetpointChanged,
    WaterSavingChanged,
    DeviceAdded,
    DeviceRemoved,
    DeviceSelected,
    PlaybackChanged,
    BroadcastChanged,
}

/// A state-change record published after every successful mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub subsystem: Subsystem,
    pub event_type: EventType,
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl Event {
    #[must_use]
    pub fn new(subsystem: Subsystem, event_type: EventType, data: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            subsystem,
            event_type,
            data,
            timestamp: now(),
        }
    }
}
