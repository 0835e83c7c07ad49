//! Lighting: lamp groups with brightness and color, plus day/night presets.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::bounds::{Bounds, PERCENT};
use crate::controller::ZoneController;
use crate::error::{OrchardError, ValidationError};
use crate::id::ZoneId;
use crate::mode::{ControlMode, LightingMode};
use crate::zone::Zone;

/// Allowed brightness, %.
pub const BRIGHTNESS: Bounds = Bounds::new("brightness", PERCENT.min, PERCENT.max);

/// Brightness removed when energy saving is switched on.
pub const SAVING_DELTA: f64 = 20.0;

/// Energy saving never dims a zone below this brightness. A zone already
/// below it is raised to it.
pub const SAVING_FLOOR: f64 = 30.0;

/// Lighting subsystem controller.
pub type LightingControl = ZoneController<LightingZone>;

/// An RGB color in `#RRGGBB` form, stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Color {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix('#') {
            Some(hex) if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) => {
                Ok(Self(format!("#{}", hex.to_ascii_uppercase())))
            }
            _ => Err(ValidationError::InvalidColor(s.to_string())),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Daily switch-on and switch-off times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightSchedule {
    pub on: NaiveTime,
    pub off: NaiveTime,
}

/// A named bulk overwrite of every zone's brightness and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightingPreset {
    Day,
    Night,
}

impl LightingPreset {
    #[must_use]
    pub fn brightness(self) -> f64 {
        match self {
            Self::Day => 75.0,
            Self::Night => 40.0,
        }
    }

    #[must_use]
    pub fn color(self) -> Color {
        // both literals are valid #RRGGBB
        match self {
            Self::Day => Color("#FFEB3B".to_string()),
            Self::Night => Color("#FFF9C4".to_string()),
        }
    }
}

impl From<LightingPreset> for LightingMode {
    fn from(preset: LightingPreset) -> Self {
        match preset {
            LightingPreset::Day => Self::Day,
            LightingPreset::Night => Self::Night,
        }
    }
}

impl LightingMode {
    /// The preset written to zones when this mode is selected, if any.
    #[must_use]
    pub fn preset(self) -> Option<LightingPreset> {
        match self {
            Self::Day => Some(LightingPreset::Day),
            Self::Night => Some(LightingPreset::Night),
            Self::Custom => None,
        }
    }
}

/// One lighting zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingZone {
    pub id: ZoneId,
    pub name: String,
    pub on: bool,
    pub brightness: f64,
    pub color: Color,
    pub mode: ControlMode,
    pub schedule: Option<LightSchedule>,
}

impl LightingZone {
    /// Create a builder for constructing a [`LightingZone`].
    #[must_use]
    pub fn builder() -> LightingZoneBuilder {
        LightingZoneBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Validation`] when `name` is empty, or
    /// [`OrchardError::OutOfRange`] when brightness is outside its bounds.
    pub fn validate(&self) -> Result<(), OrchardError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        BRIGHTNESS.check(self.brightness)?;
        Ok(())
    }
}

impl Zone for LightingZone {
    type SystemMode = LightingMode;
    const SYSTEM: &'static str = "lighting";

    fn id(&self) -> ZoneId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.on
    }

    fn set_active(&mut self, active: bool) {
        self.on = active;
    }

    fn mode(&self) -> ControlMode {
        self.mode
    }

    fn set_mode(&mut self, mode: ControlMode) {
        self.mode = mode;
    }

    fn enter_saving_mode(&mut self) {
        self.brightness = (self.brightness - SAVING_DELTA).max(SAVING_FLOOR);
    }

    fn leave_saving_mode(&mut self) {
        self.brightness = (self.brightness + SAVING_DELTA).min(BRIGHTNESS.max);
    }

    fn apply_system_mode(&mut self, mode: LightingMode) {
        if let Some(preset) = mode.preset() {
            self.brightness = preset.brightness();
            self.color = preset.color();
        }
    }
}

impl ZoneController<LightingZone> {
    /// Set a zone's brightness, clamped to [`BRIGHTNESS`].
    /// Returns the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Disabled`], [`OrchardError::NotFound`], or
    /// [`OrchardError::OutOfRange`] when `value` is not finite.
    pub fn set_brightness(&mut self, id: ZoneId, value: f64) -> Result<f64, OrchardError> {
        let value = BRIGHTNESS.clamp(value)?;
        self.zone_mut(id)?.brightness = value;
        Ok(value)
    }

    /// Select the preset's mode, overwriting every zone's brightness and
    /// color.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Disabled`] while the system is off.
    pub fn apply_preset(&mut self, preset: LightingPreset) -> Result<(), OrchardError> {
        self.set_system_mode(preset.into())
    }
}

/// Step-by-step builder for [`LightingZone`].
#[derive(Debug, Default)]
pub struct LightingZoneBuilder {
    id: Option<ZoneId>,
    name: Option<String>,
    on: bool,
    brightness: Option<f64>,
    color: Option<Color>,
    mode: ControlMode,
    schedule: Option<LightSchedule>,
}

impl LightingZoneBuilder {
    #[must_use]
    pub fn id(mut self, id: ZoneId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn on(mut self, on: bool) -> Self {
        self.on = on;
        self
    }

    #[must_use]
    pub fn brightness(mut self, brightness: f64) -> Self {
        self.brightness = Some(brightness);
        self
    }

    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: ControlMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn schedule(mut self, on: NaiveTime, off: NaiveTime) -> Self {
        self.schedule = Some(LightSchedule { on, off });
        self
    }

    /// Consume the builder, validate, and return a [`LightingZone`].
    ///
    /// Brightness and color default to the day preset.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Validation`] if `name` is missing or empty,
    /// or [`OrchardError::OutOfRange`] for an out-of-bounds brightness.
    pub fn build(self) -> Result<LightingZone, OrchardError> {
        let zone = LightingZone {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            on: self.on,
            brightness: self
                .brightness
                .unwrap_or_else(|| LightingPreset::Day.brightness()),
            color: self.color.unwrap_or_else(|| LightingPreset::Day.color()),
            mode: self.mode,
            schedule: self.schedule,
        };
        zone.validate()?;
        Ok(zone)
    }
}
