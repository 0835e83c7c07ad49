//! Climate: greenhouse sections with temperature and humidity setpoints.
//!
//! Eco mode lowers every zone's target temperature by
//! [`ECO_TEMPERATURE_DELTA`] and raises it back on exit. The shifted value
//! stays within [`TEMPERATURE`], so near the edges the round trip is lossy.

use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::controller::ZoneController;
use crate::error::{OrchardError, ValidationError};
use crate::id::ZoneId;
use crate::mode::ControlMode;
use crate::zone::Zone;

/// Allowed target temperature, °C.
pub const TEMPERATURE: Bounds = Bounds::new("target temperature", 16.0, 30.0);

/// Allowed target relative humidity, %.
pub const HUMIDITY: Bounds = Bounds::new("target humidity", 30.0, 90.0);

/// Offset applied to target temperatures when eco mode toggles, °C.
pub const ECO_TEMPERATURE_DELTA: f64 = 2.0;

/// Climate subsystem controller.
pub type ClimateControl = ZoneController<ClimateZone>;

/// One climate-controlled section.
///
/// `temperature` and `humidity` are sensed values and are never written by
/// any mutator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateZone {
    pub id: ZoneId,
    pub name: String,
    pub active: bool,
    pub mode: ControlMode,
    pub temperature: f64,
    pub target_temperature: f64,
    pub humidity: f64,
    pub target_humidity: f64,
}

impl ClimateZone {
    /// Create a builder for constructing a [`ClimateZone`].
    #[must_use]
    pub fn builder() -> ClimateZoneBuilder {
        ClimateZoneBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Validation`] when `name` is empty, or
    /// [`OrchardError::OutOfRange`] when a setpoint is outside its bounds.
    pub fn validate(&self) -> Result<(), OrchardError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        TEMPERATURE.check(self.target_temperature)?;
        HUMIDITY.check(self.target_humidity)?;
        Ok(())
    }
}

impl Zone for ClimateZone {
    type SystemMode = ControlMode;
    const SYSTEM: &'static str = "climate";

    fn id(&self) -> ZoneId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn mode(&self) -> ControlMode {
        self.mode
    }

    fn set_mode(&mut self, mode: ControlMode) {
        self.mode = mode;
    }

    fn enter_saving_mode(&mut self) {
        self.target_temperature = shift_temperature(self.target_temperature, -ECO_TEMPERATURE_DELTA);
    }

    fn leave_saving_mode(&mut self) {
        self.target_temperature = shift_temperature(self.target_temperature, ECO_TEMPERATURE_DELTA);
    }
}

fn shift_temperature(value: f64, delta: f64) -> f64 {
    (value + delta).clamp(TEMPERATURE.min, TEMPERATURE.max)
}

impl ZoneController<ClimateZone> {
    /// Set a zone's target temperature, clamped to [`TEMPERATURE`].
    /// Returns the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Disabled`], [`OrchardError::NotFound`], or
    /// [`OrchardError::OutOfRange`] when `value` is not finite.
    pub fn set_target_temperature(&mut self, id: ZoneId, value: f64) -> Result<f64, OrchardError> {
        let value = TEMPERATURE.clamp(value)?;
        self.zone_mut(id)?.target_temperature = value;
        Ok(value)
    }

    /// Set a zone's target humidity, clamped to [`HUMIDITY`].
    /// Returns the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Disabled`], [`OrchardError::NotFound`], or
    /// [`OrchardError::OutOfRange`] when `value` is not finite.
    pub fn set_target_humidity(&mut self, id: ZoneId, value: f64) -> Result<f64, OrchardError> {
        let value = HUMIDITY.clamp(value)?;
        self.zone_mut(id)?.target_humidity = value;
        Ok(value)
    }
}

/// Step-by-step builder for [`ClimateZone`].
#[derive(Debug, Default)]
pub struct ClimateZoneBuilder {
    id: Option<ZoneId>,
    name: Option<String>,
    active: bool,
    mode: ControlMode,
    temperature: Option<f64>,
    target_temperature: Option<f64>,
    humidity: Option<f64>,
    target_humidity: Option<f64>,
}

impl ClimateZoneBuilder {
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
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: ControlMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn temperature(mut self, current: f64, target: f64) -> Self {
        self.temperature = Some(current);
        self.target_temperature = Some(target);
        self
    }

    #[must_use]
    pub fn humidity(mut self, current: f64, target: f64) -> Self {
        self.humidity = Some(current);
        self.target_humidity = Some(target);
        self
    }

    /// Consume the builder, validate, and return a [`ClimateZone`].
    ///
    /// Missing setpoints default to 22 °C and 60 %.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Validation`] if `name` is missing or empty,
    /// or [`OrchardError::OutOfRange`] for an out-of-bounds setpoint.
    pub fn build(self) -> Result<ClimateZone, OrchardError> {
        let target_temperature = self.target_temperature.unwrap_or(22.0);
        let target_humidity = self.target_humidity.unwrap_or(60.0);
        let zone = ClimateZone {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            active: self.active,
            mode: self.mode,
            temperature: self.temperature.unwrap_or(target_temperature),
            target_temperature,
            humidity: self.humidity.unwrap_or(target_humidity),
            target_humidity,
        };
        zone.validate()?;
        Ok(zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::SystemState;

    fn zone(name: &str, target: f64) -> ClimateZone {
        ClimateZone::builder()
            .name(name)
            .active(true)
            .temperature(24.0, target)
            .humidity(65.0, 70.0)
            .build()
            .unwrap()
    }

    fn control(zones: Vec<ClimateZone>) -> ClimateControl {
        ClimateControl::new(SystemState::default(), zones).unwrap()
    }

    #[test]
    fn should_build_valid_zone_when_name_provided() {
        let zone = zone("Greenhouse", 25.0);
        assert_eq!(zone.name, "Greenhouse");
        assert_eq!(zone.target_temperature, 25.0);
        assert_eq!(zone.mode, ControlMode::Auto);
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = ClimateZone::builder().build();
        assert!(matches!(
            result,
            Err(OrchardError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_reject_out_of_range_setpoint_when_building() {
        let result = ClimateZone::builder()
            .name("Greenhouse")
            .temperature(24.0, 35.0)
            .build();
        assert!(matches!(result, Err(OrchardError::OutOfRange(_))));
    }

    #[test]
    fn should_lower_target_by_two_when_eco_enabled_and_restore_when_disabled() {
        let mut ctl = control(vec![zone("Greenhouse", 25.0)]);

        ctl.toggle_saving_mode().unwrap();
        assert_eq!(ctl.zones()[0].target_temperature, 23.0);

        ctl.toggle_saving_mode().unwrap();
        assert_eq!(ctl.zones()[0].target_temperature, 25.0);
    }

    #[test]
    fn should_keep_target_within_bounds_when_eco_shift_hits_floor() {
        let mut ctl = control(vec![zone("Storage", 17.0)]);

        ctl.toggle_saving_mode().unwrap();
        assert_eq!(ctl.zones()[0].target_temperature, 16.0);

        ctl.toggle_saving_mode().unwrap();
        assert_eq!(ctl.zones()[0].target_temperature, 18.0);
    }

    #[test]
    fn should_raise_target_when_leaving_eco_mode_that_started_on() {
        let mut ctl = ClimateControl::new(
            SystemState::new(true, true, ControlMode::Auto),
            vec![zone("Greenhouse", 25.0)],
        )
        .unwrap();

        assert!(!ctl.toggle_saving_mode().unwrap());
        assert_eq!(ctl.zones()[0].target_temperature, 27.0);
    }

    #[test]
    fn should_clamp_target_temperature_to_bounds() {
        let mut ctl = control(vec![zone("Greenhouse", 25.0)]);
        let id = ctl.zones()[0].id;

        assert_eq!(ctl.set_target_temperature(id, 40.0).unwrap(), 30.0);
        assert_eq!(ctl.set_target_temperature(id, 5.0).unwrap(), 16.0);
        assert_eq!(ctl.zone(id).unwrap().target_temperature, 16.0);
    }

    #[test]
    fn should_clamp_target_humidity_to_bounds() {
        let mut ctl = control(vec![zone("Greenhouse", 25.0)]);
        let id = ctl.zones()[0].id;

        assert_eq!(ctl.set_target_humidity(id, 95.0).unwrap(), 90.0);
        assert_eq!(ctl.set_target_humidity(id, 45.0).unwrap(), 45.0);
    }

    #[test]
    fn should_reject_nan_target_and_keep_previous_value() {
        let mut ctl = control(vec![zone("Greenhouse", 25.0)]);
        let id = ctl.zones()[0].id;

        let result = ctl.set_target_temperature(id, f64::NAN);
        assert!(matches!(result, Err(OrchardError::OutOfRange(_))));
        assert_eq!(ctl.zone(id).unwrap().target_temperature, 25.0);
    }

    #[test]
    fn should_reject_target_change_while_system_disabled() {
        let mut ctl = control(vec![zone("Greenhouse", 25.0)]);
        let id = ctl.zones()[0].id;
        ctl.toggle_enabled();

        let result = ctl.set_target_temperature(id, 20.0);
        assert!(matches!(result, Err(OrchardError::Disabled(_))));
    }

    #[test]
    fn should_leave_telemetry_untouched_by_mutators() {
        let mut ctl = control(vec![zone("Greenhouse", 25.0)]);
        let id = ctl.zones()[0].id;

        ctl.set_target_temperature(id, 20.0).unwrap();
        ctl.toggle_saving_mode().unwrap();

        let zone = ctl.zone(id).unwrap();
        assert_eq!(zone.temperature, 24.0);
        assert_eq!(zone.humidity, 65.0);
    }

    #[test]
    fn should_return_not_found_for_unknown_zone() {
        let mut ctl = control(vec![zone("Greenhouse", 25.0)]);
        let result = ctl.set_target_humidity(ZoneId::new(), 50.0);
        assert!(matches!(result, Err(OrchardError::NotFound(_))));
    }
}
