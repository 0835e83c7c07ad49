//! Irrigation: watering blocks with a moisture threshold and a flow rate.
//!
//! Water-saving mode scales a zone's flow rate by [`SAVING_FACTOR`] on entry
//! and by [`RESTORE_FACTOR`] on exit. The pair is only an exact inverse for
//! some starting values; callers must not rely on a lossless round trip.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::bounds::{Bounds, PERCENT};
use crate::controller::ZoneController;
use crate::error::{OrchardError, ValidationError};
use crate::id::ZoneId;
use crate::mode::ControlMode;
use crate::time::{Timestamp, now};
use crate::zone::Zone;

/// Allowed soil-moisture threshold, %.
pub const THRESHOLD: Bounds = Bounds::new("moisture threshold", PERCENT.min, PERCENT.max);

/// Flow-rate multiplier applied when water saving is switched on.
pub const SAVING_FACTOR: f64 = 0.8;

/// Flow-rate multiplier applied when water saving is switched off.
pub const RESTORE_FACTOR: f64 = 1.25;

/// Irrigation subsystem controller (basic and advanced pages alike).
pub type IrrigationControl = ZoneController<IrrigationZone>;

/// One irrigation block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationZone {
    pub id: ZoneId,
    pub name: String,
    pub active: bool,
    pub mode: ControlMode,
    /// Sensed soil moisture, %. Read-only.
    pub moisture: f64,
    /// Moisture level below which the block needs water, %.
    pub threshold: f64,
    /// Litres per minute while watering.
    pub flow_rate: f64,
    pub water_saving: bool,
    /// When the block last stopped watering.
    pub last_watered: Option<Timestamp>,
    pub schedule: Option<WateringSchedule>,
    /// Litres per hour.
    pub water_usage: Option<f64>,
    /// Watering efficiency, %.
    pub efficiency: Option<f64>,
    pub soil_type: Option<String>,
    pub crop_type: Option<String>,
}

/// Recurring watering slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WateringSchedule {
    pub days: Vec<Weekday>,
    pub start: NaiveTime,
    pub duration_minutes: Option<u32>,
}

impl WateringSchedule {
    /// Every day of the week at `start`.
    #[must_use]
    pub fn daily(start: NaiveTime) -> Self {
        Self {
            days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
                Weekday::Sun,
            ],
            start,
            duration_minutes: None,
        }
    }

    #[must_use]
    pub fn runs_on(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }
}

/// How soil moisture compares with a zone's threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoistureLevel {
    /// At least 20 points above the threshold.
    Saturated,
    Adequate,
    /// Up to 10 points below the threshold.
    Low,
    Critical,
}

impl MoistureLevel {
    #[must_use]
    pub fn classify(moisture: f64, threshold: f64) -> Self {
        if moisture >= threshold + 20.0 {
            Self::Saturated
        } else if moisture >= threshold {
            Self::Adequate
        } else if moisture >= threshold - 10.0 {
            Self::Low
        } else {
            Self::Critical
        }
    }
}

/// Read-only reservoir telemetry shown alongside the zones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reservoir {
    /// Tank fill level, %.
    pub water_level: f64,
    /// Line pressure, bar.
    pub pressure: f64,
}

impl IrrigationZone {
    /// Create a builder for constructing an [`IrrigationZone`].
    #[must_use]
    pub fn builder() -> IrrigationZoneBuilder {
        IrrigationZoneBuilder::default()
    }

    #[must_use]
    pub fn moisture_level(&self) -> MoistureLevel {
        MoistureLevel::classify(self.moisture, self.threshold)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Validation`] when `name` is empty, or
    /// [`OrchardError::OutOfRange`] when the threshold is outside its bounds.
    pub fn validate(&self) -> Result<(), OrchardError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        THRESHOLD.check(self.threshold)?;
        Ok(())
    }

    fn scale_flow(&mut self, saving: bool) -> bool {
        if self.water_saving == saving {
            return false;
        }
        self.flow_rate *= if saving { SAVING_FACTOR } else { RESTORE_FACTOR };
        self.water_saving = saving;
        true
    }
}

impl Zone for IrrigationZone {
    type SystemMode = ControlMode;
    const SYSTEM: &'static str = "irrigation";

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
        if self.active && !active {
            self.last_watered = Some(now());
        }
        self.active = active;
    }

    fn mode(&self) -> ControlMode {
        self.mode
    }

    fn set_mode(&mut self, mode: ControlMode) {
        self.mode = mode;
    }

    fn enter_saving_mode(&mut self) {
        self.scale_flow(true);
    }

    fn leave_saving_mode(&mut self) {
        self.scale_flow(false);
    }
}

impl ZoneController<IrrigationZone> {
    /// Set a zone's moisture threshold, clamped to [`THRESHOLD`].
    /// Returns the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Disabled`], [`OrchardError::NotFound`], or
    /// [`OrchardError::OutOfRange`] when `value` is not finite.
    pub fn set_threshold(&mut self, id: ZoneId, value: f64) -> Result<f64, OrchardError> {
        let value = THRESHOLD.clamp(value)?;
        self.zone_mut(id)?.threshold = value;
        Ok(value)
    }

    /// Switch one zone's water saving on or off, scaling its flow rate.
    /// Returns `false` when the zone was already in the requested state.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Disabled`] or [`OrchardError::NotFound`].
    pub fn set_water_saving(&mut self, id: ZoneId, enabled: bool) -> Result<bool, OrchardError> {
        Ok(self.zone_mut(id)?.scale_flow(enabled))
    }
}

/// Step-by-step builder for [`IrrigationZone`].
#[derive(Debug, Default)]
pub struct IrrigationZoneBuilder {
    id: Option<ZoneId>,
    name: Option<String>,
    active: bool,
    mode: ControlMode,
    moisture: f64,
    threshold: Option<f64>,
    flow_rate: Option<f64>,
    water_saving: bool,
    last_watered: Option<Timestamp>,
    schedule: Option<WateringSchedule>,
    water_usage: Option<f64>,
    efficiency: Option<f64>,
    soil_type: Option<String>,
    crop_type: Option<String>,
}

impl IrrigationZoneBuilder {
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
    pub fn moisture(mut self, moisture: f64) -> Self {
        self.moisture = moisture;
        self
    }

    #[must_use]
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    #[must_use]
    pub fn flow_rate(mut self, flow_rate: f64) -> Self {
        self.flow_rate = Some(flow_rate);
        self
    }

    #[must_use]
    pub fn water_saving(mut self, water_saving: bool) -> Self {
        self.water_saving = water_saving;
        self
    }

    #[must_use]
    pub fn last_watered(mut self, ts: Timestamp) -> Self {
        self.last_watered = Some(ts);
        self
    }

    #[must_use]
    pub fn schedule(mut self, schedule: WateringSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    #[must_use]
    pub fn water_usage(mut self, litres_per_hour: f64) -> Self {
        self.water_usage = Some(litres_per_hour);
        self
    }

    #[must_use]
    pub fn efficiency(mut self, percent: f64) -> Self {
        self.efficiency = Some(percent);
        self
    }

    #[must_use]
    pub fn soil_type(mut self, soil: impl Into<String>) -> Self {
        self.soil_type = Some(soil.into());
        self
    }

    #[must_use]
    pub fn crop_type(mut self, crop: impl Into<String>) -> Self {
        self.crop_type = Some(crop.into());
        self
    }

    /// Consume the builder, validate, and return an [`IrrigationZone`].
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Validation`] if `name` is missing or empty,
    /// or [`OrchardError::OutOfRange`] for an out-of-bounds threshold.
    pub fn build(self) -> Result<IrrigationZone, OrchardError> {
        let zone = IrrigationZone {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            active: self.active,
            mode: self.mode,
            moisture: self.moisture,
            threshold: self.threshold.unwrap_or(40.0),
            flow_rate: self.flow_rate.unwrap_or(4.0),
            water_saving: self.water_saving,
            last_watered: self.last_watered,
            schedule: self.schedule,
            water_usage: self.water_usage,
            efficiency: self.efficiency,
            soil_type: self.soil_type,
            crop_type: self.crop_type,
        };
        zone.validate()?;
        Ok(zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::SystemState;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn block(name: &str, active: bool, flow_rate: f64) -> IrrigationZone {
        IrrigationZone::builder()
            .name(name)
            .active(active)
            .moisture(50.0)
            .threshold(40.0)
            .flow_rate(flow_rate)
            .build()
            .unwrap()
    }

    fn control(zones: Vec<IrrigationZone>) -> IrrigationControl {
        IrrigationControl::new(SystemState::default(), zones).unwrap()
    }

    #[test]
    fn should_scale_flow_rate_down_then_back_when_saving_toggles() {
        let mut ctl = control(vec![block("Apples", false, 4.0)]);

        ctl.toggle_saving_mode().unwrap();
        assert!(approx(ctl.zones()[0].flow_rate, 3.2));
        assert!(ctl.zones()[0].water_saving);

        ctl.toggle_saving_mode().unwrap();
        assert!(approx(ctl.zones()[0].flow_rate, 4.0));
        assert!(!ctl.zones()[0].water_saving);
    }

    #[test]
    fn should_not_scale_zone_already_saving_when_system_saving_enabled() {
        let mut saving = block("Grapes", false, 3.0);
        saving.water_saving = true;
        let mut ctl = control(vec![saving, block("Pears", false, 5.0)]);

        ctl.toggle_saving_mode().unwrap();
        assert!(approx(ctl.zones()[0].flow_rate, 3.0));
        assert!(approx(ctl.zones()[1].flow_rate, 4.0));
    }

    #[test]
    fn should_scale_single_zone_when_water_saving_set() {
        let mut ctl = control(vec![block("Apples", false, 4.0), block("Pears", false, 5.0)]);
        let id = ctl.zones()[0].id;

        assert!(ctl.set_water_saving(id, true).unwrap());
        assert!(approx(ctl.zones()[0].flow_rate, 3.2));
        assert!(approx(ctl.zones()[1].flow_rate, 5.0));
    }

    #[test]
    fn should_ignore_repeated_water_saving_request() {
        let mut ctl = control(vec![block("Apples", false, 4.0)]);
        let id = ctl.zones()[0].id;

        ctl.set_water_saving(id, true).unwrap();
        assert!(!ctl.set_water_saving(id, true).unwrap());
        assert!(approx(ctl.zones()[0].flow_rate, 3.2));
    }

    #[test]
    fn should_record_last_watered_when_running_zone_stops() {
        let mut ctl = control(vec![block("Pears", true, 5.0)]);
        let id = ctl.zones()[0].id;
        assert!(ctl.zones()[0].last_watered.is_none());

        assert!(!ctl.toggle_active(id).unwrap());
        assert!(ctl.zone(id).unwrap().last_watered.is_some());
    }

    #[test]
    fn should_record_last_watered_only_for_running_zones_on_disable() {
        let mut ctl = control(vec![block("Pears", true, 5.0), block("Grapes", false, 3.0)]);

        ctl.toggle_enabled();
        assert!(ctl.zones()[0].last_watered.is_some());
        assert!(ctl.zones()[1].last_watered.is_none());
    }

    #[test]
    fn should_clamp_threshold_to_percentage() {
        let mut ctl = control(vec![block("Apples", false, 4.0)]);
        let id = ctl.zones()[0].id;

        assert_eq!(ctl.set_threshold(id, 120.0).unwrap(), 100.0);
        assert_eq!(ctl.set_threshold(id, -3.0).unwrap(), 0.0);
    }

    #[test]
    fn should_classify_moisture_against_threshold() {
        assert_eq!(MoistureLevel::classify(65.0, 40.0), MoistureLevel::Saturated);
        assert_eq!(MoistureLevel::classify(50.0, 50.0), MoistureLevel::Adequate);
        assert_eq!(MoistureLevel::classify(35.0, 40.0), MoistureLevel::Low);
        assert_eq!(MoistureLevel::classify(20.0, 40.0), MoistureLevel::Critical);
    }

    #[test]
    fn should_report_zone_moisture_level() {
        let zone = block("Apples", false, 4.0);
        assert_eq!(zone.moisture_level(), MoistureLevel::Adequate);
    }

    #[test]
    fn should_run_daily_schedule_every_weekday() {
        let schedule = WateringSchedule::daily(NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        assert!(schedule.runs_on(Weekday::Sun));
        assert!(schedule.runs_on(Weekday::Wed));
    }

    #[test]
    fn should_reject_water_saving_change_while_disabled() {
        let mut ctl = control(vec![block("Apples", false, 4.0)]);
        let id = ctl.zones()[0].id;
        ctl.toggle_enabled();

        assert!(matches!(
            ctl.set_water_saving(id, true),
            Err(OrchardError::Disabled(_))
        ));
        assert!(approx(ctl.zones()[0].flow_rate, 4.0));
    }
}
