//! Zone service: use-cases for the climate, irrigation and lighting pages.

use serde::Serialize;
use serde_json::json;

use orchard_domain::climate::ClimateZone;
use orchard_domain::controller::ZoneController;
use orchard_domain::error::OrchardError;
use orchard_domain::event::{Event, EventType, Subsystem};
use orchard_domain::id::ZoneId;
use orchard_domain::irrigation::IrrigationZone;
use orchard_domain::lighting::{LightingPreset, LightingZone};
use orchard_domain::mode::ControlMode;
use orchard_domain::zone::Zone;

use crate::ports::EventPublisher;

/// Application service driving one page's [`ZoneController`].
pub struct ZoneService<Z: Zone, P> {
    subsystem: Subsystem,
    control: ZoneController<Z>,
    publisher: P,
}

impl<Z, P> ZoneService<Z, P>
where
    Z: Zone,
    Z::SystemMode: Serialize,
    P: EventPublisher,
{
    /// Create a new service for `subsystem` over an initial controller.
    pub fn new(subsystem: Subsystem, control: ZoneController<Z>, publisher: P) -> Self {
        Self {
            subsystem,
            control,
            publisher,
        }
    }

    #[must_use]
    pub fn subsystem(&self) -> Subsystem {
        self.subsystem
    }

    #[must_use]
    pub fn control(&self) -> &ZoneController<Z> {
        &self.control
    }

    /// Flip the master switch. Switching off deactivates every zone.
    ///
    /// # Errors
    ///
    /// Returns an error propagated from the publisher.
    #[tracing::instrument(skip(self), fields(subsystem = %self.subsystem))]
    pub fn toggle_enabled(&mut self) -> Result<bool, OrchardError> {
        let enabled = self.control.toggle_enabled();
        tracing::info!(enabled, "master switch toggled");
        self.publish(EventType::SystemToggled, json!({ "enabled": enabled }))?;
        Ok(enabled)
    }

    /// Flip saving mode, shifting every zone's setpoint.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Disabled`] while the system is off, or an
    /// error propagated from the publisher.
    #[tracing::instrument(skip(self), fields(subsystem = %self.subsystem))]
    pub fn toggle_saving_mode(&mut self) -> Result<bool, OrchardError> {
        let saving = self.control.toggle_saving_mode().inspect_err(rejected)?;
        tracing::info!(saving, "saving mode toggled");
        self.publish(EventType::SavingModeToggled, json!({ "saving_mode": saving }))?;
        Ok(saving)
    }

    /// Change the system-wide mode.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Disabled`] while the system is off, or an
    /// error propagated from the publisher.
    #[tracing::instrument(skip(self), fields(subsystem = %self.subsystem))]
    pub fn set_system_mode(&mut self, mode: Z::SystemMode) -> Result<(), OrchardError> {
        self.control.set_system_mode(mode).inspect_err(rejected)?;
        tracing::info!(%mode, "system mode changed");
        self.publish(EventType::SystemModeChanged, json!({ "mode": mode }))
    }

    /// Set one zone's auto/manual mode.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Disabled`], [`OrchardError::NotFound`], or an
    /// error propagated from the publisher.
    #[tracing::instrument(skip(self), fields(subsystem = %self.subsystem))]
    pub fn set_zone_mode(&mut self, id: ZoneId, mode: ControlMode) -> Result<(), OrchardError> {
        self.control.set_zone_mode(id, mode).inspect_err(rejected)?;
        tracing::debug!(%id, %mode, "zone mode changed");
        self.publish(
            EventType::ZoneModeChanged,
            json!({ "zone_id": id, "mode": mode }),
        )
    }

    /// Flip one zone on or off.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Disabled`], [`OrchardError::NotFound`], or an
    /// error propagated from the publisher.
    #[tracing::instrument(skip(self), fields(subsystem = %self.subsystem))]
    pub fn toggle_active(&mut self, id: ZoneId) -> Result<bool, OrchardError> {
        let active = self.control.toggle_active(id).inspect_err(rejected)?;
        tracing::debug!(%id, active, "zone toggled");
        self.publish(
            EventType::ZoneToggled,
            json!({ "zone_id": id, "active": active }),
        )?;
        Ok(active)
    }

    fn setpoint_changed(
        &self,
        id: ZoneId,
        setpoint: &'static str,
        value: f64,
    ) -> Result<f64, OrchardError> {
        tracing::debug!(%id, setpoint, value, "setpoint changed");
        self.publish(
            EventType::SetpointChanged,
            json!({ "zone_id": id, "setpoint": setpoint, "value": value }),
        )?;
        Ok(value)
    }

    fn publish(&self, event_type: EventType, data: serde_json::Value) -> Result<(), OrchardError> {
        self.publisher
            .publish(Event::new(self.subsystem, event_type, data))
    }
}

impl<P: EventPublisher> ZoneService<ClimateZone, P> {
    /// Set a zone's target temperature, clamped to the climate bounds.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Disabled`], [`OrchardError::NotFound`],
    /// [`OrchardError::OutOfRange`] for non-finite input, or a publisher error.
    #[tracing::instrument(skip(self))]
    pub fn set_target_temperature(&mut self, id: ZoneId, value: f64) -> Result<f64, OrchardError> {
        let value = self
            .control
            .set_target_temperature(id, value)
            .inspect_err(rejected)?;
        self.setpoint_changed(id, "target_temperature", value)
    }

    /// Set a zone's target humidity, clamped to the humidity bounds.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Disabled`], [`OrchardError::NotFound`],
    /// [`OrchardError::OutOfRange`] for non-finite input, or a publisher error.
    #[tracing::instrument(skip(self))]
    pub fn set_target_humidity(&mut self, id: ZoneId, value: f64) -> Result<f64, OrchardError> {
        let value = self
            .control
            .set_target_humidity(id, value)
            .inspect_err(rejected)?;
        self.setpoint_changed(id, "target_humidity", value)
    }
}

impl<P: EventPublisher> ZoneService<IrrigationZone, P> {
    /// Set a zone's moisture threshold, clamped to 0–100 %.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Disabled`], [`OrchardError::NotFound`],
    /// [`OrchardError::OutOfRange`] for non-finite input, or a publisher error.
    #[tracing::instrument(skip(self))]
    pub fn set_threshold(&mut self, id: ZoneId, value: f64) -> Result<f64, OrchardError> {
        let value = self.control.set_threshold(id, value).inspect_err(rejected)?;
        self.setpoint_changed(id, "threshold", value)
    }

    /// Switch one zone's water saving on or off. Publishes only when the
    /// zone actually changed.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Disabled`], [`OrchardError::NotFound`], or a
    /// publisher error.
    #[tracing::instrument(skip(self))]
    pub fn set_water_saving(&mut self, id: ZoneId, enabled: bool) -> Result<bool, OrchardError> {
        let changed = self
            .control
            .set_water_saving(id, enabled)
            .inspect_err(rejected)?;
        if changed {
            let flow_rate = self.control.zone(id)?.flow_rate;
            tracing::debug!(%id, enabled, flow_rate, "water saving changed");
            self.publish(
                EventType::WaterSavingChanged,
                json!({ "zone_id": id, "water_saving": enabled, "flow_rate": flow_rate }),
            )?;
        }
        Ok(changed)
    }
}

impl<P: EventPublisher> ZoneService<LightingZone, P> {
    /// Set a zone's brightness, clamped to 0–100 %.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Disabled`], [`OrchardError::NotFound`],
    /// [`OrchardError::OutOfRange`] for non-finite input, or a publisher error.
    #[tracing::instrument(skip(self))]
    pub fn set_brightness(&mut self, id: ZoneId, value: f64) -> Result<f64, OrchardError> {
        let value = self.control.set_brightness(id, value).inspect_err(rejected)?;
        self.setpoint_changed(id, "brightness", value)
    }

    /// Apply a day or night preset to every zone.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Disabled`] while the system is off, or a
    /// publisher error.
    pub fn apply_preset(&mut self, preset: LightingPreset) -> Result<(), OrchardError> {
        self.set_system_mode(preset.into())
    }
}

fn rejected(err: &OrchardError) {
    tracing::warn!(%err, "mutation rejected");
}
