//! Device service: use-cases for the device management page.

use serde_json::json;

use orchard_domain::device::{Device, DeviceRegistry};
use orchard_domain::error::OrchardError;
use orchard_domain::event::{Event, EventType, Subsystem};
use orchard_domain::id::DeviceId;

use crate::ports::EventPublisher;

/// Application service for adding, removing and selecting devices.
pub struct DeviceService<P> {
    registry: DeviceRegistry,
    publisher: P,
}

impl<P: EventPublisher> DeviceService<P> {
    /// Create a new service over an initial registry.
    pub fn new(registry: DeviceRegistry, publisher: P) -> Self {
        Self {
            registry,
            publisher,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Register a fully described device.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Validation`] if invariants fail or the id is
    /// already taken, or an error propagated from the publisher.
    #[tracing::instrument(skip(self, device), fields(device_name = %device.name))]
    pub fn add_device(&mut self, device: Device) -> Result<DeviceId, OrchardError> {
        device.validate()?;
        let name = device.name.clone();
        let id = self.registry.add(device)?;
        self.added(id, &name)
    }

    /// Register an unconfigured placeholder device.
    ///
    /// # Errors
    ///
    /// Returns an error propagated from the publisher.
    #[tracing::instrument(skip(self))]
    pub fn add_placeholder(&mut self) -> Result<DeviceId, OrchardError> {
        let id = self.registry.add_placeholder();
        let name = self.registry.device(id)?.name.clone();
        self.added(id, &name)
    }

    /// Remove a device by id.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::NotFound`] when no device has `id`, or an
    /// error propagated from the publisher.
    #[tracing::instrument(skip(self))]
    pub fn remove_device(&mut self, id: DeviceId) -> Result<Device, OrchardError> {
        let device = self
            .registry
            .remove(id)
            .inspect_err(|err| tracing::warn!(%err, "device removal rejected"))?;
        tracing::info!(device_name = %device.name, "device removed");
        self.publish(
            EventType::DeviceRemoved,
            json!({ "device_id": id, "name": device.name }),
        )?;
        Ok(device)
    }

    /// Select a device for the detail view.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::NotFound`] when no device has `id`, or an
    /// error propagated from the publisher.
    #[tracing::instrument(skip(self))]
    pub fn select_device(&mut self, id: DeviceId) -> Result<&Device, OrchardError> {
        self.registry.select(id)?;
        self.publish(EventType::DeviceSelected, json!({ "device_id": id }))?;
        self.registry.device(id)
    }

    pub fn clear_selection(&mut self) {
        self.registry.clear_selection();
    }

    fn added(&self, id: DeviceId, name: &str) -> Result<DeviceId, OrchardError> {
        tracing::info!(%id, name, "device added");
        self.publish(EventType::DeviceAdded, json!({ "device_id": id, "name": name }))?;
        Ok(id)
    }

    fn publish(&self, event_type: EventType, data: serde_json::Value) -> Result<(), OrchardError> {
        self.publisher
            .publish(Event::new(Subsystem::Devices, event_type, data))
    }
}
