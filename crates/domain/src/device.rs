//! Device: a sensor, controller or camera deployed in the orchard.
//!
//! Unlike zones, devices can be added and removed during a session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bounds::PERCENT;
use crate::error::{NotFoundError, OrchardError, ValidationError};
use crate::id::DeviceId;
use crate::mode::UnknownVariant;
use crate::time::Timestamp;

/// What a device does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Sensor,
    Controller,
    Camera,
    #[default]
    Unclassified,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor => f.write_str("sensor"),
            Self::Controller => f.write_str("controller"),
            Self::Camera => f.write_str("camera"),
            Self::Unclassified => f.write_str("unclassified"),
        }
    }
}

impl FromStr for DeviceKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sensor" => Ok(Self::Sensor),
            "controller" => Ok(Self::Controller),
            "camera" => Ok(Self::Camera),
            "unclassified" => Ok(Self::Unclassified),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Connectivity status as last reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    #[default]
    Offline,
    Warning,
}

/// Signal strength bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalQuality {
    Strong,
    Fair,
    Weak,
}

impl SignalQuality {
    #[must_use]
    pub fn from_strength(percent: u8) -> Self {
        match percent {
            80.. => Self::Strong,
            50..80 => Self::Fair,
            _ => Self::Weak,
        }
    }
}

/// Battery charge bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatteryLevel {
    Good,
    Fair,
    Low,
}

impl BatteryLevel {
    #[must_use]
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            60.. => Self::Good,
            30..60 => Self::Fair,
            _ => Self::Low,
        }
    }
}

/// A deployed device and its last reported telemetry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub kind: DeviceKind,
    pub location: Option<String>,
    pub status: DeviceStatus,
    /// Battery charge, %.
    pub battery: u8,
    /// Radio signal strength, %.
    pub signal_strength: u8,
    pub last_active: Option<Timestamp>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    #[must_use]
    pub fn signal_quality(&self) -> SignalQuality {
        SignalQuality::from_strength(self.signal_strength)
    }

    #[must_use]
    pub fn battery_level(&self) -> BatteryLevel {
        BatteryLevel::from_percent(self.battery)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Validation`] when `name` is empty, or
    /// [`OrchardError::OutOfRange`] when a percentage exceeds 100.
    pub fn validate(&self) -> Result<(), OrchardError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        PERCENT.check(f64::from(self.battery))?;
        PERCENT.check(f64::from(self.signal_strength))?;
        Ok(())
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    name: Option<String>,
    kind: DeviceKind,
    location: Option<String>,
    status: DeviceStatus,
    battery: Option<u8>,
    signal_strength: u8,
    last_active: Option<Timestamp>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: DeviceKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: DeviceStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn battery(mut self, percent: u8) -> Self {
        self.battery = Some(percent);
        self
    }

    #[must_use]
    pub fn signal_strength(mut self, percent: u8) -> Self {
        self.signal_strength = percent;
        self
    }

    #[must_use]
    pub fn last_active(mut self, ts: Timestamp) -> Self {
        self.last_active = Some(ts);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Validation`] if `name` is missing or empty,
    /// or [`OrchardError::OutOfRange`] for a percentage above 100.
    pub fn build(self) -> Result<Device, OrchardError> {
        let device = Device {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            kind: self.kind,
            location: self.location,
            status: self.status,
            battery: self.battery.unwrap_or(100),
            signal_strength: self.signal_strength,
            last_active: self.last_active,
        };
        device.validate()?;
        Ok(device)
    }
}

/// The session's device collection, with an optional selection.
///
/// Placeholder names come from a sequence that only ever grows, so a
/// number is never handed out twice even after removals.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
    selected: Option<DeviceId>,
    next_seq: u64,
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            selected: None,
            next_seq: 1,
        }
    }
}

impl DeviceRegistry {
    /// Build a registry from an initial device list.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateId`] when two devices share an id.
    pub fn new(devices: Vec<Device>) -> Result<Self, OrchardError> {
        let mut registry = Self::default();
        for device in devices {
            registry.add(device)?;
        }
        Ok(registry)
    }

    #[must_use]
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Look up a device by id.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::NotFound`] when no device has `id`.
    pub fn device(&self, id: DeviceId) -> Result<&Device, OrchardError> {
        self.devices
            .iter()
            .find(|device| device.id == id)
            .ok_or_else(|| not_found(id))
    }

    /// Find a device by case-insensitive name.
    #[must_use]
    pub fn device_by_name(&self, name: &str) -> Option<&Device> {
        self.devices
            .iter()
            .find(|device| device.name.eq_ignore_ascii_case(name))
    }

    /// Append a device.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateId`] when the id is already present.
    pub fn add(&mut self, device: Device) -> Result<DeviceId, OrchardError> {
        if self.devices.iter().any(|existing| existing.id == device.id) {
            return Err(ValidationError::DuplicateId(device.id.to_string()).into());
        }
        let id = device.id;
        self.devices.push(device);
        self.next_seq += 1;
        Ok(id)
    }

    /// Append an unconfigured, offline device named `Device-N`.
    pub fn add_placeholder(&mut self) -> DeviceId {
        let device = Device {
            id: DeviceId::new(),
            name: format!("Device-{}", self.next_seq),
            kind: DeviceKind::Unclassified,
            location: None,
            status: DeviceStatus::Offline,
            battery: 100,
            signal_strength: 0,
            last_active: None,
        };
        let id = device.id;
        self.devices.push(device);
        self.next_seq += 1;
        id
    }

    /// Remove a device, clearing the selection if it pointed at it.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::NotFound`] when no device has `id`.
    pub fn remove(&mut self, id: DeviceId) -> Result<Device, OrchardError> {
        let index = self
            .devices
            .iter()
            .position(|device| device.id == id)
            .ok_or_else(|| not_found(id))?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(self.devices.remove(index))
    }

    /// Mark a device as the one shown in detail.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::NotFound`] when no device has `id`.
    pub fn select(&mut self, id: DeviceId) -> Result<&Device, OrchardError> {
        let index = self
            .devices
            .iter()
            .position(|device| device.id == id)
            .ok_or_else(|| not_found(id))?;
        self.selected = Some(id);
        Ok(&self.devices[index])
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Device> {
        let id = self.selected?;
        self.devices.iter().find(|device| device.id == id)
    }

    /// Devices of the given kind, or all devices for `None`.
    pub fn filter(&self, kind: Option<DeviceKind>) -> impl Iterator<Item = &Device> {
        self.devices
            .iter()
            .filter(move |device| kind.is_none_or(|kind| device.kind == kind))
    }

    #[must_use]
    pub fn count_by_status(&self, status: DeviceStatus) -> usize {
        self.devices
            .iter()
            .filter(|device| device.status == status)
            .count()
    }
}

fn not_found(id: DeviceId) -> OrchardError {
    NotFoundError {
        entity: "Device",
        id: id.to_string(),
    }
    .into()
}
