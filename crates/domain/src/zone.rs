//! Zone: one independently controllable sub-area of a subsystem.
//!
//! Every subsystem (climate, irrigation, lighting) has its own zone type
//! with its own setpoints. They share the [`Zone`] trait so that the
//! master-switch and saving-mode cascades can be written once in
//! [`ZoneController`](crate::controller::ZoneController).

use std::fmt;

use crate::id::ZoneId;
use crate::mode::ControlMode;

/// Behaviour shared by every controllable zone.
pub trait Zone {
    /// Mode label carried by the owning subsystem's
    /// [`SystemState`](crate::system::SystemState).
    type SystemMode: Copy + PartialEq + fmt::Debug + fmt::Display;

    /// Subsystem name used in errors and logs.
    const SYSTEM: &'static str;

    fn id(&self) -> ZoneId;

    fn name(&self) -> &str;

    fn is_active(&self) -> bool;

    fn set_active(&mut self, active: bool);

    fn mode(&self) -> ControlMode;

    fn set_mode(&mut self, mode: ControlMode);

    /// Apply this subsystem's saving offset to the zone's setpoint.
    fn enter_saving_mode(&mut self);

    /// Apply the inverse offset. Not guaranteed to restore the value that
    /// existed before [`enter_saving_mode`](Self::enter_saving_mode).
    fn leave_saving_mode(&mut self);

    /// React to a change of the system-wide mode. Most subsystems treat the
    /// mode as a label and do nothing.
    fn apply_system_mode(&mut self, _mode: Self::SystemMode) {}
}
