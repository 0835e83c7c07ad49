//! Zone controller: owns one subsystem's [`SystemState`] and its zones.
//!
//! All transitions go through the controller so the invariants hold after
//! every call:
//! - zone identifiers are unique within the collection;
//! - switching the system off forces every zone inactive;
//! - while the system is off, no mutator other than
//!   [`toggle_enabled`](ZoneController::toggle_enabled) is accepted, so no
//!   zone can become active again until the system is re-enabled.

use std::collections::HashSet;

use serde::Serialize;

use crate::cascade;
use crate::error::{DisabledError, NotFoundError, OrchardError, ValidationError};
use crate::id::ZoneId;
use crate::mode::ControlMode;
use crate::system::SystemState;
use crate::zone::Zone;

/// A subsystem's state aggregate: system switches plus a fixed set of zones.
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = "Z: Serialize, Z::SystemMode: Serialize"))]
pub struct ZoneController<Z: Zone> {
    system: SystemState<Z::SystemMode>,
    zones: Vec<Z>,
}

impl<Z: Zone> ZoneController<Z> {
    /// Build a controller from an initial system state and zone set.
    ///
    /// A disabled system must not start with active zones; any such zone
    /// is switched off.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateId`] when two zones share an id.
    pub fn new(system: SystemState<Z::SystemMode>, zones: Vec<Z>) -> Result<Self, OrchardError> {
        let mut seen = HashSet::with_capacity(zones.len());
        for zone in &zones {
            if !seen.insert(zone.id()) {
                return Err(ValidationError::DuplicateId(zone.id().to_string()).into());
            }
        }
        let mut controller = Self { system, zones };
        if !controller.system.enabled {
            cascade::deactivate_all(&mut controller.zones);
        }
        Ok(controller)
    }

    #[must_use]
    pub fn system(&self) -> &SystemState<Z::SystemMode> {
        &self.system
    }

    #[must_use]
    pub fn zones(&self) -> &[Z] {
        &self.zones
    }

    /// Look up a zone by id.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::NotFound`] when no zone has `id`.
    pub fn zone(&self, id: ZoneId) -> Result<&Z, OrchardError> {
        self.zones
            .iter()
            .find(|zone| zone.id() == id)
            .ok_or_else(|| not_found(id))
    }

    /// Find a zone by case-insensitive name.
    #[must_use]
    pub fn zone_by_name(&self, name: &str) -> Option<&Z> {
        self.zones
            .iter()
            .find(|zone| zone.name().eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.zones.iter().filter(|zone| zone.is_active()).count()
    }

    /// Flip the master switch and return the new `enabled` value.
    ///
    /// Turning the system off deactivates every zone. Turning it back on
    /// restores nothing: zones stay inactive until toggled individually.
    pub fn toggle_enabled(&mut self) -> bool {
        self.system.enabled = !self.system.enabled;
        if !self.system.enabled {
            cascade::deactivate_all(&mut self.zones);
        }
        self.system.enabled
    }

    /// Flip saving mode and shift every zone's setpoint accordingly.
    /// Returns the new `saving_mode` value.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Disabled`] while the system is off.
    pub fn toggle_saving_mode(&mut self) -> Result<bool, OrchardError> {
        self.ensure_enabled()?;
        self.system.saving_mode = !self.system.saving_mode;
        cascade::shift_saving(&mut self.zones, self.system.saving_mode);
        Ok(self.system.saving_mode)
    }

    /// Change the system-wide mode label and let zones react to it.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Disabled`] while the system is off.
    pub fn set_system_mode(&mut self, mode: Z::SystemMode) -> Result<(), OrchardError> {
        self.ensure_enabled()?;
        self.system.current_mode = mode;
        cascade::apply_system_mode(&mut self.zones, mode);
        Ok(())
    }

    /// Set a zone's auto/manual override. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Disabled`] while the system is off, or
    /// [`OrchardError::NotFound`] for an unknown id.
    pub fn set_zone_mode(&mut self, id: ZoneId, mode: ControlMode) -> Result<(), OrchardError> {
        self.zone_mut(id)?.set_mode(mode);
        Ok(())
    }

    /// Flip one zone's `active` flag and return the new value.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::Disabled`] while the system is off, or
    /// [`OrchardError::NotFound`] for an unknown id.
    pub fn toggle_active(&mut self, id: ZoneId) -> Result<bool, OrchardError> {
        let zone = self.zone_mut(id)?;
        let active = !zone.is_active();
        zone.set_active(active);
        Ok(active)
    }

    /// Mutable access to a zone, only granted while the system is on.
    pub(crate) fn zone_mut(&mut self, id: ZoneId) -> Result<&mut Z, OrchardError> {
        self.ensure_enabled()?;
        self.zones
            .iter_mut()
            .find(|zone| zone.id() == id)
            .ok_or_else(|| not_found(id))
    }

    fn ensure_enabled(&self) -> Result<(), OrchardError> {
        if self.system.enabled {
            Ok(())
        } else {
            Err(DisabledError { system: Z::SYSTEM }.into())
        }
    }
}

fn not_found(id: ZoneId) -> OrchardError {
    NotFoundError {
        entity: "Zone",
        id: id.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::SystemPhase;

    #[derive(Debug, Clone)]
    struct Plot {
        id: ZoneId,
        name: String,
        active: bool,
        mode: ControlMode,
        target: f64,
        last_system_mode: Option<ControlMode>,
    }

    impl Plot {
        fn new(name: &str, active: bool, target: f64) -> Self {
            Self {
                id: ZoneId::new(),
                name: name.to_string(),
                active,
                mode: ControlMode::Auto,
                target,
                last_system_mode: None,
            }
        }
    }

    impl Zone for Plot {
        type SystemMode = ControlMode;
        const SYSTEM: &'static str = "test";

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
            self.target -= 1.0;
        }
        fn leave_saving_mode(&mut self) {
            self.target += 1.0;
        }
        fn apply_system_mode(&mut self, mode: ControlMode) {
            self.last_system_mode = Some(mode);
        }
    }

    fn controller() -> ZoneController<Plot> {
        ZoneController::new(
            SystemState::default(),
            vec![
                Plot::new("North", true, 10.0),
                Plot::new("South", false, 20.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn should_reject_duplicate_zone_ids() {
        let plot = Plot::new("North", false, 1.0);
        let twin = plot.clone();
        let result = ZoneController::new(SystemState::default(), vec![plot, twin]);
        assert!(matches!(
            result,
            Err(OrchardError::Validation(ValidationError::DuplicateId(_)))
        ));
    }

    #[test]
    fn should_deactivate_zones_when_created_disabled() {
        let ctl = ZoneController::new(
            SystemState::new(false, false, ControlMode::Auto),
            vec![Plot::new("North", true, 1.0)],
        )
        .unwrap();
        assert_eq!(ctl.active_count(), 0);
    }

    #[test]
    fn should_force_all_zones_inactive_when_disabled() {
        let mut ctl = controller();
        assert!(!ctl.toggle_enabled());
        assert!(ctl.zones().iter().all(|zone| !zone.is_active()));
        assert_eq!(ctl.system().phase(), SystemPhase::Disabled);
    }

    #[test]
    fn should_not_restore_active_zones_when_re_enabled() {
        let mut ctl = controller();
        ctl.toggle_enabled();
        assert!(ctl.toggle_enabled());
        assert_eq!(ctl.active_count(), 0);
    }

    #[test]
    fn should_reject_zone_toggle_while_disabled() {
        let mut ctl = controller();
        let id = ctl.zones()[1].id;
        ctl.toggle_enabled();

        let result = ctl.toggle_active(id);
        assert!(matches!(result, Err(OrchardError::Disabled(_))));
        assert!(!ctl.zone(id).unwrap().active);
    }

    #[test]
    fn should_keep_saving_flag_across_disable_and_enable() {
        let mut ctl = controller();
        ctl.toggle_saving_mode().unwrap();
        ctl.toggle_enabled();
        ctl.toggle_enabled();
        assert_eq!(ctl.system().phase(), SystemPhase::EnabledSaving);
    }

    #[test]
    fn should_shift_every_zone_when_saving_toggles() {
        let mut ctl = controller();
        assert!(ctl.toggle_saving_mode().unwrap());
        let targets: Vec<f64> = ctl.zones().iter().map(|zone| zone.target).collect();
        assert_eq!(targets, vec![9.0, 19.0]);

        assert!(!ctl.toggle_saving_mode().unwrap());
        let targets: Vec<f64> = ctl.zones().iter().map(|zone| zone.target).collect();
        assert_eq!(targets, vec![10.0, 20.0]);
    }

    #[test]
    fn should_reject_saving_toggle_while_disabled() {
        let mut ctl = controller();
        ctl.toggle_enabled();
        assert!(matches!(
            ctl.toggle_saving_mode(),
            Err(OrchardError::Disabled(DisabledError { system: "test" }))
        ));
        assert!(!ctl.system().saving_mode);
    }

    #[test]
    fn should_propagate_system_mode_to_zones() {
        let mut ctl = controller();
        ctl.set_system_mode(ControlMode::Manual).unwrap();
        assert_eq!(ctl.system().current_mode, ControlMode::Manual);
        assert!(
            ctl.zones()
                .iter()
                .all(|zone| zone.last_system_mode == Some(ControlMode::Manual))
        );
    }

    #[test]
    fn should_leave_state_identical_when_zone_mode_set_twice() {
        let mut ctl = controller();
        let id = ctl.zones()[0].id;
        ctl.set_zone_mode(id, ControlMode::Auto).unwrap();
        let once = ctl.zone(id).unwrap().mode;
        ctl.set_zone_mode(id, ControlMode::Auto).unwrap();
        assert_eq!(ctl.zone(id).unwrap().mode, once);
    }

    #[test]
    fn should_return_not_found_for_unknown_zone() {
        let mut ctl = controller();
        let result = ctl.toggle_active(ZoneId::new());
        assert!(matches!(result, Err(OrchardError::NotFound(_))));
    }

    #[test]
    fn should_flip_single_zone_active_flag() {
        let mut ctl = controller();
        let id = ctl.zones()[1].id;
        assert!(ctl.toggle_active(id).unwrap());
        assert_eq!(ctl.active_count(), 2);
    }

    #[test]
    fn should_find_zone_by_name_ignoring_case() {
        let ctl = controller();
        assert_eq!(ctl.zone_by_name("south").unwrap().name, "South");
        assert!(ctl.zone_by_name("east").is_none());
    }
}
