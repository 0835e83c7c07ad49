//! Cascade rules: how a system-wide transition propagates to every zone.

use crate::zone::Zone;

/// Force every zone inactive. Prior activity is not remembered.
pub fn deactivate_all<Z: Zone>(zones: &mut [Z]) {
    for zone in zones.iter_mut().filter(|zone| zone.is_active()) {
        zone.set_active(false);
    }
}

/// Shift every zone's setpoint in or out of saving mode.
pub fn shift_saving<Z: Zone>(zones: &mut [Z], entering: bool) {
    for zone in zones {
        if entering {
            zone.enter_saving_mode();
        } else {
            zone.leave_saving_mode();
        }
    }
}

/// Propagate a system-wide mode change to every zone.
pub fn apply_system_mode<Z: Zone>(zones: &mut [Z], mode: Z::SystemMode) {
    for zone in zones {
        zone.apply_system_mode(mode);
    }
}
