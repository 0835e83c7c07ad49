//! Subsystem-wide switches: master enable, saving mode, and the mode label.

use serde::{Deserialize, Serialize};

/// Global enablement and mode flags for one subsystem.
///
/// `saving_mode` keeps its value while the system is disabled, so the next
/// enable resumes in the same saving state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemState<M> {
    pub enabled: bool,
    pub saving_mode: bool,
    pub current_mode: M,
}

/// The three observable phases of a [`SystemState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemPhase {
    Disabled,
    EnabledNormal,
    EnabledSaving,
}

impl<M> SystemState<M> {
    #[must_use]
    pub fn new(enabled: bool, saving_mode: bool, current_mode: M) -> Self {
        Self {
            enabled,
            saving_mode,
            current_mode,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SystemPhase {
        match (self.enabled, self.saving_mode) {
            (false, _) => SystemPhase::Disabled,
            (true, false) => SystemPhase::EnabledNormal,
            (true, true) => SystemPhase::EnabledSaving,
        }
    }
}

impl<M: Default> Default for SystemState<M> {
    fn default() -> Self {
        Self::new(true, false, M::default())
    }
}
