//! Common error types used across the workspace.
//!
//! Each failure family is its own typed error and converts into
//! [`OrchardError`] via `#[from]`, so mutators can use `?` freely.

/// Top-level error returned by every fallible domain operation.
#[derive(Debug, thiserror::Error)]
pub enum OrchardError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    OutOfRange(#[from] OutOfRangeError),

    #[error(transparent)]
    Disabled(#[from] DisabledError),
}

/// Domain invariant violations detected while building or mutating state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("identifier {0} is already in use")]
    DuplicateId(String),

    #[error("invalid color {0:?}, expected #RRGGBB")]
    InvalidColor(String),

    #[error("playlist must contain at least one track")]
    EmptyPlaylist,
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A numeric value could not be accepted for a bounded quantity.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{quantity} {value} outside [{min}, {max}]")]
pub struct OutOfRangeError {
    pub quantity: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

/// A mutator was invoked while the owning subsystem is switched off.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{system} system is disabled")]
pub struct DisabledError {
    pub system: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_validation_error_into_orchard_error() {
        let err: OrchardError = ValidationError::EmptyName.into();
        assert!(matches!(
            err,
            OrchardError::Validation(ValidationError::EmptyName)
        ));
    }

    #[test]
    fn should_describe_missing_zone() {
        let err = NotFoundError {
            entity: "Zone",
            id: "42".to_string(),
        };
        assert_eq!(err.to_string(), "Zone 42 not found");
    }

    #[test]
    fn should_describe_out_of_range_value() {
        let err = OutOfRangeError {
            quantity: "temperature",
            value: f64::NAN,
            min: 16.0,
            max: 30.0,
        };
        assert_eq!(err.to_string(), "temperature NaN outside [16, 30]");
    }

    #[test]
    fn should_forward_disabled_message_transparently() {
        let err: OrchardError = DisabledError { system: "climate" }.into();
        assert_eq!(err.to_string(), "climate system is disabled");
    }
}
