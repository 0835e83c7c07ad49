//! Closed numeric ranges for setpoints and levels.

use crate::error::OutOfRangeError;

/// An inclusive `[min, max]` range for a named quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub quantity: &'static str,
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    #[must_use]
    pub const fn new(quantity: &'static str, min: f64, max: f64) -> Self {
        Self { quantity, min, max }
    }

    /// Whether `value` lies inside the range.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a finite value into the range.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] when `value` is NaN or infinite.
    pub fn clamp(&self, value: f64) -> Result<f64, OutOfRangeError> {
        if !value.is_finite() {
            return Err(self.out_of_range(value));
        }
        Ok(value.clamp(self.min, self.max))
    }

    /// Accept `value` only if it already lies inside the range.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] when `value` is outside the range or not finite.
    pub fn check(&self, value: f64) -> Result<f64, OutOfRangeError> {
        if value.is_finite() && self.contains(value) {
            Ok(value)
        } else {
            Err(self.out_of_range(value))
        }
    }

    fn out_of_range(&self, value: f64) -> OutOfRangeError {
        OutOfRangeError {
            quantity: self.quantity,
            value,
            min: self.min,
            max: self.max,
        }
    }
}

/// Percentage scale shared by brightness, volume, battery and the like.
pub const PERCENT: Bounds = Bounds::new("percentage", 0.0, 100.0);

#[cfg(test)]
mod tests {
    use super::*;

    const RANGE: Bounds = Bounds::new("temperature", 16.0, 30.0);

    #[test]
    fn should_keep_value_inside_range_untouched() {
        assert_eq!(RANGE.clamp(22.5).unwrap(), 22.5);
    }

    #[test]
    fn should_clamp_value_below_min_to_min() {
        assert_eq!(RANGE.clamp(3.0).unwrap(), 16.0);
    }

    #[test]
    fn should_clamp_value_above_max_to_max() {
        assert_eq!(RANGE.clamp(45.0).unwrap(), 30.0);
    }

    #[test]
    fn should_reject_nan_when_clamping() {
        let err = RANGE.clamp(f64::NAN).unwrap_err();
        assert_eq!(err.quantity, "temperature");
    }

    #[test]
    fn should_reject_infinity_when_clamping() {
        assert!(RANGE.clamp(f64::INFINITY).is_err());
    }

    #[test]
    fn should_accept_edges_when_checking() {
        assert!(RANGE.check(16.0).is_ok());
        assert!(RANGE.check(30.0).is_ok());
    }

    #[test]
    fn should_reject_outside_value_when_checking() {
        let err = RANGE.check(31.0).unwrap_err();
        assert_eq!(err.value, 31.0);
        assert_eq!(err.max, 30.0);
    }
}
