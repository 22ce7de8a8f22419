//! Common validation utilities for numeric signal parameters.
//!
//! These helpers check one scalar at a time and report the parameter name in
//! the message; callers attach the field path.

use std::fmt;

/// Error type for common validation failures.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonValidationError {
    /// Human-readable error message.
    pub message: String,
}

impl CommonValidationError {
    /// Creates a new validation error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CommonValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommonValidationError {}

fn check_finite(name: &str, value: f64) -> Result<(), CommonValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CommonValidationError::new(format!(
            "{} must be finite, got {}",
            name, value
        )))
    }
}

/// Validate that a value is in [0, 1] (the unit interval).
///
/// # Example
/// ```
/// use hlb_spec::validation::common::validate_unit_interval;
///
/// assert!(validate_unit_interval("depth", 0.5).is_ok());
/// assert!(validate_unit_interval("depth", 1.5).is_err());
/// ```
pub fn validate_unit_interval(name: &str, value: f64) -> Result<(), CommonValidationError> {
    check_finite(name, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(CommonValidationError::new(format!(
            "{} must be in [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

/// Validate that a value is positive (> 0).
///
/// # Example
/// ```
/// use hlb_spec::validation::common::validate_positive;
///
/// assert!(validate_positive("sweep_period", 10.0).is_ok());
/// assert!(validate_positive("sweep_period", 0.0).is_err());
/// ```
pub fn validate_positive(name: &str, value: f64) -> Result<(), CommonValidationError> {
    check_finite(name, value)?;
    if value <= 0.0 {
        return Err(CommonValidationError::new(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Validate that a value is non-negative (>= 0).
///
/// # Example
/// ```
/// use hlb_spec::validation::common::validate_non_negative;
///
/// assert!(validate_non_negative("frequency", 0.0).is_ok());
/// assert!(validate_non_negative("frequency", -1.0).is_err());
/// ```
pub fn validate_non_negative(name: &str, value: f64) -> Result<(), CommonValidationError> {
    check_finite(name, value)?;
    if value < 0.0 {
        return Err(CommonValidationError::new(format!(
            "{} must be non-negative, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Validate that a value is within `[min, max]`.
///
/// # Example
/// ```
/// use hlb_spec::validation::common::validate_range;
///
/// assert!(validate_range("rf_gain", 20.0, 0.0, 47.0).is_ok());
/// assert!(validate_range("rf_gain", 60.0, 0.0, 47.0).is_err());
/// ```
pub fn validate_range(
    name: &str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), CommonValidationError> {
    check_finite(name, value)?;
    if value < min || value > max {
        return Err(CommonValidationError::new(format!(
            "{} must be in [{}, {}], got {}",
            name, min, max, value
        )));
    }
    Ok(())
}

/// Returns true if `frequency` is strictly below half the sample rate.
///
/// # Example
/// ```
/// use hlb_spec::validation::common::is_below_nyquist;
///
/// assert!(is_below_nyquist(22_049.0, 44_100));
/// assert!(!is_below_nyquist(22_050.0, 44_100));
/// ```
pub fn is_below_nyquist(frequency: f64, sample_rate: u32) -> bool {
    frequency < sample_rate as f64 / 2.0
}
