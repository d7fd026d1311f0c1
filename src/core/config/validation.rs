//! Validation helper functions for configuration types.

use crate::core::errors::{Result, TestgapError};

/// Validate that a usize value lies in `min..=max`.
pub fn validate_range_usize(value: usize, min: usize, max: usize, field: &str) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(TestgapError::config_field(
            format!("{} must be between {} and {}", field, min, max),
            field,
        ));
    }
    Ok(())
}

/// Validate that a percentage lies in `0.0..=100.0`.
pub fn validate_percentage(value: f64, field: &str) -> Result<()> {
    if !(0.0..=100.0).contains(&value) {
        return Err(TestgapError::config_field(
            format!("{} must be between 0.0 and 100.0", field),
            field,
        ));
    }
    Ok(())
}

/// Validate that a lower threshold does not exceed its upper counterpart.
pub fn validate_threshold_order(lower: f64, upper: f64, field: &str) -> Result<()> {
    if lower > upper {
        return Err(TestgapError::config_field(
            format!("{} ({}) must not exceed {}", field, lower, upper),
            field,
        ));
    }
    Ok(())
}
