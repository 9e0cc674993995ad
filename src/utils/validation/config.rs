//! Configuration value validation

use crate::error::{BgRemovalError, Result};

/// Validator for user-supplied configuration values
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a 0-100 quality setting
    pub fn validate_quality(name: &str, value: u8) -> Result<u8> {
        if value > 100 {
            return Err(BgRemovalError::config_value_error(
                name,
                value,
                "0-100",
                Some(90),
            ));
        }
        Ok(value)
    }

    /// Validate that an output path is usable for the number of inputs
    ///
    /// Stdout (`-`) only makes sense for a single input.
    pub fn validate_output_target(output: Option<&str>, input_count: usize) -> Result<()> {
        if input_count > 1 && output == Some("-") {
            return Err(BgRemovalError::invalid_config(
                "Cannot use stdout (-) as output when processing multiple files",
            ));
        }
        Ok(())
    }
}
