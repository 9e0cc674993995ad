//! Pixel buffer geometry validation
//!
//! Every precondition of the segmentation core is checked here, once, before
//! any stage runs.

use crate::error::{BgRemovalError, Result};

/// Validator for raw pixel buffers handed to the segmentation core
pub struct BufferValidator;

impl BufferValidator {
    /// Validate image dimensions are non-zero
    pub fn validate_dimensions(width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(BgRemovalError::invalid_image(format!(
                "Image dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        Ok(())
    }

    /// Validate the channel count is RGB or RGBA
    pub fn validate_channels(channels: u8) -> Result<()> {
        if !matches!(channels, 3 | 4) {
            return Err(BgRemovalError::unsupported_channels(channels));
        }
        Ok(())
    }

    /// Compute `width * height * channels`, rejecting overflow
    pub fn expected_len(width: u32, height: u32, channels: u8) -> Result<usize> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(usize::from(channels)))
            .ok_or_else(|| {
                BgRemovalError::invalid_image(format!(
                    "Image of {}x{}x{} overflows addressable memory",
                    width, height, channels
                ))
            })
    }

    /// Run all buffer checks in the documented order
    ///
    /// Zero dimensions are reported before the channel layout, and the
    /// channel layout before any length mismatch.
    pub fn validate_buffer(len: usize, width: u32, height: u32, channels: u8) -> Result<()> {
        Self::validate_dimensions(width, height)?;
        Self::validate_channels(channels)?;

        let expected = Self::expected_len(width, height, channels)?;
        if len != expected {
            return Err(BgRemovalError::invalid_image(format!(
                "Buffer length {} does not match {}x{}x{} = {}",
                len, width, height, channels, expected
            )));
        }
        Ok(())
    }
}
