//! Hex color parsing for the JPEG flattening background

use crate::{
    config::BackgroundColor,
    error::{BgRemovalError, Result},
};

/// Utility for parsing and formatting colors
pub struct ColorParser;

impl ColorParser {
    /// Parse `#RRGGBB` or `#RGB` (the `#` is optional)
    ///
    /// # Examples
    /// ```rust
    /// use bgremove_heuristic::utils::ColorParser;
    ///
    /// let red = ColorParser::parse_hex("#f00")?;
    /// assert_eq!((red.r, red.g, red.b), (255, 0, 0));
    /// # Ok::<(), bgremove_heuristic::BgRemovalError>(())
    /// ```
    pub fn parse_hex(hex: &str) -> Result<BackgroundColor> {
        let digits = hex.trim().trim_start_matches('#');
        if !Self::is_valid_hex(digits) {
            return Err(BgRemovalError::invalid_config(format!(
                "Invalid color '{}': expected #RRGGBB or #RGB",
                hex
            )));
        }

        // All characters are ASCII hex digits from here on
        let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).unwrap_or(0);
        let color = if digits.len() == 6 {
            BackgroundColor::new(
                nibble(0) << 4 | nibble(1),
                nibble(2) << 4 | nibble(3),
                nibble(4) << 4 | nibble(5),
            )
        } else {
            BackgroundColor::new(nibble(0) * 17, nibble(1) * 17, nibble(2) * 17)
        };
        Ok(color)
    }

    /// Format a color as lowercase hex
    #[must_use]
    pub fn to_hex(color: &BackgroundColor, include_hash: bool) -> String {
        let hash = if include_hash { "#" } else { "" };
        format!("{}{:02x}{:02x}{:02x}", hash, color.r, color.g, color.b)
    }

    /// Whether `hex` is 3 or 6 hex digits, with an optional leading `#`
    #[must_use]
    pub fn is_valid_hex(hex: &str) -> bool {
        let digits = hex.trim_start_matches('#');
        matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_formats() {
        let color = ColorParser::parse_hex("#ff8000").unwrap();
        assert_eq!((color.r, color.g, color.b), (255, 128, 0));

        let color = ColorParser::parse_hex("0a0B0c").unwrap();
        assert_eq!((color.r, color.g, color.b), (10, 11, 12));

        let color = ColorParser::parse_hex("#abc").unwrap();
        assert_eq!((color.r, color.g, color.b), (0xaa, 0xbb, 0xcc));
    }

    #[test]
    fn test_parse_hex_rejects_bad_input() {
        for bad in ["", "#", "#12345", "#gggggg", "ff00ff00", "é12", "#ffé"] {
            assert!(ColorParser::parse_hex(bad).is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn test_to_hex_round_trip() {
        let color = BackgroundColor::new(1, 163, 255);
        assert_eq!(ColorParser::to_hex(&color, true), "#01a3ff");
        assert_eq!(ColorParser::to_hex(&color, false), "01a3ff");
        assert_eq!(ColorParser::parse_hex(&ColorParser::to_hex(&color, true)).unwrap(), color);
    }
}
