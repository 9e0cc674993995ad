//! Configuration types for background removal operations

use crate::error::{BgRemovalError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output image format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PNG with alpha channel transparency
    #[default]
    Png,
    /// JPEG flattened onto the configured background color (no transparency)
    Jpeg,
    /// WebP with alpha channel transparency
    WebP,
    /// TIFF with alpha channel transparency
    Tiff,
    /// Raw RGBA8 pixel data (4 bytes per pixel)
    Rgba8,
}

/// Background color for formats that don't support transparency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self::white()
    }
}

impl BackgroundColor {
    /// Create a new background color with RGB values
    ///
    /// # Examples
    /// ```rust
    /// use bgremove_heuristic::BackgroundColor;
    /// let orange = BackgroundColor::new(255, 165, 0);
    /// assert_eq!(orange.g, 165);
    /// ```
    #[must_use]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// White (255, 255, 255)
    #[must_use]
    pub fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// Black (0, 0, 0)
    #[must_use]
    pub fn black() -> Self {
        Self::new(0, 0, 0)
    }
}

/// Tuning constants for the segmentation pipeline
///
/// The defaults are the empirically tuned reference values. Changing any of
/// them changes which pixels end up transparent, so treat non-default values
/// as a behavior change rather than a fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationParams {
    /// Lower clamp for the adaptive threshold
    pub threshold_min: f32,
    /// Upper clamp for the adaptive threshold
    pub threshold_max: f32,
    /// Multiplier applied to the border color spread
    pub threshold_scale: f32,
    /// Corner block side as a fraction of `min(width, height)`
    pub corner_fraction: f32,
    /// Smallest corner block side in pixels
    pub min_corner_block: u32,
    /// Border walk stride is `min(width, height) / edge_sample_divisor`
    pub edge_sample_divisor: u32,
    /// Width of the lenient border band as a fraction of `min(width, height)`
    pub border_band_fraction: f32,
    /// Threshold multiplier inside the border band
    pub border_leniency: f32,
    /// Threshold multiplier on strong interior edges
    pub edge_strictness: f32,
    /// Gradient magnitude above which a pixel counts as a structural edge
    pub strong_edge_magnitude: f32,
    /// Weight of the color distance in the combined metric
    pub color_weight: f32,
    /// Weight of the luminance difference in the combined metric
    pub luminance_weight: f32,
    /// Flood fill accepts neighbors closer than `threshold * flood_tolerance`
    pub flood_tolerance: f32,
}

impl Default for SegmentationParams {
    fn default() -> Self {
        Self {
            threshold_min: 30.0,
            threshold_max: 60.0,
            threshold_scale: 1.5,
            corner_fraction: 0.05,
            min_corner_block: 5,
            edge_sample_divisor: 50,
            border_band_fraction: 0.08,
            border_leniency: 1.4,
            edge_strictness: 0.7,
            strong_edge_magnitude: 50.0,
            color_weight: 0.7,
            luminance_weight: 0.3,
            flood_tolerance: 1.2,
        }
    }
}

impl SegmentationParams {
    /// Validate that every parameter is finite and in a usable range
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("threshold_min", self.threshold_min),
            ("threshold_max", self.threshold_max),
            ("threshold_scale", self.threshold_scale),
            ("border_leniency", self.border_leniency),
            ("edge_strictness", self.edge_strictness),
            ("flood_tolerance", self.flood_tolerance),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(BgRemovalError::config_value_error(
                    name,
                    value,
                    "finite, > 0",
                    None,
                ));
            }
        }

        let non_negative = [
            ("corner_fraction", self.corner_fraction),
            ("border_band_fraction", self.border_band_fraction),
            ("strong_edge_magnitude", self.strong_edge_magnitude),
            ("color_weight", self.color_weight),
            ("luminance_weight", self.luminance_weight),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(BgRemovalError::config_value_error(
                    name,
                    value,
                    "finite, >= 0",
                    None,
                ));
            }
        }

        if self.threshold_min > self.threshold_max {
            return Err(BgRemovalError::invalid_config(format!(
                "threshold_min ({}) must not exceed threshold_max ({})",
                self.threshold_min, self.threshold_max
            )));
        }

        if self.edge_sample_divisor == 0 {
            return Err(BgRemovalError::config_value_error(
                "edge_sample_divisor",
                0,
                ">= 1",
                Some(50),
            ));
        }

        Ok(())
    }
}

/// Configuration for background removal operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemovalConfig {
    /// Output format
    pub output_format: OutputFormat,

    /// Background color for non-transparent formats
    pub background_color: BackgroundColor,

    /// JPEG quality (0-100, only used for JPEG output)
    pub jpeg_quality: u8,

    /// Enable debug mode (additional logging)
    pub debug: bool,

    /// Segmentation tuning constants
    pub segmentation: SegmentationParams,
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::default(),
            background_color: BackgroundColor::default(),
            jpeg_quality: 90,
            debug: false,
            segmentation: SegmentationParams::default(),
        }
    }
}

impl RemovalConfig {
    /// Create a new configuration builder
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bgremove_heuristic::{OutputFormat, RemovalConfig};
    ///
    /// let config = RemovalConfig::builder()
    ///     .output_format(OutputFormat::WebP)
    ///     .debug(true)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(config.output_format, OutputFormat::WebP);
    /// ```
    #[must_use]
    pub fn builder() -> RemovalConfigBuilder {
        RemovalConfigBuilder::default()
    }

    /// Load a configuration from a JSON file
    ///
    /// Fields missing from the file keep their default values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let content = std::fs::read_to_string(path_ref)
            .map_err(|e| BgRemovalError::file_io_error("read config file", path_ref, &e))?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration parameters
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bgremove_heuristic::RemovalConfig;
    ///
    /// let mut config = RemovalConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.jpeg_quality = 150;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        crate::utils::ConfigValidator::validate_quality("JPEG quality", self.jpeg_quality)?;
        self.segmentation.validate()
    }
}

/// Builder for `RemovalConfig`
#[derive(Debug, Default)]
pub struct RemovalConfigBuilder {
    config: RemovalConfig,
}

impl RemovalConfigBuilder {
    /// Set output format
    #[must_use]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// Set background color used when flattening for JPEG
    #[must_use]
    pub fn background_color(mut self, color: BackgroundColor) -> Self {
        self.config.background_color = color;
        self
    }

    /// Set JPEG quality (clamped to 0-100)
    #[must_use]
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.min(100);
        self
    }

    /// Enable or disable debug mode
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Replace the segmentation parameters
    #[must_use]
    pub fn segmentation(mut self, params: SegmentationParams) -> Self {
        self.config.segmentation = params;
        self
    }

    /// Build the configuration, validating it first
    pub fn build(self) -> Result<RemovalConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
