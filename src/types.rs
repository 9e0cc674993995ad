//! Core types for background removal operations

use crate::{
    config::{BackgroundColor, OutputFormat},
    error::{BgRemovalError, Result},
    segmentation::ColorEstimate,
    services::OutputFormatHandler,
    utils::BufferValidator,
};
use image::{DynamicImage, GenericImageView, ImageBuffer, Luma, Rgba, RgbaImage};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Owned, row-major pixel buffer with 3 (RGB) or 4 (RGBA) interleaved channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl PixelBuffer {
    /// Wrap raw bytes, validating geometry and channel layout
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Result<Self> {
        BufferValidator::validate_buffer(data.len(), width, height, channels)?;
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Copy a borrowed slice into a new buffer
    pub fn from_slice(data: &[u8], width: u32, height: u32, channels: u8) -> Result<Self> {
        BufferValidator::validate_buffer(data.len(), width, height, channels)?;
        Ok(Self {
            data: data.to_vec(),
            width,
            height,
            channels,
        })
    }

    /// Decode-side conversion: RGBA if the source has alpha, RGB otherwise
    pub fn from_image(image: &DynamicImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if image.color().has_alpha() {
            Self::new(image.to_rgba8().into_raw(), width, height, 4)
        } else {
            Self::new(image.to_rgb8().into_raw(), width, height, 3)
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Color channels of the pixel at row-major index `index`
    #[inline]
    #[must_use]
    pub fn rgb_at(&self, index: usize) -> [u8; 3] {
        let base = index * usize::from(self.channels);
        [self.data[base], self.data[base + 1], self.data[base + 2]]
    }

    /// Color channels of the pixel at `(x, y)`
    #[inline]
    #[must_use]
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        self.rgb_at(y as usize * self.width as usize + x as usize)
    }

    /// Return a 4-channel buffer, synthesizing an opaque alpha channel if needed
    #[must_use]
    pub fn with_alpha(self) -> Self {
        if self.has_alpha() {
            return self;
        }

        let mut data = Vec::with_capacity(self.pixel_count() * 4);
        for rgb in self.data.chunks_exact(3) {
            data.extend_from_slice(rgb);
            data.push(u8::MAX);
        }

        Self {
            data,
            width: self.width,
            height: self.height,
            channels: 4,
        }
    }

    /// Convert a 4-channel buffer into an `RgbaImage`
    pub fn into_rgba_image(self) -> Result<RgbaImage> {
        let (width, height) = self.dimensions();
        let buffer = self.with_alpha();
        ImageBuffer::from_raw(width, height, buffer.data).ok_or_else(|| {
            BgRemovalError::processing_stage_error(
                "compositing",
                "RGBA buffer rejected by image container",
                Some(&format!("{}x{}", width, height)),
            )
        })
    }
}

/// Boolean background mask, one entry per pixel, `true` meaning background
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    data: Vec<bool>,
    width: u32,
    height: u32,
}

impl Mask {
    /// Create an all-foreground mask
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, false)
    }

    /// Create a mask with every entry set to `value`
    #[must_use]
    pub fn filled(width: u32, height: u32, value: bool) -> Self {
        Self {
            data: vec![value; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Wrap an existing row-major vector
    pub fn from_vec(data: Vec<bool>, width: u32, height: u32) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(BgRemovalError::invalid_image(format!(
                "Mask length {} does not match {}x{} = {}",
                data.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Build a mask by evaluating `f(x, y)` for every pixel
    pub fn from_fn<F: FnMut(u32, u32) -> bool>(width: u32, height: u32, mut f: F) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.data[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, background: bool) {
        let index = self.index(x, y);
        self.data[index] = background;
    }

    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [bool] {
        &mut self.data
    }

    /// Number of entries marked background
    #[must_use]
    pub fn background_count(&self) -> usize {
        self.data.iter().filter(|&&bg| bg).count()
    }

    /// Number of entries that differ from `other`; masks must share geometry
    #[must_use]
    pub fn diff_count(&self, other: &Mask) -> usize {
        self.data
            .iter()
            .zip(&other.data)
            .filter(|(a, b)| a != b)
            .count()
    }

    /// Convert to an alpha-style grayscale mask (255 = keep, 0 = transparent)
    #[must_use]
    pub fn to_segmentation_mask(&self) -> SegmentationMask {
        let data = self
            .data
            .iter()
            .map(|&background| if background { 0 } else { u8::MAX })
            .collect();
        SegmentationMask::new(data, self.dimensions())
    }
}

/// Grayscale segmentation mask as written to the alpha channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationMask {
    /// Mask data as alpha values (0 = background, 255 = foreground)
    pub data: Vec<u8>,

    /// Mask dimensions (width, height)
    pub dimensions: (u32, u32),
}

impl SegmentationMask {
    /// Create a new segmentation mask
    #[must_use]
    pub fn new(data: Vec<u8>, dimensions: (u32, u32)) -> Self {
        Self { data, dimensions }
    }

    /// Create mask from a grayscale image
    #[must_use]
    pub fn from_image(image: &ImageBuffer<Luma<u8>, Vec<u8>>) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.as_raw().clone(), (width, height))
    }

    /// Convert mask to a grayscale image
    pub fn to_image(&self) -> Result<ImageBuffer<Luma<u8>, Vec<u8>>> {
        let (width, height) = self.dimensions;
        ImageBuffer::from_raw(width, height, self.data.clone())
            .ok_or_else(|| BgRemovalError::processing("Failed to create image from mask data"))
    }

    /// Apply the mask to an RGBA image
    pub fn apply_to_image(&self, image: &mut ImageBuffer<Rgba<u8>, Vec<u8>>) -> Result<()> {
        if image.dimensions() != self.dimensions {
            return Err(BgRemovalError::processing(
                "Image and mask dimensions do not match",
            ));
        }

        for (pixel, &alpha) in image.pixels_mut().zip(&self.data) {
            pixel[3] = alpha;
        }

        Ok(())
    }

    /// Get mask statistics
    #[must_use]
    pub fn statistics(&self) -> MaskStatistics {
        let total_pixels = self.data.len();
        let foreground_pixels = self.data.iter().filter(|&&x| x > 127).count();
        let background_pixels = total_pixels - foreground_pixels;
        let total = total_pixels.max(1) as f32;

        MaskStatistics {
            total_pixels,
            foreground_pixels,
            background_pixels,
            foreground_ratio: foreground_pixels as f32 / total,
            background_ratio: background_pixels as f32 / total,
        }
    }

    /// Save mask as PNG
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let image = self.to_image()?;
        image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

/// Statistics about a segmentation mask
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskStatistics {
    pub total_pixels: usize,
    pub foreground_pixels: usize,
    pub background_pixels: usize,
    pub foreground_ratio: f32,
    pub background_ratio: f32,
}

/// Per-stage timings of one segmentation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimings {
    pub sampling_ms: u64,
    pub edge_mapping_ms: u64,
    pub classification_ms: u64,
    pub expansion_ms: u64,
    pub cleanup_ms: u64,
    pub compositing_ms: u64,
}

impl StageTimings {
    /// Sum of all stage timings
    #[must_use]
    pub fn total_ms(&self) -> u64 {
        self.sampling_ms
            + self.edge_mapping_ms
            + self.classification_ms
            + self.expansion_ms
            + self.cleanup_ms
            + self.compositing_ms
    }
}

/// Detailed timing breakdown for background removal processing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingTimings {
    /// Image loading and decoding
    pub image_decode_ms: u64,

    /// Segmentation pipeline stages
    pub stages: StageTimings,

    /// Final image encoding (if saving to file)
    pub image_encode_ms: Option<u64>,

    /// Total end-to-end processing time
    pub total_ms: u64,
}

impl ProcessingTimings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn measured_ms(&self) -> u64 {
        self.image_decode_ms + self.stages.total_ms() + self.image_encode_ms.unwrap_or(0)
    }

    /// Get the "other" overhead time (unaccounted time)
    #[must_use]
    pub fn other_overhead_ms(&self) -> u64 {
        self.total_ms.saturating_sub(self.measured_ms())
    }

    /// Get breakdown percentages
    #[must_use]
    pub fn breakdown_percentages(&self) -> TimingBreakdown {
        if self.total_ms == 0 {
            return TimingBreakdown::default();
        }

        let total = self.total_ms as f64;
        let pct = |ms: u64| (ms as f64 / total) * 100.0;

        TimingBreakdown {
            decode_pct: pct(self.image_decode_ms),
            segmentation_pct: pct(self.stages.total_ms() - self.stages.compositing_ms),
            compositing_pct: pct(self.stages.compositing_ms),
            encode_pct: pct(self.image_encode_ms.unwrap_or(0)),
            other_pct: pct(self.other_overhead_ms()),
        }
    }
}

/// Percentage breakdown of timing phases
#[derive(Debug, Clone, Default)]
pub struct TimingBreakdown {
    pub decode_pct: f64,
    pub segmentation_pct: f64,
    pub compositing_pct: f64,
    pub encode_pct: f64,
    pub other_pct: f64,
}

/// Metadata about the processing operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    /// Detailed timing breakdown
    pub timings: ProcessingTimings,

    /// Background color estimate and adaptive threshold used for this image
    pub background: ColorEstimate,

    /// Input image format
    pub input_format: String,

    /// Output image format
    pub output_format: OutputFormat,

    /// Fill color used when flattening for formats without alpha
    pub background_color: BackgroundColor,
}

impl ProcessingMetadata {
    /// Create new processing metadata
    #[must_use]
    pub fn new(background: ColorEstimate) -> Self {
        Self {
            timings: ProcessingTimings::new(),
            background,
            input_format: "unknown".to_string(),
            output_format: OutputFormat::Png,
            background_color: BackgroundColor::default(),
        }
    }
}

/// Result of a background removal operation
#[derive(Debug, Clone)]
pub struct RemovalResult {
    /// The processed RGBA image with background made transparent
    pub image: DynamicImage,

    /// The segmentation mask used for removal
    pub mask: SegmentationMask,

    /// Original image dimensions
    pub original_dimensions: (u32, u32),

    /// Processing metadata
    pub metadata: ProcessingMetadata,

    /// Original input path (for logging purposes)
    pub input_path: Option<String>,
}

impl RemovalResult {
    /// Create a new removal result
    #[must_use]
    pub fn new(
        image: DynamicImage,
        mask: SegmentationMask,
        original_dimensions: (u32, u32),
        metadata: ProcessingMetadata,
    ) -> Self {
        Self {
            image,
            mask,
            original_dimensions,
            metadata,
            input_path: None,
        }
    }

    /// Attach the input path used for log lines
    #[must_use]
    pub fn with_input_path<S: Into<String>>(mut self, input_path: S) -> Self {
        self.input_path = Some(input_path.into());
        self
    }

    /// Save the result as PNG with alpha channel
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    /// Save in the specified format
    pub fn save<P: AsRef<Path>>(&self, path: P, format: OutputFormat, quality: u8) -> Result<()> {
        let bytes = self.to_bytes(format, quality)?;
        let path_ref = path.as_ref();
        std::fs::write(path_ref, bytes)
            .map_err(|e| BgRemovalError::file_io_error("write output image", path_ref, &e))
    }

    /// Save in the specified format and record the encoding time
    pub fn save_timed<P: AsRef<Path>>(
        &mut self,
        path: P,
        format: OutputFormat,
        quality: u8,
    ) -> Result<()> {
        let encode_start = instant::Instant::now();
        self.save(&path, format, quality)?;
        let encode_ms = encode_start.elapsed().as_millis() as u64;

        self.metadata.timings.image_encode_ms = Some(encode_ms);
        self.metadata.timings.total_ms += encode_ms;

        info!(
            "Processed: {} -> {} in {:.2}s",
            self.input_path.as_deref().unwrap_or("input"),
            path.as_ref().display(),
            self.metadata.timings.total_ms as f64 / 1000.0
        );
        Ok(())
    }

    /// Get the image as raw RGBA bytes
    #[must_use]
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.image.to_rgba8().into_raw()
    }

    /// Get the image as encoded bytes in the specified format
    pub fn to_bytes(&self, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
        OutputFormatHandler::encode(
            &self.image.to_rgba8(),
            format,
            quality,
            self.metadata.background_color,
        )
    }

    /// Get image dimensions
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Get detailed timing breakdown
    #[must_use]
    pub fn timings(&self) -> &ProcessingTimings {
        &self.metadata.timings
    }

    /// Get timing summary for display
    #[must_use]
    pub fn timing_summary(&self) -> String {
        let t = &self.metadata.timings;
        let s = &t.stages;

        let mut summary = format!(
            "Total: {}ms | Decode: {}ms | Sample: {}ms | Edges: {}ms | Classify: {}ms | Expand: {}ms | Cleanup: {}ms | Composite: {}ms",
            t.total_ms,
            t.image_decode_ms,
            s.sampling_ms,
            s.edge_mapping_ms,
            s.classification_ms,
            s.expansion_ms,
            s.cleanup_ms,
            s.compositing_ms
        );

        if let Some(encode_ms) = t.image_encode_ms {
            summary.push_str(&format!(" | Encode: {}ms", encode_ms));
        }

        summary
    }
}
