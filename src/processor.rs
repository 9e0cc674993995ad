//! Unified background removal processor
//!
//! `BackgroundRemovalProcessor` wraps the segmentation core with decoding,
//! timing, metadata and progress reporting. Both the library convenience
//! functions and the CLI go through it, so they behave the same.

use crate::{
    config::RemovalConfig,
    error::Result,
    segmentation::{BackgroundSegmenter, Segmentation},
    services::{ImageIOService, OutputFormatHandler, ProcessingStage, ProgressReporter, ProgressTracker},
    types::{PixelBuffer, ProcessingMetadata, ProcessingTimings, RemovalResult},
};
use image::{DynamicImage, GenericImageView};
use instant::Instant;
use log::{debug, info};
use std::path::Path;
use tracing::{info as trace_info, instrument};

/// Background removal processor holding a validated configuration
pub struct BackgroundRemovalProcessor {
    config: RemovalConfig,
    segmenter: BackgroundSegmenter,
    progress_tracker: Option<ProgressTracker>,
}

impl BackgroundRemovalProcessor {
    /// Create a processor, validating the configuration first
    ///
    /// # Examples
    /// ```rust
    /// use bgremove_heuristic::{BackgroundRemovalProcessor, RemovalConfig};
    ///
    /// let processor = BackgroundRemovalProcessor::new(RemovalConfig::default())?;
    /// assert_eq!(processor.config().jpeg_quality, 90);
    /// # Ok::<(), bgremove_heuristic::BgRemovalError>(())
    /// ```
    pub fn new(config: RemovalConfig) -> Result<Self> {
        config.validate()?;
        OutputFormatHandler::validate_for_background_removal(config.output_format);
        let segmenter = BackgroundSegmenter::new(config.segmentation.clone())?;

        if config.debug {
            debug!("Processor configuration: {:?}", config);
        }

        Ok(Self {
            config,
            segmenter,
            progress_tracker: None,
        })
    }

    /// Attach a progress reporter
    #[must_use]
    pub fn with_progress_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.progress_tracker = Some(ProgressTracker::new(reporter));
        self
    }

    /// Replace (or remove) the progress reporter
    pub fn set_progress_reporter(&mut self, reporter: Option<Box<dyn ProgressReporter>>) {
        self.progress_tracker = reporter.map(ProgressTracker::new);
    }

    /// Load an image file and remove its background
    pub async fn process_file<P: AsRef<Path>>(&mut self, input_path: P) -> Result<RemovalResult> {
        let input_path_ref = input_path.as_ref();
        self.begin(ProcessingStage::ImageLoading);

        let decode_start = Instant::now();
        let image = match ImageIOService::load_image(input_path_ref) {
            Ok(image) => image,
            Err(e) => {
                self.fail(&e.to_string());
                return Err(e);
            },
        };
        let decode_ms = decode_start.elapsed().as_millis() as u64;

        let input_format = input_path_ref
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or_else(|| "unknown".to_string(), str::to_lowercase);

        let mut result = self.run(&image, decode_ms, input_format)?;
        result.input_path = Some(input_path_ref.display().to_string());
        Ok(result)
    }

    /// Remove the background of an already decoded image
    pub fn process_image(&mut self, image: &DynamicImage) -> Result<RemovalResult> {
        self.begin(ProcessingStage::ImageLoading);
        self.run(image, 0, "memory".to_string())
    }

    /// Decode encoded image bytes, then remove the background
    pub fn process_bytes(&mut self, image_bytes: &[u8]) -> Result<RemovalResult> {
        self.begin(ProcessingStage::ImageLoading);

        let decode_start = Instant::now();
        let image = match ImageIOService::load_from_bytes(image_bytes) {
            Ok(image) => image,
            Err(e) => {
                self.fail(&e.to_string());
                return Err(e);
            },
        };
        let decode_ms = decode_start.elapsed().as_millis() as u64;

        let input_format = ImageIOService::detect_format_name(image_bytes);
        self.run(&image, decode_ms, input_format)
    }

    /// Buffer an async stream, then process it as bytes
    pub async fn process_reader<R: tokio::io::AsyncRead + Unpin>(
        &mut self,
        mut reader: R,
    ) -> Result<RemovalResult> {
        use tokio::io::AsyncReadExt;

        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer).await?;
        self.process_bytes(&buffer)
    }

    /// Compute only the background mask of a decoded image
    pub fn segment_image(&self, image: &DynamicImage) -> Result<Segmentation> {
        let buffer = PixelBuffer::from_image(image)?;
        self.segmenter.segment(&buffer)
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &RemovalConfig {
        &self.config
    }

    fn begin(&mut self, stage: ProcessingStage) {
        if let Some(tracker) = self.progress_tracker.as_mut() {
            tracker.reset();
            tracker.report_stage(stage);
        }
    }

    fn fail(&self, error: &str) {
        if let Some(tracker) = self.progress_tracker.as_ref() {
            tracker.report_error(error);
        }
    }

    #[instrument(
        skip(self, image),
        fields(dimensions = %format!("{}x{}", image.width(), image.height()))
    )]
    fn run(
        &mut self,
        image: &DynamicImage,
        decode_ms: u64,
        input_format: String,
    ) -> Result<RemovalResult> {
        let total_start = Instant::now();
        let original_dimensions = image.dimensions();

        let buffer = PixelBuffer::from_image(image)?;
        let outcome = self
            .segmenter
            .remove_background_with_progress(&buffer, self.progress_tracker.as_mut());
        let (output, segmentation) = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                self.fail(&e.to_string());
                return Err(e);
            },
        };

        let mask = segmentation.mask.to_segmentation_mask();
        let coverage = mask.statistics();
        let rgba = output.into_rgba_image()?;

        let timings = ProcessingTimings {
            image_decode_ms: decode_ms,
            stages: segmentation.timings,
            image_encode_ms: None,
            total_ms: decode_ms + total_start.elapsed().as_millis() as u64,
        };

        trace_info!(
            background_r = segmentation.estimate.r,
            background_g = segmentation.estimate.g,
            background_b = segmentation.estimate.b,
            threshold = segmentation.estimate.threshold,
            background_ratio = coverage.background_ratio,
            total_ms = timings.total_ms,
            "Background removed"
        );
        info!(
            "Removed background of {}x{} image in {}ms",
            original_dimensions.0, original_dimensions.1, timings.total_ms
        );

        let mut metadata = ProcessingMetadata::new(segmentation.estimate);
        metadata.timings = timings.clone();
        metadata.input_format = input_format;
        metadata.output_format = self.config.output_format;
        metadata.background_color = self.config.background_color;

        if let Some(tracker) = self.progress_tracker.as_mut() {
            tracker.report_stage(ProcessingStage::Completed);
            tracker.report_completion(timings);
        }

        Ok(RemovalResult::new(
            DynamicImage::ImageRgba8(rgba),
            mask,
            original_dimensions,
            metadata,
        ))
    }
}
