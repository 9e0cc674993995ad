//! Progress reporting service
//!
//! Keeps progress reporting out of the segmentation code so each frontend can
//! decide how (and whether) to display it.

use crate::types::ProcessingTimings;
use instant::Instant;
use std::path::PathBuf;

/// Progress stages during background removal processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Loading and decoding input image
    ImageLoading,
    /// Estimating background color from borders and corners
    Sampling,
    /// Computing the gradient magnitude map
    EdgeMapping,
    /// Labelling each pixel background or foreground
    Classification,
    /// Flood filling background from the image frame
    ConnectivityExpansion,
    /// Morphological cleanup of the mask
    MaskCleanup,
    /// Writing the mask into the alpha channel
    Compositing,
    /// Saving result to file
    FileSaving,
    /// Processing completed
    Completed,
    /// One file of a multi-file run
    BatchItemProcessing,
}

impl ProcessingStage {
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            ProcessingStage::ImageLoading => "Loading input image",
            ProcessingStage::Sampling => "Sampling background color",
            ProcessingStage::EdgeMapping => "Mapping edges",
            ProcessingStage::Classification => "Classifying pixels",
            ProcessingStage::ConnectivityExpansion => "Expanding background from borders",
            ProcessingStage::MaskCleanup => "Cleaning up mask",
            ProcessingStage::Compositing => "Compositing alpha channel",
            ProcessingStage::FileSaving => "Saving result",
            ProcessingStage::Completed => "Processing completed",
            ProcessingStage::BatchItemProcessing => "Processing batch item",
        }
    }

    /// Share of a single-image run that is done once this stage starts
    #[must_use]
    pub fn progress_percentage(&self) -> u8 {
        match self {
            ProcessingStage::ImageLoading => 10,
            ProcessingStage::Sampling => 20,
            ProcessingStage::EdgeMapping => 35,
            ProcessingStage::Classification => 55,
            ProcessingStage::ConnectivityExpansion => 70,
            ProcessingStage::MaskCleanup => 85,
            ProcessingStage::Compositing => 95,
            ProcessingStage::FileSaving => 99,
            ProcessingStage::Completed => 100,
            ProcessingStage::BatchItemProcessing => 50,
        }
    }
}

/// A stage transition of one image
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub stage: ProcessingStage,
    /// Progress percentage (0-100)
    pub progress: u8,
    pub description: String,
    /// Milliseconds since the image started
    pub elapsed_ms: u64,
}

impl ProgressUpdate {
    #[must_use]
    pub fn new(stage: ProcessingStage, start_time: Instant) -> Self {
        Self {
            stage,
            progress: stage.progress_percentage(),
            description: stage.description().to_string(),
            elapsed_ms: start_time.elapsed().as_millis() as u64,
        }
    }
}

/// Position within a multi-file run, sent before each file starts
#[derive(Debug, Clone, PartialEq)]
pub struct BatchProgress {
    /// File about to be processed
    pub current: PathBuf,
    pub completed: usize,
    pub failed: usize,
    pub total: usize,
    /// Milliseconds since the batch started
    pub elapsed_ms: u64,
}

impl BatchProgress {
    /// Files finished so far, successful or not
    #[must_use]
    pub fn finished(&self) -> usize {
        self.completed + self.failed
    }

    #[must_use]
    pub fn percentage(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.finished() * 100) / self.total).min(100) as u8
    }

    /// Successful files per second, zero until the first one completes
    #[must_use]
    pub fn files_per_second(&self) -> f64 {
        if self.completed == 0 || self.elapsed_ms == 0 {
            return 0.0;
        }
        self.completed as f64 / (self.elapsed_ms as f64 / 1000.0)
    }

    /// Remaining seconds at the current rate
    #[must_use]
    pub fn eta_seconds(&self) -> Option<u64> {
        let rate = self.files_per_second();
        (rate > 0.0).then(|| (self.total.saturating_sub(self.finished()) as f64 / rate) as u64)
    }
}

/// Receives progress of the segmentation pipeline and of CLI batches
pub trait ProgressReporter: Send + Sync {
    fn report_progress(&self, update: ProgressUpdate);

    /// Called once per image with its final timings
    fn report_completion(&self, timings: ProcessingTimings);

    fn report_error(&self, stage: ProcessingStage, error: &str);

    /// Called before each file of a multi-file run; ignored by default
    fn report_batch_progress(&self, _progress: &BatchProgress) {}
}

/// Discards all progress updates
pub struct NoOpProgressReporter;

impl ProgressReporter for NoOpProgressReporter {
    fn report_progress(&self, _update: ProgressUpdate) {}

    fn report_completion(&self, _timings: ProcessingTimings) {}

    fn report_error(&self, _stage: ProcessingStage, _error: &str) {}
}

fn log_update(update: &ProgressUpdate, verbose: bool) {
    if verbose {
        log::info!(
            "[{}%] {} ({}ms elapsed)",
            update.progress,
            update.description,
            update.elapsed_ms
        );
    } else {
        log::info!("[{}%] {}", update.progress, update.description);
    }
}

fn log_completion(timings: &ProcessingTimings, verbose: bool) {
    log::info!("✅ Background removal completed in {}ms", timings.total_ms);

    if verbose {
        let stages = &timings.stages;
        log::info!("  📊 Detailed timings:");
        log::info!("    • Image decode: {}ms", timings.image_decode_ms);
        log::info!("    • Sampling: {}ms", stages.sampling_ms);
        log::info!("    • Edge mapping: {}ms", stages.edge_mapping_ms);
        log::info!("    • Classification: {}ms", stages.classification_ms);
        log::info!("    • Expansion: {}ms", stages.expansion_ms);
        log::info!("    • Cleanup: {}ms", stages.cleanup_ms);
        log::info!("    • Compositing: {}ms", stages.compositing_ms);
    }
}

/// Logs stage transitions through the `log` facade
pub struct ConsoleProgressReporter {
    verbose: bool,
}

impl ConsoleProgressReporter {
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn report_progress(&self, update: ProgressUpdate) {
        log_update(&update, self.verbose);
    }

    fn report_completion(&self, timings: ProcessingTimings) {
        log_completion(&timings, self.verbose);
    }

    fn report_error(&self, stage: ProcessingStage, error: &str) {
        log::error!("❌ Error during {}: {}", stage.description(), error);
    }
}

/// Console reporter that also draws a text bar for multi-file runs
pub struct EnhancedProgressReporter {
    show_batch: bool,
    verbose: bool,
}

impl EnhancedProgressReporter {
    #[must_use]
    pub fn new(show_batch: bool, verbose: bool) -> Self {
        Self {
            show_batch,
            verbose,
        }
    }

    fn progress_bar(percentage: u8) -> String {
        let filled = usize::from(percentage.min(100)) / 5;
        format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled))
    }

    fn format_duration(seconds: u64) -> String {
        if seconds < 60 {
            format!("{}s", seconds)
        } else {
            format!("{}m {}s", seconds / 60, seconds % 60)
        }
    }
}

impl ProgressReporter for EnhancedProgressReporter {
    fn report_progress(&self, update: ProgressUpdate) {
        log_update(&update, self.verbose);
    }

    fn report_completion(&self, timings: ProcessingTimings) {
        log_completion(&timings, self.verbose);
    }

    fn report_error(&self, stage: ProcessingStage, error: &str) {
        log::error!("❌ Error during {}: {}", stage.description(), error);
    }

    fn report_batch_progress(&self, progress: &BatchProgress) {
        if !self.show_batch {
            return;
        }

        let eta = progress
            .eta_seconds()
            .map_or_else(|| "calculating...".to_string(), Self::format_duration);
        log::info!(
            "📁 [{}] {}/{} files, {} failed, {:.1} files/sec, ETA {}",
            Self::progress_bar(progress.percentage()),
            progress.finished(),
            progress.total,
            progress.failed,
            progress.files_per_second(),
            eta
        );
        log::info!("📄 Next: {}", progress.current.display());
    }
}

/// Times one image and forwards its stage transitions to a reporter
pub struct ProgressTracker {
    reporter: Box<dyn ProgressReporter>,
    start_time: Instant,
    current_stage: Option<ProcessingStage>,
}

impl ProgressTracker {
    #[must_use]
    pub fn new(reporter: Box<dyn ProgressReporter>) -> Self {
        Self {
            reporter,
            start_time: Instant::now(),
            current_stage: None,
        }
    }

    pub fn report_stage(&mut self, stage: ProcessingStage) {
        self.current_stage = Some(stage);
        self.reporter
            .report_progress(ProgressUpdate::new(stage, self.start_time));
    }

    pub fn report_completion(&self, timings: ProcessingTimings) {
        self.reporter.report_completion(timings);
    }

    /// Report an error against the current stage
    pub fn report_error(&self, error: &str) {
        let stage = self.current_stage.unwrap_or(ProcessingStage::ImageLoading);
        self.reporter.report_error(stage, error);
    }

    /// Restart the clock for the next image
    pub fn reset(&mut self) {
        self.start_time = Instant::now();
        self.current_stage = None;
    }

    #[must_use]
    pub fn current_stage(&self) -> Option<ProcessingStage> {
        self.current_stage
    }
}

/// Pick the reporter matching the CLI flags
///
/// Without `--progress` a plain console reporter is used. With it, runs of
/// more than one file also log batch position.
pub fn create_cli_progress_reporter(
    enable_progress: bool,
    verbose: bool,
    batch_size: usize,
) -> Box<dyn ProgressReporter> {
    if enable_progress {
        Box::new(EnhancedProgressReporter::new(batch_size > 1, verbose))
    } else {
        Box::new(ConsoleProgressReporter::new(verbose))
    }
}
