//! Model-free background segmentation
//!
//! The pipeline runs six stages in order, each consuming the previous
//! stage's output: sampling, edge mapping, classification, connectivity
//! expansion, mask cleanup and compositing. Every structure is created per
//! call, so a [`BackgroundSegmenter`] can be shared freely across threads.

pub mod classifier;
pub mod color;
pub mod compositor;
pub mod edges;
pub mod expansion;
pub mod morphology;
pub mod sampler;

pub use classifier::classify;
pub use compositor::composite;
pub use edges::{compute_edge_map, EdgeMap};
pub use expansion::expand_from_border;
pub use morphology::clean;
pub use sampler::{estimate_background, ColorEstimate};

use crate::{
    config::SegmentationParams,
    error::Result,
    services::{ProcessingStage, ProgressTracker},
    types::{Mask, PixelBuffer, StageTimings},
};
use instant::Instant;
use tracing::{debug, instrument};

/// Outcome of the mask-producing stages
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Background estimate the mask was computed against
    pub estimate: ColorEstimate,
    /// Final cleaned mask, `true` meaning background
    pub mask: Mask,
    /// Per-stage timings (compositing stays zero until [`BackgroundSegmenter::remove_background`])
    pub timings: StageTimings,
}

/// Runs the segmentation pipeline with a fixed set of parameters
#[derive(Debug, Clone, Default)]
pub struct BackgroundSegmenter {
    params: SegmentationParams,
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

fn report(progress: &mut Option<&mut ProgressTracker>, stage: ProcessingStage) {
    if let Some(tracker) = progress.as_deref_mut() {
        tracker.report_stage(stage);
    }
}

impl BackgroundSegmenter {
    /// Create a segmenter, rejecting unusable parameters
    pub fn new(params: SegmentationParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    #[must_use]
    pub fn params(&self) -> &SegmentationParams {
        &self.params
    }

    /// Compute the background mask of a validated buffer
    pub fn segment(&self, buffer: &PixelBuffer) -> Result<Segmentation> {
        self.segment_with_progress(buffer, None)
    }

    /// Same as [`segment`](Self::segment), reporting each stage to `progress`
    #[instrument(
        skip(self, buffer, progress),
        fields(width = buffer.width(), height = buffer.height(), channels = buffer.channels())
    )]
    pub fn segment_with_progress(
        &self,
        buffer: &PixelBuffer,
        mut progress: Option<&mut ProgressTracker>,
    ) -> Result<Segmentation> {
        let mut timings = StageTimings::default();

        report(&mut progress, ProcessingStage::Sampling);
        let start = Instant::now();
        let estimate = estimate_background(buffer, &self.params)?;
        timings.sampling_ms = elapsed_ms(start);

        report(&mut progress, ProcessingStage::EdgeMapping);
        let start = Instant::now();
        let edges = compute_edge_map(buffer);
        timings.edge_mapping_ms = elapsed_ms(start);
        debug!(max_magnitude = edges.max_magnitude(), "Edge map ready");

        report(&mut progress, ProcessingStage::Classification);
        let start = Instant::now();
        let mut mask = classify(buffer, &estimate, &edges, &self.params)?;
        timings.classification_ms = elapsed_ms(start);
        debug!(background = mask.background_count(), "Initial classification");

        report(&mut progress, ProcessingStage::ConnectivityExpansion);
        let start = Instant::now();
        let absorbed = expand_from_border(&mut mask, buffer, &estimate, &self.params)?;
        timings.expansion_ms = elapsed_ms(start);
        debug!(absorbed, "Flood fill from border");

        report(&mut progress, ProcessingStage::MaskCleanup);
        let start = Instant::now();
        let before = mask.clone();
        let mask = clean(mask);
        timings.cleanup_ms = elapsed_ms(start);
        debug!(flipped = mask.diff_count(&before), "Morphological cleanup");

        Ok(Segmentation {
            estimate,
            mask,
            timings,
        })
    }

    /// Segment and composite in one call, returning an RGBA buffer
    pub fn remove_background(&self, buffer: &PixelBuffer) -> Result<(PixelBuffer, Segmentation)> {
        self.remove_background_with_progress(buffer, None)
    }

    /// Same as [`remove_background`](Self::remove_background), reporting each stage
    pub fn remove_background_with_progress(
        &self,
        buffer: &PixelBuffer,
        mut progress: Option<&mut ProgressTracker>,
    ) -> Result<(PixelBuffer, Segmentation)> {
        let mut segmentation = self.segment_with_progress(buffer, progress.as_deref_mut())?;

        report(&mut progress, ProcessingStage::Compositing);
        let start = Instant::now();
        let output = composite(buffer, &segmentation.mask)?;
        segmentation.timings.compositing_ms = elapsed_ms(start);

        Ok((output, segmentation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SegmentationParams;

    fn framed_square() -> PixelBuffer {
        let mut data = Vec::with_capacity(100 * 100 * 3);
        for y in 0..100u32 {
            for x in 0..100u32 {
                let inside = (20..80).contains(&x) && (20..80).contains(&y);
                data.extend_from_slice(if inside { &[255, 0, 0] } else { &[0, 0, 255] });
            }
        }
        PixelBuffer::new(data, 100, 100, 3).unwrap()
    }

    #[test]
    fn test_rejects_invalid_params() {
        let params = SegmentationParams {
            threshold_max: -1.0,
            ..SegmentationParams::default()
        };
        assert!(BackgroundSegmenter::new(params).is_err());
    }

    #[test]
    fn test_segment_framed_square() {
        let segmenter = BackgroundSegmenter::default();
        let result = segmenter.segment(&framed_square()).unwrap();

        assert!((result.estimate.b - 255.0).abs() < 1e-3);
        assert_eq!(result.estimate.threshold, 30.0);
        assert!(result.mask.get(0, 0));
        assert!(result.mask.get(10, 50));
        assert!(!result.mask.get(50, 50));
        assert_eq!(result.timings.compositing_ms, 0);
    }

    #[test]
    fn test_progress_is_reported_in_order() {
        use crate::services::{ProgressReporter, ProgressUpdate};
        use std::sync::{Arc, Mutex};

        struct Recorder(Arc<Mutex<Vec<ProcessingStage>>>);
        impl ProgressReporter for Recorder {
            fn report_progress(&self, update: ProgressUpdate) {
                self.0.lock().unwrap().push(update.stage);
            }
            fn report_completion(&self, _: crate::types::ProcessingTimings) {}
            fn report_error(&self, _: ProcessingStage, _: &str) {}
        }

        let stages = Arc::new(Mutex::new(Vec::new()));
        let mut tracker = ProgressTracker::new(Box::new(Recorder(stages.clone())));
        BackgroundSegmenter::default()
            .remove_background_with_progress(&framed_square(), Some(&mut tracker))
            .unwrap();

        assert_eq!(
            *stages.lock().unwrap(),
            vec![
                ProcessingStage::Sampling,
                ProcessingStage::EdgeMapping,
                ProcessingStage::Classification,
                ProcessingStage::ConnectivityExpansion,
                ProcessingStage::MaskCleanup,
                ProcessingStage::Compositing,
            ]
        );
    }
}
