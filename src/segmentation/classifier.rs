//! Per-pixel background/foreground classification

use super::{
    color::{color_distance, luminance_u8},
    edges::EdgeMap,
    sampler::ColorEstimate,
};
use crate::{
    config::SegmentationParams,
    error::{BgRemovalError, Result},
    types::{Mask, PixelBuffer},
};

/// Blend of color distance and luminance difference against the estimate
#[inline]
#[must_use]
pub fn combined_distance(
    rgb: [u8; 3],
    estimate: &ColorEstimate,
    params: &SegmentationParams,
) -> f32 {
    let distance = color_distance(rgb, estimate.rgb());
    let lum_diff = (luminance_u8(rgb) - estimate.luminance()).abs();
    params.color_weight * distance + params.luminance_weight * lum_diff
}

/// Width in pixels of the lenient band along the image frame
#[must_use]
pub fn border_band(width: u32, height: u32, params: &SegmentationParams) -> f32 {
    params.border_band_fraction * width.min(height) as f32
}

/// Threshold for one pixel after position and edge modulation
///
/// Inside the border band the threshold is relaxed; elsewhere, a strong
/// gradient tightens it. The band takes precedence.
#[inline]
#[must_use]
pub fn effective_threshold(
    distance_to_frame: u32,
    edge_magnitude: f32,
    band: f32,
    estimate: &ColorEstimate,
    params: &SegmentationParams,
) -> f32 {
    if (distance_to_frame as f32) < band {
        estimate.threshold * params.border_leniency
    } else if edge_magnitude > params.strong_edge_magnitude {
        estimate.threshold * params.edge_strictness
    } else {
        estimate.threshold
    }
}

/// Label every pixel, `true` meaning background
///
/// Fails with `ProcessingFailure` when the edge map was computed for an
/// image of different size.
pub fn classify(
    buffer: &PixelBuffer,
    estimate: &ColorEstimate,
    edges: &EdgeMap,
    params: &SegmentationParams,
) -> Result<Mask> {
    let (width, height) = buffer.dimensions();
    if (edges.width(), edges.height()) != (width, height) {
        return Err(BgRemovalError::processing(format!(
            "Edge map is {}x{} but image is {}x{}",
            edges.width(),
            edges.height(),
            width,
            height
        )));
    }
    let band = border_band(width, height, params);

    Ok(Mask::from_fn(width, height, |x, y| {
        let distance_to_frame = x.min(y).min(width - 1 - x).min(height - 1 - y);
        let threshold =
            effective_threshold(distance_to_frame, edges.get(x, y), band, estimate, params);
        combined_distance(buffer.rgb(x, y), estimate, params) < threshold
    }))
}
