//! Background color estimation from image borders and corners

use super::color::{luminance, weighted_distance_sq};
use crate::{
    config::SegmentationParams,
    error::{BgRemovalError, Result},
    types::PixelBuffer,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Estimated background color plus the adaptive classification threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorEstimate {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Maximum combined distance still treated as background
    pub threshold: f32,
}

impl ColorEstimate {
    #[must_use]
    pub fn rgb(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    #[must_use]
    pub fn luminance(&self) -> f32 {
        luminance(self.rgb())
    }
}

/// Side length of the square sampled in each corner
#[must_use]
pub fn corner_block_size(width: u32, height: u32, params: &SegmentationParams) -> u32 {
    let min_dim = width.min(height);
    let scaled = (params.corner_fraction * min_dim as f32).round() as u32;
    scaled.max(params.min_corner_block).min(min_dim)
}

/// Stride used when walking the four border lines
#[must_use]
pub fn edge_sample_stride(width: u32, height: u32, params: &SegmentationParams) -> usize {
    let divisor = params.edge_sample_divisor.max(1);
    ((width.min(height) / divisor) as usize).max(1)
}

fn corner_samples(buffer: &PixelBuffer, block: u32) -> Vec<[u8; 3]> {
    let (width, height) = buffer.dimensions();
    let origins = [
        (0, 0),
        (width - block, 0),
        (0, height - block),
        (width - block, height - block),
    ];

    let mut samples = Vec::with_capacity(4 * (block * block) as usize);
    for (ox, oy) in origins {
        for y in oy..oy + block {
            for x in ox..ox + block {
                samples.push(buffer.rgb(x, y));
            }
        }
    }
    samples
}

fn edge_samples(buffer: &PixelBuffer, stride: usize) -> Vec<[u8; 3]> {
    let (width, height) = buffer.dimensions();
    let mut samples = Vec::new();

    for x in (0..width).step_by(stride) {
        samples.push(buffer.rgb(x, 0));
        samples.push(buffer.rgb(x, height - 1));
    }
    for y in (0..height).step_by(stride) {
        samples.push(buffer.rgb(0, y));
        samples.push(buffer.rgb(width - 1, y));
    }
    samples
}

/// Estimate the background color and adaptive threshold of an image
///
/// Corner blocks enter the averaging pool twice, border-line samples once.
/// The spread is the root of the mean weighted squared distance to the pool
/// mean, left unnormalized; the threshold is that spread scaled by
/// `threshold_scale` and clamped to `[threshold_min, threshold_max]`.
pub fn estimate_background(
    buffer: &PixelBuffer,
    params: &SegmentationParams,
) -> Result<ColorEstimate> {
    let (width, height) = buffer.dimensions();
    if width == 0 || height == 0 {
        return Err(BgRemovalError::invalid_image(format!(
            "Cannot sample background of a {}x{} image",
            width, height
        )));
    }

    let block = corner_block_size(width, height, params);
    let stride = edge_sample_stride(width, height, params);
    let corners = corner_samples(buffer, block);
    let edges = edge_samples(buffer, stride);

    let pool = || corners.iter().chain(&corners).chain(&edges);
    let count = (2 * corners.len() + edges.len()) as f64;

    let mut sums = [0.0f64; 3];
    for rgb in pool() {
        for (sum, &channel) in sums.iter_mut().zip(rgb) {
            *sum += f64::from(channel);
        }
    }
    let mean = sums.map(|sum| (sum / count) as f32);

    let variance = pool()
        .map(|&rgb| f64::from(weighted_distance_sq(rgb, mean)))
        .sum::<f64>()
        / count;
    let spread = variance.sqrt() as f32;
    let threshold =
        (spread * params.threshold_scale).clamp(params.threshold_min, params.threshold_max);

    debug!(
        block,
        stride,
        samples = count,
        r = mean[0],
        g = mean[1],
        b = mean[2],
        spread,
        threshold,
        "Estimated background color"
    );

    Ok(ColorEstimate {
        r: mean[0],
        g: mean[1],
        b: mean[2],
        threshold,
    })
}
