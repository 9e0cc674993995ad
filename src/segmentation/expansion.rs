//! Border-seeded flood fill that connects background regions to the frame

use super::{color::color_distance, sampler::ColorEstimate};
use crate::{
    config::SegmentationParams,
    error::{BgRemovalError, Result},
    types::{Mask, PixelBuffer},
};
use std::collections::VecDeque;

/// Indices of every frame pixel, each listed once
///
/// Walks the top and bottom rows, then the left and right columns without
/// their corners. Degenerate one-row or one-column images are handled.
#[must_use]
pub fn border_indices(width: u32, height: u32) -> Vec<usize> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let (w, h) = (width as usize, height as usize);
    let mut indices = Vec::with_capacity(2 * (w + h));

    indices.extend(0..w);
    if h > 1 {
        indices.extend((h - 1) * w..h * w);
    }
    for y in 1..h.saturating_sub(1) {
        indices.push(y * w);
        if w > 1 {
            indices.push(y * w + w - 1);
        }
    }
    indices
}

/// Grow the background label inward from the frame
///
/// Seeds are frame pixels already labelled background. A 4-connected
/// neighbor joins the background when its color distance to the estimate is
/// below `threshold * flood_tolerance`, whatever its prior label. Each pixel
/// is examined at most once. Existing background labels are never cleared.
///
/// Returns the number of pixels newly labelled background, or
/// `ProcessingFailure` when the mask and the image differ in size.
pub fn expand_from_border(
    mask: &mut Mask,
    buffer: &PixelBuffer,
    estimate: &ColorEstimate,
    params: &SegmentationParams,
) -> Result<usize> {
    let (width, height) = mask.dimensions();
    if buffer.dimensions() != (width, height) {
        let (bw, bh) = buffer.dimensions();
        return Err(BgRemovalError::processing(format!(
            "Mask is {}x{} but image is {}x{}",
            width, height, bw, bh
        )));
    }
    let (w, h) = (width as usize, height as usize);
    let limit = estimate.threshold * params.flood_tolerance;
    let reference = estimate.rgb();

    let mut visited = vec![false; w * h];
    let mut queue = VecDeque::new();
    for index in border_indices(width, height) {
        if mask.as_slice()[index] {
            visited[index] = true;
            queue.push_back(index);
        }
    }

    let labels = mask.as_mut_slice();
    let mut absorbed = 0;
    while let Some(index) = queue.pop_front() {
        let (x, y) = (index % w, index / w);
        let neighbors = [
            (x > 0).then(|| index - 1),
            (x + 1 < w).then(|| index + 1),
            (y > 0).then(|| index - w),
            (y + 1 < h).then(|| index + w),
        ];

        for next in neighbors.into_iter().flatten() {
            if visited[next] {
                continue;
            }
            visited[next] = true;
            if color_distance(buffer.rgb_at(next), reference) < limit {
                if !labels[next] {
                    labels[next] = true;
                    absorbed += 1;
                }
                queue.push_back(next);
            }
        }
    }
    Ok(absorbed)
}
