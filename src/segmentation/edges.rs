//! Sobel gradient magnitude over the luma of the color channels

use super::color::luminance_u8;
use crate::types::PixelBuffer;
use ndarray::Array2;

/// Per-pixel gradient magnitude, zero on the one-pixel frame
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMap {
    magnitudes: Array2<f32>,
}

impl EdgeMap {
    #[must_use]
    pub fn width(&self) -> u32 {
        self.magnitudes.ncols() as u32
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.magnitudes.nrows() as u32
    }

    /// Gradient magnitude at `(x, y)`
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.magnitudes[[y as usize, x as usize]]
    }

    /// Underlying `(height, width)` array
    #[must_use]
    pub fn as_array(&self) -> &Array2<f32> {
        &self.magnitudes
    }

    /// Largest magnitude in the map
    #[must_use]
    pub fn max_magnitude(&self) -> f32 {
        self.magnitudes.iter().copied().fold(0.0, f32::max)
    }
}

/// Rec. 601 luma of every pixel, laid out as `(height, width)`
fn intensity(buffer: &PixelBuffer) -> Array2<f32> {
    let (width, height) = buffer.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
        luminance_u8(buffer.rgb(x as u32, y as u32))
    })
}

/// Compute the Sobel gradient magnitude of every interior pixel
///
/// `gx` is the 1-2-1 weighted top row minus the bottom row, `gy` the
/// left column minus the right column.
#[must_use]
pub fn compute_edge_map(buffer: &PixelBuffer) -> EdgeMap {
    let (width, height) = (buffer.width() as usize, buffer.height() as usize);
    let mut magnitudes = Array2::<f32>::zeros((height, width));
    if width < 3 || height < 3 {
        return EdgeMap { magnitudes };
    }

    let lum = intensity(buffer);
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let p = |dx: usize, dy: usize| lum[[y + dy - 1, x + dx - 1]];

            let top = p(0, 0) + 2.0 * p(1, 0) + p(2, 0);
            let bottom = p(0, 2) + 2.0 * p(1, 2) + p(2, 2);
            let left = p(0, 0) + 2.0 * p(0, 1) + p(0, 2);
            let right = p(2, 0) + 2.0 * p(2, 1) + p(2, 2);

            let gx = top - bottom;
            let gy = left - right;
            magnitudes[[y, x]] = (gx * gx + gy * gy).sqrt();
        }
    }

    EdgeMap { magnitudes }
}
