//! Color metrics shared by the sampler, classifier and flood fill

/// Rec. 601 luma coefficients
pub const LUMA_R: f32 = 0.299;
pub const LUMA_G: f32 = 0.587;
pub const LUMA_B: f32 = 0.114;

/// Channel weights of the squared color distance (R, G, B)
pub const CHANNEL_WEIGHTS: [f32; 3] = [2.0, 4.0, 3.0];

/// Normalizes the weighted distance back into the 0-255 range
pub const DISTANCE_NORMALIZER: f32 = 3.0;

/// Weighted squared distance `2·dr² + 4·dg² + 3·db²`
#[inline]
#[must_use]
pub fn weighted_distance_sq(rgb: [u8; 3], reference: [f32; 3]) -> f32 {
    let dr = f32::from(rgb[0]) - reference[0];
    let dg = f32::from(rgb[1]) - reference[1];
    let db = f32::from(rgb[2]) - reference[2];
    CHANNEL_WEIGHTS[0] * dr * dr + CHANNEL_WEIGHTS[1] * dg * dg + CHANNEL_WEIGHTS[2] * db * db
}

/// Weighted Euclidean color distance, divided by 3 so it spans 0-255
#[inline]
#[must_use]
pub fn color_distance(rgb: [u8; 3], reference: [f32; 3]) -> f32 {
    weighted_distance_sq(rgb, reference).sqrt() / DISTANCE_NORMALIZER
}

/// Luminance of an RGB triple
#[inline]
#[must_use]
pub fn luminance(rgb: [f32; 3]) -> f32 {
    LUMA_R * rgb[0] + LUMA_G * rgb[1] + LUMA_B * rgb[2]
}

/// Luminance of an 8-bit RGB pixel
#[inline]
#[must_use]
pub fn luminance_u8(rgb: [u8; 3]) -> f32 {
    luminance([f32::from(rgb[0]), f32::from(rgb[1]), f32::from(rgb[2])])
}
