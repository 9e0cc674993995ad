#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unused_async)]

//! # bgremove-heuristic
//!
//! Model-free background removal for product-style photos: a subject on a
//! roughly uniform backdrop that touches the image border.
//!
//! The pipeline has six deterministic stages:
//!
//! 1. **Sampler** estimates the background color and an adaptive threshold
//!    from the four corner blocks and a strided walk of the border.
//! 2. **EdgeMapper** computes a Sobel gradient magnitude per pixel.
//! 3. **Classifier** labels each pixel background or foreground, lenient near
//!    the border and strict on strong interior edges.
//! 4. **ConnectivityExpander** flood-fills from the border to absorb
//!    background regions the classifier missed.
//! 5. **MaskCleaner** runs erosion, dilation, opening and edge smoothing.
//! 6. **Compositor** writes the mask into an RGBA alpha channel.
//!
//! No neural network is involved, so there are no models to download and the
//! output is byte-identical across runs.
//!
//! ## Quick Start
//!
//! ### Raw buffers
//!
//! ```rust
//! use bgremove_heuristic::remove_background;
//!
//! // 8x8 white image with a dark 2x2 center
//! let mut pixels = vec![255u8; 8 * 8 * 3];
//! for y in 3..5 {
//!     for x in 3..5 {
//!         let i = (y * 8 + x) * 3;
//!         pixels[i..i + 3].copy_from_slice(&[10, 10, 10]);
//!     }
//! }
//!
//! let rgba = remove_background(&pixels, 8, 8, 3)?;
//! assert_eq!(rgba.len(), 8 * 8 * 4);
//! assert_eq!(rgba[3], 0); // corner pixel is transparent
//! # Ok::<(), bgremove_heuristic::BgRemovalError>(())
//! ```
//!
//! ### Encoded images
//!
//! ```rust,no_run
//! use bgremove_heuristic::{remove_background_from_reader, RemovalConfig};
//! use tokio::fs::File;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = RemovalConfig::default();
//! let file = File::open("input.jpg").await?;
//! let result = remove_background_from_reader(file, &config).await?;
//! result.save_png("output.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): command-line interface, progress bars and tracing setup
//! - `webp-support` (default): WebP encoding and decoding
//! - `tracing-json`: JSON log output for the CLI
//! - `tracing-files`: log file output for the CLI
//!
//! ### Library-Only Usage
//!
//! ```toml
//! [dependencies]
//! bgremove-heuristic = { version = "0.1", default-features = false }
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod processor;
pub mod segmentation;
pub mod services;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod types;
pub mod utils;

use tokio::io::AsyncRead;

pub use config::{
    BackgroundColor, OutputFormat, RemovalConfig, RemovalConfigBuilder, SegmentationParams,
};
pub use error::{BgRemovalError, Result};
pub use processor::BackgroundRemovalProcessor;
pub use segmentation::{BackgroundSegmenter, ColorEstimate, EdgeMap, Segmentation};
pub use services::{
    BatchProgress, ConsoleProgressReporter, EnhancedProgressReporter, ImageIOService,
    NoOpProgressReporter, OutputFormatHandler, ProcessingStage, ProgressReporter, ProgressTracker,
    ProgressUpdate,
};
pub use types::{
    Mask, MaskStatistics, PixelBuffer, ProcessingMetadata, ProcessingTimings, RemovalResult,
    SegmentationMask, StageTimings,
};
pub use utils::{BufferValidator, ColorParser, ConfigValidator};

#[cfg(feature = "cli")]
pub use tracing_config::{
    events, init_cli_tracing, spans, TracingConfig, TracingFormat, TracingGuard, TracingOutput,
};

/// Remove the background of a raw pixel buffer
///
/// `pixels` holds `width * height * channels` interleaved bytes, with
/// `channels` either 3 (RGB) or 4 (RGBA). The result always has 4 channels:
/// the input color with alpha 0 for background and 255 for foreground. Any
/// input alpha is ignored.
///
/// Preconditions are checked before any stage runs, in this order: zero
/// dimensions, then the channel count, then the buffer length.
///
/// # Examples
///
/// ```rust
/// use bgremove_heuristic::{remove_background, BgRemovalError};
///
/// let uniform = vec![42u8; 16 * 16 * 4];
/// let rgba = remove_background(&uniform, 16, 16, 4)?;
/// assert!(rgba.chunks_exact(4).all(|px| px[3] == 0));
///
/// assert!(matches!(
///     remove_background(&uniform, 16, 16, 2),
///     Err(BgRemovalError::UnsupportedChannelLayout { channels: 2 })
/// ));
/// # Ok::<(), BgRemovalError>(())
/// ```
pub fn remove_background(pixels: &[u8], width: u32, height: u32, channels: u8) -> Result<Vec<u8>> {
    remove_background_with_params(pixels, width, height, channels, &SegmentationParams::default())
}

/// Same as [`remove_background`], with explicit tuning parameters
pub fn remove_background_with_params(
    pixels: &[u8],
    width: u32,
    height: u32,
    channels: u8,
    params: &SegmentationParams,
) -> Result<Vec<u8>> {
    let buffer = PixelBuffer::from_slice(pixels, width, height, channels)?;
    let segmenter = BackgroundSegmenter::new(params.clone())?;
    let (output, _) = segmenter.remove_background(&buffer)?;
    Ok(output.into_raw())
}

/// Run every stage except compositing and return the final background mask
///
/// `true` in the mask means background.
pub fn segment_foreground(pixels: &[u8], width: u32, height: u32, channels: u8) -> Result<Mask> {
    let buffer = PixelBuffer::from_slice(pixels, width, height, channels)?;
    let segmenter = BackgroundSegmenter::default();
    Ok(segmenter.segment(&buffer)?.mask)
}

/// Remove the background of a `DynamicImage`
///
/// The result carries the RGBA image, the mask, timings and the background
/// estimate.
///
/// # Examples
///
/// ```rust
/// use bgremove_heuristic::{remove_background_from_image, RemovalConfig};
/// use image::{DynamicImage, Rgb, RgbImage};
///
/// let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 32, Rgb([200, 200, 200])));
/// let result = remove_background_from_image(&img, &RemovalConfig::default())?;
/// assert_eq!(result.dimensions(), (32, 32));
/// assert_eq!(result.mask.statistics().foreground_pixels, 0);
/// # Ok::<(), bgremove_heuristic::BgRemovalError>(())
/// ```
pub fn remove_background_from_image(
    image: &image::DynamicImage,
    config: &RemovalConfig,
) -> Result<RemovalResult> {
    let mut processor = BackgroundRemovalProcessor::new(config.clone())?;
    processor.process_image(image)
}

/// Remove the background of an encoded image (PNG, JPEG, WebP, BMP, TIFF)
///
/// Suitable for web handlers and other memory-based callers.
///
/// ```rust,no_run
/// use bgremove_heuristic::{remove_background_from_bytes, OutputFormat, RemovalConfig};
///
/// # fn example(upload_bytes: Vec<u8>) -> anyhow::Result<()> {
/// let config = RemovalConfig::default();
/// let result = remove_background_from_bytes(&upload_bytes, &config)?;
/// let png_bytes = result.to_bytes(OutputFormat::Png, 100)?;
/// # Ok(())
/// # }
/// ```
pub fn remove_background_from_bytes(
    image_bytes: &[u8],
    config: &RemovalConfig,
) -> Result<RemovalResult> {
    let mut processor = BackgroundRemovalProcessor::new(config.clone())?;
    processor.process_bytes(image_bytes)
}

/// Remove the background of an image read from an async stream
///
/// The stream is buffered in memory and decoded once complete; the
/// segmentation itself runs synchronously on the calling task.
pub async fn remove_background_from_reader<R: AsyncRead + Unpin>(
    reader: R,
    config: &RemovalConfig,
) -> Result<RemovalResult> {
    let mut processor = BackgroundRemovalProcessor::new(config.clone())?;
    processor.process_reader(reader).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framed(size: u32, frame: u32) -> Vec<u8> {
        let mut pixels = Vec::with_capacity((size * size * 3) as usize);
        for y in 0..size {
            for x in 0..size {
                let inside = x >= frame && y >= frame && x < size - frame && y < size - frame;
                pixels.extend_from_slice(if inside { &[255, 0, 0] } else { &[0, 0, 255] });
            }
        }
        pixels
    }

    #[test]
    fn test_remove_background_geometry() {
        let pixels = framed(40, 10);
        let rgba = remove_background(&pixels, 40, 40, 3).unwrap();
        assert_eq!(rgba.len(), 40 * 40 * 4);
        assert_eq!(rgba[3], 0);
        let center = (20 * 40 + 20) * 4;
        assert_eq!(&rgba[center..center + 4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_validation_order() {
        assert!(matches!(
            remove_background(&[], 0, 10, 7),
            Err(BgRemovalError::InvalidImage(_))
        ));
        assert!(matches!(
            remove_background(&[0; 3], 1, 1, 7),
            Err(BgRemovalError::UnsupportedChannelLayout { channels: 7 })
        ));
        assert!(matches!(
            remove_background(&[0; 5], 1, 1, 4),
            Err(BgRemovalError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_segment_foreground_matches_alpha() {
        let pixels = framed(40, 10);
        let mask = segment_foreground(&pixels, 40, 40, 3).unwrap();
        let rgba = remove_background(&pixels, 40, 40, 3).unwrap();
        for (i, &background) in mask.as_slice().iter().enumerate() {
            assert_eq!(rgba[i * 4 + 3] == 0, background);
        }
    }

    #[test]
    fn test_with_params_rejects_invalid() {
        let params = SegmentationParams {
            flood_tolerance: f32::NAN,
            ..SegmentationParams::default()
        };
        assert!(remove_background_with_params(&framed(10, 2), 10, 10, 3, &params).is_err());
    }

    #[tokio::test]
    async fn test_reader_api() {
        let image = image::DynamicImage::ImageRgb8(
            image::RgbImage::from_raw(40, 40, framed(40, 10)).unwrap(),
        );
        let mut bytes = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let result = remove_background_from_reader(std::io::Cursor::new(bytes), &RemovalConfig::default())
            .await
            .unwrap();
        assert_eq!(result.dimensions(), (40, 40));
        assert_eq!(result.metadata.input_format, "png");
    }
}
