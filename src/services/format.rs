//! Output format handling service
//!
//! Encoding lives here so the segmentation code never touches codecs.

use crate::{
    config::{BackgroundColor, OutputFormat},
    error::{BgRemovalError, Result},
};
use image::{codecs::jpeg::JpegEncoder, ImageFormat, RgbImage, RgbaImage};
use std::io::Cursor;

/// Service for handling output format conversions
pub struct OutputFormatHandler;

impl OutputFormatHandler {
    /// Encode an RGBA image into the bytes of the requested format
    ///
    /// JPEG has no alpha channel, so the image is first flattened onto
    /// `background`. `quality` only affects JPEG. `Rgba8` returns the raw
    /// pixel bytes without any header.
    ///
    /// # Examples
    /// ```rust
    /// use bgremove_heuristic::{services::OutputFormatHandler, BackgroundColor, OutputFormat};
    /// use image::{Rgba, RgbaImage};
    ///
    /// let image = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 0]));
    /// let raw = OutputFormatHandler::encode(&image, OutputFormat::Rgba8, 90, BackgroundColor::white())?;
    /// assert_eq!(raw.len(), 16);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn encode(
        image: &RgbaImage,
        format: OutputFormat,
        quality: u8,
        background: BackgroundColor,
    ) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let result = match format {
            OutputFormat::Rgba8 => return Ok(image.as_raw().clone()),
            OutputFormat::Jpeg => {
                let flattened = Self::flatten(image, background);
                JpegEncoder::new_with_quality(&mut bytes, quality.min(100)).encode_image(&flattened)
            },
            OutputFormat::Png => image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png),
            OutputFormat::Tiff => image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Tiff),
            OutputFormat::WebP => image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::WebP),
        };

        result.map_err(|e| {
            BgRemovalError::processing_stage_error(
                "image encoding",
                &format!("Failed to encode as {}: {}", Self::format_name(format), e),
                Some(&format!("{}x{}", image.width(), image.height())),
            )
        })?;
        Ok(bytes)
    }

    /// Alpha-blend an RGBA image onto a solid background color
    #[must_use]
    pub fn flatten(image: &RgbaImage, background: BackgroundColor) -> RgbImage {
        let bg = [background.r, background.g, background.b];
        RgbImage::from_fn(image.width(), image.height(), |x, y| {
            let pixel = image.get_pixel(x, y);
            let alpha = u32::from(pixel[3]);
            let mut rgb = [0u8; 3];
            for (channel, out) in rgb.iter_mut().enumerate() {
                let fg = u32::from(pixel[channel]);
                let bg = u32::from(bg[channel]);
                *out = ((fg * alpha + bg * (255 - alpha) + 127) / 255) as u8;
            }
            image::Rgb(rgb)
        })
    }

    /// Human-readable name of a format
    #[must_use]
    pub fn format_name(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Png => "PNG",
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::WebP => "WebP",
            OutputFormat::Tiff => "TIFF",
            OutputFormat::Rgba8 => "RGBA8",
        }
    }

    /// Get the appropriate file extension for a given output format
    ///
    /// # Examples
    /// ```rust
    /// use bgremove_heuristic::{services::OutputFormatHandler, OutputFormat};
    ///
    /// assert_eq!(OutputFormatHandler::get_extension(OutputFormat::Png), "png");
    /// assert_eq!(OutputFormatHandler::get_extension(OutputFormat::Jpeg), "jpg");
    /// ```
    #[must_use]
    pub fn get_extension(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::WebP => "webp",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Rgba8 => "raw",
        }
    }

    /// Check if a format supports transparency (alpha channel)
    #[must_use]
    pub fn supports_transparency(format: OutputFormat) -> bool {
        !matches!(format, OutputFormat::Jpeg)
    }

    /// Warn when the chosen format will lose the transparency we just computed
    pub fn validate_for_background_removal(format: OutputFormat) {
        if !Self::supports_transparency(format) {
            log::warn!(
                "Output format {:?} does not support transparency. The removed background will be filled with a solid color.",
                format
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn half_transparent() -> RgbaImage {
        RgbaImage::from_fn(4, 2, |x, _| {
            if x < 2 {
                Rgba([200, 10, 10, 0])
            } else {
                Rgba([200, 10, 10, 255])
            }
        })
    }

    #[test]
    fn test_png_round_trip_keeps_alpha() {
        let image = half_transparent();
        let bytes =
            OutputFormatHandler::encode(&image, OutputFormat::Png, 90, BackgroundColor::white())
                .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, image);
    }

    #[test]
    fn test_jpeg_is_flattened() {
        let image = half_transparent();
        let bytes =
            OutputFormatHandler::encode(&image, OutputFormat::Jpeg, 95, BackgroundColor::black())
                .unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(!decoded.color().has_alpha());
    }

    #[test]
    fn test_flatten_blends_alpha() {
        let mut image = RgbaImage::new(3, 1);
        image.put_pixel(0, 0, Rgba([100, 100, 100, 0]));
        image.put_pixel(1, 0, Rgba([100, 100, 100, 255]));
        image.put_pixel(2, 0, Rgba([0, 0, 0, 128]));

        let flat = OutputFormatHandler::flatten(&image, BackgroundColor::new(255, 0, 10));
        assert_eq!(flat.get_pixel(0, 0).0, [255, 0, 10]);
        assert_eq!(flat.get_pixel(1, 0).0, [100, 100, 100]);
        assert_eq!(flat.get_pixel(2, 0).0, [127, 0, 5]);
    }

    #[test]
    fn test_rgba8_is_raw() {
        let image = half_transparent();
        let bytes =
            OutputFormatHandler::encode(&image, OutputFormat::Rgba8, 90, BackgroundColor::white())
                .unwrap();
        assert_eq!(bytes, image.into_raw());
    }

    #[test]
    fn test_tiff_encodes() {
        let bytes = OutputFormatHandler::encode(
            &half_transparent(),
            OutputFormat::Tiff,
            90,
            BackgroundColor::white(),
        )
        .unwrap();
        assert!(bytes.starts_with(b"II") || bytes.starts_with(b"MM"));
    }

    #[test]
    fn test_extension_and_transparency() {
        assert_eq!(OutputFormatHandler::get_extension(OutputFormat::WebP), "webp");
        assert_eq!(OutputFormatHandler::get_extension(OutputFormat::Tiff), "tiff");
        assert_eq!(OutputFormatHandler::get_extension(OutputFormat::Rgba8), "raw");
        assert!(OutputFormatHandler::supports_transparency(OutputFormat::Png));
        assert!(OutputFormatHandler::supports_transparency(OutputFormat::Rgba8));
        assert!(!OutputFormatHandler::supports_transparency(OutputFormat::Jpeg));
    }
}
