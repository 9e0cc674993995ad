//! Error handling and edge case testing
//!
//! Covers the precondition checks at the library boundary, configuration
//! validation, and degenerate but valid image shapes.

mod common;

use bgremove_heuristic::{
    config::{OutputFormat, RemovalConfig, SegmentationParams},
    error::{BgRemovalError, Result},
    remove_background, remove_background_from_bytes, segment_foreground,
    segmentation::composite,
    BackgroundRemovalProcessor, Mask, PixelBuffer,
};
use common::{noise, rgb_from_fn};

#[test]
fn test_zero_dimensions_fail_fast() {
    for (width, height) in [(0, 0), (0, 5), (5, 0)] {
        let err = remove_background(&[], width, height, 3).unwrap_err();
        assert!(matches!(err, BgRemovalError::InvalidImage(_)), "{width}x{height}: {err}");
        assert!(err.is_input_error());
    }
}

#[test]
fn test_channel_layout_checked_before_length() {
    for channels in [0u8, 1, 2, 5, 255] {
        let err = remove_background(&[0; 12], 2, 2, channels).unwrap_err();
        assert!(
            matches!(err, BgRemovalError::UnsupportedChannelLayout { channels: c } if c == channels),
            "{channels}: {err}"
        );
    }
}

#[test]
fn test_zero_dimensions_reported_before_channels() {
    let err = remove_background(&[], 0, 4, 2).unwrap_err();
    assert!(matches!(err, BgRemovalError::InvalidImage(_)));
}

#[test]
fn test_buffer_length_mismatch() {
    let short = vec![0u8; 4 * 4 * 3 - 1];
    let long = vec![0u8; 4 * 4 * 3 + 1];
    let rgba_sized = vec![0u8; 4 * 4 * 4];

    for (pixels, channels) in [(&short, 3u8), (&long, 3), (&rgba_sized, 3)] {
        let err = remove_background(pixels, 4, 4, channels).unwrap_err();
        assert!(matches!(err, BgRemovalError::InvalidImage(_)), "{err}");
        assert!(err.to_string().contains("does not match"));
    }

    assert!(segment_foreground(&short, 4, 4, 3).is_err());
}

#[test]
fn test_overflowing_dimensions_rejected() {
    let err = remove_background(&[0; 3], u32::MAX, u32::MAX, 4).unwrap_err();
    assert!(matches!(err, BgRemovalError::InvalidImage(_)));
}

#[test]
fn test_thin_images_are_processed() -> Result<()> {
    // Every pixel of a 1px-wide image lies on the border
    let column = rgb_from_fn(1, 40, |_, y| if y == 20 { [255, 0, 0] } else { [0, 0, 255] });
    let rgba = remove_background(&column, 1, 40, 3)?;
    assert_eq!(rgba.len(), 40 * 4);

    let row = noise(40, 1, 3);
    assert_eq!(remove_background(&row, 40, 1, 3)?.len(), 40 * 4);

    let single = remove_background(&[9, 9, 9, 9], 1, 1, 4)?;
    assert_eq!(single, vec![9, 9, 9, 0]);
    Ok(())
}

#[test]
fn test_compositor_rejects_mismatched_mask() {
    let buffer = PixelBuffer::new(vec![0; 4 * 4 * 3], 4, 4, 3).unwrap();
    let err = composite(&buffer, &Mask::new(4, 5)).unwrap_err();
    assert!(matches!(err, BgRemovalError::ProcessingFailure(_)));
    assert!(!err.is_input_error());
}

#[test]
fn test_config_validation_edge_cases() -> Result<()> {
    let config = RemovalConfig::builder().jpeg_quality(0).build()?;
    assert_eq!(config.jpeg_quality, 0);

    // Builder clamps, manual construction does not
    let config = RemovalConfig::builder().jpeg_quality(150).build()?;
    assert_eq!(config.jpeg_quality, 100);

    let mut config = RemovalConfig::default();
    config.jpeg_quality = 101;
    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("JPEG quality"));
    assert!(error.to_string().contains("101"));
    assert!(error.to_string().contains("0-100"));

    Ok(())
}

#[test]
fn test_segmentation_params_validation() {
    let invalid = [
        SegmentationParams {
            threshold_min: 70.0,
            ..SegmentationParams::default()
        },
        SegmentationParams {
            threshold_scale: 0.0,
            ..SegmentationParams::default()
        },
        SegmentationParams {
            flood_tolerance: f32::INFINITY,
            ..SegmentationParams::default()
        },
        SegmentationParams {
            color_weight: -0.1,
            ..SegmentationParams::default()
        },
        SegmentationParams {
            edge_sample_divisor: 0,
            ..SegmentationParams::default()
        },
    ];

    for params in invalid {
        let config = RemovalConfig {
            segmentation: params.clone(),
            ..RemovalConfig::default()
        };
        assert!(params.validate().is_err(), "{params:?}");
        assert!(matches!(
            BackgroundRemovalProcessor::new(config),
            Err(BgRemovalError::InvalidConfig(_))
        ));
    }
}

#[test]
fn test_undecodable_bytes() {
    let config = RemovalConfig::default();
    assert!(matches!(
        remove_background_from_bytes(&[], &config),
        Err(BgRemovalError::InvalidImage(_))
    ));
    assert!(matches!(
        remove_background_from_bytes(b"definitely not an image", &config),
        Err(BgRemovalError::Image(_))
    ));
}

#[tokio::test]
async fn test_missing_file() {
    let mut processor = BackgroundRemovalProcessor::new(RemovalConfig::default()).unwrap();
    let err = processor
        .process_file("/nonexistent/path/photo.png")
        .await
        .unwrap_err();
    assert!(matches!(err, BgRemovalError::Io(_)));
    assert!(err.to_string().contains("photo.png"));
}

#[test]
fn test_jpeg_output_has_no_alpha() -> Result<()> {
    let config = RemovalConfig::builder()
        .output_format(OutputFormat::Jpeg)
        .build()?;
    let image = common::to_dynamic(32, 32, noise(32, 32, 11));
    let result = BackgroundRemovalProcessor::new(config)?.process_image(&image)?;

    let jpeg = result.to_bytes(OutputFormat::Jpeg, 80)?;
    let decoded = image::load_from_memory(&jpeg)?;
    assert!(!decoded.color().has_alpha());
    assert_eq!((decoded.width(), decoded.height()), (32, 32));
    Ok(())
}
