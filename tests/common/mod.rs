//! Synthetic image builders shared by the integration tests

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

pub const BLUE: [u8; 3] = [0, 0, 255];
pub const RED: [u8; 3] = [255, 0, 0];

/// Interleaved RGB bytes produced by `f(x, y)`
pub fn rgb_from_fn<F: Fn(u32, u32) -> [u8; 3]>(width: u32, height: u32, f: F) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&f(x, y));
        }
    }
    pixels
}

/// Solid frame of `frame_rgb` around a centered square of `center_rgb`
pub fn framed_square(size: u32, frame: u32, frame_rgb: [u8; 3], center_rgb: [u8; 3]) -> Vec<u8> {
    rgb_from_fn(size, size, |x, y| {
        if in_rect(x, y, frame, frame, size - frame, size - frame) {
            center_rgb
        } else {
            frame_rgb
        }
    })
}

/// `x0 <= x < x1 && y0 <= y < y1`
pub fn in_rect(x: u32, y: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> bool {
    x >= x0 && x < x1 && y >= y0 && y < y1
}

/// Deterministic pseudo-random RGB noise
pub fn noise(width: u32, height: u32, seed: u32) -> Vec<u8> {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    (0..width * height * 3)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8
        })
        .collect()
}

/// Alpha channel of an RGBA buffer
pub fn alpha_at(rgba: &[u8], width: u32, x: u32, y: u32) -> u8 {
    rgba[((y * width + x) * 4 + 3) as usize]
}

pub fn to_dynamic(width: u32, height: u32, pixels: Vec<u8>) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, pixels).unwrap())
}

/// Encode an RGB buffer in the given container format
pub fn encode(width: u32, height: u32, pixels: Vec<u8>, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    to_dynamic(width, height, pixels)
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();
    bytes
}
