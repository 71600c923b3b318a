//! Test fixtures: generated images and raw blobs.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("Failed to encode fixture");
    buffer
}

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    })
}

/// Baseline JPEG with a colour gradient.
pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(&DynamicImage::ImageRgb8(gradient(width, height)), ImageFormat::Jpeg)
}

/// Opaque PNG with a colour gradient.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    encode(&DynamicImage::ImageRgb8(gradient(width, height)), ImageFormat::Png)
}

/// Fully transparent RGBA PNG.
pub fn create_transparent_png(width: u32, height: u32) -> Vec<u8> {
    encode(
        &DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]))),
        ImageFormat::Png,
    )
}

/// Pseudo-random bytes behind a prefix that matches no image signature.
pub fn create_random_bytes(len: usize) -> Vec<u8> {
    let mut state: u32 = 0x2545_F491;
    let mut data = b"not an image:".to_vec();
    data.extend((0..len).map(|_| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state >> 24) as u8
    }));
    data
}
