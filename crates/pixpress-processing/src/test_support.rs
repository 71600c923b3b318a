//! Shared fixtures for unit tests in this crate.

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

use crate::codec::{CodecError, ImageCodec};

pub fn encode_as(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
    buffer
}

pub fn encode_png(img: &DynamicImage) -> Vec<u8> {
    encode_as(img, ImageFormat::Png)
}

pub fn encode_jpeg(img: &DynamicImage) -> Vec<u8> {
    encode_as(img, ImageFormat::Jpeg)
}

pub fn solid_png(width: u32, height: u32) -> Vec<u8> {
    encode_png(&DynamicImage::ImageRgb8(RgbImage::from_pixel(
        width,
        height,
        Rgb([120, 80, 40]),
    )))
}

const ENCODE_FAILURE_MARKER: Rgb<u8> = Rgb([1, 2, 3]);

/// Codec double: bytes starting with `b"ok"` decode to a 4x2 raster, bytes
/// starting with `b"noenc"` decode but fail to encode, anything else fails to
/// decode. Encoded output is the literal `b"encoded"`.
#[derive(Debug, Default)]
pub struct ScriptedCodec;

impl ImageCodec for ScriptedCodec {
    fn decode(&self, data: &[u8], _max_pixels: u64) -> Result<DynamicImage, CodecError> {
        if data.starts_with(b"ok") {
            Ok(DynamicImage::ImageRgb8(RgbImage::new(4, 2)))
        } else if data.starts_with(b"noenc") {
            let mut raster = RgbImage::new(4, 2);
            raster.put_pixel(0, 0, ENCODE_FAILURE_MARKER);
            Ok(DynamicImage::ImageRgb8(raster))
        } else {
            Err(CodecError::UnsupportedFormat)
        }
    }

    fn resize(&self, image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        image.resize_exact(width, height, FilterType::Nearest)
    }

    fn encode(&self, image: &DynamicImage, _quality: u8) -> Result<Vec<u8>, CodecError> {
        let marker = image.as_rgb8().map(|raster| *raster.get_pixel(0, 0));
        if marker == Some(ENCODE_FAILURE_MARKER) {
            return Err(CodecError::Encode("scripted failure".to_string()));
        }
        Ok(b"encoded".to_vec())
    }

    fn extension(&self) -> &'static str {
        "webp"
    }

    fn mime_type(&self) -> &'static str {
        "image/webp"
    }
}
