//! Codec adapter: decode, resample and encode.
//!
//! The rest of the pipeline only talks to [`ImageCodec`]; [`WebpCodec`] is the
//! production implementation backed by `image` (decode/resample) and `libwebp`
//! (lossy encode).

use image::{DynamicImage, GenericImageView, ImageReader, Limits};
use std::io::Cursor;

use crate::image::ImageResize;

/// Largest width or height libwebp can encode.
pub const WEBP_MAX_DIMENSION: u32 = 16383;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("unrecognized image format")]
    UnsupportedFormat,

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("image has {pixels} pixels, exceeding the limit of {max}")]
    PixelLimitExceeded { pixels: u64, max: u64 },

    #[error("image dimensions {width}x{height} exceed the encoder limit of {max}px")]
    DimensionsTooLarge { width: u32, height: u32, max: u32 },

    #[error("failed to encode image: {0}")]
    Encode(String),
}

/// Decode/resample/encode primitives used by the item converter.
pub trait ImageCodec: Send + Sync {
    /// Decode `data` into a raster, refusing rasters above `max_pixels`.
    fn decode(&self, data: &[u8], max_pixels: u64) -> Result<DynamicImage, CodecError>;

    /// Resample to exactly `width` x `height`.
    fn resize(&self, image: &DynamicImage, width: u32, height: u32) -> DynamicImage;

    /// Encode the raster at `quality` (0-100).
    fn encode(&self, image: &DynamicImage, quality: u8) -> Result<Vec<u8>, CodecError>;

    /// Canonical file extension of the output format, without the dot.
    fn extension(&self) -> &'static str;

    /// Media type of the output format.
    fn mime_type(&self) -> &'static str;

    /// Largest width or height `encode` accepts.
    fn max_dimension(&self) -> u32 {
        u32::MAX
    }
}

/// Lossy WebP codec
#[derive(Debug, Clone, Copy, Default)]
pub struct WebpCodec;

impl WebpCodec {
    fn read_dimensions(data: &[u8]) -> Result<(u32, u32), CodecError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| CodecError::Decode(e.to_string()))?;

        if reader.format().is_none() {
            return Err(CodecError::UnsupportedFormat);
        }

        reader
            .into_dimensions()
            .map_err(|e| CodecError::Decode(e.to_string()))
    }
}

impl ImageCodec for WebpCodec {
    fn decode(&self, data: &[u8], max_pixels: u64) -> Result<DynamicImage, CodecError> {
        // Header-only pass so a bomb is rejected before any raster is allocated
        let (width, height) = Self::read_dimensions(data)?;
        let pixels = u64::from(width) * u64::from(height);
        if pixels > max_pixels {
            return Err(CodecError::PixelLimitExceeded {
                pixels,
                max: max_pixels,
            });
        }

        let mut reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| CodecError::Decode(e.to_string()))?;

        let mut limits = Limits::default();
        limits.max_image_width = Some(width);
        limits.max_image_height = Some(height);
        reader.limits(limits);

        reader
            .decode()
            .map_err(|e| CodecError::Decode(e.to_string()))
    }

    fn resize(&self, image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        ImageResize::resize_image(image, width, height)
    }

    fn encode(&self, image: &DynamicImage, quality: u8) -> Result<Vec<u8>, CodecError> {
        let (width, height) = image.dimensions();
        if width > WEBP_MAX_DIMENSION || height > WEBP_MAX_DIMENSION {
            return Err(CodecError::DimensionsTooLarge {
                width,
                height,
                max: WEBP_MAX_DIMENSION,
            });
        }

        let quality = f32::from(quality.min(100));

        // Keep the alpha channel only when the source has one
        let encoded = if image.color().has_alpha() {
            let rgba = image.to_rgba8();
            webp::Encoder::from_rgba(rgba.as_raw(), width, height)
                .encode_simple(false, quality)
                .map(|memory| memory.to_vec())
        } else {
            let rgb = image.to_rgb8();
            webp::Encoder::from_rgb(rgb.as_raw(), width, height)
                .encode_simple(false, quality)
                .map(|memory| memory.to_vec())
        };

        encoded.map_err(|e| CodecError::Encode(format!("{:?}", e)))
    }

    fn max_dimension(&self) -> u32 {
        WEBP_MAX_DIMENSION
    }

    fn extension(&self) -> &'static str {
        "webp"
    }

    fn mime_type(&self) -> &'static str {
        "image/webp"
    }
}
