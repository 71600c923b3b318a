//! Item converter - one uploaded file in, one encoded image (or a skip) out.

use std::path::Path;
use std::sync::Arc;

use image::GenericImageView;
use pixpress_core::{ConversionLimits, ConversionOptions, ConvertedItem, UploadedItem};

use crate::codec::{CodecError, ImageCodec};
use crate::image::{ImageResize, ResizeDimensions};

/// Why an item was dropped from its batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkipReason {
    #[error("file too large: {size} bytes (max: {max} bytes)")]
    OversizedInput { size: usize, max: usize },

    #[error("empty file")]
    EmptyInput,

    #[error("{0}")]
    DecodeFailure(String),

    #[error("image has {pixels} pixels (max: {max})")]
    PixelLimitExceeded { pixels: u64, max: u64 },

    #[error("{0}")]
    EncodeFailure(String),
}

impl SkipReason {
    /// Short machine-readable tag, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            SkipReason::OversizedInput { .. } => "oversized_input",
            SkipReason::EmptyInput => "empty_input",
            SkipReason::DecodeFailure(_) => "decode_failure",
            SkipReason::PixelLimitExceeded { .. } => "pixel_limit_exceeded",
            SkipReason::EncodeFailure(_) => "encode_failure",
        }
    }
}

impl From<CodecError> for SkipReason {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::PixelLimitExceeded { pixels, max } => {
                SkipReason::PixelLimitExceeded { pixels, max }
            }
            CodecError::UnsupportedFormat | CodecError::Decode(_) => {
                SkipReason::DecodeFailure(err.to_string())
            }
            CodecError::DimensionsTooLarge { .. } | CodecError::Encode(_) => {
                SkipReason::EncodeFailure(err.to_string())
            }
        }
    }
}

/// Derive the output file name: base name of `original` with its extension
/// replaced by `extension`.
///
/// Directory components (either separator style) are dropped. A name without
/// an extension gets one appended; an empty name falls back to `image`.
pub fn output_name(original: &str, extension: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .unwrap_or("image");

    let stem = Path::new(base)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(base);

    format!("{}.{}", stem, extension)
}

/// Converts single uploaded items under fixed resource limits.
#[derive(Clone)]
pub struct ItemConverter {
    codec: Arc<dyn ImageCodec>,
    limits: ConversionLimits,
}

impl ItemConverter {
    pub fn new(codec: Arc<dyn ImageCodec>, limits: ConversionLimits) -> Self {
        Self { codec, limits }
    }

    pub fn codec(&self) -> &dyn ImageCodec {
        self.codec.as_ref()
    }

    /// Convert one item.
    ///
    /// Oversized payloads never reach the codec. Every failure is returned as
    /// a [`SkipReason`]; nothing here panics on bad input.
    pub fn convert(
        &self,
        item: &UploadedItem,
        options: &ConversionOptions,
    ) -> Result<ConvertedItem, SkipReason> {
        let size = item.size();
        if size > self.limits.max_item_bytes {
            return Err(SkipReason::OversizedInput {
                size,
                max: self.limits.max_item_bytes,
            });
        }
        if size == 0 {
            return Err(SkipReason::EmptyInput);
        }

        let mut img = self.codec.decode(&item.data, self.limits.max_pixels)?;

        if let Some(dims) = ResizeDimensions::from_options(options) {
            let (orig_width, orig_height) = img.dimensions();
            let (width, height) = ImageResize::calculate_dimensions(orig_width, orig_height, dims);

            let max_dimension = self.codec.max_dimension();
            if width > max_dimension || height > max_dimension {
                return Err(CodecError::DimensionsTooLarge {
                    width,
                    height,
                    max: max_dimension,
                }
                .into());
            }

            let pixels = u64::from(width) * u64::from(height);
            if pixels > self.limits.max_pixels {
                return Err(SkipReason::PixelLimitExceeded {
                    pixels,
                    max: self.limits.max_pixels,
                });
            }

            tracing::debug!(
                item = %item.name,
                from_width = orig_width,
                from_height = orig_height,
                to_width = width,
                to_height = height,
                "Resizing image"
            );
            img = self.codec.resize(&img, width, height);
        }

        let data = self.codec.encode(&img, options.quality)?;
        drop(img);

        Ok(ConvertedItem {
            name: output_name(&item.name, self.codec.extension()),
            data: data.into(),
        })
    }
}
