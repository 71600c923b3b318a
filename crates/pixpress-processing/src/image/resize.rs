use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use pixpress_core::ConversionOptions;

/// Requested resize dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeDimensions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ResizeDimensions {
    /// Build from form options, where 0 means "unspecified" on that axis.
    ///
    /// Returns `None` when neither axis is set.
    pub fn from_options(options: &ConversionOptions) -> Option<Self> {
        let width = (options.width > 0).then_some(options.width);
        let height = (options.height > 0).then_some(options.height);

        if width.is_none() && height.is_none() {
            return None;
        }

        Some(ResizeDimensions { width, height })
    }
}

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Calculate target dimensions, deriving a missing axis from the source
    /// aspect ratio.
    pub fn calculate_dimensions(
        orig_width: u32,
        orig_height: u32,
        dimensions: ResizeDimensions,
    ) -> (u32, u32) {
        match (dimensions.width, dimensions.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => {
                let h = (f64::from(orig_height) * f64::from(w) / f64::from(orig_width.max(1)))
                    .round() as u32;
                (w, h.max(1))
            }
            (None, Some(h)) => {
                let w = (f64::from(orig_width) * f64::from(h) / f64::from(orig_height.max(1)))
                    .round() as u32;
                (w.max(1), h)
            }
            (None, None) => (orig_width, orig_height),
        }
    }

    /// Resize image to exact dimensions with a Lanczos3 filter.
    ///
    /// The pixel layout (including any alpha channel) of the source is kept.
    pub fn resize_image(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        if img.dimensions() == (width, height) {
            return img.clone();
        }
        img.resize_exact(width, height, FilterType::Lanczos3)
    }
}
