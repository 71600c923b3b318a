//! Conversion domain models
//!
//! Values that flow through one conversion request: the uploaded items, the
//! options parsed from the form, and the converted results.

use bytes::Bytes;
use serde::Serialize;

/// One uploaded file within a batch request.
#[derive(Debug, Clone)]
pub struct UploadedItem {
    pub name: String,
    pub data: Bytes,
}

impl UploadedItem {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Options shared by every item of one request.
///
/// A target dimension of 0 means "unspecified" on that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionOptions {
    pub quality: u8,
    pub width: u32,
    pub height: u32,
}

impl ConversionOptions {
    pub const DEFAULT_QUALITY: u8 = 80;

    pub fn new(quality: u8, width: u32, height: u32) -> Self {
        Self {
            quality,
            width,
            height,
        }
    }
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self::new(Self::DEFAULT_QUALITY, 0, 0)
    }
}

/// Resource ceilings applied to every item before and during decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionLimits {
    pub max_item_bytes: usize,
    pub max_pixels: u64,
}

/// A fully encoded output image and its derived file name.
#[derive(Debug, Clone)]
pub struct ConvertedItem {
    pub name: String,
    pub data: Bytes,
}

/// An item dropped from the batch, kept only for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedItem {
    pub name: String,
    pub reason: String,
}

/// Outcome of a batch: converted items in input order plus skip records.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub items: Vec<ConvertedItem>,
    pub skipped: Vec<SkippedItem>,
}

impl BatchResult {
    pub fn converted_count(&self) -> usize {
        self.items.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
