//! Raster helpers used by the codec adapter.

pub mod resize;

pub use resize::{ImageResize, ResizeDimensions};
