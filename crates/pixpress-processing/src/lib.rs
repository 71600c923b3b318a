//! Pixpress Processing Library
//!
//! The conversion pipeline behind `POST /api/convert`:
//! - Codec adapter (decode with bomb guard, Lanczos resample, lossy WebP encode)
//! - Item converter (size ceiling, naming, tagged skip outcomes)
//! - Batch orchestrator (sequential per request, input order preserved)
//! - Response packager (single image or zip archive)

pub mod batch;
pub mod codec;
pub mod converter;
pub mod image;
pub mod package;

#[cfg(test)]
pub(crate) mod test_support;

pub use batch::{BatchError, BatchOrchestrator};
pub use codec::{CodecError, ImageCodec, WebpCodec};
pub use converter::{output_name, ItemConverter, SkipReason};
pub use package::{package, PackageError, Packaged, ARCHIVE_CONTENT_TYPE, ARCHIVE_FILE_NAME};
