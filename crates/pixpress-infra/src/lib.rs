//! Pixpress Infrastructure Library
//!
//! Shared infrastructure components used by the Pixpress service:
//! - Middleware (request ID, security headers)
//! - Telemetry initialization
//! - Error response body
//! - Admission gate (bounded conversion concurrency)
//! - Archive creation

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

pub mod error;

#[cfg(feature = "admission")]
pub mod admission;

#[cfg(feature = "archive")]
pub mod archive;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{
    request_id_middleware, security_headers_middleware, RequestId, SecurityHeadersConfig,
};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry};

pub use error::ErrorResponse;

#[cfg(feature = "admission")]
pub use admission::SemaphoreGate;

#[cfg(feature = "archive")]
pub use archive::{create_zip_archive, ArchiveEntry};
