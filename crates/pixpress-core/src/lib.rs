//! Pixpress Core Library
//!
//! This crate provides the domain models, error types, configuration, and the
//! admission gate contract shared by every Pixpress component.

pub mod admission_gate;
pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use admission_gate::{AdmissionGate, AdmissionSlot};
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    BatchResult, ConversionLimits, ConversionOptions, ConvertedItem, SkippedItem, UploadedItem,
};
