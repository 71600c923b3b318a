//! Pixpress API Library
//!
//! HTTP surface of the converter: application state, routes, handlers,
//! error rendering and server startup.

mod handlers;
mod utils;

pub mod error;
pub mod setup;
pub mod state;

// Re-exports
pub use error::HttpAppError;
pub use state::AppState;
