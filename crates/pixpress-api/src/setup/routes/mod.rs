//! Route configuration and setup.
//!
//! Health checks live in [health](health).

mod health;

use crate::error::{error_details_middleware, ErrorRendering};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use pixpress_core::Config;
use pixpress_infra::{request_id_middleware, security_headers_middleware, SecurityHeadersConfig};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    let max_request_bytes = config.max_request_size_bytes;
    tracing::info!(
        max_request_mb = max_request_bytes / 1024 / 1024,
        static_dir = %config.static_dir.display(),
        "Configuring routes"
    );

    let is_production = config.is_production();
    let security_headers_config = Arc::new(SecurityHeadersConfig::new(is_production));

    Router::new()
        .route("/", get(handlers::index::index))
        .route("/health", get(health::liveness_check))
        .route(
            "/api/convert",
            post(handlers::convert::convert_images)
                // Multipart reads are bounded by the whole-request ceiling, not
                // axum's 2 MB default
                .layer(DefaultBodyLimit::max(max_request_bytes)),
        )
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(RequestBodyLimitLayer::new(max_request_bytes))
        .layer(axum::middleware::from_fn_with_state(
            ErrorRendering::new(is_production),
            error_details_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            security_headers_config,
            security_headers_middleware,
        ))
        .with_state(state)
}
