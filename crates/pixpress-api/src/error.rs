//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Domain errors convert into
//! `AppError` first so status, body and logging stay consistent.
//!
//! Error bodies are rendered without diagnostics. Outside production,
//! [`error_details_middleware`] swaps in the detailed body, so the choice
//! follows the configured environment rather than anything global.

use axum::{
    extract::{multipart::MultipartError, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use pixpress_core::{AppError, ErrorMetadata, LogLevel};
use pixpress_infra::ErrorResponse;
use pixpress_processing::{BatchError, PackageError};

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: neither the trait nor `AppError` is local to this crate).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<BatchError> for HttpAppError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::NoValidItems { submitted, skipped } => {
                HttpAppError(AppError::NoValidItems {
                    submitted,
                    skipped: skipped.len(),
                })
            }
        }
    }
}

impl From<PackageError> for HttpAppError {
    fn from(err: PackageError) -> Self {
        let app = match err {
            PackageError::Empty => AppError::NoValidItems {
                submitted: 0,
                skipped: 0,
            },
            PackageError::Archive(source) => AppError::InternalWithSource {
                message: "Failed to build archive".to_string(),
                source,
            },
        };
        HttpAppError(app)
    }
}

/// Body-limit violations surface while the multipart stream is read; they
/// map to 413, everything else is a malformed request.
impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        let app = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
        };
        HttpAppError(app)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn error_response(app_error: &AppError, is_production: bool) -> ErrorResponse {
    let mut body = ErrorResponse::new(app_error.client_message(), app_error.error_code());
    body.recoverable = app_error.is_recoverable();
    body.suggested_action = app_error.suggested_action().map(String::from);

    // Details only outside production, and never for sensitive errors
    if !is_production && !app_error.is_sensitive() {
        body.details = Some(app_error.detailed_message());
        body.error_type = Some(app_error.error_type().to_string());
    }

    body
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let mut response = (status, Json(error_response(app_error, true))).into_response();
        if !app_error.is_sensitive() {
            response
                .extensions_mut()
                .insert(ErrorDiagnostics(error_response(app_error, false)));
        }
        response
    }
}

/// Detailed error body carried next to a redacted response.
#[derive(Clone)]
struct ErrorDiagnostics(ErrorResponse);

/// How error bodies are rendered for this deployment.
#[derive(Clone, Copy, Debug)]
pub struct ErrorRendering {
    pub is_production: bool,
}

impl ErrorRendering {
    pub fn new(is_production: bool) -> Self {
        Self { is_production }
    }
}

/// Expose error details and types outside production.
pub async fn error_details_middleware(
    State(rendering): State<ErrorRendering>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let diagnostics = response.extensions_mut().remove::<ErrorDiagnostics>();
    match diagnostics {
        Some(ErrorDiagnostics(detailed)) if !rendering.is_production => {
            let (mut parts, _) = response.into_parts();
            parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, Json(detailed).into_response().into_body())
        }
        _ => response,
    }
}
