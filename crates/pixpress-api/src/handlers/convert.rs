//! `POST /api/convert`

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use pixpress_core::AppError;
use pixpress_processing::{package, Packaged};

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::extract_convert_form;

pub const CONVERTED_COUNT_HEADER: &str = "X-Converted-Count";
pub const SKIPPED_COUNT_HEADER: &str = "X-Skipped-Count";

/// Convert every uploaded image to WebP.
///
/// One surviving image is returned directly; several are returned as a zip
/// archive. The request holds an admission slot for the whole batch, and the
/// slot travels with the blocking task so it is released only once the CPU
/// work is really over, even if the client has gone away.
#[tracing::instrument(
    skip_all,
    fields(
        items = tracing::field::Empty,
        converted = tracing::field::Empty,
        skipped = tracing::field::Empty
    )
)]
pub async fn convert_images(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let form = extract_convert_form(multipart, state.config.default_quality).await?;
    let submitted = form.items.len();
    tracing::Span::current().record("items", submitted);

    if submitted == 0 {
        return Err(AppError::NoValidItems {
            submitted: 0,
            skipped: 0,
        }
        .into());
    }

    let slot = state.gate.acquire().await?;
    tracing::debug!(
        available_slots = state.gate.available_slots(),
        "Admission slot acquired"
    );

    let orchestrator = state.orchestrator.clone();
    let options = form.options;
    let items = form.items;

    let (packaged, converted, skipped) = tokio::task::spawn_blocking(move || {
        let _slot = slot;
        let result = orchestrator.run(items, &options)?;
        let converted = result.converted_count();
        let skipped = result.skipped_count();
        let packaged = package(result, orchestrator.output_mime_type())?;
        Ok::<_, HttpAppError>((packaged, converted, skipped))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Conversion task failed: {}", e)))??;

    let span = tracing::Span::current();
    span.record("converted", converted);
    span.record("skipped", skipped);

    Ok(build_response(packaged, converted, skipped))
}

fn build_response(packaged: Packaged, converted: usize, skipped: usize) -> Response {
    let disposition = match &packaged {
        Packaged::Single { file_name, .. } => {
            format!("inline; filename=\"{}\"", header_safe_file_name(file_name))
        }
        Packaged::Archive { file_name, .. } => format!("attachment; filename=\"{}\"", file_name),
    };
    let content_type = packaged.content_type();

    let mut response = (StatusCode::OK, packaged.into_data()).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    headers.insert(CONVERTED_COUNT_HEADER, HeaderValue::from(converted));
    headers.insert(SKIPPED_COUNT_HEADER, HeaderValue::from(skipped));

    response
}

/// Restrict a file name to characters that are safe inside a quoted header
/// parameter.
fn header_safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_header_safe_file_name() {
        assert_eq!(header_safe_file_name("cat.webp"), "cat.webp");
        assert_eq!(header_safe_file_name("my cat.webp"), "my cat.webp");
        assert_eq!(header_safe_file_name("ca\"t.webp"), "ca_t.webp");
        assert_eq!(header_safe_file_name("café.webp"), "caf_.webp");
    }

    #[test]
    fn test_single_response_headers() {
        let response = build_response(
            Packaged::Single {
                data: Bytes::from_static(b"RIFF"),
                file_name: "cat.webp".to_string(),
                content_type: "image/webp",
            },
            1,
            2,
        );

        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "image/webp");
        assert_eq!(headers[header::CONTENT_DISPOSITION], "inline; filename=\"cat.webp\"");
        assert_eq!(headers[CONVERTED_COUNT_HEADER], "1");
        assert_eq!(headers[SKIPPED_COUNT_HEADER], "2");
    }

    #[test]
    fn test_archive_response_headers() {
        let response = build_response(
            Packaged::Archive {
                data: Bytes::from_static(b"PK"),
                file_name: "optimized_images.zip",
            },
            3,
            0,
        );

        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/zip");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"optimized_images.zip\""
        );
    }
}
