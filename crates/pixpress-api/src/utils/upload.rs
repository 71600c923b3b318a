//! Multipart form parsing for conversion requests

use axum::extract::Multipart;
use pixpress_core::{AppError, ConversionOptions, UploadedItem};

use crate::error::HttpAppError;

/// Field carrying the uploaded images.
pub const FILES_FIELD: &str = "files";
/// Single-file alias accepted for older clients.
pub const FILE_FIELD: &str = "file";

/// Parsed `POST /api/convert` form.
#[derive(Debug)]
pub struct ConvertForm {
    pub items: Vec<UploadedItem>,
    pub options: ConversionOptions,
}

/// Read every part of the form. File parts are collected in the order they
/// arrive; unknown fields are ignored.
pub async fn extract_convert_form(
    mut multipart: Multipart,
    default_quality: u8,
) -> Result<ConvertForm, HttpAppError> {
    let mut items = Vec::new();
    let mut quality = default_quality;
    let mut width = 0;
    let mut height = 0;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            FILES_FIELD | FILE_FIELD => {
                let filename = field.file_name().map(|s| s.to_string()).unwrap_or_default();
                let data = field.bytes().await?;
                items.push(UploadedItem::new(filename, data));
            }
            "quality" => quality = parse_quality(&field.text().await?, default_quality)?,
            "width" => width = parse_dimension("width", &field.text().await?)?,
            "height" => height = parse_dimension("height", &field.text().await?)?,
            other => {
                tracing::debug!(field = other, "Ignoring unknown form field");
            }
        }
    }

    Ok(ConvertForm {
        items,
        options: ConversionOptions::new(quality, width, height),
    })
}

/// Parse the `quality` field; blank means the configured default.
pub fn parse_quality(raw: &str, default_quality: u8) -> Result<u8, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(default_quality);
    }

    match raw.parse::<i64>() {
        Ok(q) if (0..=100).contains(&q) => Ok(q as u8),
        Ok(q) => Err(AppError::InvalidInput(format!(
            "quality must be between 0 and 100, got {}",
            q
        ))),
        Err(_) => Err(AppError::InvalidInput(format!(
            "quality must be an integer, got '{}'",
            raw
        ))),
    }
}

/// Parse a target dimension; blank or absent means 0 (unspecified).
pub fn parse_dimension(name: &str, raw: &str) -> Result<u32, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }

    raw.parse::<u32>().map_err(|_| {
        AppError::InvalidInput(format!(
            "{} must be a non-negative integer, got '{}'",
            name, raw
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quality() {
        assert_eq!(parse_quality("75", 80).unwrap(), 75);
        assert_eq!(parse_quality(" 0 ", 80).unwrap(), 0);
        assert_eq!(parse_quality("100", 80).unwrap(), 100);
        assert_eq!(parse_quality("", 80).unwrap(), 80);
    }

    #[test]
    fn test_parse_quality_out_of_range() {
        assert!(matches!(
            parse_quality("101", 80),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_quality("-1", 80),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_quality("high", 80),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension("width", "640").unwrap(), 640);
        assert_eq!(parse_dimension("width", "").unwrap(), 0);
        assert_eq!(parse_dimension("width", "0").unwrap(), 0);
    }

    #[test]
    fn test_parse_dimension_rejects_negative_and_garbage() {
        let err = parse_dimension("height", "-5").unwrap_err();
        assert!(err.to_string().contains("height"));
        assert!(parse_dimension("width", "12px").is_err());
        assert!(parse_dimension("width", "99999999999").is_err());
    }
}
