//! Configuration module
//!
//! Process-wide settings are read once at startup and never mutated afterwards.
//! Every component receives the values it needs from the shared `Config`.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::models::ConversionLimits;

// Defaults
const SERVER_PORT: u16 = 8000;
const MAX_FILE_SIZE_MB: usize = 15;
const MAX_REQUEST_SIZE_MB: usize = 100;
const MAX_IMAGE_PIXELS: u64 = 90_000_000;
const DEFAULT_QUALITY: u8 = 80;
const MAX_CONCURRENT_CONVERSIONS: usize = 2;
const STATIC_DIR: &str = "static";

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!("Invalid log format: {}", other)),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    /// Per-item byte ceiling; larger uploads are skipped before decoding.
    pub max_file_size_bytes: usize,
    /// Whole multipart body ceiling; larger requests are rejected with 413.
    pub max_request_size_bytes: usize,
    /// Decompression-bomb guard on decoded width * height.
    pub max_image_pixels: u64,
    pub default_quality: u8,
    pub max_concurrent_conversions: usize,
    pub static_dir: PathBuf,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            max_request_size_bytes: MAX_REQUEST_SIZE_MB * 1024 * 1024,
            max_image_pixels: MAX_IMAGE_PIXELS,
            default_quality: DEFAULT_QUALITY,
            max_concurrent_conversions: MAX_CONCURRENT_CONVERSIONS,
            static_dir: PathBuf::from(STATIC_DIR),
            log_format: LogFormat::Text,
        }
    }
}

/// Read `key` through `lookup` and parse it, falling back to `default` when the
/// variable is unset, empty or unparsable.
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from the process environment (and `.env` if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let max_file_size_mb = parse_or(&lookup, "MAX_FILE_SIZE_MB", MAX_FILE_SIZE_MB);
        let max_request_size_mb = parse_or(&lookup, "MAX_REQUEST_SIZE_MB", MAX_REQUEST_SIZE_MB);

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) if !raw.trim().is_empty() => raw.parse::<LogFormat>()?,
            _ => LogFormat::default(),
        };

        let config = Config {
            server_port: parse_or(&lookup, "SERVER_PORT", SERVER_PORT),
            environment,
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            max_request_size_bytes: max_request_size_mb * 1024 * 1024,
            max_image_pixels: parse_or(&lookup, "MAX_IMAGE_PIXELS", MAX_IMAGE_PIXELS),
            default_quality: parse_or(&lookup, "DEFAULT_QUALITY", DEFAULT_QUALITY),
            max_concurrent_conversions: parse_or(
                &lookup,
                "MAX_CONCURRENT_CONVERSIONS",
                MAX_CONCURRENT_CONVERSIONS,
            ),
            static_dir: lookup("STATIC_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(STATIC_DIR)),
            log_format,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_concurrent_conversions == 0 {
            return Err(anyhow::anyhow!(
                "MAX_CONCURRENT_CONVERSIONS must be at least 1"
            ));
        }

        if self.default_quality > 100 {
            return Err(anyhow::anyhow!(
                "DEFAULT_QUALITY must be between 0 and 100, got {}",
                self.default_quality
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.max_file_size_bytes > self.max_request_size_bytes {
            return Err(anyhow::anyhow!(
                "MAX_FILE_SIZE_MB ({} MB) cannot exceed MAX_REQUEST_SIZE_MB ({} MB)",
                self.max_file_size_bytes / 1024 / 1024,
                self.max_request_size_bytes / 1024 / 1024
            ));
        }

        if self.max_image_pixels == 0 {
            return Err(anyhow::anyhow!("MAX_IMAGE_PIXELS must be greater than 0"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn conversion_limits(&self) -> ConversionLimits {
        ConversionLimits {
            max_item_bytes: self.max_file_size_bytes,
            max_pixels: self.max_image_pixels,
        }
    }

    pub fn index_path(&self) -> PathBuf {
        self.static_dir.join("index.html")
    }
}
