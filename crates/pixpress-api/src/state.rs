//! Shared application state

use std::sync::Arc;

use pixpress_core::{AdmissionGate, Config};
use pixpress_infra::SemaphoreGate;
use pixpress_processing::{BatchOrchestrator, ImageCodec, ItemConverter, WebpCodec};

/// State shared by all handlers. Built once at startup; never mutated.
pub struct AppState {
    pub config: Config,
    pub gate: Arc<dyn AdmissionGate>,
    pub orchestrator: Arc<BatchOrchestrator>,
}

impl AppState {
    /// Production state: WebP codec behind a semaphore gate sized from config.
    pub fn new(config: Config) -> Self {
        Self::with_codec(config, Arc::new(WebpCodec))
    }

    pub fn with_codec(config: Config, codec: Arc<dyn ImageCodec>) -> Self {
        let gate: Arc<dyn AdmissionGate> =
            Arc::new(SemaphoreGate::new(config.max_concurrent_conversions));
        Self::with_parts(config, codec, gate)
    }

    pub fn with_parts(
        config: Config,
        codec: Arc<dyn ImageCodec>,
        gate: Arc<dyn AdmissionGate>,
    ) -> Self {
        let converter = ItemConverter::new(codec, config.conversion_limits());
        Self {
            orchestrator: Arc::new(BatchOrchestrator::new(converter)),
            gate,
            config,
        }
    }
}
