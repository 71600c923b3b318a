//! Health check handler and response type.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(super) struct LivenessResponse {
    pub status: &'static str,
    pub available_slots: usize,
    pub capacity: usize,
}

/// Liveness probe - process is running. Also reports admission gate usage.
pub(super) async fn liveness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(LivenessResponse {
            status: "alive",
            available_slots: state.gate.available_slots(),
            capacity: state.gate.capacity(),
        }),
    )
}
