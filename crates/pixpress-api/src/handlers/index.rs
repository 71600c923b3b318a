//! Landing page

use std::io;
use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use pixpress_core::AppError;

use crate::error::HttpAppError;
use crate::state::AppState;

/// `GET /` (and `HEAD /`): the upload page from the static directory.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Response, HttpAppError> {
    let path = state.config.index_path();

    match tokio::fs::read(&path).await {
        Ok(html) => Ok((
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            html,
        )
            .into_response()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Landing page missing");
            Err(AppError::NotFound("index.html not found".to_string()).into())
        }
        Err(e) => Err(AppError::from(e).into()),
    }
}
