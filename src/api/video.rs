//! Video endpoints
//!
//! `/video_feed` streams motion-JPEG until the client disconnects;
//! `/api/snapshot` returns a single frame.

use crate::capture::{encode_jpeg, frame_stream, FrameError, FRAME_BOUNDARY};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
};
use std::sync::Arc;
use tracing::info;

/// Stream the screen as `multipart/x-mixed-replace`
///
/// # Returns
/// * `Result<Response, AppError>` - Streaming HTTP response or error
pub async fn video_feed(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    info!(
        frame_rate = state.capture.frame_rate,
        scale_factor = state.capture.scale_factor,
        "Video feed client connected"
    );

    let stream = frame_stream(
        state.frames.clone(),
        state.capture,
        state.shutdown_receiver(),
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/x-mixed-replace; boundary={}", FRAME_BOUNDARY),
        )
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build video response: {}", e)))
}

/// Capture and return one JPEG frame
pub async fn snapshot(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let frames = state.frames.clone();
    let quality = state.capture.jpeg_quality;
    let jpeg = tokio::task::spawn_blocking(move || encode_jpeg(&frames.capture(), quality))
        .await
        .map_err(|e| FrameError::TaskFailed(e.to_string()))??;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/jpeg")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from(jpeg))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build snapshot response: {}", e)))
}
