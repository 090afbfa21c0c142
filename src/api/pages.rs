//! Viewer page and health check

use crate::state::AppState;
use axum::{extract::State, response::Html, Json};
use serde::Serialize;
use std::sync::Arc;

/// Viewer page: video feed plus chat client
const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// Health check response body
#[derive(Serialize, Debug)]
pub struct HealthResponse {
    /// Always `healthy` when the server answers
    pub status: String,
    /// Crate version
    pub version: String,
    /// Open chat connections
    pub connections: usize,
    /// Whether `/describe` is backed by a model
    pub ai_enabled: bool,
}

/// Serve the viewer page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        connections: state.registry.len(),
        ai_enabled: state.describer.is_enabled(),
    })
}
