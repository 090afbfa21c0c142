//! API module
//!
//! HTTP routes: the viewer page, health, video feed and chat WebSocket

pub mod pages;
pub mod video;

use crate::chat::handler::chat_handler;
use crate::state::AppState;
use axum::{extract::Request, middleware::Next, response::Response, routing::get, Router};
use std::sync::Arc;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Build the application router
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()`; the
/// chat handler logs the remote address.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/api/health", get(pages::health_check))
        .route("/api/snapshot", get(video::snapshot))
        .route("/video_feed", get(video::video_feed))
        .route("/ws/chat", get(chat_handler))
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    // For streams and upgrades this is time-to-headers
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = start.elapsed().as_millis(),
        "Request completed"
    );

    response
}
