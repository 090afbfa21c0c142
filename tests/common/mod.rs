//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use image::{DynamicImage, Rgba, RgbaImage};
use screen_share_chat::api::router;
use screen_share_chat::capture::{FrameSource, ScreenGrabber};
use screen_share_chat::config::CaptureConfig;
use screen_share_chat::describer::{AiDescriber, VisionModel};
use screen_share_chat::gemini::GeminiError;
use screen_share_chat::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Screen that is always a 400x300 solid image
pub struct FakeScreen;

impl ScreenGrabber for FakeScreen {
    fn grab(&self) -> anyhow::Result<DynamicImage> {
        Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            400,
            300,
            Rgba([0, 120, 255, 255]),
        )))
    }
}

/// Vision model with a fixed answer
pub struct FakeVision(pub &'static str);

#[async_trait]
impl VisionModel for FakeVision {
    async fn describe_image(&self, _prompt: &str, _jpeg: &[u8]) -> Result<Option<String>, GeminiError> {
        Ok(Some(self.0.to_string()))
    }
}

/// Build state over the fake screen, optionally with a fake model
pub fn test_state(answer: Option<&'static str>) -> Arc<AppState> {
    let frames = FrameSource::new(Arc::new(FakeScreen), 0.5);
    let model = answer.map(|a| Arc::new(FakeVision(a)) as Arc<dyn VisionModel>);
    let capture = CaptureConfig {
        frame_rate: 20,
        ..CaptureConfig::default()
    };
    Arc::new(AppState::new(
        AiDescriber::new(model, frames.clone()),
        frames,
        capture,
    ))
}

/// Serve the router on an ephemeral local port
pub async fn spawn_server(state: Arc<AppState>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state);
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    addr
}

/// Wait until the registry holds exactly `count` connections
pub async fn wait_for_connections(state: &AppState, count: usize) {
    for _ in 0..200 {
        if state.registry.len() == count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "expected {} connections, registry has {}",
        count,
        state.registry.len()
    );
}
