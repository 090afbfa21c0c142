// Application state
// Connection registry, AI describer and video settings shared by all handlers

use crate::capture::FrameSource;
use crate::chat::ConnectionRegistry;
use crate::config::{CaptureConfig, Config};
use crate::describer::{AiDescriber, VisionModel};
use crate::gemini::{GeminiClient, GeminiError};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Main application state
pub struct AppState {
    /// Open chat connections
    pub registry: ConnectionRegistry,
    /// `/describe` backend
    pub describer: AiDescriber,
    /// Frame source for the video feed
    pub frames: FrameSource,
    /// Video feed settings
    pub capture: CaptureConfig,
    /// Flips to `true` when the server starts shutting down
    shutdown: watch::Sender<bool>,
}

impl AppState {
    /// Create state with an empty registry
    pub fn new(describer: AiDescriber, frames: FrameSource, capture: CaptureConfig) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            describer,
            frames,
            capture,
            shutdown: watch::channel(false).0,
        }
    }

    /// Build state from configuration, capturing the real screen
    ///
    /// A missing or unusable API key disables `/describe` but nothing else.
    pub fn from_config(config: &Config) -> Self {
        let frames = FrameSource::screen(config.capture.scale_factor);
        let model = vision_model(config);
        Self::new(
            AiDescriber::new(model, frames.clone()),
            frames,
            config.capture,
        )
    }

    /// Receiver that observes the shutdown flag
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    /// Tell long-lived streams to finish
    pub fn begin_shutdown(&self) {
        self.shutdown.send_replace(true);
    }
}

fn vision_model(config: &Config) -> Option<Arc<dyn VisionModel>> {
    match GeminiClient::from_config(&config.gemini) {
        Ok(client) => {
            info!(model = %client.model(), "Gemini model initialized successfully");
            Some(Arc::new(client))
        }
        Err(GeminiError::MissingApiKey) => {
            warn!("GEMINI_API_KEY not set. AI description feature will be disabled.");
            None
        }
        Err(e) => {
            error!(error = %e, "Error initializing Gemini model");
            None
        }
    }
}
