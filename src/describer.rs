//! AI screen describer
//!
//! Captures a fresh frame and asks a vision model for a one-sentence
//! description. Every outcome, including failures, is a human-readable
//! string suitable for posting into the chat.

use crate::capture::{encode_jpeg, FrameSource};
use crate::gemini::{GeminiClient, GeminiError};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

/// Instruction sent alongside the screenshot
pub const DESCRIBE_PROMPT: &str =
    "Describe what you see on this screen in a single, concise sentence.";

/// Returned when no vision model was configured at startup
pub const UNAVAILABLE_MESSAGE: &str = "AI description service is currently unavailable.";

/// Returned when the model answered without any text
pub const NO_DESCRIPTION_MESSAGE: &str = "AI could not generate a description.";

/// JPEG quality for frames sent to the model
const DESCRIBE_JPEG_QUALITY: u8 = 90;

/// A model that can answer a prompt about a JPEG image
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Return the first non-empty text answer, or `None` if there was none
    async fn describe_image(&self, prompt: &str, jpeg: &[u8]) -> Result<Option<String>, GeminiError>;
}

#[async_trait]
impl VisionModel for GeminiClient {
    async fn describe_image(&self, prompt: &str, jpeg: &[u8]) -> Result<Option<String>, GeminiError> {
        self.generate_with_image(prompt, jpeg).await
    }
}

/// Describes the current screen through an optional vision model
#[derive(Clone)]
pub struct AiDescriber {
    model: Option<Arc<dyn VisionModel>>,
    source: FrameSource,
}

impl AiDescriber {
    /// Create a describer
    ///
    /// # Arguments
    /// * `model` - Vision model, or `None` if the AI feature is disabled
    /// * `source` - Frame source used for the fresh capture
    pub fn new(model: Option<Arc<dyn VisionModel>>, source: FrameSource) -> Self {
        Self { model, source }
    }

    /// Whether a vision model is configured
    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    /// Describe the current screen in one sentence
    ///
    /// Never fails; errors are folded into the returned text.
    pub async fn describe(&self) -> String {
        let Some(model) = &self.model else {
            return UNAVAILABLE_MESSAGE.to_string();
        };

        let source = self.source.clone();
        let jpeg = match tokio::task::spawn_blocking(move || {
            encode_jpeg(&source.capture(), DESCRIBE_JPEG_QUALITY)
        })
        .await
        {
            Ok(Ok(jpeg)) => jpeg,
            Ok(Err(e)) => {
                error!(error = %e, "Failed to encode frame for AI description");
                return format!("Error communicating with AI: {}", e);
            }
            Err(e) => {
                error!(error = %e, "Capture task for AI description failed");
                return format!("Error communicating with AI: {}", e);
            }
        };

        match model.describe_image(DESCRIBE_PROMPT, &jpeg).await {
            Ok(Some(text)) => {
                info!(len = text.len(), "AI description generated");
                text
            }
            Ok(None) => NO_DESCRIPTION_MESSAGE.to_string(),
            Err(e) => {
                error!(error = %e, "Error getting AI screen description");
                format!("Error communicating with AI: {}", e)
            }
        }
    }
}
