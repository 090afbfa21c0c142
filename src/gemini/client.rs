//! Gemini API client
//!
//! Direct HTTP client for calling the Gemini vision API with an inline
//! JPEG image.

use crate::config::GeminiConfig;
use crate::gemini::error::GeminiError;
use crate::gemini::types::{GenerateContentRequest, GenerateContentResponse};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::time::Duration;

/// MIME type of the images we send
const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for one Gemini model
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Build a client from configuration
    ///
    /// # Errors
    /// * `GeminiError::MissingApiKey` if no API key is configured
    /// * `GeminiError::Client` if the HTTP client cannot be built
    pub fn from_config(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(GeminiError::MissingApiKey)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| GeminiError::Client(e.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.to_string(),
            model: config.model.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Model name this client talks to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a prompt plus one JPEG image
    ///
    /// # Arguments
    /// * `prompt` - Instruction text
    /// * `jpeg` - Encoded JPEG bytes
    ///
    /// # Returns
    /// * `Ok(Some(String))` - First non-empty text in the response
    /// * `Ok(None)` - The response carried no text
    /// * `Err(GeminiError)` - If the call failed or the response was invalid
    pub async fn generate_with_image(
        &self,
        prompt: &str,
        jpeg: &[u8],
    ) -> Result<Option<String>, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request_body =
            GenerateContentRequest::prompt_with_image(prompt, IMAGE_MIME_TYPE, BASE64.encode(jpeg));

        tracing::debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            image_bytes = jpeg.len(),
            "Calling Gemini API"
        );

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status_code,
                error_body = %error_body,
                "Gemini API returned error status"
            );

            if status_code == 429 {
                return Err(GeminiError::RateLimited(error_body));
            }
            return Err(GeminiError::Status {
                status: status_code,
                body: error_body,
            });
        }

        let response_body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&response_body)
            .map_err(|e| GeminiError::Parse(format!("{} - Response body: {}", e, response_body)))?;

        if let Some(reason) = parsed.block_reason() {
            return Err(GeminiError::Blocked(reason.to_string()));
        }

        let text = parsed.first_text().map(str::to_string);
        tracing::debug!(
            has_text = text.is_some(),
            "Received response from Gemini API"
        );
        Ok(text)
    }
}
