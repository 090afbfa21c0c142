//! Gemini API error types

use thiserror::Error;

/// Errors that can occur while calling the Gemini API
#[derive(Error, Debug)]
pub enum GeminiError {
    /// No API key was configured
    #[error("API key is empty")]
    MissingApiKey,

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// The request could not be sent or the body could not be read
    #[error("Failed to send HTTP request to Gemini API: {0}")]
    Request(reqwest::Error),

    /// HTTP 429 from the API
    #[error("Gemini API rate limit exceeded (HTTP 429): {0}")]
    RateLimited(String),

    /// Any other non-success HTTP status
    #[error("Gemini API returned error status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// The response body was not the expected JSON
    #[error("Failed to parse JSON response from Gemini API: {0}")]
    Parse(String),

    /// The prompt was blocked by the API's safety filters
    #[error("Gemini API blocked the prompt: {0}")]
    Blocked(String),
}

impl From<reqwest::Error> for GeminiError {
    fn from(e: reqwest::Error) -> Self {
        // Error text is posted into the chat, so it carries no request URL.
        GeminiError::Request(e.without_url())
    }
}
