//! Gemini API request and response types
//!
//! Structs that mirror the Gemini `generateContent` JSON format.

use serde::{Deserialize, Serialize};

/// Request body for `generateContent`
#[derive(Serialize, Debug)]
pub struct GenerateContentRequest {
    /// List of content items to send
    pub contents: Vec<RequestContent>,
}

impl GenerateContentRequest {
    /// Single-turn request carrying a text prompt followed by one inline image
    pub fn prompt_with_image(prompt: &str, mime_type: &str, base64_data: String) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Text {
                        text: prompt.to_string(),
                    },
                    RequestPart::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: base64_data,
                        },
                    },
                ],
            }],
        }
    }
}

/// Content structure for requests
#[derive(Serialize, Debug)]
pub struct RequestContent {
    /// List of content parts
    pub parts: Vec<RequestPart>,
}

/// A single request part: either text or inline binary data
#[derive(Serialize, Debug)]
#[serde(untagged)]
pub enum RequestPart {
    /// Text prompt
    Text {
        /// The text content
        text: String,
    },
    /// Inline base64 payload
    InlineData {
        /// The blob
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

/// Base64-encoded blob with its MIME type
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type, e.g. `image/jpeg`
    pub mime_type: String,
    /// Base64 (standard alphabet) payload
    pub data: String,
}

/// Top-level `generateContent` response
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate responses from the model
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Feedback about the prompt (e.g., if it was blocked)
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// First non-empty text across all candidates and their parts
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .find(|text| !text.trim().is_empty())
    }

    /// Block reason, if the API refused the prompt
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}

/// A single candidate response from the model
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Candidate content; absent when generation was stopped early
    #[serde(default)]
    pub content: Option<Content>,
    /// Why the model stopped generating
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Content of a candidate
#[derive(Deserialize, Debug)]
pub struct Content {
    /// Content parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single part of response content
#[derive(Deserialize, Debug)]
pub struct Part {
    /// Text, when this is a text part
    #[serde(default)]
    pub text: Option<String>,
}

/// Feedback about the prompt
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Reason the prompt was blocked
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = GenerateContentRequest::prompt_with_image("Describe", "image/jpeg", "AAAA".into());
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["parts"][0]["text"], "Describe");
        assert_eq!(
            json["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/jpeg"
        );
        assert_eq!(json["contents"][0]["parts"][1]["inlineData"]["data"], "AAAA");
    }

    #[test]
    fn test_first_text_skips_empty_and_non_text_parts() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"inlineData": {}}, {"text": "  "}]}},
                {"content": {"parts": [{"text": "A code editor."}]}, "finishReason": "STOP"}
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.first_text(), Some("A code editor."));
    }

    #[test]
    fn test_first_text_none_without_candidates() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.first_text(), None);
        assert_eq!(response.block_reason(), None);
    }

    #[test]
    fn test_block_reason() {
        let json = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.block_reason(), Some("SAFETY"));
    }
}
