//! Chat wire messages
//!
//! Inbound and outbound frames share one JSON shape:
//! `{"senderId": string, "message": string}`.

use crate::chat::error::ChatError;
use serde::{Deserialize, Serialize};

/// Sender id used for server notices
pub const SYSTEM_SENDER: &str = "System";

/// Sender id used for AI answers
pub const AI_SENDER: &str = "AI Assistant";

/// Sender id when the client did not supply one
pub const ANONYMOUS_SENDER: &str = "anonymous";

/// Chat command that triggers a screen description
pub const DESCRIBE_COMMAND: &str = "/describe";

/// Notice broadcast while the description is generated
pub const GENERATING_NOTICE: &str = "AI is generating screen description, please wait...";

/// Error sent back to a client whose message could not be parsed
pub const INVALID_FORMAT_NOTICE: &str = "Error: Invalid message format.";

/// Parsed inbound message
///
/// Missing fields default; anything that is not a JSON object with string
/// fields is rejected.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Message text
    #[serde(default)]
    pub message: String,
    /// Client-chosen sender id
    #[serde(rename = "senderId", default = "default_sender")]
    pub sender_id: String,
}

fn default_sender() -> String {
    ANONYMOUS_SENDER.to_string()
}

impl IncomingMessage {
    /// Parse a text frame
    pub fn parse(text: &str) -> Result<Self, ChatError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Whether this is the `/describe` command (trimmed, case-insensitive)
    pub fn is_describe_command(&self) -> bool {
        self.message.trim().eq_ignore_ascii_case(DESCRIBE_COMMAND)
    }
}

/// Outbound message produced by the server
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Sender id
    #[serde(rename = "senderId")]
    pub sender_id: String,
    /// Message text
    pub message: String,
}

impl ChatMessage {
    /// Message from the `System` sender
    pub fn system(message: impl Into<String>) -> Self {
        Self {
            sender_id: SYSTEM_SENDER.to_string(),
            message: message.into(),
        }
    }

    /// Message from the `AI Assistant` sender
    pub fn ai(message: impl Into<String>) -> Self {
        Self {
            sender_id: AI_SENDER.to_string(),
            message: message.into(),
        }
    }

    /// Serialize to a JSON text frame
    pub fn to_json(&self) -> Result<String, ChatError> {
        serde_json::to_string(self).map_err(|e| ChatError::Encode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_message() {
        let msg = IncomingMessage::parse(r#"{"message":"hi","senderId":"alice"}"#).unwrap();
        assert_eq!(msg.message, "hi");
        assert_eq!(msg.sender_id, "alice");
    }

    #[test]
    fn test_parse_defaults_missing_fields() {
        let msg = IncomingMessage::parse("{}").unwrap();
        assert_eq!(msg.message, "");
        assert_eq!(msg.sender_id, ANONYMOUS_SENDER);
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        let msg = IncomingMessage::parse(r#"{"message":"x","color":"red"}"#).unwrap();
        assert_eq!(msg.message, "x");
    }

    #[test]
    fn test_parse_rejects_invalid_payloads() {
        for bad in ["not json", "", "[1,2]", "\"hi\"", r#"{"message": 5}"#, r#"{"senderId": null}"#] {
            let err = IncomingMessage::parse(bad).unwrap_err();
            assert!(matches!(err, ChatError::InvalidMessage(_)), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_describe_command_detection() {
        for text in ["/describe", "/DESCRIBE ", "  /Describe\n"] {
            let msg = IncomingMessage {
                message: text.to_string(),
                sender_id: default_sender(),
            };
            assert!(msg.is_describe_command(), "{text:?}");
        }

        for text in ["describe", "/describe now", "/ describe"] {
            let msg = IncomingMessage {
                message: text.to_string(),
                sender_id: default_sender(),
            };
            assert!(!msg.is_describe_command(), "{text:?}");
        }
    }

    #[test]
    fn test_system_message_json() {
        let json = ChatMessage::system(INVALID_FORMAT_NOTICE).to_json().unwrap();
        assert_eq!(
            json,
            r#"{"senderId":"System","message":"Error: Invalid message format."}"#
        );
    }
}
