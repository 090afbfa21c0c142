//! Chat-specific error types

use crate::chat::registry::ConnectionId;
use thiserror::Error;

/// Errors that can occur while handling chat traffic
#[derive(Error, Debug)]
pub enum ChatError {
    /// Inbound text is not a valid chat message
    #[error("Invalid message format: {0}")]
    InvalidMessage(#[from] serde_json::Error),

    /// Outbound message could not be serialized
    #[error("Failed to encode message: {0}")]
    Encode(String),

    /// The connection is not registered
    #[error("Connection {0} is not registered")]
    UnknownConnection(ConnectionId),

    /// The connection's writer has gone away
    #[error("Connection {0} is closed")]
    ConnectionClosed(ConnectionId),
}

impl ChatError {
    /// Whether the error means the connection itself is unusable
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ChatError::UnknownConnection(_) | ChatError::ConnectionClosed(_)
        )
    }
}
