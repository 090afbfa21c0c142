//! Chat module
//!
//! Shared chat channel over WebSockets: wire messages, the registry of open
//! connections, and the per-connection handler.

pub mod error;
pub mod handler;
pub mod message;
pub mod registry;

pub use error::ChatError;
pub use message::{ChatMessage, IncomingMessage};
pub use registry::{Connection, ConnectionId, ConnectionRegistry, RegistrationGuard};
