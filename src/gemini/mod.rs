//! Gemini vision API
//!
//! Typed request/response structs and a direct HTTP client for
//! `models/{model}:generateContent` with inline image data.

pub mod client;
pub mod error;
pub mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
