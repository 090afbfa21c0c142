//! Screen Share Chat Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod capture;
pub mod chat;
pub mod config;
pub mod describer;
pub mod error;
pub mod gemini;
/// Application state management
///
/// Connection registry, describer and video settings shared by handlers.
pub mod state;
