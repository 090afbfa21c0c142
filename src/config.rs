//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::fmt;

/// Default Gemini API base URL
pub const DEFAULT_GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default vision-capable Gemini model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Screen capture and video stream configuration
    pub capture: CaptureConfig,
    /// Vision model configuration
    pub gemini: GeminiConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Screen capture configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureConfig {
    /// Factor applied to both screen dimensions, in (0, 1]
    pub scale_factor: f32,
    /// Frames published per second on the video feed
    pub frame_rate: u32,
    /// JPEG quality, 1-100
    pub jpeg_quality: u8,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            scale_factor: 0.5,
            frame_rate: 10,
            jpeg_quality: 80,
        }
    }
}

/// Gemini vision model configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key; `None` disables the `/describe` command
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// API base URL
    pub api_base_url: String,
    /// HTTP timeout for a single generateContent call (in seconds)
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_base_url: DEFAULT_GEMINI_API_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

// Keep the key out of logs.
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let capture_defaults = CaptureConfig::default();
        let gemini_defaults = GeminiConfig::default();

        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8000),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            capture: CaptureConfig {
                scale_factor: env::var("SCALE_FACTOR")
                    .ok()
                    .and_then(|s| s.parse::<f32>().ok())
                    .filter(|s| *s > 0.0 && *s <= 1.0)
                    .unwrap_or(capture_defaults.scale_factor),
                frame_rate: env::var("FRAME_RATE")
                    .ok()
                    .and_then(|r| r.parse::<u32>().ok())
                    .map(|r| r.max(1))
                    .unwrap_or(capture_defaults.frame_rate),
                jpeg_quality: env::var("JPEG_QUALITY")
                    .ok()
                    .and_then(|q| q.parse::<u8>().ok())
                    .map(|q| q.clamp(1, 100))
                    .unwrap_or(capture_defaults.jpeg_quality),
            },
            gemini: GeminiConfig {
                api_key: env::var("GEMINI_API_KEY")
                    .ok()
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty()),
                model: env::var("GEMINI_MODEL").unwrap_or(gemini_defaults.model),
                api_base_url: env::var("GEMINI_API_BASE_URL")
                    .unwrap_or(gemini_defaults.api_base_url),
                timeout_secs: env::var("GEMINI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(gemini_defaults.timeout_secs),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "PORT",
        "HOST",
        "SCALE_FACTOR",
        "FRAME_RATE",
        "JPEG_QUALITY",
        "GEMINI_API_KEY",
        "GEMINI_MODEL",
        "GEMINI_API_BASE_URL",
        "GEMINI_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env();
        assert_eq!(config.server_addr(), "0.0.0.0:8000");
        assert_eq!(config.capture, CaptureConfig::default());
        assert!(config.gemini.api_key.is_none());
        assert_eq!(config.gemini.model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    #[serial]
    fn test_overrides_and_clamping() {
        clear_env();
        env::set_var("PORT", "9100");
        env::set_var("SCALE_FACTOR", "2.5");
        env::set_var("FRAME_RATE", "0");
        env::set_var("JPEG_QUALITY", "0");
        env::set_var("GEMINI_API_KEY", "  ");

        let config = Config::from_env();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.capture.scale_factor, 0.5);
        assert_eq!(config.capture.frame_rate, 1);
        assert_eq!(config.capture.jpeg_quality, 1);
        assert!(config.gemini.api_key.is_none());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_api_key_is_redacted_in_debug() {
        clear_env();
        env::set_var("GEMINI_API_KEY", "super-secret");
        let config = Config::from_env();
        assert_eq!(config.gemini.api_key.as_deref(), Some("super-secret"));

        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));

        clear_env();
    }
}
