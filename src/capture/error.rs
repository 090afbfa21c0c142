//! Frame-specific error types

use thiserror::Error;

/// Errors that can occur while producing a frame
#[derive(Error, Debug)]
pub enum FrameError {
    /// The image has a zero dimension and cannot be encoded
    #[error("Cannot encode an empty {0}x{1} image")]
    EmptyImage(u32, u32),

    /// The JPEG encoder rejected the image
    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    /// The blocking capture task panicked or was cancelled
    #[error("Capture task failed: {0}")]
    TaskFailed(String),
}
