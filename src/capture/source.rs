//! Frame source
//!
//! Takes a screenshot of the primary display and scales it down. Capture
//! never fails from the caller's point of view: on error a black placeholder
//! frame is returned so the video loop keeps running.

use anyhow::{bail, Context, Result};
use image::{imageops::FilterType, DynamicImage, RgbImage};
use std::sync::Arc;
use tracing::warn;

/// Edge length of the placeholder frame before scaling
const PLACEHOLDER_EDGE: f32 = 100.0;

/// A backend able to grab the full-resolution screen
pub trait ScreenGrabber: Send + Sync {
    /// Capture the primary display at native resolution
    fn grab(&self) -> Result<DynamicImage>;
}

/// Screen grabber backed by `xcap`
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapGrabber;

impl ScreenGrabber for XcapGrabber {
    fn grab(&self) -> Result<DynamicImage> {
        let monitors = xcap::Monitor::all().context("Failed to enumerate monitors")?;

        let monitor = monitors
            .iter()
            .find(|m| m.is_primary())
            .or_else(|| monitors.first())
            .context("No monitors found")?;

        let raw = monitor
            .capture_image()
            .context("Failed to capture primary display")?;

        if raw.width() == 0 || raw.height() == 0 {
            bail!("Captured empty screenshot - possible permission issue or no display");
        }

        Ok(DynamicImage::ImageRgba8(raw))
    }
}

/// Captures and downsamples screen frames
#[derive(Clone)]
pub struct FrameSource {
    grabber: Arc<dyn ScreenGrabber>,
    scale_factor: f32,
}

impl FrameSource {
    /// Create a frame source over the given grabber
    pub fn new(grabber: Arc<dyn ScreenGrabber>, scale_factor: f32) -> Self {
        Self {
            grabber,
            scale_factor,
        }
    }

    /// Frame source over the real display
    pub fn screen(scale_factor: f32) -> Self {
        Self::new(Arc::new(XcapGrabber), scale_factor)
    }

    /// Factor applied to both dimensions
    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// Capture the screen and scale it to an RGB frame, falling back to a black frame on error
    pub fn capture(&self) -> DynamicImage {
        match self.grabber.grab() {
            Ok(screenshot) => {
                let (width, height) = self.scaled(screenshot.width(), screenshot.height());
                let scaled = screenshot.resize_exact(width, height, FilterType::Lanczos3);
                DynamicImage::ImageRgb8(scaled.to_rgb8())
            }
            Err(e) => {
                warn!(error = %format!("{:#}", e), "Screen capture failed, using placeholder frame");
                self.placeholder()
            }
        }
    }

    /// Solid black frame of the scaled placeholder size
    pub fn placeholder(&self) -> DynamicImage {
        let edge = scale_dimension(PLACEHOLDER_EDGE as u32, self.scale_factor);
        DynamicImage::ImageRgb8(RgbImage::new(edge, edge))
    }

    fn scaled(&self, width: u32, height: u32) -> (u32, u32) {
        (
            scale_dimension(width, self.scale_factor),
            scale_dimension(height, self.scale_factor),
        )
    }
}

// Truncates like an integer cast, but never yields zero.
fn scale_dimension(value: u32, factor: f32) -> u32 {
    ((value as f32 * factor) as u32).max(1)
}
