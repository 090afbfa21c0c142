//! JPEG frame encoder

use crate::capture::error::FrameError;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

/// Encode an image as JPEG
///
/// Alpha is dropped before encoding since JPEG has no alpha channel.
///
/// # Arguments
/// * `image` - Image to encode
/// * `quality` - JPEG quality, 1-100
///
/// # Returns
/// * `Ok(Vec<u8>)` - Encoded JPEG bytes
/// * `Err(FrameError)` - If the image is empty or encoding failed
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, FrameError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(FrameError::EmptyImage(image.width(), image.height()));
    }

    let rgb = image.to_rgb8();
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100)).encode_image(&rgb)?;
    Ok(buffer)
}
