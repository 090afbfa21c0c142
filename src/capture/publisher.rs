//! Motion-JPEG frame publisher
//!
//! Produces an infinite stream of multipart chunks suitable for a
//! `multipart/x-mixed-replace` response body.

use crate::capture::encoder::encode_jpeg;
use crate::capture::error::FrameError;
use crate::capture::source::FrameSource;
use crate::config::CaptureConfig;
use async_stream::stream;
use axum::body::Bytes;
use futures_util::stream::Stream;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Multipart boundary between frames
pub const FRAME_BOUNDARY: &str = "frame";

/// Pause before retrying after a failed cycle
const RETRY_DELAY: Duration = Duration::from_millis(10);

/// Wrap JPEG bytes into one multipart part
///
/// Layout: `--frame\r\nContent-Type: image/jpeg\r\n\r\n<jpeg>\r\n`
pub fn frame_part(jpeg: &[u8]) -> Bytes {
    let header = format!("--{}\r\nContent-Type: image/jpeg\r\n\r\n", FRAME_BOUNDARY);
    let mut part = Vec::with_capacity(header.len() + jpeg.len() + 2);
    part.extend_from_slice(header.as_bytes());
    part.extend_from_slice(jpeg);
    part.extend_from_slice(b"\r\n");
    Bytes::from(part)
}

/// Create the frame stream
///
/// Each cycle captures and encodes on the blocking pool, so a slow screenshot
/// does not stall other tasks. A failed cycle is skipped; the stream only
/// ends when the consumer drops it or the server shuts down.
///
/// # Arguments
/// * `source` - Frame source to capture from
/// * `config` - Frame rate and JPEG quality
/// * `shutdown` - Becomes `true` when the server is shutting down
///
/// # Returns
/// * `impl Stream<Item = Result<Bytes, std::io::Error>>` - Chunk stream
pub fn frame_stream(
    source: FrameSource,
    config: CaptureConfig,
    mut shutdown: watch::Receiver<bool>,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> {
    let period = Duration::from_secs_f64(1.0 / f64::from(config.frame_rate.max(1)));
    let quality = config.jpeg_quality;

    stream! {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut frames: u64 = 0;
        let mut watching = true;

        loop {
            if *shutdown.borrow() {
                info!(frames, "Video feed closed for shutdown");
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed(), if watching => {
                    // Sender dropped: shutdown can no longer be signalled
                    if changed.is_err() {
                        watching = false;
                    }
                    continue;
                }
            }

            match next_frame(source.clone(), quality).await {
                Ok(jpeg) => {
                    frames += 1;
                    if frames % 100 == 0 {
                        debug!(frames, "Video feed still streaming");
                    }
                    yield Ok(frame_part(&jpeg));
                }
                Err(e) => {
                    warn!(error = %e, "Skipping video frame");
                    sleep(RETRY_DELAY).await;
                }
            }
        }
    }
}

async fn next_frame(source: FrameSource, quality: u8) -> Result<Vec<u8>, FrameError> {
    tokio::task::spawn_blocking(move || encode_jpeg(&source.capture(), quality))
        .await
        .map_err(|e| FrameError::TaskFailed(e.to_string()))?
}
