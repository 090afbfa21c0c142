//! Screen capture module
//!
//! Grabs the primary display, downsamples it, encodes it as JPEG and
//! publishes it as a motion-JPEG stream.

pub mod encoder;
pub mod error;
pub mod publisher;
pub mod source;

pub use encoder::encode_jpeg;
pub use error::FrameError;
pub use publisher::{frame_part, frame_stream, FRAME_BOUNDARY};
pub use source::{FrameSource, ScreenGrabber, XcapGrabber};
