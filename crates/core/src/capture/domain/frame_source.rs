use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("camera {index} failed to open: {reason}")]
    Open { index: u32, reason: String },
    #[error("no video capture input named {0} is available")]
    NoInputFormat(&'static str),
}

/// An opened camera device.
///
/// Reads are blocking and return at most one frame. `Ok(None)` means the
/// device had nothing decodable yet; callers simply try again.
pub trait FrameSource: Send {
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Closes the device. Reads after release yield `Ok(None)`.
    fn release(&mut self);
}

/// Opens camera devices by index.
pub trait CameraBackend {
    fn open(&self, device_index: u32) -> Result<Box<dyn FrameSource>, CaptureError>;
}
