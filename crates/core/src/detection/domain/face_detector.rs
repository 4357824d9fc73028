use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for face detection.
///
/// Implementations may keep scratch buffers between frames, hence `&mut self`.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>>;
}

/// A detector shared between the controller and successive capture loops.
pub type SharedDetector = Arc<Mutex<Box<dyn FaceDetector>>>;

pub fn share(detector: impl FaceDetector + 'static) -> SharedDetector {
    Arc::new(Mutex::new(Box::new(detector)))
}

#[derive(Error, Debug)]
pub enum DetectorLoadError {
    #[error("cascade model not found at {0}")]
    Missing(PathBuf),
    #[error("cascade model path {0} is not valid UTF-8")]
    InvalidPath(PathBuf),
    #[error("failed to load cascade model from {path}: {reason}")]
    Backend { path: PathBuf, reason: String },
    #[error("failed to load cascade model from path: {0} (classifier is empty)")]
    EmptyModel(PathBuf),
}
