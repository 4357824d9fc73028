use std::path::Path;

use crate::shared::frame::Frame;

/// Encodes a single frame to an image file.
pub trait ImageWriter: Send {
    /// Writes `frame` to `path`. Fails instead of overwriting an existing
    /// file, and leaves no partial file behind on error. The parent
    /// directory must already exist.
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;
}
