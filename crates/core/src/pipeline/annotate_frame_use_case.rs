use std::sync::PoisonError;

use crate::detection::domain::face_detector::SharedDetector;
use crate::overlay::box_painter::BoxPainter;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Per-frame step of the live view: detect → outline.
///
/// Detector failures are logged and the frame passes through unannotated,
/// so a bad frame never interrupts the feed.
pub struct AnnotateFrameUseCase {
    detector: SharedDetector,
    painter: BoxPainter,
}

impl AnnotateFrameUseCase {
    pub fn new(detector: SharedDetector, painter: BoxPainter) -> Self {
        Self { detector, painter }
    }

    /// Outlines every detected face on `frame` and returns the detections.
    pub fn execute(&self, frame: &mut Frame) -> Vec<Region> {
        let detected = self
            .detector
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .detect(frame);

        match detected {
            Ok(regions) => {
                self.painter.paint(frame, &regions);
                regions
            }
            Err(e) => {
                log::warn!("Face detection failed on frame {}: {e}", frame.index());
                Vec::new()
            }
        }
    }
}
