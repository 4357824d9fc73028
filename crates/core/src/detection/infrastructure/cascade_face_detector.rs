use std::path::Path;

use opencv::core::{Mat, Rect, Scalar, Size, Vector, CV_8UC1};
use opencv::imgproc;
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;

use crate::detection::domain::face_detector::{DetectorLoadError, FaceDetector};
use crate::shared::config::CascadeParams;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Haar-cascade face detector backed by OpenCV's `CascadeClassifier`.
///
/// Frames are converted to equalised grayscale before the multi-scale search.
pub struct CascadeFaceDetector {
    classifier: CascadeClassifier,
    params: CascadeParams,
    gray: Mat,
    equalized: Mat,
}

impl CascadeFaceDetector {
    /// Loads a cascade XML model. An unreadable or empty model is an error.
    pub fn load(path: &Path, params: CascadeParams) -> Result<Self, DetectorLoadError> {
        if !path.is_file() {
            return Err(DetectorLoadError::Missing(path.to_path_buf()));
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| DetectorLoadError::InvalidPath(path.to_path_buf()))?;

        let backend_err = |e: opencv::Error| DetectorLoadError::Backend {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let classifier = CascadeClassifier::new(path_str).map_err(backend_err)?;
        if classifier.empty().map_err(backend_err)? {
            return Err(DetectorLoadError::EmptyModel(path.to_path_buf()));
        }

        log::info!("Cascade model successfully loaded from {}", path.display());
        Ok(Self {
            classifier,
            params,
            gray: Mat::default(),
            equalized: Mat::default(),
        })
    }

    fn fill_gray(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let luma = grayscale_bytes(frame)?;
        let rows = i32::try_from(frame.height())?;
        let cols = i32::try_from(frame.width())?;
        if self.gray.rows() != rows || self.gray.cols() != cols {
            self.gray = Mat::new_rows_cols_with_default(rows, cols, CV_8UC1, Scalar::all(0.0))?;
        }
        self.gray.data_bytes_mut()?.copy_from_slice(&luma);
        Ok(())
    }
}

impl FaceDetector for CascadeFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        if frame.is_empty() {
            return Ok(Vec::new());
        }

        self.fill_gray(frame)?;
        imgproc::equalize_hist(&self.gray, &mut self.equalized)?;

        let mut faces = Vector::<Rect>::new();
        self.classifier.detect_multi_scale(
            &self.equalized,
            &mut faces,
            self.params.scale_factor,
            self.params.min_neighbors,
            0,
            Size::new(self.params.min_size, self.params.min_size),
            Size::default(),
        )?;

        Ok(faces
            .iter()
            .map(|r| Region::new(r.x, r.y, r.width, r.height))
            .collect())
    }
}

/// Version string of the linked OpenCV build, for the startup log.
pub fn backend_version() -> String {
    opencv::core::get_version_string().unwrap_or_else(|_| "unknown".to_string())
}

/// Converts a frame to 8-bit luma, one byte per pixel.
fn grayscale_bytes(frame: &Frame) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    match frame.channels() {
        1 => Ok(frame.data().to_vec()),
        3 => {
            let rgb = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
                .ok_or("Failed to create image from frame data")?;
            Ok(image::imageops::grayscale(&rgb).into_raw())
        }
        n => Err(format!("unsupported channel count for detection: {n}").into()),
    }
}
