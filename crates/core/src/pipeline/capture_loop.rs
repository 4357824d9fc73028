use std::thread::{self, JoinHandle};

use crossbeam_channel::{Sender, TrySendError};

use crate::pipeline::annotate_frame_use_case::AnnotateFrameUseCase;
use crate::session::running_state::RunningState;
use crate::session::shared_camera::SharedCamera;
use crate::shared::display_image::DisplayImage;

/// Background frame pump: read → detect/outline → convert → publish.
///
/// Runs until the running flag clears or the UI side hangs up, then
/// releases the camera. Empty or failed reads are retried immediately.
/// Frames are published with `try_send`; when the UI is behind, the
/// newest frame is dropped instead of blocking capture. `AppController`
/// keeps its receiver for its whole life, so a disconnect only happens
/// when an owner that built the loop directly drops its receiver.
pub struct CaptureLoop {
    camera: SharedCamera,
    running: RunningState,
    annotate: AnnotateFrameUseCase,
    frames_tx: Sender<DisplayImage>,
}

impl CaptureLoop {
    pub fn new(
        camera: SharedCamera,
        running: RunningState,
        annotate: AnnotateFrameUseCase,
        frames_tx: Sender<DisplayImage>,
    ) -> Self {
        Self {
            camera,
            running,
            annotate,
            frames_tx,
        }
    }

    /// Runs the loop on a detached background thread.
    pub fn spawn(self) -> JoinHandle<()> {
        thread::spawn(move || self.run())
    }

    pub fn run(self) {
        let mut published: usize = 0;

        while self.running.is_active() {
            let mut frame = match self.camera.read() {
                Ok(Some(frame)) if !frame.is_empty() => frame,
                Ok(_) => continue,
                Err(e) => {
                    log::debug!("Frame read failed, retrying: {e}");
                    continue;
                }
            };

            let faces = self.annotate.execute(&mut frame);
            log::trace!("Frame {}: {} face(s)", frame.index(), faces.len());

            match self.frames_tx.try_send(DisplayImage::from_frame(&frame)) {
                Ok(()) => published += 1,
                Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Disconnected(_)) => {
                    log::warn!("Display closed, stopping capture");
                    self.running.deactivate();
                    break;
                }
            }
        }

        if self.camera.release() {
            log::info!("Camera released after {published} frame(s).");
        }
    }
}
