use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

use crate::capture::domain::frame_source::{CameraBackend, CaptureError};
use crate::detection::domain::face_detector::SharedDetector;
use crate::overlay::box_painter::BoxPainter;
use crate::pipeline::annotate_frame_use_case::AnnotateFrameUseCase;
use crate::pipeline::capture_loop::CaptureLoop;
use crate::session::running_state::RunningState;
use crate::session::shared_camera::SharedCamera;
use crate::shared::config::AppConfig;
use crate::shared::constants::{FRAME_CHANNEL_CAPACITY, SNAPSHOT_READ_ATTEMPTS};
use crate::shared::display_image::DisplayImage;
use crate::shared::frame::Frame;
use crate::shared::notice::Notice;
use crate::snapshot::snapshot_error::SnapshotError;
use crate::snapshot::snapshot_request::{LabeledSnapshot, SnapshotOutcome, SnapshotRequest};
use crate::snapshot::snapshot_writer::SnapshotWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    /// Stop the loop; the caller closes the window.
    Quit,
    /// Stop the loop and release the device; the window stays open.
    CloseFeed,
}

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Camera is already running.")]
    AlreadyRunning,
    #[error("Camera is not running.")]
    NotRunning,
    #[error("Camera must be running to take snapshot.")]
    CameraRequired,
    #[error(transparent)]
    CameraOpen(#[from] CaptureError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl ControllerError {
    pub fn notice(&self) -> Notice {
        match self {
            Self::AlreadyRunning | Self::NotRunning => Notice::info("Info", self.to_string()),
            Self::CameraRequired => Notice::warning("Warning", self.to_string()),
            Self::CameraOpen(e) => Notice::error(format!("Camera failed to open.\n{e}")),
            Self::Snapshot(e) => e.notice(),
        }
    }
}

/// Owns the camera lifecycle and exposes the user actions.
///
/// All methods run on the UI thread. The only other thread is the capture
/// loop, which shares the running flag and the camera handle.
pub struct AppController {
    config: AppConfig,
    backend: Box<dyn CameraBackend>,
    detector: SharedDetector,
    painter: BoxPainter,
    snapshots: SnapshotWriter,
    running: RunningState,
    camera: SharedCamera,
    frames_tx: Sender<DisplayImage>,
    frames_rx: Receiver<DisplayImage>,
    loop_handle: Option<JoinHandle<()>>,
}

impl AppController {
    pub fn new(
        config: AppConfig,
        backend: Box<dyn CameraBackend>,
        detector: SharedDetector,
        snapshots: SnapshotWriter,
    ) -> Self {
        let (frames_tx, frames_rx) = crossbeam_channel::bounded(FRAME_CHANNEL_CAPACITY);
        Self {
            config,
            backend,
            detector,
            painter: BoxPainter::default(),
            snapshots,
            running: RunningState::new(),
            camera: SharedCamera::new(),
            frames_tx,
            frames_rx,
            loop_handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_active()
    }

    /// Annotated frames published by the capture loop, for the UI to drain.
    pub fn frames(&self) -> Receiver<DisplayImage> {
        self.frames_rx.clone()
    }

    pub fn start(&mut self) -> Result<(), ControllerError> {
        if self.running.is_active() {
            log::info!("Camera is already running.");
            return Err(ControllerError::AlreadyRunning);
        }

        // A loop stopped by the previous Stop may still be finishing its last
        // iteration; it must release its handle before a new one is opened.
        if let Some(previous) = self.loop_handle.take() {
            if previous.join().is_err() {
                log::error!("Previous capture loop panicked");
            }
        }
        // Frames the old loop sent after the last stop must not reach the new session.
        while self.frames_rx.try_recv().is_ok() {}

        log::info!("Attempting to start camera feed...");
        self.running.activate();

        let source = match self.backend.open(self.config.device_index) {
            Ok(source) => source,
            Err(e) => {
                self.running.deactivate();
                log::error!("Camera failed to open: {e}");
                return Err(e.into());
            }
        };
        self.camera.install(source);
        log::info!("Camera feed is now open.");

        let capture = CaptureLoop::new(
            self.camera.clone(),
            self.running.clone(),
            AnnotateFrameUseCase::new(self.detector.clone(), self.painter.clone()),
            self.frames_tx.clone(),
        );
        self.loop_handle = Some(capture.spawn());
        log::info!("Camera thread is now active.");
        Ok(())
    }

    pub fn stop(&mut self, mode: StopMode) -> Result<(), ControllerError> {
        match mode {
            StopMode::Quit => {
                // The loop releases the device on its way out; nothing waits for it.
                self.running.deactivate();
                log::info!("Camera feed stopped.");
                Ok(())
            }
            StopMode::CloseFeed => {
                if !self.running.is_active() {
                    log::info!("Camera is not running.");
                    return Err(ControllerError::NotRunning);
                }
                log::info!("Attempting to stop camera feed...");
                self.running.deactivate();
                if self.camera.release() {
                    log::info!("Camera released.");
                }
                while self.frames_rx.try_recv().is_ok() {}
                log::info!("Camera feed stopped and panel cleared.");
                Ok(())
            }
        }
    }

    /// Grabs the frame a snapshot will be made of. Reads through the same
    /// handle as the capture loop; no device is opened here.
    pub fn begin_snapshot(&self) -> Result<SnapshotRequest, ControllerError> {
        if !self.running.is_active() {
            log::info!("Camera must be running to take snapshot.");
            return Err(ControllerError::CameraRequired);
        }
        let frame = self.read_snapshot_frame()?;
        Ok(SnapshotRequest::new(frame))
    }

    /// Finishes a snapshot once the user has answered the confirmation.
    pub fn resolve_snapshot(
        &self,
        labeled: LabeledSnapshot,
        confirmed: bool,
    ) -> Result<SnapshotOutcome, ControllerError> {
        Ok(labeled.resolve(confirmed, &self.snapshots)?)
    }

    fn read_snapshot_frame(&self) -> Result<Frame, SnapshotError> {
        for _ in 0..SNAPSHOT_READ_ATTEMPTS {
            match self.camera.read() {
                Ok(Some(frame)) if frame.is_empty() => {
                    return Err(SnapshotError::CaptureFailed("empty frame".into()))
                }
                Ok(Some(frame)) => return Ok(frame),
                Ok(None) => continue,
                Err(e) => return Err(SnapshotError::CaptureFailed(e.to_string())),
            }
        }
        Err(SnapshotError::CaptureFailed("no frame available".into()))
    }
}

impl Drop for AppController {
    fn drop(&mut self) {
        self.running.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use crate::capture::domain::frame_source::FrameSource;
    use crate::detection::domain::face_detector::{share, FaceDetector};
    use crate::shared::notice::NoticeLevel;
    use crate::shared::region::Region;
    use crate::video::infrastructure::image_file_writer::ImageFileWriter;

    #[derive(Clone, Default)]
    struct Counters {
        opens: Arc<AtomicUsize>,
        reads: Arc<AtomicUsize>,
        releases: Arc<AtomicUsize>,
        fail_open: Arc<AtomicBool>,
        empty_frames: Arc<AtomicBool>,
    }

    struct StubSource {
        counters: Counters,
    }

    impl FrameSource for StubSource {
        fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
            let n = self.counters.reads.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(1));
            if self.counters.empty_frames.load(Ordering::SeqCst) {
                return Ok(Some(Frame::new(Vec::new(), 0, 0, 3, n)));
            }
            Ok(Some(Frame::new(vec![0; 8 * 6 * 3], 8, 6, 3, n)))
        }

        fn release(&mut self) {
            self.counters.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct StubBackend {
        counters: Counters,
    }

    impl CameraBackend for StubBackend {
        fn open(&self, device_index: u32) -> Result<Box<dyn FrameSource>, CaptureError> {
            if self.counters.fail_open.load(Ordering::SeqCst) {
                return Err(CaptureError::Open {
                    index: device_index,
                    reason: "no such device".into(),
                });
            }
            self.counters.opens.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(StubSource {
                counters: self.counters.clone(),
            }))
        }
    }

    struct WholeFrameDetector;

    impl FaceDetector for WholeFrameDetector {
        fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            Ok(vec![Region::new(
                0,
                0,
                frame.width() as i32,
                frame.height() as i32,
            )])
        }
    }

    fn controller(base: &Path) -> (AppController, Counters) {
        let counters = Counters::default();
        let snapshots =
            SnapshotWriter::with_clock(base, Box::new(ImageFileWriter::new()), Box::new(|| 1_000));
        let controller = AppController::new(
            AppConfig::default(),
            Box::new(StubBackend {
                counters: counters.clone(),
            }),
            share(WholeFrameDetector),
            snapshots,
        );
        (controller, counters)
    }

    fn join_loop(controller: &mut AppController) {
        if let Some(handle) = controller.loop_handle.take() {
            handle.join().unwrap();
        }
    }

    fn snapshots_base(tmp: &tempfile::TempDir) -> PathBuf {
        tmp.path().join("snapshots")
    }

    #[test]
    fn test_running_flag_follows_start_and_stop() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut c, _) = controller(&snapshots_base(&tmp));

        assert!(!c.is_running());
        c.start().unwrap();
        assert!(c.is_running());
        c.stop(StopMode::CloseFeed).unwrap();
        assert!(!c.is_running());
        c.start().unwrap();
        assert!(c.is_running());
        c.stop(StopMode::Quit).unwrap();
        assert!(!c.is_running());
        join_loop(&mut c);
    }

    #[test]
    fn test_start_twice_is_a_notice() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut c, counters) = controller(&snapshots_base(&tmp));

        c.start().unwrap();
        let err = c.start().unwrap_err();

        assert!(matches!(err, ControllerError::AlreadyRunning));
        assert_eq!(err.notice().level, NoticeLevel::Info);
        assert_eq!(counters.opens.load(Ordering::SeqCst), 1);
        assert!(c.is_running());
        c.stop(StopMode::Quit).unwrap();
        join_loop(&mut c);
    }

    #[test]
    fn test_open_failure_is_one_error_and_retryable() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut c, counters) = controller(&snapshots_base(&tmp));
        counters.fail_open.store(true, Ordering::SeqCst);

        let err = c.start().unwrap_err();

        assert!(matches!(err, ControllerError::CameraOpen(_)));
        assert_eq!(err.notice().level, NoticeLevel::Error);
        assert!(!c.is_running());
        assert!(c.loop_handle.is_none());

        counters.fail_open.store(false, Ordering::SeqCst);
        c.start().unwrap();
        assert!(c.is_running());
        c.stop(StopMode::Quit).unwrap();
        join_loop(&mut c);
    }

    #[test]
    fn test_stop_when_stopped_is_a_notice() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut c, counters) = controller(&snapshots_base(&tmp));

        let err = c.stop(StopMode::CloseFeed).unwrap_err();

        assert!(matches!(err, ControllerError::NotRunning));
        assert_eq!(counters.releases.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_close_feed_releases_device_once() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut c, counters) = controller(&snapshots_base(&tmp));

        c.start().unwrap();
        thread::sleep(Duration::from_millis(10));
        c.stop(StopMode::CloseFeed).unwrap();
        join_loop(&mut c);

        assert_eq!(counters.releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_quit_lets_loop_release_device_once() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut c, counters) = controller(&snapshots_base(&tmp));

        c.start().unwrap();
        c.stop(StopMode::Quit).unwrap();
        join_loop(&mut c);

        assert_eq!(counters.releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_restart_releases_previous_handle_first() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut c, counters) = controller(&snapshots_base(&tmp));

        c.start().unwrap();
        c.stop(StopMode::Quit).unwrap();
        c.start().unwrap();

        assert_eq!(counters.opens.load(Ordering::SeqCst), 2);
        assert_eq!(counters.releases.load(Ordering::SeqCst), 1);
        c.stop(StopMode::CloseFeed).unwrap();
        join_loop(&mut c);
        assert_eq!(counters.releases.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_frames_reach_the_ui_with_outlines() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut c, _) = controller(&snapshots_base(&tmp));
        let frames = c.frames();

        c.start().unwrap();
        let image = frames.recv_timeout(Duration::from_secs(2)).unwrap();
        c.stop(StopMode::Quit).unwrap();
        join_loop(&mut c);

        assert_eq!((image.width(), image.height()), (8, 6));
        assert_eq!(&image.rgba()[0..4], &[0, 255, 0, 255]);
    }

    #[test]
    fn test_restart_discards_frames_from_previous_session() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut c, _) = controller(&snapshots_base(&tmp));
        let frames = c.frames();

        c.start().unwrap();
        c.stop(StopMode::CloseFeed).unwrap();
        // A frame the old loop published after the stop drained the channel.
        let stale = DisplayImage::from_frame(&Frame::new(vec![9; 3], 1, 1, 3, 0));
        c.frames_tx.try_send(stale).unwrap();

        c.start().unwrap();
        let first = frames.recv_timeout(Duration::from_secs(2)).unwrap();
        c.stop(StopMode::Quit).unwrap();
        join_loop(&mut c);

        assert_eq!((first.width(), first.height()), (8, 6));
    }

    #[test]
    fn test_snapshot_while_stopped_does_no_io() {
        let tmp = tempfile::tempdir().unwrap();
        let base = snapshots_base(&tmp);
        let (c, counters) = controller(&base);

        let err = c.begin_snapshot().unwrap_err();

        assert!(matches!(err, ControllerError::CameraRequired));
        assert_eq!(counters.opens.load(Ordering::SeqCst), 0);
        assert_eq!(counters.reads.load(Ordering::SeqCst), 0);
        assert!(!base.exists());
    }

    #[test]
    fn test_blank_label_creates_no_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let base = snapshots_base(&tmp);
        let (mut c, _) = controller(&base);
        c.start().unwrap();

        let request = c.begin_snapshot().unwrap();
        let err = ControllerError::from(request.with_label(Some("  ")).unwrap_err());

        assert_eq!(err.notice().message, "Snapshot person must have a name.");
        assert!(!base.exists());
        c.stop(StopMode::Quit).unwrap();
        join_loop(&mut c);
    }

    #[test]
    fn test_declined_snapshot_leaves_directory_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        let base = snapshots_base(&tmp);
        let (mut c, _) = controller(&base);
        c.start().unwrap();

        let labeled = c.begin_snapshot().unwrap().with_label(Some("alice")).unwrap();
        let outcome = c.resolve_snapshot(labeled, false).unwrap();

        assert_eq!(outcome, SnapshotOutcome::Declined);
        assert!(!base.exists());
        c.stop(StopMode::Quit).unwrap();
        join_loop(&mut c);
    }

    #[test]
    fn test_two_snapshots_in_one_millisecond_are_distinct() {
        let tmp = tempfile::tempdir().unwrap();
        let base = snapshots_base(&tmp);
        let (mut c, counters) = controller(&base);
        c.start().unwrap();

        let mut saved = Vec::new();
        for _ in 0..2 {
            let labeled = c.begin_snapshot().unwrap().with_label(Some("alice")).unwrap();
            match c.resolve_snapshot(labeled, true).unwrap() {
                SnapshotOutcome::Saved(path) => saved.push(path),
                SnapshotOutcome::Declined => panic!("confirmed snapshot was declined"),
            }
        }
        c.stop(StopMode::Quit).unwrap();
        join_loop(&mut c);

        assert_ne!(saved[0], saved[1]);
        assert!(saved.iter().all(|p| p.starts_with(base.join("alice")) && p.is_file()));
        assert_eq!(counters.opens.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_frame_fails_snapshot_without_files() {
        let tmp = tempfile::tempdir().unwrap();
        let base = snapshots_base(&tmp);
        let (mut c, counters) = controller(&base);
        counters.empty_frames.store(true, Ordering::SeqCst);
        c.start().unwrap();

        let err = c.begin_snapshot().unwrap_err();

        assert_eq!(err.notice().message, "Failed to capture frame");
        assert!(!base.exists());
        c.stop(StopMode::Quit).unwrap();
        join_loop(&mut c);
    }
}
