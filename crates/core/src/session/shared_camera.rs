use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::capture::domain::frame_source::FrameSource;
use crate::shared::frame::Frame;

/// The single open camera handle, shared by the capture loop and snapshot reads.
///
/// Release is idempotent: whichever side releases first closes the device,
/// later calls are no-ops.
#[derive(Clone, Default)]
pub struct SharedCamera {
    slot: Arc<Mutex<Option<Box<dyn FrameSource>>>>,
}

impl SharedCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a freshly opened source. A source still held is released first,
    /// so at most one device handle is ever open.
    pub fn install(&self, source: Box<dyn FrameSource>) {
        let mut slot = self.lock();
        if let Some(mut previous) = slot.replace(source) {
            log::warn!("Replacing a camera handle that was never released");
            previous.release();
        }
    }

    /// Reads one frame. Yields `Ok(None)` when no device is open.
    pub fn read(&self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        match self.lock().as_mut() {
            Some(source) => source.read(),
            None => Ok(None),
        }
    }

    /// Closes the device if it is open. Returns whether anything was released.
    pub fn release(&self) -> bool {
        let taken = self.lock().take();
        match taken {
            Some(mut source) => {
                source.release();
                true
            }
            None => false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Box<dyn FrameSource>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
