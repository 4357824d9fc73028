use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use super::snapshot_error::SnapshotError;
use super::snapshot_label::SnapshotLabel;
use crate::shared::constants::{SNAPSHOT_EXTENSION, SNAPSHOT_PREFIX};
use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

pub type Clock = Box<dyn Fn() -> u64 + Send>;

/// Persists labelled snapshots as `<base>/<label>/snapshot_<millis>.png`.
///
/// Stamps are strictly increasing per writer, even when the clock repeats
/// or steps backwards, and an existing file is never replaced.
pub struct SnapshotWriter {
    base_dir: PathBuf,
    image_writer: Box<dyn ImageWriter>,
    clock: Clock,
    last_stamp: AtomicU64,
}

impl SnapshotWriter {
    pub fn new(base_dir: impl Into<PathBuf>, image_writer: Box<dyn ImageWriter>) -> Self {
        Self::with_clock(base_dir, image_writer, Box::new(unix_millis))
    }

    pub fn with_clock(
        base_dir: impl Into<PathBuf>,
        image_writer: Box<dyn ImageWriter>,
        clock: Clock,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            image_writer,
            clock,
            last_stamp: AtomicU64::new(0),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn save(&self, frame: &Frame, label: &SnapshotLabel) -> Result<PathBuf, SnapshotError> {
        let dir = self.base_dir.join(label.as_str());
        fs::create_dir_all(&dir).map_err(|source| {
            log::error!("Failed to create directory {}: {source}", dir.display());
            SnapshotError::CreateDir {
                path: dir.clone(),
                source,
            }
        })?;

        let path = loop {
            let candidate = dir.join(file_name(self.next_stamp()));
            if !candidate.exists() {
                break candidate;
            }
        };

        self.image_writer
            .write(&path, frame)
            .map_err(|e| SnapshotError::Write {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        log::info!("Snapshot saved to {}", path.display());
        Ok(path)
    }

    fn next_stamp(&self) -> u64 {
        let now = (self.clock)();
        let previous = self
            .last_stamp
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

fn file_name(stamp: u64) -> String {
    format!("{SNAPSHOT_PREFIX}{stamp}.{SNAPSHOT_EXTENSION}")
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
