use std::path::PathBuf;

use super::snapshot_error::SnapshotError;
use super::snapshot_label::SnapshotLabel;
use super::snapshot_writer::SnapshotWriter;
use crate::shared::frame::Frame;
use crate::shared::notice::Notice;

/// A frame grabbed for a snapshot, waiting for the user to name it.
#[derive(Debug)]
pub struct SnapshotRequest {
    frame: Frame,
}

impl SnapshotRequest {
    pub fn new(frame: Frame) -> Self {
        Self { frame }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Attaches the user's answer to the label prompt. `None` is a
    /// cancelled prompt and is treated like an empty answer.
    pub fn with_label(self, raw: Option<&str>) -> Result<LabeledSnapshot, SnapshotError> {
        let label = SnapshotLabel::parse(raw.unwrap_or_default())?;
        Ok(LabeledSnapshot {
            frame: self.frame,
            label,
        })
    }
}

/// A named snapshot awaiting yes/no confirmation.
#[derive(Debug)]
pub struct LabeledSnapshot {
    frame: Frame,
    label: SnapshotLabel,
}

impl LabeledSnapshot {
    pub fn label(&self) -> &SnapshotLabel {
        &self.label
    }

    pub fn confirmation_title(&self) -> &'static str {
        "Confirm snapshot"
    }

    pub fn confirmation_prompt(&self) -> String {
        format!("Save snapshot for \"{}\"?", self.label)
    }

    /// Writes the snapshot if confirmed; anything else touches no files.
    pub fn resolve(
        self,
        confirmed: bool,
        writer: &SnapshotWriter,
    ) -> Result<SnapshotOutcome, SnapshotError> {
        if !confirmed {
            log::info!("Snapshot for \"{}\" declined", self.label);
            return Ok(SnapshotOutcome::Declined);
        }
        writer
            .save(&self.frame, &self.label)
            .map(SnapshotOutcome::Saved)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOutcome {
    Saved(PathBuf),
    Declined,
}

impl SnapshotOutcome {
    pub fn notice(&self) -> Notice {
        match self {
            Self::Saved(path) => {
                Notice::info("Success", format!("Snapshot saved to {}", path.display()))
            }
            Self::Declined => Notice::info("Info", "Snapshot not saved."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::notice::NoticeLevel;
    use crate::video::infrastructure::image_file_writer::ImageFileWriter;

    fn request() -> SnapshotRequest {
        SnapshotRequest::new(Frame::new(vec![200; 2 * 2 * 3], 2, 2, 3, 5))
    }

    fn writer(base: &std::path::Path) -> SnapshotWriter {
        SnapshotWriter::with_clock(base, Box::new(ImageFileWriter::new()), Box::new(|| 9))
    }

    #[test]
    fn test_prompt_names_trimmed_label() {
        let labeled = request().with_label(Some("  alice  ")).unwrap();
        assert_eq!(labeled.confirmation_prompt(), "Save snapshot for \"alice\"?");
    }

    #[test]
    fn test_cancelled_prompt_is_empty_label() {
        assert!(matches!(
            request().with_label(None),
            Err(SnapshotError::EmptyLabel)
        ));
    }

    #[test]
    fn test_declined_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("snapshots");

        let outcome = request()
            .with_label(Some("alice"))
            .unwrap()
            .resolve(false, &writer(&base))
            .unwrap();

        assert_eq!(outcome, SnapshotOutcome::Declined);
        assert_eq!(outcome.notice().message, "Snapshot not saved.");
        assert!(!base.exists());
    }

    #[test]
    fn test_confirmed_saves_and_reports_path() {
        let tmp = tempfile::tempdir().unwrap();

        let outcome = request()
            .with_label(Some("alice"))
            .unwrap()
            .resolve(true, &writer(tmp.path()))
            .unwrap();

        let expected = tmp.path().join("alice").join("snapshot_9.png");
        assert_eq!(outcome, SnapshotOutcome::Saved(expected.clone()));
        assert!(expected.is_file());
        let notice = outcome.notice();
        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(
            notice.message,
            format!("Snapshot saved to {}", expected.display())
        );
    }
}
