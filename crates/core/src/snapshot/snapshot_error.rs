use std::path::PathBuf;

use thiserror::Error;

use crate::shared::notice::Notice;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    #[error("snapshot label is empty")]
    EmptyLabel,
    #[error("snapshot label {0:?} is not a valid directory name")]
    InvalidLabel(String),
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

impl SnapshotError {
    /// The dialog shown when a snapshot attempt ends with this error.
    pub fn notice(&self) -> Notice {
        match self {
            Self::CaptureFailed(_) => Notice::error("Failed to capture frame"),
            Self::EmptyLabel => Notice::warning("Warning", "Snapshot person must have a name."),
            Self::InvalidLabel(label) => Notice::warning(
                "Warning",
                format!("\"{label}\" cannot be used as a snapshot name."),
            ),
            Self::CreateDir { .. } => {
                Notice::error("Something went wrong with directory. Try again.")
            }
            Self::Write { reason, .. } => Notice::error(format!("Failed to save snapshot: {reason}")),
        }
    }
}
