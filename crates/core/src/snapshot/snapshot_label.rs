use std::fmt;

use super::snapshot_error::SnapshotError;

/// A trimmed, non-empty name that is safe to use as one directory component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotLabel(String);

impl SnapshotLabel {
    pub fn parse(raw: &str) -> Result<Self, SnapshotError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SnapshotError::EmptyLabel);
        }
        if trimmed == "." || trimmed == ".." || trimmed.contains(['/', '\\']) {
            return Err(SnapshotError::InvalidLabel(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
