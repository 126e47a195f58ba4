//! mem::info
//!
//! Metadata describing a handle or a directory child.

use chrono::{DateTime, Utc};

use super::FileMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Base name (empty for the root directory).
    pub name: String,
    pub size: u64,
    pub mode: FileMode,
    pub modified: DateTime<Utc>,
}

impl FileInfo {
    pub fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }
}
