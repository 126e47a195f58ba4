//! mem::dir
//!
//! In-memory directory handle: a name-keyed set of child descriptors.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::{FileInfo, FileMode};

#[derive(Debug, Clone)]
pub struct MemDir {
    name: String,
    mode: FileMode,
    modified: DateTime<Utc>,
    children: BTreeMap<String, FileInfo>,
}

impl MemDir {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: FileMode::DIR,
            modified: Utc::now(),
            children: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the permission bits; the handle stays a directory.
    pub fn set_mode(&mut self, mode: FileMode) {
        self.mode = FileMode::new(FileMode::DIR.bits() | mode.perm());
    }

    /// Add a child file descriptor. A later child with the same name replaces
    /// an earlier one.
    pub fn add_file(&mut self, name: impl Into<String>, size: u64) {
        let name = name.into();
        self.children.insert(
            name.clone(),
            FileInfo {
                name,
                size,
                mode: FileMode::FILE,
                modified: self.modified,
            },
        );
    }

    /// Add a child directory descriptor.
    pub fn add_dir(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.children.insert(
            name.clone(),
            FileInfo {
                name,
                size: 0,
                mode: FileMode::DIR,
                modified: self.modified,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Children sorted by name.
    pub fn read_dir(&self) -> Vec<FileInfo> {
        self.children.values().cloned().collect()
    }

    pub fn stat(&self) -> FileInfo {
        FileInfo {
            name: self.name.clone(),
            size: 0,
            mode: self.mode,
            modified: self.modified,
        }
    }
}
