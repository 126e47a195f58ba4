//! mem::file
//!
//! In-memory file handle.

use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use chrono::{DateTime, Utc};

use super::{FileInfo, FileMode};

/// A file backed by a `Vec<u8>` with its own read/write position.
#[derive(Debug, Clone)]
pub struct MemFile {
    name: String,
    data: Cursor<Vec<u8>>,
    mode: FileMode,
    modified: DateTime<Utc>,
}

impl MemFile {
    /// An empty file positioned at the start.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_contents(name, Vec::new())
    }

    /// A file holding `contents`, positioned at the start.
    pub fn with_contents(name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data: Cursor::new(contents),
            mode: FileMode::FILE,
            modified: Utc::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// Replace the permission bits; type bits in `mode` are ignored.
    pub fn set_mode(&mut self, mode: FileMode) {
        self.mode = FileMode::new(mode.perm());
    }

    /// Whole contents, regardless of position.
    pub fn contents(&self) -> &[u8] {
        self.data.get_ref()
    }

    pub fn into_contents(self) -> Vec<u8> {
        self.data.into_inner()
    }

    /// Position at the end of the contents.
    pub fn seek_end(&mut self) {
        let len = self.data.get_ref().len() as u64;
        self.data.set_position(len);
    }

    /// Drop all contents and rewind.
    pub fn truncate(&mut self) {
        self.data.get_mut().clear();
        self.data.set_position(0);
        self.modified = Utc::now();
    }

    pub fn stat(&self) -> FileInfo {
        FileInfo {
            name: self.name.clone(),
            size: self.data.get_ref().len() as u64,
            mode: self.mode,
            modified: self.modified,
        }
    }
}

impl Read for MemFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.data.read(buf)
    }
}

impl Write for MemFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.data.write(buf)?;
        self.modified = Utc::now();
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for MemFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.data.seek(pos)
    }
}
