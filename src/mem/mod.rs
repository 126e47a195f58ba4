//! mem
//!
//! Memory-backed file and directory handles.
//!
//! The adapter hands every opened path back as a [`Handle`]: a byte buffer
//! with a cursor for files, a list of child descriptors for directories.
//! Handles are detached copies; writing to one never reaches the remote
//! repository.
//!
//! # Example
//!
//! ```
//! use std::io::{Read, Write, Seek, SeekFrom};
//! use forgefs::mem::{Handle, MemFile};
//!
//! let mut handle = Handle::File(MemFile::new("notes.txt"));
//! handle.write_all(b"hello").unwrap();
//! handle.seek(SeekFrom::Start(0)).unwrap();
//!
//! let mut out = String::new();
//! handle.read_to_string(&mut out).unwrap();
//! assert_eq!(out, "hello");
//! assert_eq!(handle.stat().size, 5);
//! ```

mod dir;
mod file;
mod info;

pub use dir::MemDir;
pub use file::MemFile;
pub use info::FileInfo;

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::ops::BitOr;

/// Unix-style permission and type bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileMode(u32);

impl FileMode {
    /// Mode given to every file handle.
    pub const FILE: FileMode = FileMode(0o644);

    /// Mode given to every directory handle.
    pub const DIR: FileMode = FileMode(0o040000);

    const TYPE_MASK: u32 = 0o170000;

    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Permission bits only.
    pub fn perm(&self) -> u32 {
        self.0 & 0o777
    }

    pub fn is_dir(&self) -> bool {
        self.0 & Self::TYPE_MASK == Self::DIR.0
    }
}

impl Default for FileMode {
    fn default() -> Self {
        Self::FILE
    }
}

impl std::fmt::Display for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06o}", self.0)
    }
}

/// Flags accepted by `open_file`.
///
/// Only [`OpenFlags::TRUNCATE`] and [`OpenFlags::APPEND`] change the
/// returned handle; the rest are accepted and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OpenFlags(u32);

impl OpenFlags {
    pub const READ_ONLY: OpenFlags = OpenFlags(0);
    pub const WRITE_ONLY: OpenFlags = OpenFlags(0x1);
    pub const READ_WRITE: OpenFlags = OpenFlags(0x2);
    pub const APPEND: OpenFlags = OpenFlags(0x400);
    pub const CREATE: OpenFlags = OpenFlags(0x40);
    pub const EXCLUSIVE: OpenFlags = OpenFlags(0x80);
    pub const SYNC: OpenFlags = OpenFlags(0x101000);
    pub const TRUNCATE: OpenFlags = OpenFlags(0x200);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Whether every bit of `other` is set.
    pub fn contains(&self, other: OpenFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for OpenFlags {
    type Output = OpenFlags;

    fn bitor(self, rhs: OpenFlags) -> OpenFlags {
        OpenFlags(self.0 | rhs.0)
    }
}

/// An opened path.
#[derive(Debug, Clone)]
pub enum Handle {
    File(MemFile),
    Dir(MemDir),
}

impl Handle {
    pub fn name(&self) -> &str {
        match self {
            Handle::File(f) => f.name(),
            Handle::Dir(d) => d.name(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Handle::Dir(_))
    }

    /// Metadata of the handle itself.
    pub fn stat(&self) -> FileInfo {
        match self {
            Handle::File(f) => f.stat(),
            Handle::Dir(d) => d.stat(),
        }
    }

    /// Children of a directory handle, sorted by name.
    ///
    /// # Errors
    ///
    /// An `io::Error` of kind `Unsupported` for file handles.
    pub fn read_dir(&self) -> io::Result<Vec<FileInfo>> {
        match self {
            Handle::Dir(d) => Ok(d.read_dir()),
            Handle::File(f) => Err(not_a_directory(f.name())),
        }
    }

    pub fn set_mode(&mut self, mode: FileMode) {
        match self {
            Handle::File(f) => f.set_mode(mode),
            Handle::Dir(d) => d.set_mode(mode),
        }
    }

    /// Apply the handle-level effects of `flags`.
    pub fn apply_flags(&mut self, flags: OpenFlags) {
        if let Handle::File(f) = self {
            if flags.contains(OpenFlags::TRUNCATE) {
                f.truncate();
            }
            if flags.contains(OpenFlags::APPEND) {
                f.seek_end();
            }
        }
    }

    /// File contents; `None` for directories.
    pub fn contents(&self) -> Option<&[u8]> {
        match self {
            Handle::File(f) => Some(f.contents()),
            Handle::Dir(_) => None,
        }
    }
}

fn is_a_directory(name: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Unsupported, format!("{}: is a directory", name))
}

fn not_a_directory(name: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Unsupported, format!("{}: not a directory", name))
}

impl Read for Handle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Handle::File(f) => f.read(buf),
            Handle::Dir(d) => Err(is_a_directory(d.name())),
        }
    }
}

impl Write for Handle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Handle::File(f) => f.write(buf),
            Handle::Dir(d) => Err(is_a_directory(d.name())),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for Handle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Handle::File(f) => f.seek(pos),
            Handle::Dir(d) => Err(is_a_directory(d.name())),
        }
    }
}
