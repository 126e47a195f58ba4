//! fs::traits
//!
//! The filesystem surface the adapter exposes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::Result;
use crate::mem::{FileInfo, FileMode, Handle, OpenFlags};

/// A hierarchical filesystem view.
///
/// Paths are slash-separated; a leading slash is optional and the empty
/// path (or `/`) is the root directory. Every method on an implementation
/// may take an instance-wide lock, so calls on one instance run one at a
/// time.
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// Create a new, empty file handle. Nothing is recorded in the tree.
    async fn create(&self, path: &str) -> Result<Handle>;

    /// Create a directory whose parent already exists.
    async fn mkdir(&self, path: &str, perm: FileMode) -> Result<()>;

    /// Create a directory along with any missing parents.
    async fn mkdir_all(&self, path: &str, perm: FileMode) -> Result<()>;

    /// Open a file or directory for reading.
    async fn open(&self, path: &str) -> Result<Handle>;

    /// Open with flags, applying `perm` to the returned handle.
    async fn open_file(&self, path: &str, flags: OpenFlags, perm: FileMode) -> Result<Handle>;

    /// Remove a single file.
    async fn remove(&self, path: &str) -> Result<()>;

    /// Remove a file, or every file below a directory.
    async fn remove_all(&self, path: &str) -> Result<()>;

    /// Move `old` to `new`.
    async fn rename(&self, old: &str, new: &str) -> Result<()>;

    /// Metadata for a path.
    async fn stat(&self, path: &str) -> Result<FileInfo>;

    /// Identifier of the filesystem kind.
    fn name(&self) -> &'static str;

    /// Change the mode of a path.
    async fn chmod(&self, path: &str, mode: FileMode) -> Result<()>;

    /// Change the access and modification times of a path.
    async fn chtimes(&self, path: &str, atime: DateTime<Utc>, mtime: DateTime<Utc>)
        -> Result<()>;
}
