//! fs
//!
//! A filesystem view over one branch of a remote repository.
//!
//! # Architecture
//!
//! [`ForgeFs`] owns a [`FilesystemSnapshot`] (branch head plus the flat
//! recursive entry list of its tree) behind a single async mutex. Every
//! public operation holds that mutex for its whole duration, including
//! while it awaits the forge, so operations on one instance never
//! interleave. Separate instances share nothing.
//!
//! - `snapshot`: initial load and wholesale tree refresh
//! - `synth`: blob fetch/decode for files, one-level listings for directories
//! - `mutate`: mkdir (local only), remove/remove_all/write_file/rename (committed)
//! - `commit`: create tree, create commit, non-forced ref update
//!
//! # Persistence
//!
//! `create` and `mkdir` never reach the forge: a created handle is a
//! detached buffer and a new directory is a local marker that disappears
//! at the next refresh. Use [`ForgeFs::write_file`] to commit contents.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use forgefs::forge::mock::MockForge;
//! use forgefs::fs::{Filesystem, ForgeFs};
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::with_files("main", &[("docs/a.md", b"# A".as_slice())]);
//! let fs = ForgeFs::connect(Arc::new(forge), "main").await.unwrap();
//!
//! let root = fs.open("/").await.unwrap();
//! let names: Vec<_> = root.read_dir().unwrap().into_iter().map(|i| i.name).collect();
//! assert_eq!(names, vec!["docs"]);
//!
//! fs.rename("docs/a.md", "docs/b.md").await.unwrap();
//! assert!(fs.find_entry("docs/b.md").await.is_some());
//! # });
//! ```

mod commit;
mod error;
mod mutate;
mod snapshot;
mod synth;
mod traits;

pub use error::{FsError, Result};
pub use traits::Filesystem;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::instrument;

use crate::core::config::schema::{DEFAULT_FILE_MESSAGE, DEFAULT_RENAME_MESSAGE};
use crate::core::path;
use crate::core::tree::{FilesystemSnapshot, TreeEntry};
use crate::core::types::BranchName;
use crate::forge::Forge;
use crate::mem::{FileInfo, FileMode, Handle, MemFile, OpenFlags};

/// Commit messages used for remote mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessages {
    /// Per-file delete commits (`remove`, `remove_all`)
    pub remove: String,
    /// The tree-rewrite commit of `rename`
    pub rename: String,
    /// Single-file commits of `write_file`
    pub write: String,
}

impl Default for CommitMessages {
    fn default() -> Self {
        Self {
            remove: DEFAULT_FILE_MESSAGE.to_string(),
            rename: DEFAULT_RENAME_MESSAGE.to_string(),
            write: DEFAULT_FILE_MESSAGE.to_string(),
        }
    }
}

/// Filesystem adapter over one branch of a forge-hosted repository.
pub struct ForgeFs {
    forge: Arc<dyn Forge>,
    messages: CommitMessages,
    state: Mutex<FilesystemSnapshot>,
}

impl std::fmt::Debug for ForgeFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForgeFs")
            .field("forge", &self.forge.name())
            .field("messages", &self.messages)
            .finish_non_exhaustive()
    }
}

impl ForgeFs {
    /// Connect to `branch` with the default commit messages.
    ///
    /// # Errors
    ///
    /// - `FsError::InvalidBranch` if `branch` is not a valid branch name
    /// - `FsError::Remote` if the branch or its tree cannot be read
    pub async fn connect(forge: Arc<dyn Forge>, branch: &str) -> Result<Self> {
        Self::connect_with(forge, branch, CommitMessages::default()).await
    }

    /// Connect to `branch`, committing with `messages`.
    pub async fn connect_with(
        forge: Arc<dyn Forge>,
        branch: &str,
        messages: CommitMessages,
    ) -> Result<Self> {
        let branch = BranchName::new(branch)?;
        let state = snapshot::load(forge.as_ref(), &branch).await?;
        Ok(Self {
            forge,
            messages,
            state: Mutex::new(state),
        })
    }

    /// A copy of the current snapshot.
    pub async fn snapshot(&self) -> FilesystemSnapshot {
        self.state.lock().await.clone()
    }

    /// The entry stored at exactly `path`, if any.
    pub async fn find_entry(&self, path: &str) -> Option<TreeEntry> {
        self.state.lock().await.find_entry(path).cloned()
    }

    /// Commit `contents` as the file at `path`, creating or replacing it.
    ///
    /// # Errors
    ///
    /// - `FsError::IsADirectory` if `path` is the root or a directory
    /// - `FsError::Remote` if the forge rejects the write
    #[instrument(skip(self, contents), fields(bytes = contents.len()))]
    pub async fn write_file(&self, path: &str, contents: &[u8]) -> Result<()> {
        let mut state = self.state.lock().await;
        mutate::write_file(
            self.forge.as_ref(),
            &mut state,
            path,
            contents,
            &self.messages.write,
        )
        .await
    }

    async fn open_locked(&self, state: &FilesystemSnapshot, path: &str) -> Result<Handle> {
        synth::open(self.forge.as_ref(), state, path).await
    }
}

#[async_trait]
impl Filesystem for ForgeFs {
    #[instrument(skip(self))]
    async fn create(&self, path: &str) -> Result<Handle> {
        let _state = self.state.lock().await;
        let name = path::base_name(path::normalize(path));
        Ok(Handle::File(MemFile::new(name)))
    }

    #[instrument(skip(self))]
    async fn mkdir(&self, path: &str, _perm: FileMode) -> Result<()> {
        let mut state = self.state.lock().await;
        mutate::mkdir(&mut state, path)
    }

    #[instrument(skip(self))]
    async fn mkdir_all(&self, path: &str, _perm: FileMode) -> Result<()> {
        let mut state = self.state.lock().await;
        mutate::mkdir_all(&mut state, path)
    }

    #[instrument(skip(self))]
    async fn open(&self, path: &str) -> Result<Handle> {
        let state = self.state.lock().await;
        self.open_locked(&state, path).await
    }

    #[instrument(skip(self))]
    async fn open_file(&self, path: &str, flags: OpenFlags, perm: FileMode) -> Result<Handle> {
        let state = self.state.lock().await;
        let mut handle = self.open_locked(&state, path).await?;
        handle.set_mode(perm);
        handle.apply_flags(flags);
        Ok(handle)
    }

    #[instrument(skip(self))]
    async fn remove(&self, path: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        mutate::remove(self.forge.as_ref(), &mut state, path, &self.messages.remove).await
    }

    #[instrument(skip(self))]
    async fn remove_all(&self, path: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        mutate::remove_all(self.forge.as_ref(), &mut state, path, &self.messages.remove).await
    }

    #[instrument(skip(self))]
    async fn rename(&self, old: &str, new: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        mutate::rename(self.forge.as_ref(), &mut state, old, new, &self.messages.rename).await
    }

    #[instrument(skip(self))]
    async fn stat(&self, path: &str) -> Result<FileInfo> {
        let state = self.state.lock().await;
        Ok(self.open_locked(&state, path).await?.stat())
    }

    fn name(&self) -> &'static str {
        "forgefs"
    }

    async fn chmod(&self, _path: &str, _mode: FileMode) -> Result<()> {
        let _state = self.state.lock().await;
        Ok(())
    }

    async fn chtimes(
        &self,
        _path: &str,
        _atime: DateTime<Utc>,
        _mtime: DateTime<Utc>,
    ) -> Result<()> {
        let _state = self.state.lock().await;
        Ok(())
    }
}
