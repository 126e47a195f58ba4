//! forge::traits
//!
//! Forge trait definition: the git data calls the filesystem adapter
//! needs from a remote hosting service.
//!
//! # Design
//!
//! The `Forge` trait is async because every call is network I/O. An
//! instance is bound to one repository (owner and name are fixed at
//! construction), so methods take only branch names and object ids.
//!
//! Implementations never retry. Errors are surfaced as-is and the
//! adapter propagates them verbatim.
//!
//! # Example
//!
//! ```ignore
//! use forgefs::forge::Forge;
//! use forgefs::core::types::BranchName;
//!
//! async fn head_tree(forge: &dyn Forge) -> Result<(), forgefs::forge::ForgeError> {
//!     let branch = forge.get_branch(&BranchName::new("main").unwrap()).await?;
//!     let tree = forge.get_tree(&branch.head_tree).await?;
//!     println!("{} entries at {}", tree.entries.len(), branch.head_commit.short(7));
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::core::tree::{BranchState, NewTreeEntry, TreeSnapshot};
use crate::core::types::{BranchName, Oid};

/// Errors from forge operations.
///
/// These map the common failure modes of a hosting service's HTTP API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForgeError {
    /// Authentication is required but not available.
    #[error("authentication required")]
    AuthRequired,

    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request conflicts with the current remote state
    /// (stale blob sha, ref moved underneath us).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The operation is not supported by this forge.
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

/// Transport encoding of blob content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobEncoding {
    Base64,
    Utf8,
}

/// Raw blob as returned by the forge, still transport-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub sha: Oid,
    pub content: String,
    pub encoding: BlobEncoding,
    pub size: Option<u64>,
}

/// A commit created by the forge, with the tree it points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRef {
    pub sha: Oid,
    pub tree: Oid,
}

/// Delete one file on a branch with a single commit.
#[derive(Debug, Clone)]
pub struct DeleteFileRequest {
    /// Repository-relative path
    pub path: String,
    /// Blob sha the caller believes is current (precondition)
    pub sha: Oid,
    /// Branch to commit on
    pub branch: BranchName,
    /// Commit message
    pub message: String,
}

/// Create or replace one file on a branch with a single commit.
#[derive(Debug, Clone)]
pub struct PutFileRequest {
    /// Repository-relative path
    pub path: String,
    /// Raw file contents (the forge applies transport encoding)
    pub content: Vec<u8>,
    /// Current blob sha when replacing an existing file
    pub sha: Option<Oid>,
    /// Branch to commit on
    pub branch: BranchName,
    /// Commit message
    pub message: String,
}

/// Create a commit object.
#[derive(Debug, Clone)]
pub struct CreateCommitRequest {
    pub message: String,
    pub tree: Oid,
    pub parents: Vec<Oid>,
}

/// The Forge trait for the git data API of a remote hosting service.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, ForgeError>`:
/// - `AuthRequired` / `AuthFailed`: credentials missing or rejected
/// - `NotFound`: branch, object or path doesn't exist
/// - `Conflict`: precondition failed or ref update is not a fast-forward
/// - `RateLimited`: back off (callers decide; nothing here retries)
/// - `ApiError`: validation or server failure
/// - `NetworkError`: connectivity
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "github").
    fn name(&self) -> &'static str;

    /// Look up a branch and the commit/tree it points at.
    async fn get_branch(&self, branch: &BranchName) -> Result<BranchState, ForgeError>;

    /// Fetch the full recursive entry list of a tree.
    async fn get_tree(&self, sha: &Oid) -> Result<TreeSnapshot, ForgeError>;

    /// Fetch one blob, transport-encoded.
    async fn get_blob(&self, sha: &Oid) -> Result<Blob, ForgeError>;

    /// Delete one file, committing on the request's branch.
    ///
    /// # Returns
    ///
    /// The commit made, including the resulting tree hash.
    async fn delete_file(&self, request: DeleteFileRequest) -> Result<CommitRef, ForgeError>;

    /// Create or update one file, committing on the request's branch.
    async fn put_file(&self, request: PutFileRequest) -> Result<CommitRef, ForgeError>;

    /// Build a tree object from `entries`.
    ///
    /// With `base_tree == None` the tree is a full rebuild: anything not
    /// listed in `entries` is absent from the result.
    async fn create_tree(
        &self,
        base_tree: Option<&Oid>,
        entries: Vec<NewTreeEntry>,
    ) -> Result<Oid, ForgeError>;

    /// Create a commit object (does not move any ref).
    async fn create_commit(&self, request: CreateCommitRequest) -> Result<CommitRef, ForgeError>;

    /// Point `branch` at commit `sha`.
    ///
    /// With `force == false` the forge rejects updates that are not
    /// fast-forwards.
    async fn update_ref(&self, branch: &BranchName, sha: &Oid, force: bool)
        -> Result<(), ForgeError>;
}
