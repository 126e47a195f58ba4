//! fs::error
//!
//! Errors surfaced by filesystem operations.
//!
//! Remote failures are wrapped without translation, so a caller can match
//! on the exact [`ForgeError`] the forge returned.
//!
//! # Example
//!
//! ```
//! use forgefs::fs::FsError;
//! use forgefs::forge::ForgeError;
//!
//! let err: FsError = ForgeError::RateLimited.into();
//! assert!(matches!(err, FsError::Remote(ForgeError::RateLimited)));
//! assert_eq!(FsError::NotFound("docs/a.md".into()).to_string(), "docs/a.md: file does not exist");
//! ```

use thiserror::Error;

use crate::core::types::TypeError;
use crate::forge::ForgeError;

/// Errors from [`Filesystem`](super::Filesystem) operations.
#[derive(Debug, Error)]
pub enum FsError {
    /// No entry exists at the path.
    #[error("{0}: file does not exist")]
    NotFound(String),

    /// The path names a directory where a file is required.
    #[error("{0}: is a directory")]
    IsADirectory(String),

    /// The remote call failed; carried verbatim.
    #[error(transparent)]
    Remote(#[from] ForgeError),

    /// Blob content could not be decoded.
    #[error("{path}: invalid blob content: {message}")]
    InvalidBlob { path: String, message: String },

    /// The branch name given at construction is not a valid ref name.
    #[error("invalid branch: {0}")]
    InvalidBranch(#[from] TypeError),
}

impl FsError {
    /// Whether this is a missing-path error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound(_))
    }
}

/// Result alias for filesystem operations.
pub type Result<T> = std::result::Result<T, FsError>;
