//! auth::errors
//!
//! Authentication error types.
//!
//! Error messages never contain token values.
//!
//! # Example
//!
//! ```
//! use forgefs::auth::AuthError;
//!
//! let err = AuthError::NotAuthenticated("GITHUB_TOKEN".to_string());
//! assert!(err.to_string().contains("GITHUB_TOKEN"));
//! ```

use thiserror::Error;

/// Errors from token providers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No token is available from the named source.
    #[error("no token available: set the {0} environment variable")]
    NotAuthenticated(String),

    /// A token was found but cannot be used in an HTTP header.
    #[error("invalid token: {0}")]
    InvalidToken(String),
}
