//! auth
//!
//! Token sources for the forge client.
//!
//! The forge never reads credentials itself. It asks a [`TokenProvider`]
//! for a bearer token before each request, so long-running processes can
//! swap in a provider that refreshes tokens.
//!
//! # Providers
//!
//! - [`StaticTokenProvider`] - a token handed over at construction
//! - [`EnvTokenProvider`] - reads an environment variable on every call
//!
//! # Security
//!
//! Tokens never appear in logs, errors or `Debug` output. Both providers
//! implement a redacting `Debug`.
//!
//! # Example
//!
//! ```
//! use forgefs::auth::{StaticTokenProvider, TokenProvider};
//!
//! # tokio_test::block_on(async {
//! let provider = StaticTokenProvider::new("ghp_example");
//! assert_eq!(provider.bearer_token().await.unwrap(), "ghp_example");
//! assert!(!format!("{:?}", provider).contains("ghp_example"));
//! # });
//! ```

mod errors;

pub use errors::AuthError;

use async_trait::async_trait;

/// Trait for providing bearer tokens to forge adapters.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a bearer token for the next request.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NotAuthenticated`] if no token exists
    /// - [`AuthError::InvalidToken`] if the token cannot be sent
    async fn bearer_token(&self) -> Result<String, AuthError>;

    /// Check if a token is available without fetching it.
    fn is_authenticated(&self) -> bool;
}

/// Reject tokens that would corrupt the Authorization header.
fn check_token(token: &str) -> Result<(), AuthError> {
    if token.is_empty() {
        return Err(AuthError::InvalidToken("token is empty".into()));
    }
    if token.chars().any(|c| c.is_ascii_control() || c == ' ') {
        return Err(AuthError::InvalidToken(
            "token contains whitespace or control characters".into(),
        ));
    }
    Ok(())
}

/// A fixed token.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"[redacted]")
            .finish()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Result<String, AuthError> {
        check_token(&self.token)?;
        Ok(self.token.clone())
    }

    fn is_authenticated(&self) -> bool {
        check_token(&self.token).is_ok()
    }
}

/// Reads the token from an environment variable on each request.
#[derive(Debug, Clone)]
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    /// Provider reading `var` (for example `GITHUB_TOKEN`).
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Name of the variable consulted.
    pub fn var(&self) -> &str {
        &self.var
    }

    fn read(&self) -> Result<String, AuthError> {
        let token = std::env::var(&self.var)
            .map_err(|_| AuthError::NotAuthenticated(self.var.clone()))?;
        let token = token.trim().to_string();
        check_token(&token)?;
        Ok(token)
    }
}

#[async_trait]
impl TokenProvider for EnvTokenProvider {
    async fn bearer_token(&self) -> Result<String, AuthError> {
        self.read()
    }

    fn is_authenticated(&self) -> bool {
        self.read().is_ok()
    }
}
