//! forge::factory
//!
//! Forge selection and creation.
//!
//! # Design
//!
//! Callers use [`create_forge`] or [`create_forge_from_url`] instead of
//! constructing a concrete forge, so the adapter and CLI only ever see
//! `dyn Forge`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use forgefs::auth::StaticTokenProvider;
//! use forgefs::forge::{create_forge, ForgeTarget};
//!
//! let target = ForgeTarget::new("octocat", "hello-world");
//! let forge = create_forge(None, &target, Arc::new(StaticTokenProvider::new("t"))).unwrap();
//! assert_eq!(forge.name(), "github");
//! ```

use std::sync::Arc;

use super::github::{parse_github_url, GitHubForge, DEFAULT_API_BASE};
use super::traits::{Forge, ForgeError};
use crate::auth::TokenProvider;

/// Supported forge providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForgeProvider {
    GitHub,
}

impl ForgeProvider {
    /// Get all available providers.
    pub fn all() -> &'static [ForgeProvider] {
        &[ForgeProvider::GitHub]
    }

    /// Get the provider name as a string.
    ///
    /// This matches the name used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            ForgeProvider::GitHub => "github",
        }
    }

    /// Parse a provider from a string (case-insensitive).
    ///
    /// ```
    /// use forgefs::forge::ForgeProvider;
    ///
    /// assert_eq!(ForgeProvider::parse("GitHub"), Some(ForgeProvider::GitHub));
    /// assert_eq!(ForgeProvider::parse("unknown"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "github" => Some(ForgeProvider::GitHub),
            _ => None,
        }
    }
}

impl std::fmt::Display for ForgeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The repository a forge instance is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgeTarget {
    pub owner: String,
    pub repo: String,
    pub api_base: String,
}

impl ForgeTarget {
    /// Target on the public API.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Use a different API base (enterprise installs, test servers).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

/// Detect the forge provider from a remote URL.
///
/// ```
/// use forgefs::forge::{detect_provider, ForgeProvider};
///
/// assert_eq!(
///     detect_provider("git@github.com:owner/repo.git"),
///     Some(ForgeProvider::GitHub)
/// );
/// assert_eq!(detect_provider("git@example.com:owner/repo.git"), None);
/// ```
pub fn detect_provider(remote_url: &str) -> Option<ForgeProvider> {
    if parse_github_url(remote_url).is_some() {
        return Some(ForgeProvider::GitHub);
    }
    None
}

/// Create a forge for an explicit owner/repo.
///
/// # Errors
///
/// - `ForgeError::NotFound` if `provider_override` names no known provider
pub fn create_forge(
    provider_override: Option<&str>,
    target: &ForgeTarget,
    tokens: Arc<dyn TokenProvider>,
) -> Result<Box<dyn Forge>, ForgeError> {
    let provider = match provider_override {
        Some(name) => ForgeProvider::parse(name).ok_or_else(|| {
            ForgeError::NotFound(format!("provider '{}' (supported: {})", name, supported()))
        })?,
        None => ForgeProvider::GitHub,
    };

    match provider {
        ForgeProvider::GitHub => Ok(Box::new(GitHubForge::new_with_provider_and_api_base(
            tokens,
            target.owner.clone(),
            target.repo.clone(),
            target.api_base.clone(),
        ))),
    }
}

/// Create a forge from a remote URL (SSH or HTTPS), detecting the provider.
///
/// The forge talks to the provider's public API.
///
/// # Errors
///
/// - `ForgeError::NotFound` if no provider recognizes the URL
pub fn create_forge_from_url(
    remote_url: &str,
    tokens: Arc<dyn TokenProvider>,
) -> Result<Box<dyn Forge>, ForgeError> {
    let unrecognized = || {
        ForgeError::NotFound(format!(
            "repository for remote '{}' (expected git@github.com:OWNER/REPO.git \
             or https://github.com/OWNER/REPO; supported: {})",
            remote_url,
            supported()
        ))
    };

    match detect_provider(remote_url).ok_or_else(unrecognized)? {
        ForgeProvider::GitHub => {
            let forge = GitHubForge::from_remote_url_with_provider(remote_url, tokens)
                .ok_or_else(unrecognized)?;
            Ok(Box::new(forge))
        }
    }
}

fn supported() -> String {
    valid_forge_names().join(", ")
}

/// Get list of valid forge names for configuration validation.
pub fn valid_forge_names() -> &'static [&'static str] {
    &["github"]
}
