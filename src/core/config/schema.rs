//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Example
//!
//! ```toml
//! [remote]
//! provider = "github"
//! owner = "octocat"
//! repo = "hello-world"
//! branch = "main"
//! token_env = "GITHUB_TOKEN"
//!
//! [commit]
//! remove_message = "automatic commit"
//! rename_message = "auto commit from git"
//!
//! [log]
//! level = "debug"
//! format = "json"
//! ```

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::BranchName;

/// Default commit message for per-file deletes and writes.
pub const DEFAULT_FILE_MESSAGE: &str = "automatic commit";

/// Default commit message for the whole-tree rename commit.
pub const DEFAULT_RENAME_MESSAGE: &str = "auto commit from git";

/// Default environment variable holding the API token.
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Which repository and branch to mount
    pub remote: Option<RemoteConfig>,

    /// Commit message overrides
    pub commit: Option<CommitConfig>,

    /// Logging settings
    pub log: Option<LogConfig>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(remote) = &self.remote {
            remote.validate()?;
        }
        if let Some(commit) = &self.commit {
            commit.validate()?;
        }
        if let Some(log) = &self.log {
            log.validate()?;
        }
        Ok(())
    }
}

/// Remote repository selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    /// Forge provider (only "github")
    pub provider: Option<String>,

    /// API base URL, for GitHub Enterprise
    pub api_base: Option<String>,

    /// Repository owner (user or organization)
    pub owner: Option<String>,

    /// Repository name
    pub repo: Option<String>,

    /// Branch to mount
    pub branch: Option<String>,

    /// Environment variable to read the token from
    pub token_env: Option<String>,
}

impl RemoteConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(provider) = &self.provider {
            let valid = crate::forge::valid_forge_names();
            if !valid.contains(&provider.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid provider '{}', must be one of: {}",
                    provider,
                    valid.join(", ")
                )));
            }
        }

        if let Some(branch) = &self.branch {
            BranchName::new(branch.as_str())
                .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        }

        if let Some(api_base) = &self.api_base {
            if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
                return Err(ConfigError::InvalidValue(format!(
                    "api_base '{}' must be an http(s) URL",
                    api_base
                )));
            }
        }

        for (field, value) in [("owner", &self.owner), ("repo", &self.repo)] {
            if let Some(v) = value {
                if v.is_empty() || v.contains('/') {
                    return Err(ConfigError::InvalidValue(format!(
                        "{} '{}' must be a single non-empty path segment",
                        field, v
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Commit messages used by mutating operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CommitConfig {
    pub remove_message: Option<String>,
    pub rename_message: Option<String>,
    pub write_message: Option<String>,
}

impl CommitConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for message in [&self.remove_message, &self.rename_message, &self.write_message]
            .into_iter()
            .flatten()
        {
            if message.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "commit messages cannot be empty".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// trace, debug, info, warn, error or off
    pub level: Option<String>,

    /// text or json
    pub format: Option<String>,
}

impl LogConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(level) = &self.level {
            const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];
            if !LEVELS.contains(&level.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid log level '{}', must be one of: {}",
                    level,
                    LEVELS.join(", ")
                )));
            }
        }
        if let Some(format) = &self.format {
            if format != "text" && format != "json" {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid log format '{}', must be 'text' or 'json'",
                    format
                )));
            }
        }
        Ok(())
    }
}
