//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. An explicit path (`--config`)
//! 2. `$FORGEFS_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/forgefs/config.toml`
//! 4. `~/.forgefs/config.toml`
//!
//! A missing file is not an error; defaults are used.
//!
//! # Example
//!
//! ```no_run
//! use forgefs::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("branch: {}", config.branch());
//! println!("api: {}", config.api_base());
//! ```

pub mod schema;

pub use schema::{CommitConfig, FileConfig, LogConfig, RemoteConfig};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::fs::CommitMessages;

/// Default branch when none is configured.
pub const DEFAULT_BRANCH: &str = "main";

pub use crate::forge::github::DEFAULT_API_BASE;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Loaded configuration with defaults applied by the accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents
    pub file: FileConfig,
    /// Where the file was loaded from, if anywhere
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration, preferring `explicit` over the standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed,
    /// or if an explicit path does not exist.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::discover() {
            Some(path) => Self::from_file(&path),
            None => Ok(Config::default()),
        }
    }

    /// Load and validate a specific config file.
    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: FileConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(Config {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// First existing config file in the standard locations.
    fn discover() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("FORGEFS_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("forgefs/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        let path = Self::default_path().ok()?;
        path.exists().then_some(path)
    }

    /// The canonical config location, `~/.forgefs/config.toml`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".forgefs/config.toml"))
    }

    /// Path the config was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn remote(&self) -> Option<&RemoteConfig> {
        self.file.remote.as_ref()
    }

    /// Repository owner, if configured.
    pub fn owner(&self) -> Option<&str> {
        self.remote().and_then(|r| r.owner.as_deref())
    }

    /// Repository name, if configured.
    pub fn repo(&self) -> Option<&str> {
        self.remote().and_then(|r| r.repo.as_deref())
    }

    /// Branch to mount (default: `main`).
    pub fn branch(&self) -> &str {
        self.remote()
            .and_then(|r| r.branch.as_deref())
            .unwrap_or(DEFAULT_BRANCH)
    }

    /// Forge provider name (default: `github`).
    pub fn provider(&self) -> &str {
        self.remote()
            .and_then(|r| r.provider.as_deref())
            .unwrap_or("github")
    }

    /// API base URL (default: public GitHub).
    pub fn api_base(&self) -> &str {
        self.remote()
            .and_then(|r| r.api_base.as_deref())
            .unwrap_or(DEFAULT_API_BASE)
    }

    /// Environment variable holding the token.
    pub fn token_env(&self) -> &str {
        self.remote()
            .and_then(|r| r.token_env.as_deref())
            .unwrap_or(schema::DEFAULT_TOKEN_ENV)
    }

    /// Commit messages with defaults filled in.
    pub fn commit_messages(&self) -> CommitMessages {
        let mut messages = CommitMessages::default();
        if let Some(commit) = &self.file.commit {
            if let Some(m) = &commit.remove_message {
                messages.remove = m.clone();
            }
            if let Some(m) = &commit.rename_message {
                messages.rename = m.clone();
            }
            if let Some(m) = &commit.write_message {
                messages.write = m.clone();
            }
        }
        messages
    }

    /// Log level (default: `info`).
    pub fn log_level(&self) -> &str {
        self.file
            .log
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }

    /// Log format (default: `text`).
    pub fn log_format(&self) -> &str {
        self.file
            .log
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .unwrap_or("text")
    }
}
