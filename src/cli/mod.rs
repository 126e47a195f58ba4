//! cli
//!
//! Command-line interface for forgefs.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Merge flags over the config file
//! - Connect a [`ForgeFs`] and dispatch to command handlers
//!
//! Handlers are async and run on a multi-threaded tokio runtime created
//! here; everything below this layer returns typed errors that are given
//! context with `anyhow` at this edge.

pub mod args;
pub mod commands;

pub use args::{Cli, Command};

use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::auth::{EnvTokenProvider, TokenProvider};
use crate::core::config::Config;
use crate::forge::{create_forge, create_forge_from_url, Forge, ForgeTarget};
use crate::fs::ForgeFs;
use crate::logging;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let level = if cli.debug { "debug" } else { config.log_level() };
    logging::init(level, config.log_format()).context("Failed to initialize logging")?;

    let ctx = Context::from_cli(&cli, config);
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(commands::dispatch(cli.command, &ctx))
}

/// Resolved settings for one invocation: flags layered over config.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub remote: Option<String>,
    pub branch: String,
    pub api_base: String,
}

impl Context {
    pub fn from_cli(cli: &Cli, config: Config) -> Self {
        Self {
            owner: cli.owner.clone().or_else(|| config.owner().map(str::to_string)),
            repo: cli.repo.clone().or_else(|| config.repo().map(str::to_string)),
            remote: cli.remote.clone(),
            branch: cli
                .branch
                .clone()
                .unwrap_or_else(|| config.branch().to_string()),
            api_base: cli
                .api_base
                .clone()
                .unwrap_or_else(|| config.api_base().to_string()),
            config,
        }
    }

    /// Build the forge client. The token is read from the configured
    /// environment variable on each request.
    pub fn forge(&self) -> Result<Box<dyn Forge>> {
        let tokens: Arc<dyn TokenProvider> =
            Arc::new(EnvTokenProvider::new(self.config.token_env()));

        if let Some(url) = &self.remote {
            return create_forge_from_url(url, tokens)
                .with_context(|| format!("Failed to use remote '{}'", url));
        }

        let owner = self
            .owner
            .as_deref()
            .context("No repository owner: pass --owner or set remote.owner in the config")?;
        let repo = self
            .repo
            .as_deref()
            .context("No repository name: pass --repo or set remote.repo in the config")?;

        let target = ForgeTarget::new(owner, repo).with_api_base(self.api_base.as_str());
        create_forge(Some(self.config.provider()), &target, tokens)
            .context("Failed to create forge client")
    }

    /// Connect to the configured branch.
    pub async fn connect(&self) -> Result<ForgeFs> {
        let forge: Arc<dyn Forge> = Arc::from(self.forge()?);
        ForgeFs::connect_with(forge, &self.branch, self.config.commit_messages())
            .await
            .with_context(|| format!("Failed to open branch '{}'", self.branch))
    }
}
