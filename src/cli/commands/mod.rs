//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each handler takes a connected [`ForgeFs`] and a writer for its output,
//! so handlers can be exercised against a mock forge without a terminal.
//! Only `dispatch` touches stdin/stdout.

mod cat;
mod ls;
mod mkdir;
mod mv;
mod put;
mod rm;
mod stat;

pub use cat::cat;
pub use ls::ls;
pub use mkdir::mkdir;
pub use mv::mv;
pub use put::put;
pub use rm::rm;
pub use stat::stat;

use std::io::{Read, Write};

use anyhow::{Context as _, Result};

use super::{Command, Context};
use crate::fs::ForgeFs;

/// Connect to the branch and run one command.
pub async fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    let fs = ctx.connect().await?;
    let mut out = std::io::stdout();

    match command {
        Command::Ls { path } => ls(&fs, &path, &mut out).await,
        Command::Cat { path } => cat(&fs, &path, &mut out).await,
        Command::Stat { path } => stat(&fs, &path, &mut out).await,
        Command::Mkdir { parents, path } => mkdir(&fs, &path, parents, &mut out).await,
        Command::Rm { recursive, path } => rm(&fs, &path, recursive, &mut out).await,
        Command::Mv { old, new } => mv(&fs, &old, &new, &mut out).await,
        Command::Put { path, from } => {
            let contents = match from {
                Some(file) => std::fs::read(&file)
                    .with_context(|| format!("Failed to read {}", file.display()))?,
                None => {
                    let mut buf = Vec::new();
                    std::io::stdin()
                        .read_to_end(&mut buf)
                        .context("Failed to read stdin")?;
                    buf
                }
            };
            put(&fs, &path, &contents, &mut out).await
        }
    }?;

    out.flush()?;
    Ok(())
}

/// Short hash of the branch head, for confirmation messages.
async fn head(fs: &ForgeFs) -> String {
    fs.snapshot().await.branch.head_commit.short(7).to_string()
}
