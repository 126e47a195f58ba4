//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--config <path>`: Use this config file instead of the search path
//! - `--owner`, `--repo`, `--branch`, `--api-base`: Override `[remote]` settings
//! - `--remote <url>`: Take owner and repo from a GitHub remote URL
//! - `--debug`: Enable debug logging

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// forgefs - browse and edit a GitHub branch like a filesystem
#[derive(Parser, Debug)]
#[command(name = "forgefs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to load
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Repository owner (user or organization)
    #[arg(long, global = true)]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long, global = true)]
    pub repo: Option<String>,

    /// GitHub remote URL; sets owner and repo
    #[arg(long, global = true, value_name = "URL", conflicts_with_all = ["owner", "repo"])]
    pub remote: Option<String>,

    /// Branch to operate on
    #[arg(long, global = true)]
    pub branch: Option<String>,

    /// API base URL (GitHub Enterprise: https://HOST/api/v3)
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List a directory
    #[command(
        name = "ls",
        after_help = "\
EXAMPLES:
    # List the repository root
    forgefs --owner octocat --repo hello-world ls

    # List a subdirectory on another branch
    forgefs --branch docs ls guides/"
    )]
    Ls {
        /// Directory to list (default: root)
        #[arg(default_value = "")]
        path: String,
    },

    /// Print a file's contents
    Cat {
        /// File to print
        path: String,
    },

    /// Show metadata for a path
    Stat {
        /// File or directory
        path: String,
    },

    /// Create a directory in the local snapshot
    #[command(
        long_about = "Create a directory in the local snapshot.\n\n\
            Directories only exist remotely once they contain a file, so this \
            command changes nothing on the branch. It is useful to check that \
            the parent exists; use `put` to commit a file inside the new path."
    )]
    Mkdir {
        /// Create missing parents as well
        #[arg(short = 'p', long)]
        parents: bool,

        /// Directory to create
        path: String,
    },

    /// Remove a file (one commit)
    #[command(
        long_about = "Remove a file with a single commit.\n\n\
            With -r, every file below a directory is removed, one commit per \
            file. A failure part-way leaves earlier removals committed."
    )]
    Rm {
        /// Remove every file below a directory
        #[arg(short = 'r', long)]
        recursive: bool,

        /// Path to remove
        path: String,
    },

    /// Rename a path (one commit)
    #[command(
        long_about = "Rename a path by rewriting the branch's tree.\n\n\
            Only the entry at exactly OLD is moved. The branch update is a \
            fast-forward; if someone else pushed in the meantime it is rejected."
    )]
    Mv {
        /// Current path
        old: String,

        /// New path
        new: String,
    },

    /// Write a file (one commit)
    Put {
        /// Destination path in the repository
        path: String,

        /// Read contents from this local file instead of stdin
        #[arg(long, value_name = "FILE")]
        from: Option<PathBuf>,
    },
}
