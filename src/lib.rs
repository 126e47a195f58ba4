//! forgefs - a filesystem view over a branch of a GitHub repository
//!
//! Directories are synthesized from the branch's flat recursive tree,
//! files are fetched as blobs, and removals, renames and writes become
//! commits on the branch.
//!
//! # Architecture
//!
//! - [`fs`] - The adapter: `ForgeFs` and the `Filesystem` trait
//! - [`mem`] - In-memory file and directory handles returned by the adapter
//! - [`forge`] - Remote hosting abstraction (GitHub REST, in-memory mock)
//! - [`core`] - Domain types, tree model, paths, configuration
//! - [`auth`] - Token providers
//! - [`logging`] - `tracing` subscriber setup
//! - [`cli`] - Command-line interface
//!
//! # Consistency
//!
//! One adapter instance serializes all of its operations behind a single
//! lock. Instances are independent; two instances on the same branch can
//! race at the remote, where non-forced ref updates and blob sha
//! preconditions reject the loser.

pub mod auth;
pub mod cli;
pub mod core;
pub mod forge;
pub mod fs;
pub mod logging;
pub mod mem;
