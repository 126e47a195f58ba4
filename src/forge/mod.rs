//! forge
//!
//! Abstraction for the remote hosting service holding the repository.
//!
//! # Architecture
//!
//! The `Forge` trait covers the git data calls the filesystem adapter
//! makes: branch lookup, recursive tree and blob reads, single-file
//! delete/put commits, and the tree/commit/ref triple used for renames.
//! The adapter and CLI obtain a forge through [`create_forge`] rather than
//! naming a concrete implementation.
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait and request/response types
//! - [`github`]: GitHub implementation using the REST API
//! - [`mock`]: In-memory implementation for deterministic testing
//! - `factory`: Forge selection and creation

mod factory;
pub mod github;
pub mod mock;
mod traits;

pub use factory::{
    create_forge, create_forge_from_url, detect_provider, valid_forge_names, ForgeProvider,
    ForgeTarget,
};
pub use traits::*;
