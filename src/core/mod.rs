//! core
//!
//! Core domain types for forgefs.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, Oid
//! - [`path`] - Repository path normalization and parent/child helpers
//! - [`tree`] - Tree entries, tree snapshots and branch state
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing

pub mod config;
pub mod path;
pub mod tree;
pub mod types;
