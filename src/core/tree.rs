//! core::tree
//!
//! Passive data structures for one remote tree snapshot.
//!
//! # Model
//!
//! The forge stores a commit's file hierarchy as a flat list of
//! path-keyed entries. Each entry is either a [`EntryKind::Blob`] (file
//! contents, addressed by sha) or a [`EntryKind::Tree`] (directory marker).
//! [`TreeSnapshot`] keeps that list in the order the forge returned it;
//! entries appended locally are never deduplicated against earlier ones.
//!
//! [`FilesystemSnapshot`] pairs the tree with the [`BranchState`] it was
//! read from. The adapter owns exactly one of these behind its lock.

use serde::{Deserialize, Serialize};

use super::path;
use super::types::{BranchName, Oid};

/// Git mode for a regular file entry.
pub const MODE_FILE: &str = "100644";

/// Git mode for a directory entry.
pub const MODE_TREE: &str = "040000";

/// Kind of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// File contents.
    Blob,
    /// Directory marker.
    Tree,
}

impl EntryKind {
    /// The wire tag used by the git data API.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Blob => "blob",
            EntryKind::Tree => "tree",
        }
    }

    /// Parse a wire tag. Other object kinds (submodule commits) yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "blob" => Some(EntryKind::Blob),
            "tree" => Some(EntryKind::Tree),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of a tree as read from the forge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Repository-relative path, never with a leading slash.
    pub path: String,
    /// Blob or tree.
    pub kind: EntryKind,
    /// Content hash. `None` only for directory markers created locally.
    pub sha: Option<Oid>,
    /// Git file mode string (`100644`, `040000`, ...).
    pub mode: String,
    /// Blob size, present only in read responses.
    pub size: Option<u64>,
    /// API url of the object, present only in read responses.
    pub url: Option<String>,
}

impl TreeEntry {
    /// A directory marker that exists only in the local snapshot.
    pub fn local_dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Tree,
            sha: None,
            mode: MODE_TREE.to_string(),
            size: None,
            url: None,
        }
    }

    /// Whether this entry is a blob.
    pub fn is_blob(&self) -> bool {
        self.kind == EntryKind::Blob
    }

    /// Final path component.
    pub fn name(&self) -> &str {
        path::base_name(&self.path)
    }
}

/// A tree entry as submitted to tree creation.
///
/// Carries only the fields the create-tree call accepts; the read-only
/// fields of [`TreeEntry`] (size, url) have no place here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTreeEntry {
    pub path: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub sha: Option<Oid>,
}

impl From<&TreeEntry> for NewTreeEntry {
    fn from(entry: &TreeEntry) -> Self {
        Self {
            path: entry.path.clone(),
            mode: entry.mode.clone(),
            kind: entry.kind,
            sha: entry.sha.clone(),
        }
    }
}

/// One tree as fetched recursively from the forge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSnapshot {
    /// Hash of the tree the entries were read from.
    pub sha: Oid,
    /// Flat entry list, in forge order followed by locally appended entries.
    pub entries: Vec<TreeEntry>,
}

impl TreeSnapshot {
    /// First entry whose path equals `path` exactly.
    ///
    /// Linear scan; trees handled by the adapter are expected to be small.
    pub fn find(&self, path: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Entries whose immediate parent is `dir` (`""` for the root).
    pub fn children<'a>(&'a self, dir: &'a str) -> impl Iterator<Item = &'a TreeEntry> + 'a {
        self.entries
            .iter()
            .filter(move |e| !e.path.is_empty() && path::parent(&e.path) == dir)
    }

    /// Blob entries strictly below directory `dir`.
    pub fn blobs_under<'a>(&'a self, dir: &'a str) -> impl Iterator<Item = &'a TreeEntry> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.is_blob() && path::is_descendant(&e.path, dir))
    }

    /// Whether `path` denotes a directory: the root, a tree entry, or a
    /// strict prefix of some entry's path.
    pub fn is_dir(&self, path: &str) -> bool {
        path::is_root(path)
            || self
                .entries
                .iter()
                .any(|e| {
                    (e.path == path && e.kind == EntryKind::Tree)
                        || path::is_descendant(&e.path, path)
                })
    }

    #[cfg(test)]
    fn is_file(&self, path: &str) -> bool {
        self.entries.iter().any(|e| e.path == path && e.is_blob())
    }
}

/// The branch a snapshot was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchState {
    pub name: BranchName,
    pub head_commit: Oid,
    pub head_tree: Oid,
}

/// Branch plus tree, owned by one adapter instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemSnapshot {
    pub branch: BranchState,
    pub tree: TreeSnapshot,
}

impl FilesystemSnapshot {
    /// Entry lookup on a raw (possibly slash-prefixed) path.
    pub fn find_entry(&self, raw_path: &str) -> Option<&TreeEntry> {
        self.tree.find(path::normalize(raw_path))
    }
}
