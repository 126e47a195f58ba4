//! fs::mutate
//!
//! Operations that change the snapshot or the remote branch.
//!
//! # Design
//!
//! Every function here runs with the adapter lock already held and works
//! on the borrowed snapshot, so composite operations call each other
//! without re-locking.
//!
//! Two kinds of change exist:
//!
//! - Local: `mkdir` and `mkdir_all` append directory markers to the entry
//!   list. Nothing is sent to the forge and the tree hash goes stale.
//! - Remote: `remove`, `write_file` and `rename` commit on the branch,
//!   then replace the tree with the server's result.
//!
//! Appended entries are not deduplicated against existing ones.

use tracing::{debug, info};

use super::commit;
use super::error::{FsError, Result};
use super::snapshot;
use crate::core::path;
use crate::core::tree::{FilesystemSnapshot, NewTreeEntry, TreeEntry};
use crate::forge::{DeleteFileRequest, Forge, PutFileRequest};

/// Append a directory marker for `raw_path` if its parent exists.
///
/// The root always exists, so making it is a no-op.
pub(crate) fn mkdir(snapshot: &mut FilesystemSnapshot, raw_path: &str) -> Result<()> {
    let normalized = path::normalize(raw_path);
    if path::is_root(normalized) {
        return Ok(());
    }

    let parent = path::parent(normalized);
    if !path::is_root(parent) && snapshot.tree.find(parent).is_none() {
        debug!(path = normalized, parent, "mkdir: parent missing");
        return Err(FsError::NotFound(parent.to_string()));
    }

    snapshot.tree.entries.push(TreeEntry::local_dir(normalized));
    Ok(())
}

/// Make every missing ancestor, then the path itself.
///
/// The final `mkdir` is unconditional, so repeating the call appends
/// another marker for the leaf.
pub(crate) fn mkdir_all(snapshot: &mut FilesystemSnapshot, raw_path: &str) -> Result<()> {
    let normalized = path::normalize(raw_path);
    for ancestor in path::ancestors(normalized) {
        if snapshot.tree.find(ancestor).is_none() {
            mkdir(snapshot, ancestor)?;
        }
    }
    mkdir(snapshot, normalized)
}

/// Delete one entry with a single-file commit.
///
/// A directory marker made by `mkdir` has no sha and was never committed,
/// so it is dropped from the entry list without a `delete_file` call.
pub(crate) async fn remove(
    forge: &dyn Forge,
    snapshot: &mut FilesystemSnapshot,
    raw_path: &str,
    message: &str,
) -> Result<()> {
    let normalized = path::normalize(raw_path);
    let Some(entry) = snapshot.tree.find(normalized) else {
        debug!(path = normalized, "remove: no entry");
        return Err(FsError::NotFound(normalized.to_string()));
    };

    // A marker from mkdir has never been committed
    let Some(sha) = entry.sha.clone() else {
        snapshot.tree.entries.retain(|e| e.path != normalized);
        debug!(path = normalized, "remove: dropped local marker");
        return Ok(());
    };

    let commit = forge
        .delete_file(DeleteFileRequest {
            path: normalized.to_string(),
            sha,
            branch: snapshot.branch.name.clone(),
            message: message.to_string(),
        })
        .await?;
    info!(path = normalized, commit = %commit.sha.short(7), "deleted file");

    snapshot::advance(snapshot, &commit);
    snapshot::refresh(forge, snapshot, &commit.tree).await
}

/// Remove a file, or every blob below a directory.
///
/// Directory markers are skipped; a partial failure leaves earlier
/// deletions committed.
pub(crate) async fn remove_all(
    forge: &dyn Forge,
    snapshot: &mut FilesystemSnapshot,
    raw_path: &str,
    message: &str,
) -> Result<()> {
    let normalized = path::normalize(raw_path);
    let Some(entry) = snapshot.tree.find(normalized) else {
        debug!(path = normalized, "remove_all: no entry");
        return Err(FsError::NotFound(normalized.to_string()));
    };
    if entry.is_blob() {
        return remove(forge, snapshot, normalized, message).await;
    }

    let targets: Vec<String> = snapshot
        .tree
        .blobs_under(normalized)
        .map(|e| e.path.clone())
        .collect();
    debug!(path = normalized, files = targets.len(), "remove_all");

    for target in targets {
        remove(forge, snapshot, &target, message).await?;
    }
    Ok(())
}

/// Create or replace one file with a single-file commit.
pub(crate) async fn write_file(
    forge: &dyn Forge,
    snapshot: &mut FilesystemSnapshot,
    raw_path: &str,
    contents: &[u8],
    message: &str,
) -> Result<()> {
    let normalized = path::normalize(raw_path);
    if snapshot.tree.is_dir(normalized) {
        return Err(FsError::IsADirectory(normalized.to_string()));
    }
    let existing = snapshot
        .tree
        .find(normalized)
        .and_then(|entry| entry.sha.clone());

    let commit = forge
        .put_file(PutFileRequest {
            path: normalized.to_string(),
            content: contents.to_vec(),
            sha: existing,
            branch: snapshot.branch.name.clone(),
            message: message.to_string(),
        })
        .await?;
    info!(
        path = normalized,
        bytes = contents.len(),
        commit = %commit.sha.short(7),
        "wrote file"
    );

    snapshot::advance(snapshot, &commit);
    snapshot::refresh(forge, snapshot, &commit.tree).await
}

/// Rename by rewriting the whole tree.
///
/// Branch and tree are re-read first. Only the entry whose path equals
/// `old` is moved; entries below it keep their paths, so renaming a
/// directory copies its subtree to `new` and leaves the old files.
///
/// Returns `FsError::NotFound` without committing when `old` is absent
/// after the resync, rather than committing an unchanged tree.
pub(crate) async fn rename(
    forge: &dyn Forge,
    snapshot: &mut FilesystemSnapshot,
    old: &str,
    new: &str,
    message: &str,
) -> Result<()> {
    let old = path::normalize(old);
    let new = path::normalize(new);

    snapshot::refresh_branch(forge, snapshot).await?;
    let head_tree = snapshot.branch.head_tree.clone();
    snapshot::refresh(forge, snapshot, &head_tree).await?;

    if snapshot.tree.find(old).is_none() {
        debug!(path = old, "rename: no entry");
        return Err(FsError::NotFound(old.to_string()));
    }

    for entry in snapshot.tree.entries.iter_mut().filter(|e| e.path == old) {
        entry.path = new.to_string();
    }
    let entries: Vec<NewTreeEntry> = snapshot.tree.entries.iter().map(NewTreeEntry::from).collect();

    let tree = commit::build_tree(forge, entries).await?;
    snapshot::refresh(forge, snapshot, &tree).await?;

    let commit = commit::commit_tree(forge, &snapshot.branch, &tree, message).await?;
    info!(from = old, to = new, commit = %commit.sha.short(7), "renamed");
    snapshot::advance(snapshot, &commit);
    Ok(())
}
