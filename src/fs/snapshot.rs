//! fs::snapshot
//!
//! Loading and replacing the adapter's branch/tree snapshot.
//!
//! The tree is only ever replaced wholesale from a server-side tree hash;
//! local edits (see `mutate`) append to the entry list and are discarded
//! by the next refresh.

use tracing::{debug, warn};

use super::error::Result;
use crate::core::tree::FilesystemSnapshot;
use crate::core::types::{BranchName, Oid};
use crate::forge::{CommitRef, Forge};

/// Build the initial snapshot: branch lookup, then its head tree.
pub(crate) async fn load(forge: &dyn Forge, branch: &BranchName) -> Result<FilesystemSnapshot> {
    let branch = forge.get_branch(branch).await?;
    let tree = forge.get_tree(&branch.head_tree).await?;
    debug!(
        branch = %branch.name,
        commit = %branch.head_commit.short(7),
        tree = %tree.sha.short(7),
        entries = tree.entries.len(),
        "loaded snapshot"
    );
    Ok(FilesystemSnapshot { branch, tree })
}

/// Replace the tree with the full listing of `sha`.
pub(crate) async fn refresh(
    forge: &dyn Forge,
    snapshot: &mut FilesystemSnapshot,
    sha: &Oid,
) -> Result<()> {
    let tree = forge.get_tree(sha).await?;
    if tree.sha != *sha {
        warn!(requested = %sha, returned = %tree.sha, "forge returned a different tree");
    }
    debug!(tree = %tree.sha.short(7), entries = tree.entries.len(), "refreshed tree");
    snapshot.tree = tree;
    Ok(())
}

/// Re-read the branch head from the forge.
pub(crate) async fn refresh_branch(
    forge: &dyn Forge,
    snapshot: &mut FilesystemSnapshot,
) -> Result<()> {
    let branch = forge.get_branch(&snapshot.branch.name).await?;
    debug!(
        branch = %branch.name,
        commit = %branch.head_commit.short(7),
        "refreshed branch"
    );
    snapshot.branch = branch;
    Ok(())
}

/// Point the branch state at a commit the forge has accepted.
pub(crate) fn advance(snapshot: &mut FilesystemSnapshot, commit: &CommitRef) {
    snapshot.branch.head_commit = commit.sha.clone();
    snapshot.branch.head_tree = commit.tree.clone();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::mock::{FailOn, MockForge, MockOperation};
    use crate::forge::ForgeError;
    use crate::fs::FsError;

    fn main() -> BranchName {
        BranchName::new("main").unwrap()
    }

    #[tokio::test]
    async fn load_reads_branch_then_tree() {
        let forge = MockForge::with_files("main", &[("a.txt", b"a".as_slice())]);
        let snapshot = load(&forge, &main()).await.unwrap();

        assert_eq!(snapshot.branch.head_tree, snapshot.tree.sha);
        assert_eq!(Some(snapshot.branch.head_commit.clone()), forge.head("main"));
        assert!(snapshot.find_entry("/a.txt").is_some());

        let ops = forge.operations();
        assert!(matches!(ops[0], MockOperation::GetBranch { .. }));
        assert!(matches!(ops[1], MockOperation::GetTree { .. }));
    }

    #[tokio::test]
    async fn load_propagates_remote_failure() {
        let forge = MockForge::with_files("main", &[]).fail_on(FailOn::GetTree(
            ForgeError::NetworkError("reset".into()),
        ));
        let result = load(&forge, &main()).await;
        assert!(matches!(
            result,
            Err(FsError::Remote(ForgeError::NetworkError(_)))
        ));
    }

    #[tokio::test]
    async fn refresh_branch_sees_external_commits() {
        let forge = MockForge::with_files("main", &[("a.txt", b"a".as_slice())]);
        let mut snapshot = load(&forge, &main()).await.unwrap();

        let pushed = forge.push_file("main", "b.txt", b"b").unwrap();
        refresh_branch(&forge, &mut snapshot).await.unwrap();
        assert_eq!(snapshot.branch.head_commit, pushed);

        // The tree stays stale until refreshed explicitly
        assert!(snapshot.find_entry("b.txt").is_none());
        let head_tree = snapshot.branch.head_tree.clone();
        refresh(&forge, &mut snapshot, &head_tree).await.unwrap();
        assert!(snapshot.find_entry("b.txt").is_some());
    }

    #[tokio::test]
    async fn refresh_replaces_local_entries() {
        let forge = MockForge::with_files("main", &[("a.txt", b"a".as_slice())]);
        let mut snapshot = load(&forge, &main()).await.unwrap();
        snapshot
            .tree
            .entries
            .push(crate::core::tree::TreeEntry::local_dir("scratch"));

        let sha = snapshot.tree.sha.clone();
        refresh(&forge, &mut snapshot, &sha).await.unwrap();
        assert!(snapshot.find_entry("scratch").is_none());
    }
}
