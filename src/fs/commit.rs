//! fs::commit
//!
//! The tree, commit and ref calls that land a whole-tree rewrite on a branch.
//!
//! Ref updates are never forced: if another writer moved the branch since
//! the snapshot's head commit was read, the forge rejects the update and
//! the error reaches the caller unchanged.

use tracing::info;

use super::error::Result;
use crate::core::tree::{BranchState, NewTreeEntry};
use crate::core::types::Oid;
use crate::forge::{CommitRef, CreateCommitRequest, Forge};

/// Create a tree holding exactly `entries` (no base tree).
pub(crate) async fn build_tree(forge: &dyn Forge, entries: Vec<NewTreeEntry>) -> Result<Oid> {
    let count = entries.len();
    let sha = forge.create_tree(None, entries).await?;
    info!(tree = %sha.short(7), entries = count, "created tree");
    Ok(sha)
}

/// Commit `tree` on top of the branch head and move the branch to it.
pub(crate) async fn commit_tree(
    forge: &dyn Forge,
    branch: &BranchState,
    tree: &Oid,
    message: &str,
) -> Result<CommitRef> {
    let commit = forge
        .create_commit(CreateCommitRequest {
            message: message.to_string(),
            tree: tree.clone(),
            parents: vec![branch.head_commit.clone()],
        })
        .await?;
    forge.update_ref(&branch.name, &commit.sha, false).await?;
    info!(
        branch = %branch.name,
        commit = %commit.sha.short(7),
        parent = %branch.head_commit.short(7),
        "advanced branch"
    );
    Ok(commit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::BranchName;
    use crate::forge::mock::{FailOn, MockForge, MockOperation};
    use crate::forge::ForgeError;
    use crate::fs::{snapshot, FsError};

    async fn setup() -> (MockForge, BranchState) {
        let forge = MockForge::with_files("main", &[("a.txt", b"a".as_slice())]);
        let snap = snapshot::load(&forge, &BranchName::new("main").unwrap())
            .await
            .unwrap();
        forge.clear_operations();
        (forge, snap.branch)
    }

    #[tokio::test]
    async fn commit_uses_head_as_parent_and_never_forces() {
        let (forge, branch) = setup().await;

        let commit = commit_tree(&forge, &branch, &branch.head_tree, "msg")
            .await
            .unwrap();

        assert_eq!(forge.head("main"), Some(commit.sha.clone()));
        assert_eq!(
            forge.operations(),
            vec![
                MockOperation::CreateCommit {
                    tree: branch.head_tree.clone(),
                    parents: vec![branch.head_commit.clone()],
                    message: "msg".into(),
                },
                MockOperation::UpdateRef {
                    branch: "main".into(),
                    sha: commit.sha,
                    force: false,
                },
            ]
        );
    }

    #[tokio::test]
    async fn stale_head_is_rejected() {
        let (forge, branch) = setup().await;
        forge.push_file("main", "other.txt", b"o").unwrap();

        let result = commit_tree(&forge, &branch, &branch.head_tree, "msg").await;
        assert!(matches!(
            result,
            Err(FsError::Remote(ForgeError::ApiError { status: 422, .. }))
        ));
    }

    #[tokio::test]
    async fn commit_failure_skips_ref_update() {
        let (forge, branch) = setup().await;
        forge.set_fail_on(FailOn::CreateCommit(ForgeError::RateLimited), 0);

        let result = commit_tree(&forge, &branch, &branch.head_tree, "msg").await;
        assert!(matches!(result, Err(FsError::Remote(ForgeError::RateLimited))));
        assert!(!forge
            .operations()
            .iter()
            .any(|op| matches!(op, MockOperation::UpdateRef { .. })));
    }

    #[tokio::test]
    async fn build_tree_has_no_base() {
        let (forge, _) = setup().await;
        build_tree(&forge, Vec::new()).await.unwrap();
        assert_eq!(
            forge.operations(),
            vec![MockOperation::CreateTree {
                base_tree: None,
                paths: vec![],
            }]
        );
    }
}
