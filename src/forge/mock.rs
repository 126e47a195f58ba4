//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock forge is a small in-memory git object store: blobs, trees and
//! commits keyed by synthetic content hashes, plus named branches. It
//! behaves like the hosted API where the adapter can observe it:
//!
//! - Trees can't hold empty directories; they vanish once their last file goes
//! - Deleting or replacing a file checks the caller's blob sha (409 on mismatch)
//! - Non-forced ref updates must be fast-forwards (422 otherwise)
//! - A tree entry of kind tree carrying a sha pulls in that whole subtree
//!
//! Every call is recorded as a [`MockOperation`], and any call can be made
//! to fail through [`FailOn`].
//!
//! # Example
//!
//! ```
//! use forgefs::forge::mock::MockForge;
//! use forgefs::forge::Forge;
//! use forgefs::core::types::BranchName;
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::with_files("main", &[("README.md", b"hello".as_slice())]);
//! let branch = forge.get_branch(&BranchName::new("main").unwrap()).await.unwrap();
//! let tree = forge.get_tree(&branch.head_tree).await.unwrap();
//! assert_eq!(tree.entries.len(), 1);
//! assert_eq!(tree.entries[0].path, "README.md");
//! # });
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use base64::Engine;
use sha2::{Digest, Sha256};

use super::traits::{
    Blob, BlobEncoding, CommitRef, CreateCommitRequest, DeleteFileRequest, Forge, ForgeError,
    PutFileRequest,
};
use crate::core::path;
use crate::core::tree::{
    BranchState, EntryKind, NewTreeEntry, TreeEntry, TreeSnapshot, MODE_FILE, MODE_TREE,
};
use crate::core::types::{BranchName, Oid};

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockForge {
    inner: Arc<Mutex<MockForgeInner>>,
}

#[derive(Debug, Clone)]
struct MockCommit {
    tree: Oid,
    parents: Vec<Oid>,
    message: String,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockForgeInner {
    blobs: HashMap<Oid, Vec<u8>>,
    /// Recursive listing (paths relative to the tree) for every tree.
    trees: HashMap<Oid, Vec<TreeEntry>>,
    commits: HashMap<Oid, MockCommit>,
    /// Branch name to head commit.
    branches: HashMap<String, Oid>,
    fail_on: Option<ArmedFailure>,
    operations: Vec<MockOperation>,
}

#[derive(Debug)]
struct ArmedFailure {
    fail_on: FailOn,
    /// Matching calls that still succeed before the failure fires.
    successes_left: usize,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    GetBranch(ForgeError),
    GetTree(ForgeError),
    GetBlob(ForgeError),
    DeleteFile(ForgeError),
    PutFile(ForgeError),
    CreateTree(ForgeError),
    CreateCommit(ForgeError),
    UpdateRef(ForgeError),
}

impl FailOn {
    fn error_for(&self, call: Call) -> Option<&ForgeError> {
        match (self, call) {
            (FailOn::GetBranch(e), Call::GetBranch)
            | (FailOn::GetTree(e), Call::GetTree)
            | (FailOn::GetBlob(e), Call::GetBlob)
            | (FailOn::DeleteFile(e), Call::DeleteFile)
            | (FailOn::PutFile(e), Call::PutFile)
            | (FailOn::CreateTree(e), Call::CreateTree)
            | (FailOn::CreateCommit(e), Call::CreateCommit)
            | (FailOn::UpdateRef(e), Call::UpdateRef) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    GetBranch,
    GetTree,
    GetBlob,
    DeleteFile,
    PutFile,
    CreateTree,
    CreateCommit,
    UpdateRef,
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    GetBranch {
        branch: String,
    },
    GetTree {
        sha: Oid,
    },
    GetBlob {
        sha: Oid,
    },
    DeleteFile {
        path: String,
        sha: Oid,
        branch: String,
        message: String,
    },
    PutFile {
        path: String,
        sha: Option<Oid>,
        branch: String,
        message: String,
        len: usize,
    },
    CreateTree {
        base_tree: Option<Oid>,
        paths: Vec<String>,
    },
    CreateCommit {
        tree: Oid,
        parents: Vec<Oid>,
        message: String,
    },
    UpdateRef {
        branch: String,
        sha: Oid,
        force: bool,
    },
}

/// Synthetic git-style object id: sha256 over a typed header, cut to 40 hex chars.
fn object_id(kind: &str, payload: &[u8]) -> Oid {
    let mut hasher = Sha256::new();
    hasher.update(format!("{} {}\0", kind, payload.len()).as_bytes());
    hasher.update(payload);
    let hex = hex::encode(hasher.finalize());
    Oid::new(&hex[..40]).unwrap_or_else(|_| unreachable!("sha256 hex is valid"))
}

fn validation(message: impl Into<String>) -> ForgeError {
    ForgeError::ApiError {
        status: 422,
        message: message.into(),
    }
}

impl MockForgeInner {
    fn record(&mut self, op: MockOperation) {
        self.operations.push(op);
    }

    fn check_fail(&mut self, call: Call) -> Result<(), ForgeError> {
        let Some(armed) = &mut self.fail_on else {
            return Ok(());
        };
        let Some(error) = armed.fail_on.error_for(call) else {
            return Ok(());
        };
        if armed.successes_left > 0 {
            armed.successes_left -= 1;
            return Ok(());
        }
        Err(error.clone())
    }

    fn put_blob(&mut self, content: &[u8]) -> Oid {
        let sha = object_id("blob", content);
        self.blobs.entry(sha.clone()).or_insert_with(|| content.to_vec());
        sha
    }

    /// Store a tree holding exactly `files` (path to blob sha and mode),
    /// with every intermediate directory, and return the root tree sha.
    fn store_tree(&mut self, files: &BTreeMap<String, (Oid, String)>) -> Oid {
        let mut dirs: BTreeSet<String> = BTreeSet::from([String::new()]);
        for file in files.keys() {
            dirs.extend(path::ancestors(file).into_iter().map(str::to_string));
        }

        // Deepest directories first so children hash before parents
        let mut ordered: Vec<&String> = dirs.iter().collect();
        ordered.sort_by_key(|d| {
            let depth = if d.is_empty() {
                0
            } else {
                d.matches('/').count() + 1
            };
            std::cmp::Reverse(depth)
        });

        let mut dir_sha: HashMap<String, Oid> = HashMap::new();
        for dir in ordered {
            let mut lines: Vec<String> = files
                .iter()
                .filter(|(p, _)| path::parent(p) == dir.as_str())
                .map(|(p, (sha, mode))| format!("{} blob {} {}", mode, sha, path::base_name(p)))
                .collect();
            for sub in dirs.iter().filter(|d| !d.is_empty() && path::parent(d) == dir.as_str()) {
                lines.push(format!("{} tree {} {}", MODE_TREE, dir_sha[sub], path::base_name(sub)));
            }
            lines.sort();
            dir_sha.insert(dir.clone(), object_id("tree", lines.join("\n").as_bytes()));
        }

        for dir in &dirs {
            let relative = |p: &str| -> String {
                if dir.is_empty() {
                    p.to_string()
                } else {
                    p[dir.len() + 1..].to_string()
                }
            };

            let mut listing: Vec<TreeEntry> = Vec::new();
            for sub in dirs.iter().filter(|d| path::is_descendant(d, dir)) {
                listing.push(TreeEntry {
                    path: relative(sub),
                    kind: EntryKind::Tree,
                    sha: Some(dir_sha[sub].clone()),
                    mode: MODE_TREE.to_string(),
                    size: None,
                    url: Some(format!("mock://trees/{}", dir_sha[sub])),
                });
            }
            for (p, (sha, mode)) in files.iter().filter(|(p, _)| path::is_descendant(p, dir)) {
                listing.push(TreeEntry {
                    path: relative(p),
                    kind: EntryKind::Blob,
                    sha: Some(sha.clone()),
                    mode: mode.clone(),
                    size: self.blobs.get(sha).map(|b| b.len() as u64),
                    url: Some(format!("mock://blobs/{}", sha)),
                });
            }
            listing.sort_by(|a, b| a.path.cmp(&b.path));
            self.trees.insert(dir_sha[dir].clone(), listing);
        }

        dir_sha[""].clone()
    }

    /// Blob map of a stored tree.
    fn files_of(&self, tree: &Oid) -> Option<BTreeMap<String, (Oid, String)>> {
        let listing = self.trees.get(tree)?;
        Some(
            listing
                .iter()
                .filter(|e| e.is_blob())
                .filter_map(|e| Some((e.path.clone(), (e.sha.clone()?, e.mode.clone()))))
                .collect(),
        )
    }

    fn head(&self, branch: &str) -> Result<(Oid, MockCommit), ForgeError> {
        let sha = self
            .branches
            .get(branch)
            .ok_or_else(|| ForgeError::NotFound(format!("Branch not found: {}", branch)))?;
        let commit = self
            .commits
            .get(sha)
            .ok_or_else(|| validation(format!("dangling branch {}", branch)))?;
        Ok((sha.clone(), commit.clone()))
    }

    fn commit(&mut self, tree: Oid, parents: Vec<Oid>, message: &str) -> Oid {
        let mut payload = format!("tree {}\n", tree);
        for parent in &parents {
            payload.push_str(&format!("parent {}\n", parent));
        }
        payload.push_str(&format!("seq {}\n\n{}", self.commits.len(), message));
        let sha = object_id("commit", payload.as_bytes());
        self.commits.insert(
            sha.clone(),
            MockCommit {
                tree,
                parents,
                message: message.to_string(),
            },
        );
        sha
    }

    /// Commit `files` on top of `branch` and advance it.
    fn commit_files(
        &mut self,
        branch: &str,
        files: &BTreeMap<String, (Oid, String)>,
        message: &str,
    ) -> Result<CommitRef, ForgeError> {
        let (parent, _) = self.head(branch)?;
        let tree = self.store_tree(files);
        let sha = self.commit(tree.clone(), vec![parent], message);
        self.branches.insert(branch.to_string(), sha.clone());
        Ok(CommitRef { sha, tree })
    }

    fn is_ancestor(&self, ancestor: &Oid, of: &Oid) -> bool {
        let mut stack = vec![of.clone()];
        let mut seen = BTreeSet::new();
        while let Some(sha) = stack.pop() {
            if &sha == ancestor {
                return true;
            }
            if !seen.insert(sha.clone()) {
                continue;
            }
            if let Some(commit) = self.commits.get(&sha) {
                stack.extend(commit.parents.iter().cloned());
            }
        }
        false
    }
}

impl MockForge {
    /// Create an empty mock forge with no branches.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockForgeInner::default())),
        }
    }

    /// Create a mock forge with one branch whose single commit holds `files`.
    pub fn with_files(branch: &str, files: &[(&str, &[u8])]) -> Self {
        let forge = Self::new();
        {
            let mut inner = forge.state();
            let mut map = BTreeMap::new();
            for (p, content) in files {
                let sha = inner.put_blob(content);
                map.insert(path::normalize(p).to_string(), (sha, MODE_FILE.to_string()));
            }
            let tree = inner.store_tree(&map);
            let commit = inner.commit(tree, Vec::new(), "initial commit");
            inner.branches.insert(branch.to_string(), commit);
        }
        forge
    }

    fn state(&self) -> MutexGuard<'_, MockForgeInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Configure the mock to fail on a specific operation.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.fail_on_after(fail_on, 0)
    }

    /// Fail the given operation after `successes` matching calls succeed.
    pub fn fail_on_after(self, fail_on: FailOn, successes: usize) -> Self {
        self.set_fail_on(fail_on, successes);
        self
    }

    /// Arm a failure on an existing (possibly shared) mock.
    pub fn set_fail_on(&self, fail_on: FailOn, successes: usize) {
        self.state().fail_on = Some(ArmedFailure {
            fail_on,
            successes_left: successes,
        });
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        self.state().fail_on = None;
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.state().operations.clone()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        self.state().operations.clear();
    }

    /// Head commit of a branch.
    pub fn head(&self, branch: &str) -> Option<Oid> {
        self.state().branches.get(branch).cloned()
    }

    /// Message of a commit.
    pub fn commit_message(&self, sha: &Oid) -> Option<String> {
        self.state().commits.get(sha).map(|c| c.message.clone())
    }

    /// Paths of all files on a branch, sorted.
    pub fn file_paths(&self, branch: &str) -> Vec<String> {
        let inner = self.state();
        inner
            .head(branch)
            .ok()
            .and_then(|(_, commit)| inner.files_of(&commit.tree))
            .map(|files| files.into_keys().collect())
            .unwrap_or_default()
    }

    /// Contents of a file on a branch.
    pub fn read_file(&self, branch: &str, file: &str) -> Option<Vec<u8>> {
        let inner = self.state();
        let (_, commit) = inner.head(branch).ok()?;
        let files = inner.files_of(&commit.tree)?;
        let (sha, _) = files.get(file)?;
        inner.blobs.get(sha).cloned()
    }

    /// Commit a file directly, as another client would, without recording it.
    pub fn push_file(&self, branch: &str, file: &str, content: &[u8]) -> Option<Oid> {
        let mut inner = self.state();
        let (_, commit) = inner.head(branch).ok()?;
        let mut files = inner.files_of(&commit.tree)?;
        let sha = inner.put_blob(content);
        files.insert(file.to_string(), (sha, MODE_FILE.to_string()));
        inner
            .commit_files(branch, &files, "external push")
            .ok()
            .map(|c| c.sha)
    }
}

impl Default for MockForge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn get_branch(&self, branch: &BranchName) -> Result<BranchState, ForgeError> {
        let mut inner = self.state();
        inner.record(MockOperation::GetBranch {
            branch: branch.to_string(),
        });
        inner.check_fail(Call::GetBranch)?;

        let (head_commit, commit) = inner.head(branch.as_str())?;
        Ok(BranchState {
            name: branch.clone(),
            head_commit,
            head_tree: commit.tree,
        })
    }

    async fn get_tree(&self, sha: &Oid) -> Result<TreeSnapshot, ForgeError> {
        let mut inner = self.state();
        inner.record(MockOperation::GetTree { sha: sha.clone() });
        inner.check_fail(Call::GetTree)?;

        let entries = inner
            .trees
            .get(sha)
            .cloned()
            .ok_or_else(|| ForgeError::NotFound(format!("tree {}", sha)))?;
        Ok(TreeSnapshot {
            sha: sha.clone(),
            entries,
        })
    }

    async fn get_blob(&self, sha: &Oid) -> Result<Blob, ForgeError> {
        let mut inner = self.state();
        inner.record(MockOperation::GetBlob { sha: sha.clone() });
        inner.check_fail(Call::GetBlob)?;

        let content = inner
            .blobs
            .get(sha)
            .ok_or_else(|| ForgeError::NotFound(format!("blob {}", sha)))?;

        // Wrapped at 60 columns, as the hosted API does
        let encoded = base64::engine::general_purpose::STANDARD.encode(content);
        let wrapped = encoded
            .as_bytes()
            .chunks(60)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Blob {
            sha: sha.clone(),
            content: wrapped,
            encoding: BlobEncoding::Base64,
            size: Some(content.len() as u64),
        })
    }

    async fn delete_file(&self, request: DeleteFileRequest) -> Result<CommitRef, ForgeError> {
        let mut inner = self.state();
        inner.record(MockOperation::DeleteFile {
            path: request.path.clone(),
            sha: request.sha.clone(),
            branch: request.branch.to_string(),
            message: request.message.clone(),
        });
        inner.check_fail(Call::DeleteFile)?;

        let (_, commit) = inner.head(request.branch.as_str())?;
        let mut files = inner
            .files_of(&commit.tree)
            .ok_or_else(|| validation("branch tree missing"))?;
        match files.get(&request.path) {
            None => return Err(ForgeError::NotFound(format!("file {}", request.path))),
            Some((sha, _)) if sha != &request.sha => {
                return Err(ForgeError::Conflict(format!(
                    "{} does not match {}",
                    request.path, request.sha
                )));
            }
            Some(_) => {}
        }
        files.remove(&request.path);
        inner.commit_files(request.branch.as_str(), &files, &request.message)
    }

    async fn put_file(&self, request: PutFileRequest) -> Result<CommitRef, ForgeError> {
        let mut inner = self.state();
        inner.record(MockOperation::PutFile {
            path: request.path.clone(),
            sha: request.sha.clone(),
            branch: request.branch.to_string(),
            message: request.message.clone(),
            len: request.content.len(),
        });
        inner.check_fail(Call::PutFile)?;

        let (_, commit) = inner.head(request.branch.as_str())?;
        let mut files = inner
            .files_of(&commit.tree)
            .ok_or_else(|| validation("branch tree missing"))?;
        match (files.get(&request.path), &request.sha) {
            (Some(_), None) => {
                return Err(validation(format!(
                    "\"sha\" wasn't supplied for existing file {}",
                    request.path
                )));
            }
            (Some((current, _)), Some(given)) if current != given => {
                return Err(ForgeError::Conflict(format!(
                    "{} does not match {}",
                    request.path, given
                )));
            }
            _ => {}
        }
        let sha = inner.put_blob(&request.content);
        files.insert(request.path.clone(), (sha, MODE_FILE.to_string()));
        inner.commit_files(request.branch.as_str(), &files, &request.message)
    }

    async fn create_tree(
        &self,
        base_tree: Option<&Oid>,
        entries: Vec<NewTreeEntry>,
    ) -> Result<Oid, ForgeError> {
        let mut inner = self.state();
        inner.record(MockOperation::CreateTree {
            base_tree: base_tree.cloned(),
            paths: entries.iter().map(|e| e.path.clone()).collect(),
        });
        inner.check_fail(Call::CreateTree)?;

        let mut files = match base_tree {
            Some(base) => inner
                .files_of(base)
                .ok_or_else(|| validation(format!("base_tree {} not found", base)))?,
            None => BTreeMap::new(),
        };

        for entry in entries {
            match (entry.kind, entry.sha) {
                // A null sha removes the path
                (_, None) => {
                    files.retain(|p, _| p != &entry.path && !path::is_descendant(p, &entry.path));
                }
                (EntryKind::Blob, Some(sha)) => {
                    if !inner.blobs.contains_key(&sha) {
                        return Err(validation(format!(
                            "tree.sha {} is not a valid blob",
                            sha
                        )));
                    }
                    files.insert(entry.path, (sha, entry.mode));
                }
                (EntryKind::Tree, Some(sha)) => {
                    let subtree = inner.files_of(&sha).ok_or_else(|| {
                        validation(format!("tree.sha {} is not a valid tree", sha))
                    })?;
                    for (p, blob) in subtree {
                        files.insert(format!("{}/{}", entry.path, p), blob);
                    }
                }
            }
        }

        Ok(inner.store_tree(&files))
    }

    async fn create_commit(&self, request: CreateCommitRequest) -> Result<CommitRef, ForgeError> {
        let mut inner = self.state();
        inner.record(MockOperation::CreateCommit {
            tree: request.tree.clone(),
            parents: request.parents.clone(),
            message: request.message.clone(),
        });
        inner.check_fail(Call::CreateCommit)?;

        if !inner.trees.contains_key(&request.tree) {
            return Err(validation(format!("tree {} not found", request.tree)));
        }
        if let Some(missing) = request
            .parents
            .iter()
            .find(|p| !inner.commits.contains_key(*p))
        {
            return Err(validation(format!("parent {} not found", missing)));
        }

        let sha = inner.commit(request.tree.clone(), request.parents, &request.message);
        Ok(CommitRef {
            sha,
            tree: request.tree,
        })
    }

    async fn update_ref(
        &self,
        branch: &BranchName,
        sha: &Oid,
        force: bool,
    ) -> Result<(), ForgeError> {
        let mut inner = self.state();
        inner.record(MockOperation::UpdateRef {
            branch: branch.to_string(),
            sha: sha.clone(),
            force,
        });
        inner.check_fail(Call::UpdateRef)?;

        if !inner.commits.contains_key(sha) {
            return Err(validation(format!("Object does not exist: {}", sha)));
        }
        let current = inner
            .branches
            .get(branch.as_str())
            .cloned()
            .ok_or_else(|| validation("Reference does not exist"))?;
        if !force && !inner.is_ancestor(&current, sha) {
            return Err(validation("Update is not a fast forward"));
        }
        inner.branches.insert(branch.to_string(), sha.clone());
        Ok(())
    }
}
