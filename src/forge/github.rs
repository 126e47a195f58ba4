//! forge::github
//!
//! GitHub forge implementation over the REST git data API.
//!
//! # Endpoints
//!
//! | Method | Endpoint |
//! |---|---|
//! | `get_branch` | `GET repos/{o}/{r}/branches/{branch}` |
//! | `get_tree` | `GET repos/{o}/{r}/git/trees/{sha}?recursive=1` |
//! | `get_blob` | `GET repos/{o}/{r}/git/blobs/{sha}` |
//! | `delete_file` | `DELETE repos/{o}/{r}/contents/{path}` |
//! | `put_file` | `PUT repos/{o}/{r}/contents/{path}` |
//! | `create_tree` | `POST repos/{o}/{r}/git/trees` |
//! | `create_commit` | `POST repos/{o}/{r}/git/commits` |
//! | `update_ref` | `PATCH repos/{o}/{r}/git/refs/heads/{branch}` |
//!
//! # Authentication
//!
//! A [`TokenProvider`] is consulted before every request. Auth failures
//! are reported, never retried.
//!
//! # Truncated trees
//!
//! GitHub caps recursive tree listings. A truncated listing is returned
//! as-is with a warning; paging through sub-trees is not implemented.
//!
//! # Example
//!
//! ```ignore
//! use forgefs::forge::github::GitHubForge;
//! use forgefs::auth::EnvTokenProvider;
//! use std::sync::Arc;
//!
//! let forge = GitHubForge::new_with_provider(
//!     Arc::new(EnvTokenProvider::new("GITHUB_TOKEN")),
//!     "octocat",
//!     "hello-world",
//! );
//! ```
//!
//! [`TokenProvider`]: crate::auth::TokenProvider

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::traits::{
    Blob, BlobEncoding, CommitRef, CreateCommitRequest, DeleteFileRequest, Forge, ForgeError,
    PutFileRequest,
};
use crate::auth::{StaticTokenProvider, TokenProvider};
use crate::core::tree::{BranchState, EntryKind, NewTreeEntry, TreeEntry, TreeSnapshot};
use crate::core::types::{BranchName, Oid};

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "forgefs";

/// GitHub forge implementation bound to one repository.
pub struct GitHubForge {
    /// HTTP client for making requests
    client: Client,
    /// Source of bearer tokens
    token_provider: Arc<dyn TokenProvider>,
    /// Repository owner (user or organization)
    owner: String,
    /// Repository name
    repo: String,
    /// API base URL (configurable for GitHub Enterprise)
    api_base: String,
}

// Custom Debug so the provider (and any token it holds) is never printed
impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl GitHubForge {
    /// Create a GitHub forge for `owner/repo` using `provider` for tokens.
    pub fn new_with_provider(
        provider: Arc<dyn TokenProvider>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self::new_with_provider_and_api_base(provider, owner, repo, DEFAULT_API_BASE)
    }

    /// Create a GitHub forge against a custom API base URL
    /// (e.g., `https://github.example.com/api/v3`).
    pub fn new_with_provider_and_api_base(
        provider: Arc<dyn TokenProvider>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            token_provider: provider,
            owner: owner.into(),
            repo: repo.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a GitHub forge with a fixed token.
    pub fn new(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self::new_with_provider(Arc::new(StaticTokenProvider::new(token)), owner, repo)
    }

    /// Create a GitHub forge from a remote URL (SSH or HTTPS).
    ///
    /// Returns `None` if the URL is not a github.com repository URL.
    pub fn from_remote_url_with_provider(
        url: &str,
        provider: Arc<dyn TokenProvider>,
    ) -> Option<Self> {
        let (owner, repo) = parse_github_url(url)?;
        Some(Self::new_with_provider(provider, owner, repo))
    }

    /// Get the repository owner.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Get the repository name.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Build common headers for API requests.
    async fn headers(&self) -> Result<HeaderMap, ForgeError> {
        let token = self
            .token_provider
            .bearer_token()
            .await
            .map_err(|e| ForgeError::AuthFailed(e.to_string()))?;

        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ForgeError::AuthFailed("token is not a valid header value".into()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Build URL for a repository endpoint.
    ///
    /// Each segment is percent-encoded separately, so repository paths
    /// containing spaces or `#` are safe to pass.
    fn repo_url<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, ForgeError> {
        let invalid =
            || ForgeError::NetworkError(format!("invalid API base URL '{}'", self.api_base));
        let mut url = Url::parse(&self.api_base).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.repo.as_str()])
            .extend(segments);
        Ok(url)
    }

    /// URL for a file path under `contents/`.
    fn contents_url(&self, path: &str) -> Result<Url, ForgeError> {
        self.repo_url(std::iter::once("contents").chain(path.split('/')))
    }

    /// Attach headers, send, and decode the JSON response.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ForgeError> {
        let response = request
            .headers(self.headers().await?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;
        self.handle_response(response).await
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, ForgeError> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            })
        } else {
            Err(Self::error_from_response(response, status).await)
        }
    }

    /// Map an error response to a `ForgeError`.
    async fn error_from_response(response: Response, status: StatusCode) -> ForgeError {
        let rate_limited = response
            .headers()
            .get("X-RateLimit-Remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "0");

        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        match status {
            StatusCode::FORBIDDEN if rate_limited => ForgeError::RateLimited,
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN => {
                ForgeError::AuthFailed(format!("Permission denied: {}", message))
            }
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            StatusCode::CONFLICT => ForgeError::Conflict(message),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn get_branch(&self, branch: &BranchName) -> Result<BranchState, ForgeError> {
        let url = self.repo_url(["branches", branch.as_str()])?;
        debug!(%url, "get branch");

        let gh: GitHubBranch = self.send(self.client.get(url)).await?;
        Ok(BranchState {
            name: BranchName::new(gh.name).map_err(invalid_response)?,
            head_commit: parse_oid(gh.commit.sha)?,
            head_tree: parse_oid(gh.commit.commit.tree.sha)?,
        })
    }

    async fn get_tree(&self, sha: &Oid) -> Result<TreeSnapshot, ForgeError> {
        let mut url = self.repo_url(["git", "trees", sha.as_str()])?;
        url.query_pairs_mut().append_pair("recursive", "1");
        debug!(%url, "get tree");

        let gh: GitHubTree = self.send(self.client.get(url)).await?;
        if gh.truncated {
            warn!(tree = %sha, entries = gh.tree.len(), "recursive tree listing was truncated");
        }
        gh.try_into()
    }

    async fn get_blob(&self, sha: &Oid) -> Result<Blob, ForgeError> {
        let url = self.repo_url(["git", "blobs", sha.as_str()])?;
        debug!(%url, "get blob");

        let gh: GitHubBlob = self.send(self.client.get(url)).await?;
        let encoding = match gh.encoding.as_str() {
            "base64" => BlobEncoding::Base64,
            "utf-8" | "utf8" => BlobEncoding::Utf8,
            other => {
                return Err(invalid_response(format!("unknown blob encoding '{}'", other)));
            }
        };
        Ok(Blob {
            sha: parse_oid(gh.sha)?,
            content: gh.content,
            encoding,
            size: gh.size,
        })
    }

    async fn delete_file(&self, request: DeleteFileRequest) -> Result<CommitRef, ForgeError> {
        let url = self.contents_url(&request.path)?;
        debug!(%url, branch = %request.branch, "delete file");

        let body = DeleteFileBody {
            message: &request.message,
            sha: request.sha.as_str(),
            branch: request.branch.as_str(),
        };
        let gh: GitHubContentCommit = self.send(self.client.delete(url).json(&body)).await?;
        gh.commit.try_into()
    }

    async fn put_file(&self, request: PutFileRequest) -> Result<CommitRef, ForgeError> {
        let url = self.contents_url(&request.path)?;
        debug!(%url, branch = %request.branch, bytes = request.content.len(), "put file");

        let body = PutFileBody {
            message: &request.message,
            content: base64::engine::general_purpose::STANDARD.encode(&request.content),
            sha: request.sha.as_ref().map(Oid::as_str),
            branch: request.branch.as_str(),
        };
        let gh: GitHubContentCommit = self.send(self.client.put(url).json(&body)).await?;
        gh.commit.try_into()
    }

    async fn create_tree(
        &self,
        base_tree: Option<&Oid>,
        entries: Vec<NewTreeEntry>,
    ) -> Result<Oid, ForgeError> {
        let url = self.repo_url(["git", "trees"])?;
        debug!(%url, entries = entries.len(), base = ?base_tree.map(Oid::as_str), "create tree");

        let body = CreateTreeBody {
            base_tree: base_tree.map(Oid::as_str),
            tree: &entries,
        };
        let gh: GitHubTree = self.send(self.client.post(url).json(&body)).await?;
        parse_oid(gh.sha)
    }

    async fn create_commit(&self, request: CreateCommitRequest) -> Result<CommitRef, ForgeError> {
        let url = self.repo_url(["git", "commits"])?;
        debug!(%url, tree = %request.tree, "create commit");

        let body = CreateCommitBody {
            message: &request.message,
            tree: request.tree.as_str(),
            parents: request.parents.iter().map(Oid::as_str).collect(),
        };
        let gh: GitHubGitCommit = self.send(self.client.post(url).json(&body)).await?;
        gh.try_into()
    }

    async fn update_ref(
        &self,
        branch: &BranchName,
        sha: &Oid,
        force: bool,
    ) -> Result<(), ForgeError> {
        let ref_path = branch.ref_path();
        let url = self.repo_url(["git", "refs"].into_iter().chain(ref_path.split('/')))?;
        debug!(%url, %sha, force, "update ref");

        let body = UpdateRefBody {
            sha: sha.as_str(),
            force,
        };
        let _: IgnoredAny = self.send(self.client.patch(url).json(&body)).await?;
        Ok(())
    }
}

fn invalid_response(message: impl std::fmt::Display) -> ForgeError {
    ForgeError::ApiError {
        status: 200,
        message: format!("unexpected response: {}", message),
    }
}

fn parse_oid(sha: String) -> Result<Oid, ForgeError> {
    Oid::new(sha).map_err(invalid_response)
}

// =============================================================================
// GitHub API Types (internal)
// =============================================================================

#[derive(Debug, Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GitHubSha {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GitHubBranch {
    name: String,
    commit: GitHubBranchCommit,
}

#[derive(Debug, Deserialize)]
struct GitHubBranchCommit {
    sha: String,
    commit: GitHubBranchCommitDetail,
}

#[derive(Debug, Deserialize)]
struct GitHubBranchCommitDetail {
    tree: GitHubSha,
}

#[derive(Debug, Deserialize)]
struct GitHubTree {
    sha: String,
    #[serde(default)]
    tree: Vec<GitHubTreeItem>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct GitHubTreeItem {
    path: String,
    mode: String,
    #[serde(rename = "type")]
    kind: String,
    sha: Option<String>,
    size: Option<u64>,
    url: Option<String>,
}

impl TryFrom<GitHubTree> for TreeSnapshot {
    type Error = ForgeError;

    fn try_from(gh: GitHubTree) -> Result<Self, Self::Error> {
        let mut entries = Vec::with_capacity(gh.tree.len());
        for item in gh.tree {
            // Submodule links ("commit") have no place in a file view
            let Some(kind) = EntryKind::parse(&item.kind) else {
                debug!(path = %item.path, kind = %item.kind, "skipping tree entry");
                continue;
            };
            entries.push(TreeEntry {
                path: item.path,
                kind,
                sha: item.sha.map(parse_oid).transpose()?,
                mode: item.mode,
                size: item.size,
                url: item.url,
            });
        }
        Ok(TreeSnapshot {
            sha: parse_oid(gh.sha)?,
            entries,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GitHubBlob {
    sha: String,
    content: String,
    encoding: String,
    size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct GitHubContentCommit {
    commit: GitHubGitCommit,
}

#[derive(Debug, Deserialize)]
struct GitHubGitCommit {
    sha: String,
    tree: GitHubSha,
}

impl TryFrom<GitHubGitCommit> for CommitRef {
    type Error = ForgeError;

    fn try_from(gh: GitHubGitCommit) -> Result<Self, Self::Error> {
        Ok(CommitRef {
            sha: parse_oid(gh.sha)?,
            tree: parse_oid(gh.tree.sha)?,
        })
    }
}

#[derive(Debug, Serialize)]
struct DeleteFileBody<'a> {
    message: &'a str,
    sha: &'a str,
    branch: &'a str,
}

#[derive(Debug, Serialize)]
struct PutFileBody<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    branch: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateTreeBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    base_tree: Option<&'a str>,
    tree: &'a [NewTreeEntry],
}

#[derive(Debug, Serialize)]
struct CreateCommitBody<'a> {
    message: &'a str,
    tree: &'a str,
    parents: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct UpdateRefBody<'a> {
    sha: &'a str,
    force: bool,
}

/// Parse a GitHub remote URL into (owner, repo).
///
/// Supports SSH (`git@github.com:owner/repo.git`) and HTTP(S)
/// (`https://github.com/owner/repo.git`) forms.
///
/// ```
/// use forgefs::forge::github::parse_github_url;
///
/// let (owner, repo) = parse_github_url("git@github.com:octocat/hello-world.git").unwrap();
/// assert_eq!(owner, "octocat");
/// assert_eq!(repo, "hello-world");
/// ```
pub fn parse_github_url(url: &str) -> Option<(String, String)> {
    let rest = url
        .strip_prefix("git@github.com:")
        .or_else(|| url.strip_prefix("https://github.com/"))
        .or_else(|| url.strip_prefix("http://github.com/"))?;
    let rest = rest.strip_suffix(".git").unwrap_or(rest);

    match rest.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Some((owner.to_string(), repo.to_string()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parse_github_url {
        use super::*;

        #[test]
        fn ssh_and_https_forms() {
            for url in [
                "git@github.com:octocat/hello-world.git",
                "git@github.com:octocat/hello-world",
                "https://github.com/octocat/hello-world.git",
                "https://github.com/octocat/hello-world",
                "http://github.com/octocat/hello-world.git",
            ] {
                assert_eq!(
                    parse_github_url(url),
                    Some(("octocat".to_string(), "hello-world".to_string())),
                    "{url}"
                );
            }
        }

        #[test]
        fn non_github_url() {
            assert!(parse_github_url("git@gitlab.com:owner/repo.git").is_none());
            assert!(parse_github_url("https://bitbucket.org/owner/repo").is_none());
        }

        #[test]
        fn invalid_format() {
            assert!(parse_github_url("not a url").is_none());
            assert!(parse_github_url("https://github.com/").is_none());
            assert!(parse_github_url("https://github.com/owner").is_none());
            assert!(parse_github_url("https://github.com/owner/repo/tree/main").is_none());
        }

        #[test]
        fn repo_with_dots() {
            let result = parse_github_url("git@github.com:owner/repo.name.git");
            assert_eq!(result, Some(("owner".to_string(), "repo.name".to_string())));
        }
    }

    mod github_forge {
        use super::*;

        #[test]
        fn new_creates_forge() {
            let forge = GitHubForge::new("token", "owner", "repo");
            assert_eq!(forge.name(), "github");
            assert_eq!(forge.owner(), "owner");
            assert_eq!(forge.repo(), "repo");
            assert_eq!(forge.api_base(), DEFAULT_API_BASE);
        }

        #[test]
        fn api_base_trailing_slash_trimmed() {
            let forge = GitHubForge::new_with_provider_and_api_base(
                Arc::new(StaticTokenProvider::new("t")),
                "owner",
                "repo",
                "https://github.example.com/api/v3/",
            );
            assert_eq!(forge.api_base(), "https://github.example.com/api/v3");
            assert_eq!(
                forge.repo_url(["git", "trees"]).unwrap().as_str(),
                "https://github.example.com/api/v3/repos/owner/repo/git/trees"
            );
        }

        #[test]
        fn repo_url_format() {
            let forge = GitHubForge::new("token", "octocat", "hello-world");
            assert_eq!(
                forge.repo_url(["branches", "main"]).unwrap().as_str(),
                "https://api.github.com/repos/octocat/hello-world/branches/main"
            );
        }

        #[test]
        fn contents_url_encodes_segments() {
            let forge = GitHubForge::new("token", "octocat", "hello-world");
            assert_eq!(
                forge.contents_url("docs/my notes#1.md").unwrap().as_str(),
                "https://api.github.com/repos/octocat/hello-world/contents/docs/my%20notes%231.md"
            );
        }

        #[test]
        fn invalid_api_base_is_error() {
            let forge = GitHubForge::new_with_provider_and_api_base(
                Arc::new(StaticTokenProvider::new("t")),
                "o",
                "r",
                "not a url",
            );
            assert!(matches!(
                forge.repo_url(["x"]),
                Err(ForgeError::NetworkError(_))
            ));
        }

        #[test]
        fn from_remote_url_with_provider() {
            let provider: Arc<dyn TokenProvider> = Arc::new(StaticTokenProvider::new("t"));
            let forge = GitHubForge::from_remote_url_with_provider(
                "git@github.com:o/r.git",
                provider.clone(),
            )
            .unwrap();
            assert_eq!(forge.owner(), "o");
            assert_eq!(forge.repo(), "r");
            assert!(GitHubForge::from_remote_url_with_provider("https://gitlab.com/o/r", provider)
                .is_none());
        }

        #[test]
        fn debug_does_not_expose_token() {
            let forge = GitHubForge::new("secret_token_abc123", "owner", "repo");
            let debug_output = format!("{:?}", forge);
            assert!(!debug_output.contains("secret_token_abc123"));
            assert!(debug_output.contains("owner"));
        }

        #[tokio::test]
        async fn headers_carry_bearer_token() {
            let forge = GitHubForge::new("abc", "o", "r");
            let headers = forge.headers().await.unwrap();
            assert_eq!(headers[AUTHORIZATION], "Bearer abc");
            assert_eq!(headers[USER_AGENT], USER_AGENT_VALUE);
        }

        #[tokio::test]
        async fn headers_fail_without_token() {
            let forge = GitHubForge::new("", "o", "r");
            assert!(matches!(
                forge.headers().await,
                Err(ForgeError::AuthFailed(_))
            ));
        }
    }

    mod conversions {
        use super::*;

        const SHA_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
        const SHA_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

        #[test]
        fn tree_skips_submodules() {
            let gh: GitHubTree = serde_json::from_value(serde_json::json!({
                "sha": SHA_A,
                "truncated": false,
                "tree": [
                    {
                        "path": "README.md", "mode": "100644", "type": "blob",
                        "sha": SHA_B, "size": 12, "url": "u"
                    },
                    {"path": "src", "mode": "040000", "type": "tree", "sha": SHA_B},
                    {"path": "vendor/lib", "mode": "160000", "type": "commit", "sha": SHA_B}
                ]
            }))
            .unwrap();

            let tree = TreeSnapshot::try_from(gh).unwrap();
            assert_eq!(tree.sha.as_str(), SHA_A);
            assert_eq!(tree.entries.len(), 2);
            assert_eq!(tree.entries[0].kind, EntryKind::Blob);
            assert_eq!(tree.entries[0].size, Some(12));
            assert_eq!(tree.entries[1].kind, EntryKind::Tree);
            assert_eq!(tree.entries[1].size, None);
        }

        #[test]
        fn tree_with_bad_sha_is_error() {
            let gh: GitHubTree = serde_json::from_value(serde_json::json!({
                "sha": "nope",
                "tree": []
            }))
            .unwrap();
            assert!(matches!(
                TreeSnapshot::try_from(gh),
                Err(ForgeError::ApiError { .. })
            ));
        }

        #[test]
        fn commit_ref_from_git_commit() {
            let gh: GitHubGitCommit = serde_json::from_value(serde_json::json!({
                "sha": SHA_A,
                "tree": {"sha": SHA_B, "url": "ignored"},
                "message": "ignored"
            }))
            .unwrap();
            let commit = CommitRef::try_from(gh).unwrap();
            assert_eq!(commit.sha.as_str(), SHA_A);
            assert_eq!(commit.tree.as_str(), SHA_B);
        }

        #[test]
        fn create_tree_body_omits_missing_base() {
            let entries = vec![NewTreeEntry {
                path: "a.txt".into(),
                mode: "100644".into(),
                kind: EntryKind::Blob,
                sha: Some(Oid::new(SHA_A).unwrap()),
            }];
            let body = serde_json::to_value(CreateTreeBody {
                base_tree: None,
                tree: &entries,
            })
            .unwrap();
            assert!(body.get("base_tree").is_none());
            assert_eq!(body["tree"][0]["type"], "blob");
            assert_eq!(body["tree"][0]["sha"], SHA_A);
        }

        #[test]
        fn put_body_omits_sha_for_new_files() {
            let body = serde_json::to_value(PutFileBody {
                message: "m",
                content: "aGk=".into(),
                sha: None,
                branch: "main",
            })
            .unwrap();
            assert!(body.get("sha").is_none());
            assert_eq!(body["content"], "aGk=");
        }
    }
}
