//! Mock source host for deterministic testing
//!
//! Stores release pages, tag commits and branch heads in memory, records
//! every call, and can be told to fail a number of upcoming calls.
//!
//! ```
//! use depsync::github::{MockSourceHost, SourceHost};
//!
//! # tokio_test_block_on(async {
//! let host = MockSourceHost::new()
//!     .with_release_pages("ethereum", "go-ethereum", vec![vec!["v1.1.0", "v1.0.0"]])
//!     .with_ref_commit("ethereum", "go-ethereum", "refs/tags/v1.1.0", "abc");
//!
//! let page = host.list_releases("ethereum", "go-ethereum", 1, 100).await.unwrap();
//! assert_eq!(page.releases[0].tag_name, "v1.1.0");
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

use crate::error::{NotFoundError, ResolveError};
use crate::github::{Release, ReleasePage, SourceHost};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock source host.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockSourceHost {
    inner: Arc<Mutex<MockInner>>,
}

#[derive(Debug, Default)]
struct MockInner {
    /// Release pages by "owner/repo"
    releases: HashMap<String, Vec<Vec<Release>>>,
    /// Commit SHAs by "owner/repo@ref"
    refs: HashMap<String, String>,
    /// Branch head commits by "owner/repo#branch"; `None` means empty history
    branches: HashMap<String, Option<String>>,
    /// Errors returned by the next calls, in order
    failures: Vec<ResolveError>,
    /// Recorded calls
    calls: Vec<MockCall>,
}

/// Recorded call for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    ListReleases {
        owner: String,
        repo: String,
        page: u32,
        per_page: u32,
    },
    CommitSha {
        owner: String,
        repo: String,
        reference: String,
    },
    LatestBranchCommit {
        owner: String,
        repo: String,
        branch: String,
    },
}

fn repo_key(owner: &str, repo: &str) -> String {
    format!("{}/{}", owner, repo)
}

impl MockSourceHost {
    /// Create an empty mock host
    pub fn new() -> Self {
        Self::default()
    }

    /// Register release pages (newest first) for a repository
    pub fn with_release_pages(self, owner: &str, repo: &str, pages: Vec<Vec<&str>>) -> Self {
        let pages = pages
            .into_iter()
            .map(|page| page.into_iter().map(Release::new).collect())
            .collect();
        self.lock().releases.insert(repo_key(owner, repo), pages);
        self
    }

    /// Register the commit a ref resolves to
    pub fn with_ref_commit(self, owner: &str, repo: &str, reference: &str, sha: &str) -> Self {
        self.lock().refs.insert(
            format!("{}@{}", repo_key(owner, repo), reference),
            sha.to_string(),
        );
        self
    }

    /// Register a release tag together with the commit it points at
    pub fn with_tag_commit(self, owner: &str, repo: &str, tag: &str, sha: &str) -> Self {
        self.with_ref_commit(owner, repo, &format!("refs/tags/{}", tag), sha)
    }

    /// Register the head commit of a branch (`None` for an empty branch)
    pub fn with_branch_head(self, owner: &str, repo: &str, branch: &str, sha: Option<&str>) -> Self {
        self.lock().branches.insert(
            format!("{}#{}", repo_key(owner, repo), branch),
            sha.map(str::to_string),
        );
        self
    }

    /// Make the next call fail with the given error
    pub fn fail_next(&self, error: impl Into<ResolveError>) {
        self.lock().failures.push(error.into());
    }

    /// Replace the head commit of a branch
    pub fn set_branch_head(&self, owner: &str, repo: &str, branch: &str, sha: &str) {
        self.lock().branches.insert(
            format!("{}#{}", repo_key(owner, repo), branch),
            Some(sha.to_string()),
        );
    }

    /// All calls made so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: MockCall) -> Result<(), ResolveError> {
        let mut inner = self.lock();
        inner.calls.push(call);
        if inner.failures.is_empty() {
            Ok(())
        } else {
            Err(inner.failures.remove(0))
        }
    }
}

#[async_trait]
impl SourceHost for MockSourceHost {
    fn host_name(&self) -> &'static str {
        "mock"
    }

    async fn list_releases(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u32,
    ) -> Result<ReleasePage, ResolveError> {
        self.record(MockCall::ListReleases {
            owner: owner.to_string(),
            repo: repo.to_string(),
            page,
            per_page,
        })?;

        let inner = self.lock();
        let pages = inner
            .releases
            .get(&repo_key(owner, repo))
            .ok_or_else(|| NotFoundError::Resource {
                url: format!("mock://{}/releases", repo_key(owner, repo)),
            })?;

        let index = page.saturating_sub(1) as usize;
        let releases = pages.get(index).cloned().unwrap_or_default();
        let next_page = if index + 1 < pages.len() {
            Some(page + 1)
        } else {
            None
        };

        Ok(ReleasePage {
            releases,
            next_page,
        })
    }

    async fn commit_sha(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
    ) -> Result<String, ResolveError> {
        self.record(MockCall::CommitSha {
            owner: owner.to_string(),
            repo: repo.to_string(),
            reference: reference.to_string(),
        })?;

        let key = format!("{}@{}", repo_key(owner, repo), reference);
        self.lock().refs.get(&key).cloned().ok_or_else(|| {
            NotFoundError::Resource {
                url: format!("mock://{}", key),
            }
            .into()
        })
    }

    async fn latest_branch_commit(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Option<String>, ResolveError> {
        self.record(MockCall::LatestBranchCommit {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
        })?;

        let key = format!("{}#{}", repo_key(owner, repo), branch);
        self.lock().branches.get(&key).cloned().ok_or_else(|| {
            NotFoundError::Resource {
                url: format!("mock://{}", key),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpstreamError;

    #[tokio::test]
    async fn test_release_pagination() {
        let host = MockSourceHost::new().with_release_pages(
            "o",
            "r",
            vec![vec!["v3", "v2"], vec!["v1"]],
        );

        let first = host.list_releases("o", "r", 1, 100).await.unwrap();
        assert_eq!(first.releases.len(), 2);
        assert_eq!(first.next_page, Some(2));

        let second = host.list_releases("o", "r", 2, 100).await.unwrap();
        assert_eq!(second.releases[0].tag_name, "v1");
        assert_eq!(second.next_page, None);
    }

    #[tokio::test]
    async fn test_unknown_repo_is_not_found() {
        let host = MockSourceHost::new();
        let err = host.list_releases("o", "missing", 1, 100).await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_fail_next_consumes_in_order() {
        let host = MockSourceHost::new().with_branch_head("o", "r", "main", Some("abc"));
        host.fail_next(UpstreamError::timeout("mock://o/r"));

        assert!(host.latest_branch_commit("o", "r", "main").await.is_err());
        assert_eq!(
            host.latest_branch_commit("o", "r", "main").await.unwrap(),
            Some("abc".to_string())
        );
        assert_eq!(host.call_count(), 2);
    }

    #[tokio::test]
    async fn test_tag_commit_lookup() {
        let host = MockSourceHost::new().with_tag_commit("o", "r", "op-node/v1.0.0", "sha1");
        let sha = host.commit_sha("o", "r", "refs/tags/op-node/v1.0.0").await.unwrap();
        assert_eq!(sha, "sha1");
        assert_eq!(
            host.calls(),
            vec![MockCall::CommitSha {
                owner: "o".to_string(),
                repo: "r".to_string(),
                reference: "refs/tags/op-node/v1.0.0".to_string(),
            }]
        );
    }
}
