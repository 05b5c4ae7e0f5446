//! GitHub REST API adapter
//!
//! Endpoints used:
//! - `GET /repos/{owner}/{repo}/releases?per_page=N&page=P`
//! - `GET /repos/{owner}/{repo}/commits/{ref}`
//! - `GET /repos/{owner}/{repo}/commits?sha={branch}&per_page=1`

use crate::error::ResolveError;
use crate::github::{HttpClient, Release, ReleasePage, SourceHost};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

/// GitHub adapter
#[derive(Debug, Clone)]
pub struct GitHubAdapter {
    client: HttpClient,
}

/// Commit object as returned by the commits endpoints
#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
}

impl GitHubAdapter {
    /// Create a new GitHub adapter
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    fn releases_url(&self, owner: &str, repo: &str, page: u32, per_page: u32) -> Url {
        let mut url = self.client.endpoint(["repos", owner, repo, "releases"]);
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());
        url
    }

    /// Slashes in `reference` stay path separators; everything else is encoded
    fn commit_url(&self, owner: &str, repo: &str, reference: &str) -> Url {
        self.client.endpoint(
            ["repos", owner, repo, "commits"]
                .into_iter()
                .chain(reference.split('/')),
        )
    }

    fn branch_commits_url(&self, owner: &str, repo: &str, branch: &str) -> Url {
        let mut url = self.client.endpoint(["repos", owner, repo, "commits"]);
        url.query_pairs_mut()
            .append_pair("sha", branch)
            .append_pair("per_page", "1");
        url
    }
}

#[async_trait]
impl SourceHost for GitHubAdapter {
    fn host_name(&self) -> &'static str {
        "GitHub"
    }

    async fn list_releases(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u32,
    ) -> Result<ReleasePage, ResolveError> {
        let url = self.releases_url(owner, repo, page, per_page);
        let (releases, next_page): (Vec<Release>, _) = self.client.get_json_page(url.as_str()).await?;
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
        let url = self.commit_url(owner, repo, reference);
        let commit: CommitResponse = self.client.get_json(url.as_str()).await?;
        Ok(commit.sha)
    }

    async fn latest_branch_commit(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Option<String>, ResolveError> {
        let url = self.branch_commits_url(owner, repo, branch);
        let commits: Vec<CommitResponse> = self.client.get_json(url.as_str()).await?;
        Ok(commits.into_iter().next().map(|c| c.sha))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> GitHubAdapter {
        GitHubAdapter::new(HttpClient::new("token").unwrap())
    }

    #[test]
    fn test_host_name() {
        assert_eq!(adapter().host_name(), "GitHub");
    }

    #[test]
    fn test_releases_url() {
        assert_eq!(
            adapter()
                .releases_url("ethereum-optimism", "optimism", 2, 100)
                .as_str(),
            "https://api.github.com/repos/ethereum-optimism/optimism/releases?per_page=100&page=2"
        );
    }

    #[test]
    fn test_commit_url_with_nested_tag() {
        assert_eq!(
            adapter()
                .commit_url("ethereum-optimism", "optimism", "refs/tags/op-node/v1.13.4")
                .as_str(),
            "https://api.github.com/repos/ethereum-optimism/optimism/commits/refs/tags/op-node/v1.13.4"
        );
    }

    #[test]
    fn test_branch_commits_url() {
        assert_eq!(
            adapter()
                .branch_commits_url("base", "node-reth", "main")
                .as_str(),
            "https://api.github.com/repos/base/node-reth/commits?sha=main&per_page=1"
        );
    }

    #[test]
    fn test_commit_url_encodes_tag() {
        assert_eq!(
            adapter().commit_url("o", "r", "refs/tags/v1#rc?1%").as_str(),
            "https://api.github.com/repos/o/r/commits/refs/tags/v1%23rc%3F1%25"
        );
    }

    #[test]
    fn test_branch_commits_url_encodes_branch() {
        assert_eq!(
            adapter().branch_commits_url("o", "r", "feat&x#y").as_str(),
            "https://api.github.com/repos/o/r/commits?sha=feat%26x%23y&per_page=1"
        );
    }

    #[test]
    fn test_release_deserialize() {
        let json = r#"[
            {"tag_name": "v1.1.0", "published_at": "2025-01-02T03:04:05Z", "draft": false},
            {"tag_name": "v1.0.0", "published_at": null}
        ]"#;
        let releases: Vec<Release> = serde_json::from_str(json).unwrap();
        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0].tag_name, "v1.1.0");
        assert!(releases[0].published_at.is_some());
        assert!(releases[1].published_at.is_none());
    }

    #[test]
    fn test_commit_response_deserialize() {
        let json = r#"{"sha": "def456", "commit": {"message": "x"}}"#;
        let commit: CommitResponse = serde_json::from_str(json).unwrap();
        assert_eq!(commit.sha, "def456");
    }
}
