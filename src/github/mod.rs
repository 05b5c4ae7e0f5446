//! Source-hosting adapters for fetching release and commit information
//!
//! This module provides:
//! - HTTP client shared foundation with auth headers and timeouts
//! - GitHub REST API adapter
//! - In-memory mock adapter for tests

mod client;
mod api;
pub mod mock;

pub use client::{next_page, HttpClient, DEFAULT_API_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use api::GitHubAdapter;
pub use mock::MockSourceHost;

use crate::error::ResolveError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Number of releases requested per page
pub const RELEASES_PER_PAGE: u32 = 100;

/// A published release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Git tag the release points at
    pub tag_name: String,
    /// Publication time, absent for drafts
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl Release {
    /// Creates a release without a publication date
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            published_at: None,
        }
    }
}

/// One page of a release listing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReleasePage {
    /// Releases on this page, newest first
    pub releases: Vec<Release>,
    /// Next page number, if there is one
    pub next_page: Option<u32>,
}

/// Trait for source-hosting adapters
#[async_trait]
pub trait SourceHost: Send + Sync {
    /// Get the host name used in messages
    fn host_name(&self) -> &'static str;

    /// List one page of releases, newest first
    async fn list_releases(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u32,
    ) -> Result<ReleasePage, ResolveError>;

    /// Resolve a ref (e.g. `refs/tags/v1.0.0`) to a commit SHA
    async fn commit_sha(&self, owner: &str, repo: &str, reference: &str)
        -> Result<String, ResolveError>;

    /// Most recent commit SHA on a branch, `None` if the branch has no commits
    async fn latest_branch_commit(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Option<String>, ResolveError>;
}
