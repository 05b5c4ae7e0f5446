//! Dependency records tracked in versions.json

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Base URL used for repository and compare links
pub const GITHUB_WEB_URL: &str = "https://github.com";

/// All tracked dependencies keyed by name
pub type Dependencies = BTreeMap<String, DependencyRecord>;

/// Web URL of an upstream repository
pub fn repo_url(owner: &str, repo: &str) -> String {
    format!("{}/{}/{}", GITHUB_WEB_URL, owner, repo)
}

/// How a dependency follows its upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tracking", rename_all = "lowercase")]
pub enum Tracking {
    /// Follow the newest release, optionally restricted to a tag prefix
    Tag {
        #[serde(
            rename = "tagPrefix",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        tag_prefix: Option<String>,
    },
    /// Follow the head commit of a branch
    Branch { branch: String },
}

impl Tracking {
    /// Tag tracking without a prefix
    pub fn tag() -> Self {
        Tracking::Tag { tag_prefix: None }
    }

    /// Tag tracking restricted to tags starting with `prefix`
    pub fn tag_with_prefix(prefix: impl Into<String>) -> Self {
        Tracking::Tag {
            tag_prefix: Some(prefix.into()),
        }
    }

    /// Branch tracking
    pub fn branch(branch: impl Into<String>) -> Self {
        Tracking::Branch {
            branch: branch.into(),
        }
    }
}

impl fmt::Display for Tracking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tracking::Tag { tag_prefix } => match tag_prefix.as_deref() {
                Some(prefix) if !prefix.is_empty() => write!(f, "tag ({}*)", prefix),
                _ => write!(f, "tag"),
            },
            Tracking::Branch { branch } => write!(f, "branch {}", branch),
        }
    }
}

/// One tracked upstream dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    /// Last recorded tag (the branch name when tracking a branch)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
    /// Last resolved commit SHA
    pub commit: String,
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Tracking mode and its mode-specific fields
    #[serde(flatten)]
    pub tracking: Tracking,
}

impl DependencyRecord {
    /// Creates a new record
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        tracking: Tracking,
        tag: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            commit: commit.into(),
            owner: owner.into(),
            repo: repo.into(),
            tracking,
        }
    }

    /// Non-empty tag prefix, if any
    pub fn tag_prefix(&self) -> Option<&str> {
        match &self.tracking {
            Tracking::Tag { tag_prefix } => tag_prefix.as_deref().filter(|p| !p.is_empty()),
            Tracking::Branch { .. } => None,
        }
    }

    /// Web URL of the upstream repository
    pub fn repo_url(&self) -> String {
        repo_url(&self.owner, &self.repo)
    }

    /// Label exported as the TAG value
    pub fn version_label(&self) -> &str {
        match &self.tracking {
            Tracking::Tag { .. } => &self.tag,
            Tracking::Branch { branch } => branch,
        }
    }
}

impl fmt::Display for DependencyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}@{} [{}]",
            self.owner,
            self.repo,
            self.version_label(),
            self.tracking
        )
    }
}
