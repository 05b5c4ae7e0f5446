//! Resolution outcome types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A detected version change for one dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionUpdate {
    /// Upstream repository name
    pub repo: String,
    /// Previously recorded tag or commit
    pub from: String,
    /// Newly resolved tag or commit
    pub to: String,
    /// Compare link between `from` and `to`
    pub diff_url: String,
}

impl VersionUpdate {
    /// Creates a new version update
    pub fn new(
        repo: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        diff_url: impl Into<String>,
    ) -> Self {
        Self {
            repo: repo.into(),
            from: from.into(),
            to: to.into(),
            diff_url: diff_url.into(),
        }
    }
}

impl fmt::Display for VersionUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} → {}", self.repo, self.from, self.to)
    }
}

/// Latest upstream state for one dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Tag name, or the branch name when tracking a branch
    pub label: String,
    /// Commit SHA the label points at
    pub commit: String,
    /// Release publication time (tag tracking only)
    pub published_at: Option<DateTime<Utc>>,
    /// Present only when the upstream moved past the recorded state
    pub update: Option<VersionUpdate>,
}

impl Resolution {
    /// Returns true if the upstream changed
    pub fn has_update(&self) -> bool {
        self.update.is_some()
    }
}
