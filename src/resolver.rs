//! Upstream resolution for one dependency
//!
//! Tag tracking walks the release listing newest-first and picks the first
//! release whose tag starts with the configured prefix (or simply the first
//! release when there is no prefix), then resolves that tag to a commit.
//! Branch tracking reads the head commit of the branch.
//!
//! Both produce a [`Resolution`]; it carries a [`VersionUpdate`] only when
//! the upstream moved past what the record holds.

use crate::domain::{repo_url, DependencyRecord, Resolution, Tracking, VersionUpdate};
use crate::error::{NotFoundError, ResolveError};
use crate::github::{Release, SourceHost, RELEASES_PER_PAGE};

/// Resolves dependency records against a source host
pub struct Resolver<'a> {
    host: &'a dyn SourceHost,
    per_page: u32,
}

impl<'a> Resolver<'a> {
    /// Create a resolver using the default page size
    pub fn new(host: &'a dyn SourceHost) -> Self {
        Self {
            host,
            per_page: RELEASES_PER_PAGE,
        }
    }

    /// Determine the latest upstream state for a record
    pub async fn resolve(&self, record: &DependencyRecord) -> Result<Resolution, ResolveError> {
        match &record.tracking {
            Tracking::Tag { .. } => self.resolve_tag(record).await,
            Tracking::Branch { branch } => self.resolve_branch(record, branch).await,
        }
    }

    async fn resolve_tag(&self, record: &DependencyRecord) -> Result<Resolution, ResolveError> {
        let release = self.find_release(record).await?;
        let Release {
            tag_name: tag,
            published_at,
        } = release;

        let commit = self
            .host
            .commit_sha(&record.owner, &record.repo, &format!("refs/tags/{}", tag))
            .await?;

        let update = (tag != record.tag).then(|| {
            VersionUpdate::new(
                &record.repo,
                &record.tag,
                &tag,
                compare_url(&record.owner, &record.repo, &record.tag, &tag),
            )
        });

        Ok(Resolution {
            label: tag,
            commit,
            published_at,
            update,
        })
    }

    async fn resolve_branch(
        &self,
        record: &DependencyRecord,
        branch: &str,
    ) -> Result<Resolution, ResolveError> {
        let commit = self
            .host
            .latest_branch_commit(&record.owner, &record.repo, branch)
            .await?
            .ok_or_else(|| NotFoundError::empty_branch(&record.owner, &record.repo, branch))?;

        let update = (commit != record.commit).then(|| {
            VersionUpdate::new(
                &record.repo,
                &record.commit,
                &commit,
                compare_url(&record.owner, &record.repo, &record.commit, &commit),
            )
        });

        Ok(Resolution {
            label: branch.to_string(),
            commit,
            published_at: None,
            update,
        })
    }

    /// Find the newest release eligible for the record's tag prefix
    async fn find_release(&self, record: &DependencyRecord) -> Result<Release, ResolveError> {
        let prefix = record.tag_prefix();
        let mut page = 1;

        loop {
            let listing = self
                .host
                .list_releases(&record.owner, &record.repo, page, self.per_page)
                .await?;

            let found = match prefix {
                None => listing.releases.into_iter().next(),
                Some(prefix) => listing
                    .releases
                    .into_iter()
                    .find(|r| r.tag_name.starts_with(prefix)),
            };

            if let Some(release) = found {
                return Ok(release);
            }

            // Without a prefix only the newest release is considered
            match (prefix, listing.next_page) {
                (Some(_), Some(next)) if next > page => page = next,
                _ => {
                    return Err(NotFoundError::no_suitable_release(
                        &record.owner,
                        &record.repo,
                        prefix.unwrap_or_default(),
                    )
                    .into())
                }
            }
        }
    }
}

/// Compare link between two refs or commits
pub fn compare_url(owner: &str, repo: &str, from: &str, to: &str) -> String {
    format!("{}/compare/{}...{}", repo_url(owner, repo), from, to)
}

/// Record the resolved state; returns the update if one was applied.
///
/// A branch-tracked record always takes the branch name as its tag.
pub fn apply_resolution(
    record: &mut DependencyRecord,
    resolution: Resolution,
) -> Option<VersionUpdate> {
    if matches!(record.tracking, Tracking::Branch { .. }) {
        record.tag = resolution.label.clone();
    }

    let update = resolution.update?;
    record.tag = resolution.label;
    record.commit = resolution.commit;
    Some(update)
}
