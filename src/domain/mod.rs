//! Core domain models for depsync
//!
//! - Dependency records as stored in versions.json
//! - Tracking modes (release tag or branch head)
//! - Resolution results and version updates

mod dependency;
mod update;

pub use dependency::{repo_url, Dependencies, DependencyRecord, Tracking, GITHUB_WEB_URL};
pub use update::{Resolution, VersionUpdate};
