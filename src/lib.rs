//! depsync - dependency version synchronizer library
//!
//! This library keeps a `versions.json` manifest of pinned upstream
//! dependencies in sync with GitHub:
//! - Tag tracking (latest release, optionally filtered by tag prefix)
//! - Branch tracking (latest commit on a branch)
//! - `versions.env` export for shell consumers
//! - git commit or GitHub Actions output for detected changes

pub mod announce;
pub mod cli;
pub mod domain;
pub mod error;
pub mod github;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod resolver;
pub mod retry;
