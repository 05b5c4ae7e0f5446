//! Recording dependency updates
//!
//! This module provides:
//! - Commit title and description generation
//! - `git commit` execution in the target repository
//! - GitHub Actions output (`$GITHUB_OUTPUT`) writing

use crate::domain::VersionUpdate;
use crate::error::AnnounceError;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Commit title prefix
const TITLE_PREFIX: &str = "chore: updated ";

/// First line of the commit description
const DESCRIPTION_HEADER: &str = "### Dependency Updates";

/// Generated commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    /// One-line title
    pub title: String,
    /// Multi-line body
    pub description: String,
}

/// Where the commit message goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Announcement {
    /// Run `git commit` in the repository
    Commit,
    /// Append to the GitHub Actions output file (`None` if GITHUB_OUTPUT is unset)
    GitHubOutput(Option<PathBuf>),
}

/// Build the commit title and description.
///
/// The title lists each repository once, sorted. The description keeps one
/// line per update in the given order.
pub fn build_commit_message(updates: &[VersionUpdate]) -> CommitMessage {
    let mut repos: Vec<&str> = updates.iter().map(|u| u.repo.as_str()).collect();
    repos.sort_unstable();
    repos.dedup();

    let description = std::iter::once(DESCRIPTION_HEADER.to_string())
        .chain(
            updates
                .iter()
                .map(|u| format!("**{}** - {}: [diff]({})", u.repo, u.to, u.diff_url)),
        )
        .collect::<Vec<_>>()
        .join("\n");

    CommitMessage {
        title: format!("{}{}", TITLE_PREFIX, repos.join(", ")),
        description,
    }
}

/// Trait for creating commits
pub trait CommitRunner {
    /// Commit all tracked changes in `repo_dir` with the given message
    fn commit(&self, repo_dir: &Path, message: &CommitMessage) -> Result<(), AnnounceError>;
}

/// Commit runner that shells out to git
#[derive(Debug, Default)]
pub struct SystemGit;

impl SystemGit {
    /// Create a new git runner
    pub fn new() -> Self {
        Self
    }

    /// Run a command and capture output
    fn run_command(&self, args: &[&str], working_dir: &Path) -> std::io::Result<Output> {
        Command::new("git")
            .args(args)
            .current_dir(working_dir)
            .output()
    }
}

impl CommitRunner for SystemGit {
    fn commit(&self, repo_dir: &Path, message: &CommitMessage) -> Result<(), AnnounceError> {
        let output = self
            .run_command(
                &["commit", "-am", &message.title, "-m", &message.description],
                repo_dir,
            )
            .map_err(|source| AnnounceError::Spawn {
                path: repo_dir.to_path_buf(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Err(AnnounceError::CommitFailed {
            status: output.status.to_string(),
            output: combined.trim().to_string(),
        })
    }
}

/// Render the GitHub Actions output entries for a message
pub fn github_output_content(message: &CommitMessage) -> String {
    let mut delimiter = String::from("EOF");
    while message.description.lines().any(|line| line == delimiter) {
        delimiter.push('_');
    }

    format!(
        "TITLE={}\nDESC<<{}\n{}\n{}\n",
        message.title, delimiter, message.description, delimiter
    )
}

/// Append the message to the GitHub Actions output file
pub fn write_github_output(path: &Path, message: &CommitMessage) -> Result<(), AnnounceError> {
    let to_error = |source| AnnounceError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(to_error)?;
    file.write_all(github_output_content(message).as_bytes())
        .map_err(to_error)
}

/// Deliver the message for the given updates
pub fn announce(
    announcement: &Announcement,
    runner: &dyn CommitRunner,
    repo_dir: &Path,
    updates: &[VersionUpdate],
) -> Result<CommitMessage, AnnounceError> {
    let message = build_commit_message(updates);

    match announcement {
        Announcement::Commit => runner.commit(repo_dir, &message)?,
        Announcement::GitHubOutput(Some(path)) => write_github_output(path, &message)?,
        Announcement::GitHubOutput(None) => return Err(AnnounceError::MissingOutputPath),
    }

    Ok(message)
}
