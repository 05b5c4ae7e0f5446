//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ConfigError: manifest missing or malformed, invalid CLI values
//! - UpstreamError: GitHub API or network failures
//! - NotFoundError: no matching release, empty branch, unknown repository
//! - PersistenceError: writing versions.json / versions.env failed
//! - AnnounceError: git commit or GitHub Actions output failed

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Errors writing the manifest or environment file
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Errors committing or reporting the change
    #[error(transparent)]
    Announce(#[from] AnnounceError),

    /// A dependency could not be resolved after exhausting its retries
    #[error("failed to resolve '{name}' after {attempts} attempt(s): {source}")]
    Dependency {
        name: String,
        attempts: u32,
        #[source]
        source: ResolveError,
    },
}

/// Errors related to configuration and the manifest file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// Invalid duration format
    #[error("invalid duration format '{value}': expected format like '500ms', '30s', '2m'")]
    InvalidDuration { value: String },

    /// Invalid path
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: PathBuf, message: String },

    /// The HTTP client could not be built
    #[error("failed to create HTTP client: {message}")]
    HttpClient { message: String },
}

/// Errors talking to the source-hosting API
#[derive(Error, Debug, Clone)]
pub enum UpstreamError {
    /// Network request failed
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    /// Non-success status that has no more specific variant
    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {url}")]
    RateLimited { url: String },

    /// Authentication error
    #[error("authentication failed for {url}: HTTP {status}")]
    Authentication { url: String, status: u16 },

    /// Timeout
    #[error("timeout while requesting {url}")]
    Timeout { url: String },

    /// Invalid response body
    #[error("invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },
}

/// Errors for upstream objects that do not exist
#[derive(Error, Debug, Clone)]
pub enum NotFoundError {
    /// Repository or ref returned 404
    #[error("not found: {url}")]
    Resource { url: String },

    /// No release tag matched the configured prefix
    #[error("no suitable release found for {owner}/{repo} (tag prefix '{prefix}')")]
    NoSuitableRelease {
        owner: String,
        repo: String,
        prefix: String,
    },

    /// The tracked branch has no commits
    #[error("no commits found on branch '{branch}' of {owner}/{repo}")]
    EmptyBranch {
        owner: String,
        repo: String,
        branch: String,
    },
}

/// Errors from resolving a single dependency
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The resolution task panicked or was aborted
    #[error("resolution task failed: {message}")]
    Task { message: String },
}

/// Errors writing versions.json or versions.env
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Failed to write a file
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize the manifest
    #[error("failed to serialize manifest: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

/// Errors recording the change
#[derive(Error, Debug)]
pub enum AnnounceError {
    /// git could not be started
    #[error("failed to run git in {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// git exited with a non-zero status
    #[error("git commit failed ({status}): {output}")]
    CommitFailed { status: String, output: String },

    /// GITHUB_OUTPUT is not set
    #[error("GITHUB_OUTPUT is not set; cannot write GitHub Actions output")]
    MissingOutputPath,

    /// Failed to write the GitHub Actions output file
    #[error("failed to write GitHub Actions output {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Creates a new ManifestNotFound error
    pub fn manifest_not_found(path: impl Into<PathBuf>) -> Self {
        ConfigError::ManifestNotFound { path: path.into() }
    }

    /// Creates a new ManifestRead error
    pub fn manifest_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ManifestRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new InvalidDuration error
    pub fn invalid_duration(value: impl Into<String>) -> Self {
        ConfigError::InvalidDuration {
            value: value.into(),
        }
    }

    /// Creates a new InvalidPath error
    pub fn invalid_path(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new ManifestParse error
    pub fn manifest_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::ManifestParse {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl UpstreamError {
    /// Creates a new Network error
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        UpstreamError::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(url: impl Into<String>, message: impl Into<String>) -> Self {
        UpstreamError::InvalidResponse {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(url: impl Into<String>) -> Self {
        UpstreamError::Timeout { url: url.into() }
    }
}

impl NotFoundError {
    /// Creates a new NoSuitableRelease error
    pub fn no_suitable_release(
        owner: impl Into<String>,
        repo: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        NotFoundError::NoSuitableRelease {
            owner: owner.into(),
            repo: repo.into(),
            prefix: prefix.into(),
        }
    }

    /// Creates a new EmptyBranch error
    pub fn empty_branch(
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        NotFoundError::EmptyBranch {
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
        }
    }
}

impl PersistenceError {
    /// Creates a new Write error
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PersistenceError::Write {
            path: path.into(),
            source,
        }
    }
}
