//! Manifest store for versions.json and versions.env
//!
//! This module provides:
//! - Loading the dependency manifest from the target repository
//! - Writing it back with stable key order
//! - Deriving the shell-exportable environment file

mod env;
mod writer;

pub use env::{env_var_prefix, render_env};
pub use writer::{read_manifest, write_atomic, WriteResult};

use crate::domain::Dependencies;
use crate::error::{ConfigError, PersistenceError};
use std::path::{Path, PathBuf};

/// Manifest filename inside the target repository
pub const MANIFEST_FILENAME: &str = "versions.json";

/// Environment export filename inside the target repository
pub const ENV_FILENAME: &str = "versions.env";

/// Reads and writes the manifest files of one repository
#[derive(Debug, Clone)]
pub struct ManifestStore {
    /// Directory containing versions.json
    root: PathBuf,
    /// Whether to skip writing files
    dry_run: bool,
}

impl ManifestStore {
    /// Create a store rooted at the given repository directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dry_run: false,
        }
    }

    /// Enable or disable dry-run mode (builder pattern)
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Check if this store is in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Repository directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to versions.json
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILENAME)
    }

    /// Path to versions.env
    pub fn env_path(&self) -> PathBuf {
        self.root.join(ENV_FILENAME)
    }

    /// Load all dependency records
    pub fn load(&self) -> Result<Dependencies, ConfigError> {
        let path = self.manifest_path();
        let content = read_manifest(&path)?;
        parse_manifest(&content, &path)
    }

    /// Write the dependency records back to versions.json
    pub fn save(&self, dependencies: &Dependencies) -> Result<WriteResult, PersistenceError> {
        let content = render_manifest(dependencies)?;
        self.write(self.manifest_path(), &content)
    }

    /// Write versions.env derived from the dependency records
    pub fn export_environment(
        &self,
        dependencies: &Dependencies,
    ) -> Result<WriteResult, PersistenceError> {
        self.write(self.env_path(), &render_env(dependencies))
    }

    fn write(&self, path: PathBuf, content: &str) -> Result<WriteResult, PersistenceError> {
        let changed = std::fs::read_to_string(&path)
            .map(|existing| existing != content)
            .unwrap_or(true);

        if !self.dry_run {
            write_atomic(&path, content)?;
        }

        Ok(WriteResult {
            path,
            changed,
            written: !self.dry_run,
        })
    }
}

/// Parse manifest content
pub fn parse_manifest(content: &str, path: &Path) -> Result<Dependencies, ConfigError> {
    serde_json::from_str(content).map_err(|e| ConfigError::manifest_parse(path, e.to_string()))
}

/// Serialize dependency records as pretty JSON with a trailing newline
pub fn render_manifest(dependencies: &Dependencies) -> Result<String, PersistenceError> {
    let mut content = serde_json::to_string_pretty(dependencies)
        .map_err(|source| PersistenceError::Serialize { source })?;
    content.push('\n');
    Ok(content)
}
