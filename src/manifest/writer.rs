//! File reading and writing for the manifest store
//!
//! Writes go to a sibling temporary file first and are renamed over the
//! target, so an interrupted run never leaves a half-written manifest.

use crate::error::{ConfigError, PersistenceError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Result of writing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    /// Path of the written file
    pub path: PathBuf,
    /// Whether the content differs from what was on disk
    pub changed: bool,
    /// Whether the file was actually written (false in dry-run mode)
    pub written: bool,
}

/// Read a manifest file, mapping a missing file to `ManifestNotFound`
pub fn read_manifest(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ConfigError::manifest_not_found(path)
        } else {
            ConfigError::manifest_read(path, e)
        }
    })
}

/// Write content via temp file and rename
pub fn write_atomic(path: &Path, content: &str) -> Result<(), PersistenceError> {
    let tmp_path = temp_path(path);

    fs::write(&tmp_path, content).map_err(|e| PersistenceError::write(&tmp_path, e))?;

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(PersistenceError::write(path, e));
    }

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", file_name))
}
