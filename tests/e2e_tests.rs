//! End-to-end tests for the depsync CLI
//!
//! These tests verify:
//! - Required arguments and exit codes
//! - Error reporting on stderr
//! - Runs that need no network access (empty manifest, unreachable API)

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Command with a token and an API URL nothing listens on
fn depsync(repo: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("depsync");
    cmd.env_remove("GITHUB_OUTPUT")
        .env_remove("GITHUB_API_URL")
        .args(["--token", "test-token", "--api-url", "http://127.0.0.1:9"])
        .arg("--repo")
        .arg(repo.path());
    cmd
}

fn repo_with_manifest(content: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    fs::write(dir.path().join("versions.json"), content).unwrap();
    dir
}

mod exit_code_tests {
    use super::*;

    #[test]
    fn test_help() {
        cargo_bin_cmd!("depsync")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--github-action"));
    }

    #[test]
    fn test_version() {
        cargo_bin_cmd!("depsync")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("depsync"));
    }

    #[test]
    fn test_missing_token() {
        let dir = repo_with_manifest("{}");
        cargo_bin_cmd!("depsync")
            .env_remove("GITHUB_TOKEN")
            .arg("--repo")
            .arg(dir.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("--token"));
    }

    #[test]
    fn test_invalid_duration() {
        let dir = repo_with_manifest("{}");
        depsync(&dir)
            .args(["--timeout", "10h"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid duration format '10h'"));
    }

    #[test]
    fn test_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        depsync(&dir)
            .assert()
            .failure()
            .stderr(predicate::str::starts_with("Error: manifest file not found"));
    }

    #[test]
    fn test_malformed_manifest() {
        let dir = repo_with_manifest("{ not json");
        depsync(&dir)
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to parse JSON"));
    }
}

mod run_tests {
    use super::*;

    #[test]
    fn test_empty_manifest_succeeds() {
        let dir = repo_with_manifest("{}");
        depsync(&dir)
            .assert()
            .success()
            .stdout(predicate::str::contains("All dependencies are up to date"));

        assert_eq!(fs::read_to_string(dir.path().join("versions.env")).unwrap(), "");
        assert_eq!(
            fs::read_to_string(dir.path().join("versions.json")).unwrap(),
            "{}\n"
        );
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = repo_with_manifest("{}");
        depsync(&dir).arg("--dry-run").assert().success();

        assert!(!dir.path().join("versions.env").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("versions.json")).unwrap(),
            "{}"
        );
    }

    #[test]
    fn test_json_output() {
        let dir = repo_with_manifest("{}");
        let output = depsync(&dir).arg("--json").assert().success();

        let stdout = output.get_output().stdout.clone();
        let value: serde_json::Value = serde_json::from_slice(&stdout).unwrap();
        assert_eq!(value["dry_run"], false);
        assert_eq!(value["updates"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_unreachable_api_fails_without_writing() {
        let manifest = r#"{
  "geth": {
    "tag": "v1.0.0",
    "commit": "abc",
    "owner": "ethereum",
    "repo": "go-ethereum",
    "tracking": "tag"
  }
}"#;
        let dir = repo_with_manifest(manifest);
        depsync(&dir)
            .args(["--retries", "2", "--retry-delay", "10ms", "--timeout", "2s"])
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "failed to resolve 'geth' after 2 attempt(s)",
            ));

        assert!(!dir.path().join("versions.env").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("versions.json")).unwrap(),
            manifest
        );
    }
}
