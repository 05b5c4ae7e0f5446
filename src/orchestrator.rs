//! Update orchestrator for coordinating the sync workflow
//!
//! This module provides:
//! - Workflow coordination: load → resolve (parallel) → persist → announce
//! - One task per dependency with fixed-delay retry
//! - Dry-run mode support
//! - Deterministic failure reporting (first failing dependency by name)

use crate::announce::{announce, Announcement, CommitMessage, CommitRunner, SystemGit};
use crate::cli::CliArgs;
use crate::domain::{Dependencies, DependencyRecord, VersionUpdate};
use crate::error::{AppError, ConfigError, ResolveError};
use crate::github::{GitHubAdapter, HttpClient, SourceHost, DEFAULT_USER_AGENT};
use crate::manifest::{ManifestStore, WriteResult};
use crate::progress::Progress;
use crate::resolver::{apply_resolution, Resolver};
use crate::retry::{RetryError, RetryPolicy};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Settings for one sync run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory containing versions.json
    pub repo: PathBuf,
    /// GitHub token
    pub token: String,
    /// GitHub API base URL
    pub api_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retry policy per dependency
    pub retry: RetryPolicy,
    /// How to record updates, if at all
    pub announcement: Option<Announcement>,
    /// Resolve and report only
    pub dry_run: bool,
    /// Print diagnostics to stderr
    pub verbose: bool,
    /// Show the progress bar
    pub show_progress: bool,
}

impl RunConfig {
    /// Create a config for a repository with default settings
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            token: String::new(),
            api_url: crate::github::DEFAULT_API_URL.to_string(),
            timeout: crate::github::DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            announcement: None,
            dry_run: false,
            verbose: false,
            show_progress: false,
        }
    }

    /// Build the run settings from parsed CLI arguments
    pub fn from_cli(args: &CliArgs) -> Self {
        let announcement = if args.github_action {
            let path = args
                .github_output
                .clone()
                .filter(|p| !p.as_os_str().is_empty());
            Some(Announcement::GitHubOutput(path))
        } else if args.commit {
            Some(Announcement::Commit)
        } else {
            None
        };

        Self {
            repo: args.repo.clone(),
            token: args.token.clone(),
            api_url: args.api_url.clone(),
            timeout: args.timeout,
            retry: RetryPolicy::new(args.retries, args.retry_delay),
            announcement,
            dry_run: args.dry_run,
            verbose: args.verbose,
            show_progress: !(args.quiet || args.json || args.github_action),
        }
    }
}

/// An update together with the dependency it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyUpdate {
    /// Dependency name (manifest key)
    pub name: String,
    /// The detected change
    #[serde(flatten)]
    pub update: VersionUpdate,
}

/// Result of running the orchestrator
#[derive(Debug)]
pub struct RunOutcome {
    /// Updates ordered by dependency name
    pub updates: Vec<DependencyUpdate>,
    /// Records after applying updates
    pub dependencies: Dependencies,
    /// versions.json and versions.env write results
    pub write_results: Vec<WriteResult>,
    /// Commit message, if the updates were announced
    pub announced: Option<CommitMessage>,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl RunOutcome {
    /// Check if any dependency changed
    pub fn has_updates(&self) -> bool {
        !self.updates.is_empty()
    }
}

type ResolveOutcome = Result<(DependencyRecord, Option<VersionUpdate>), RetryError<ResolveError>>;
type TaskOutput = (String, ResolveOutcome);

/// Orchestrator for coordinating the sync workflow
pub struct Orchestrator {
    config: RunConfig,
    host: Arc<dyn SourceHost>,
    runner: Box<dyn CommitRunner>,
}

impl Orchestrator {
    /// Create an orchestrator talking to the GitHub API
    pub fn new(config: RunConfig) -> Result<Self, ConfigError> {
        let client = HttpClient::with_config(
            &config.token,
            &config.api_url,
            config.timeout,
            DEFAULT_USER_AGENT,
        )?;
        let host = Arc::new(GitHubAdapter::new(client));
        Ok(Self::with_host(config, host))
    }

    /// Create an orchestrator with a custom source host (for testing)
    pub fn with_host(config: RunConfig, host: Arc<dyn SourceHost>) -> Self {
        Self {
            config,
            host,
            runner: Box::new(SystemGit::new()),
        }
    }

    /// Replace the commit runner (for testing)
    pub fn with_commit_runner(mut self, runner: Box<dyn CommitRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Run the sync workflow
    pub async fn run(&self) -> Result<RunOutcome, AppError> {
        if !self.config.repo.is_dir() {
            return Err(ConfigError::invalid_path(&self.config.repo, "not a directory").into());
        }

        let store = ManifestStore::new(&self.config.repo).with_dry_run(self.config.dry_run);
        let mut dependencies = store.load()?;

        if self.config.verbose {
            eprintln!(
                "Loaded {} dependencies from {} ({})",
                dependencies.len(),
                store.manifest_path().display(),
                self.host.host_name()
            );
        }

        // Step 1: resolve every dependency
        let results = self.resolve_all(&dependencies).await;

        // Step 2: fail on the first failing dependency by name, persisting nothing
        if let Some((name, Err(e))) = results.iter().find(|(_, r)| r.is_err()) {
            return Err(AppError::Dependency {
                name: name.clone(),
                attempts: e.attempts,
                source: e.last.clone(),
            });
        }

        let mut updates = Vec::new();
        for (name, result) in results {
            let Ok((record, update)) = result else {
                continue;
            };
            dependencies.insert(name.clone(), record);
            if let Some(update) = update {
                updates.push(DependencyUpdate { name, update });
            }
        }

        // Step 3: persist
        let write_results = vec![
            store.save(&dependencies)?,
            store.export_environment(&dependencies)?,
        ];

        if self.config.verbose {
            for result in &write_results {
                let state = match (result.written, result.changed) {
                    (false, _) => "not written (dry run)",
                    (true, true) => "written",
                    (true, false) => "unchanged",
                };
                eprintln!("{}: {}", result.path.display(), state);
            }
        }

        // Step 4: announce
        let mut announced = None;
        if let Some(announcement) = &self.config.announcement {
            if !updates.is_empty() && !self.config.dry_run {
                let changes: Vec<VersionUpdate> =
                    updates.iter().map(|u| u.update.clone()).collect();
                let message = announce(
                    announcement,
                    self.runner.as_ref(),
                    &self.config.repo,
                    &changes,
                )?;
                if self.config.verbose {
                    eprintln!("Announced: {}", message.title);
                }
                announced = Some(message);
            }
        }

        Ok(RunOutcome {
            updates,
            dependencies,
            write_results,
            announced,
            dry_run: self.config.dry_run,
        })
    }

    /// Resolve every dependency in its own task and collect the results by name
    async fn resolve_all(
        &self,
        dependencies: &Dependencies,
    ) -> BTreeMap<String, ResolveOutcome> {
        let mut progress = Progress::new(self.config.show_progress);
        progress.start(dependencies.len() as u64, "Resolving dependencies");

        let mut tasks: JoinSet<TaskOutput> = JoinSet::new();
        let mut names = HashMap::new();

        for (name, record) in dependencies {
            let handle = tasks.spawn(resolve_task(
                name.clone(),
                record.clone(),
                Arc::clone(&self.host),
                self.config.retry,
                self.config.verbose,
            ));
            names.insert(handle.id(), name.clone());
        }

        let mut results = BTreeMap::new();
        while let Some(joined) = tasks.join_next_with_id().await {
            let (name, result) = match joined {
                Ok((_, output)) => output,
                Err(e) => {
                    let name = names.get(&e.id()).cloned().unwrap_or_default();
                    let failure = RetryError {
                        attempts: 1,
                        last: ResolveError::Task {
                            message: e.to_string(),
                        },
                    };
                    (name, Err(failure))
                }
            };
            progress.set_message(&name);
            progress.inc();
            results.insert(name, result);
        }
        progress.finish_and_clear();

        results
    }
}

/// Resolve one dependency with retries; runs as its own task
async fn resolve_task(
    name: String,
    mut record: DependencyRecord,
    host: Arc<dyn SourceHost>,
    retry: RetryPolicy,
    verbose: bool,
) -> TaskOutput {
    let resolver = Resolver::new(host.as_ref());

    let result = retry
        .run(
            || resolver.resolve(&record),
            |attempt, e| {
                if verbose {
                    eprintln!(
                        "  {}: attempt {}/{} failed: {}",
                        name, attempt, retry.attempts, e
                    );
                }
            },
        )
        .await;

    let result = result.map(|resolution| {
        if verbose {
            let published = resolution
                .published_at
                .map(|t| format!(", published {}", t.format("%Y-%m-%d")))
                .unwrap_or_default();
            eprintln!(
                "  {}: {} @ {}{}",
                name, resolution.label, resolution.commit, published
            );
        }
        let update = apply_resolution(&mut record, resolution);
        (record, update)
    });

    (name, result)
}
