//! CLI argument parsing module for depsync

use crate::error::ConfigError;
use crate::github::DEFAULT_API_URL;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parse duration string in format: Nms (milliseconds), Ns (seconds), Nm (minutes)
fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim();

    let (num_str, unit) = if let Some(n) = s.strip_suffix("ms") {
        (n, "ms")
    } else if let Some(n) = s.strip_suffix('s') {
        (n, "s")
    } else if let Some(n) = s.strip_suffix('m') {
        (n, "m")
    } else {
        return Err(ConfigError::invalid_duration(s));
    };

    let num: u64 = num_str
        .parse()
        .map_err(|_| ConfigError::invalid_duration(s))?;

    let duration = match unit {
        "ms" => Duration::from_millis(num),
        "s" => Duration::from_secs(num),
        "m" => Duration::from_secs(
            num.checked_mul(60)
                .ok_or_else(|| ConfigError::invalid_duration(s))?,
        ),
        _ => unreachable!(),
    };

    Ok(duration)
}

/// Parse the attempt count (at least 1)
fn parse_attempts(s: &str) -> Result<u32, String> {
    let n: u32 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number of attempts: {}", s))?;
    if n == 0 {
        return Err("attempts must be at least 1".to_string());
    }
    Ok(n)
}

/// Keeps pinned upstream versions in versions.json up to date
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depsync",
    version,
    about = "Sync pinned upstream tags and branch heads"
)]
pub struct CliArgs {
    /// GitHub token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Repository directory containing versions.json
    #[arg(long)]
    pub repo: PathBuf,

    // Announcement options
    /// Commit the changes with git when updates were found
    #[arg(long)]
    pub commit: bool,

    /// Write TITLE and DESC to $GITHUB_OUTPUT when updates were found
    #[arg(long)]
    pub github_action: bool,

    /// GitHub Actions output file
    #[arg(long, env = "GITHUB_OUTPUT", hide = true)]
    pub github_output: Option<PathBuf>,

    // Network options
    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Per-request timeout (e.g., 500ms, 30s, 2m)
    #[arg(long, value_parser = parse_duration, default_value = "30s")]
    pub timeout: Duration,

    /// Attempts per dependency
    #[arg(long, value_parser = parse_attempts, default_value = "3")]
    pub retries: u32,

    /// Pause between attempts (e.g., 500ms, 1s)
    #[arg(long, value_parser = parse_duration, default_value = "1s")]
    pub retry_delay: Duration,

    // General options
    /// Dry run mode - resolve and report without writing or committing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}
