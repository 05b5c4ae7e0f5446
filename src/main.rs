//! depsync - keeps pinned upstream versions up to date
//!
//! Reads versions.json from the target repository, resolves the latest
//! release tag or branch head of every dependency on GitHub, writes the
//! results back together with versions.env, and optionally commits the
//! change or reports it to GitHub Actions.

use clap::Parser;
use depsync::cli::CliArgs;
use depsync::orchestrator::{Orchestrator, RunConfig};
use depsync::output::{create_formatter, OutputConfig};
use std::io::{self, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<()> {
    if args.verbose {
        eprintln!("depsync v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Target: {}", args.repo.display());
        eprintln!("API: {}", args.api_url);
        if args.dry_run {
            eprintln!("Mode: dry-run");
        }
    }

    let config = RunConfig::from_cli(&args);
    let orchestrator = Orchestrator::new(config)?;
    let outcome = orchestrator.run().await?;

    let formatter = create_formatter(OutputConfig::from_cli(args.json, args.quiet));
    let mut stdout = io::stdout().lock();
    formatter.format(&outcome, &mut stdout)?;
    stdout.flush()?;

    Ok(())
}
