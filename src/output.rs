//! Output formatting for sync results
//!
//! This module provides:
//! - Text output for human-readable display
//! - JSON output for machine processing

use crate::orchestrator::{DependencyUpdate, RunOutcome};
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Output format (text, json)
    pub format: OutputFormat,
    /// Only print the update lines
    pub quiet: bool,
    /// Whether to use colors (when supported)
    pub color: bool,
}

impl OutputConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(json: bool, quiet: bool) -> Self {
        Self {
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            quiet,
            color: true,
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write the run outcome
    fn format(&self, outcome: &RunOutcome, writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::new(config.quiet, config.color)),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    quiet: bool,
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(quiet: bool, color: bool) -> Self {
        Self { quiet, color }
    }

    fn update_line(&self, update: &DependencyUpdate) -> String {
        let change = &update.update;
        if self.color {
            format!(
                "{}: {} → {}",
                update.name.bold(),
                change.from.dimmed(),
                change.to.green()
            )
        } else {
            format!("{}: {} → {}", update.name, change.from, change.to)
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, outcome: &RunOutcome, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.quiet {
            for update in &outcome.updates {
                writeln!(writer, "{}", self.update_line(update))?;
            }
            return Ok(());
        }

        let prefix = match (outcome.dry_run, self.color) {
            (true, true) => format!("{} ", "(dry-run)".cyan()),
            (true, false) => "(dry-run) ".to_string(),
            (false, _) => String::new(),
        };

        if !outcome.has_updates() {
            let message = "All dependencies are up to date";
            if self.color {
                writeln!(writer, "{}{}", prefix, message.green())?;
            } else {
                writeln!(writer, "{}{}", prefix, message)?;
            }
            return Ok(());
        }

        writeln!(writer, "{}Dependency updates:", prefix)?;
        for update in &outcome.updates {
            writeln!(writer, "  {}", self.update_line(update))?;
            writeln!(writer, "    {}", update.update.diff_url)?;
        }

        let count = outcome.updates.len();
        writeln!(
            writer,
            "{}{} {} updated",
            prefix,
            count,
            if count == 1 { "dependency" } else { "dependencies" }
        )?;

        if let Some(message) = &outcome.announced {
            writeln!(writer, "{}", message.title)?;
        }

        Ok(())
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Whether this was a dry-run
    dry_run: bool,
    /// Detected updates
    updates: &'a [DependencyUpdate],
    /// Written files
    files: Vec<JsonFile>,
    /// Commit title, if the updates were announced
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonFile {
    path: String,
    changed: bool,
    written: bool,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, outcome: &RunOutcome, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            dry_run: outcome.dry_run,
            updates: &outcome.updates,
            files: outcome
                .write_results
                .iter()
                .map(|r| JsonFile {
                    path: r.path.display().to_string(),
                    changed: r.changed,
                    written: r.written,
                })
                .collect(),
            title: outcome.announced.as_ref().map(|m| m.title.as_str()),
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }
}
