//! CLI module for logstash-filter-test
//!
//! Runs one fixture file against one filter definition and prints a report.
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//! - `reporter` - Text and JSON report output
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod reporter;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use crate::version::LFT_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Render a library diagnostic, including its code and help text.
    pub fn diagnostic<D>(err: D) -> Self
    where
        D: miette::Diagnostic + Send + Sync + 'static,
    {
        Self::failure(format!("{:?}", miette::Report::new(err)))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable failure blocks and a summary line
    #[default]
    Text,
    /// The whole report as one JSON document
    Json,
}

/// Test Logstash filters against JSON fixtures
#[derive(Parser, Debug)]
#[command(name = "logstash-filter-test")]
#[command(version = LFT_VERSION)]
#[command(about = "Run Logstash filters against test cases", long_about = None)]
pub struct Cli {
    /// Filter definition to test
    #[arg(long, value_name = "FILE", default_value = "filter.conf")]
    pub filters: PathBuf,

    /// Test cases: a JSON array of [input, expected] pairs, comments allowed
    #[arg(long, value_name = "FILE", default_value = "testcases.js")]
    pub testcases: PathBuf,

    /// Logstash executable (default: $LOGSTASH_BIN, then well-known install paths)
    #[arg(long = "logstash-bin", value_name = "PATH")]
    pub logstash_bin: Option<PathBuf>,

    /// Keep the generated working directory for inspection
    #[arg(long = "keep-workdir")]
    pub keep_workdir: bool,

    /// Don't copy [@metadata] into __@metadata
    #[arg(long = "no-metadata")]
    pub no_metadata: bool,

    /// Kill Logstash after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    commands::run_filter_test(&cli)
}

// ============================================================================
// Tests
// ============================================================================
