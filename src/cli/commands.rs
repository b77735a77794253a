//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crate::config::HarnessConfig;
use crate::fixture::{TestSuite, parse_fixture};
use crate::harness::{Engine, LogstashEngine, run_suite};

use super::reporter::{ConsoleReporter, JsonReporter, emit};
use super::{Cli, CliError, CliResult, ExitCode, ReportFormat};

/// Maximum input file size (10 MB). Filter definitions and fixtures are
/// hand-written; anything bigger is almost certainly the wrong file.
const MAX_SOURCE_SIZE: u64 = 10 * 1024 * 1024;

/// Read an input file with a size check.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be accessed or read
/// - The file exceeds `MAX_SOURCE_SIZE` (10 MB)
pub fn read_source(file_path: &Path) -> CliResult<String> {
    let display = file_path.display();
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", display, e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "File '{}' is too large ({} bytes, max {} bytes)",
            display,
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", display, e)))
}

/// Build the harness configuration from command-line flags and the environment.
pub fn harness_config(cli: &Cli) -> HarnessConfig {
    let mut config = HarnessConfig::new()
        .with_keep_workdir(cli.keep_workdir)
        .with_expose_metadata(!cli.no_metadata);
    if let Some(bin) = &cli.logstash_bin {
        config = config.with_logstash_bin(bin);
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    config.with_env_overrides()
}

/// Run the fixture against the filter with a real Logstash and report.
pub fn run_filter_test(cli: &Cli) -> CliResult<ExitCode> {
    let suite = parse_fixture(&read_source(&cli.testcases)?).map_err(CliError::diagnostic)?;
    let filter = read_source(&cli.filters)?;
    tracing::debug!(
        filters = %cli.filters.display(),
        testcases = %cli.testcases.display(),
        cases = suite.len(),
        "loaded inputs"
    );

    let engine = LogstashEngine::new(harness_config(cli));
    check_suite(&engine, &suite, &filter, cli.format, io::stdout().lock())
}

/// Run `suite` through `engine`, write the report to `out`, and map the
/// outcome to an exit code.
///
/// Failing cases yield an error with an empty message: the report already
/// explains them.
pub fn check_suite<E, W>(engine: &E, suite: &TestSuite, filter: &str, format: ReportFormat, out: W) -> CliResult<ExitCode>
where
    E: Engine + ?Sized,
    W: Write,
{
    let run = run_suite(engine, suite, filter).map_err(CliError::diagnostic)?;

    let written = match format {
        ReportFormat::Text => emit(&mut ConsoleReporter::new(out), &run.report),
        ReportFormat::Json => emit(&mut JsonReporter::new(out), &run.report),
    };
    written.map_err(|e| CliError::failure(format!("Error writing report: {}", e)))?;

    if run.report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Err(CliError::new("", ExitCode::FAILURE))
    }
}
