//! Logstash subprocess engine
//!
//! One [`Engine::execute`] call is one Logstash process:
//! 1. Mint a scoped working directory and write the pipeline into it
//! 2. Spawn Logstash with stdout/stderr redirected to `engine.log`
//! 3. Stream the records to stdin from a writer thread, then close it
//! 4. Wait (optionally bounded) and read back `output-json`

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;

use super::pipeline::PipelineGenerator;
use super::workspace::Workspace;
use super::{Engine, HarnessError};
use crate::config::{HarnessConfig, LOGSTASH_BIN_CANDIDATES};

/// How often a bounded wait polls the child.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How many lines of `engine.log` to attach to an exit error.
const LOG_TAIL_LINES: usize = 20;

/// Runs filters through a real Logstash installation.
#[derive(Debug, Clone, Default)]
pub struct LogstashEngine {
    config: HarnessConfig,
}

impl LogstashEngine {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    fn locate(&self) -> Result<PathBuf, HarnessError> {
        let bin = self.config.locate_engine().ok_or_else(|| HarnessError::EngineInvocation {
            reason: format!(
                "couldn't find logstash executable (tried {})",
                LOGSTASH_BIN_CANDIDATES.join(", ")
            ),
        })?;
        if !bin.exists() {
            return Err(HarnessError::EngineInvocation {
                reason: format!("'{}' does not exist", bin.display()),
            });
        }
        Ok(bin)
    }

    fn command(&self, bin: &Path, generator: &PipelineGenerator) -> Command {
        let mut cmd = Command::new(bin);
        cmd.arg(format!("--log.level={}", self.config.log_level))
            .arg("--path.settings")
            .arg(generator.config_dir())
            .arg("--path.data")
            .arg(generator.data_dir());
        cmd
    }
}

impl Engine for LogstashEngine {
    fn ensure_available(&self) -> Result<(), HarnessError> {
        self.locate().map(|_| ())
    }

    fn execute(&self, filter: &str, inputs: &[Value]) -> Result<Vec<String>, HarnessError> {
        let bin = self.locate()?;
        let payload = encode_json_lines(inputs);

        let workspace = Workspace::create(self.config.keep_workdir)
            .map_err(HarnessError::workspace("failed to create working directory"))?;
        let generator = PipelineGenerator::new(workspace.path(), self.config.expose_metadata);
        generator
            .generate(filter)
            .map_err(HarnessError::workspace("failed to write pipeline configuration"))?;

        let log_path = generator.log_path();
        let log = File::create(&log_path).map_err(HarnessError::workspace("failed to create engine log"))?;
        let log_err = log.try_clone().map_err(HarnessError::workspace("failed to create engine log"))?;

        let mut cmd = self.command(&bin, &generator);
        cmd.stdin(Stdio::piped()).stdout(log).stderr(log_err);

        tracing::info!(command = ?cmd, records = inputs.len(), "starting logstash");
        let mut child = cmd.spawn().map_err(|e| HarnessError::EngineInvocation {
            reason: format!("failed to start '{}': {}", bin.display(), e),
        })?;

        let status = feed_and_wait(&mut child, payload, self.config.timeout)?;
        if !status.success() {
            return Err(HarnessError::EngineExit {
                status: status.code().map_or_else(|| "(terminated by signal)".to_string(), |c| c.to_string()),
                log_tail: read_log_tail(&log_path),
            });
        }

        read_output_lines(&generator.output_json_path())
    }
}

/// Serialize records as newline-terminated JSON lines.
fn encode_json_lines(inputs: &[Value]) -> String {
    let mut payload = String::new();
    for record in inputs {
        payload.push_str(&record.to_string());
        payload.push('\n');
    }
    payload
}

/// Write `payload` to the child's stdin on a separate thread while waiting
/// for the child to exit.
///
/// Stdin is closed once the payload is written, which is what makes the
/// `stdin` input plugin shut the pipeline down.
fn feed_and_wait(child: &mut Child, payload: String, timeout: Option<Duration>) -> Result<ExitStatus, HarnessError> {
    let Some(mut stdin) = child.stdin.take() else {
        return Err(HarnessError::EngineInvocation {
            reason: "child process has no stdin".to_string(),
        });
    };

    let writer = thread::spawn(move || -> io::Result<()> {
        stdin.write_all(payload.as_bytes())?;
        stdin.flush()
        // dropping `stdin` closes the pipe
    });

    let status = wait_for(child, timeout);

    match writer.join() {
        Ok(Ok(())) => {}
        // The engine quit without reading everything; its exit status tells the story.
        Ok(Err(e)) => tracing::warn!(error = %e, "failed to write all records to logstash"),
        Err(_) => tracing::warn!("stdin writer thread panicked"),
    }

    status
}

fn wait_for(child: &mut Child, timeout: Option<Duration>) -> Result<ExitStatus, HarnessError> {
    let Some(timeout) = timeout else {
        return child.wait().map_err(HarnessError::workspace("failed to wait for logstash"));
    };

    let Some(deadline) = Instant::now().checked_add(timeout) else {
        // Too far out to represent; no different from waiting forever.
        return child.wait().map_err(HarnessError::workspace("failed to wait for logstash"));
    };
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {}
            Err(e) => return Err(HarnessError::workspace("failed to wait for logstash")(e)),
        }
        if Instant::now() >= deadline {
            tracing::warn!(timeout_secs = timeout.as_secs(), "logstash timed out, killing it");
            let _ = child.kill();
            let _ = child.wait();
            return Err(HarnessError::EngineTimeout {
                seconds: timeout.as_secs(),
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Read the JSON output file, one entry per line.
///
/// The file output only creates its file on the first event, so a missing
/// file means zero outputs.
fn read_output_lines(path: &Path) -> Result<Vec<String>, HarnessError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(HarnessError::workspace(format!("failed to read {}", path.display()))(e)),
    };
    Ok(text.lines().map(str::to_string).collect())
}

fn read_log_tail(path: &Path) -> String {
    let Ok(text) = fs::read_to_string(path) else {
        return String::new();
    };
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(LOG_TAIL_LINES);
    lines[start..].join("\n")
}
