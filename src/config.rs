//! Harness configuration
//!
//! Settings for one harness run: where the engine lives, how it is invoked,
//! and what happens to the scoped working directory afterwards.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Well-known Logstash install locations, tried in order.
pub const LOGSTASH_BIN_CANDIDATES: &[&str] = &["/opt/logstash/bin/logstash", "/usr/share/logstash/bin/logstash"];

/// Environment variable naming an explicit engine executable.
pub const LOGSTASH_BIN_ENV: &str = "LOGSTASH_BIN";

/// Harness configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Explicit engine executable; skips the candidate search when set
    pub logstash_bin: Option<PathBuf>,
    /// Keep the working directory after the run for inspection
    pub keep_workdir: bool,
    /// Copy `[@metadata]` into a visible `__@metadata` field and write a rubydebug dump
    pub expose_metadata: bool,
    /// Value passed to `--log.level`
    pub log_level: String,
    /// Kill the engine if it runs longer than this
    pub timeout: Option<Duration>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            logstash_bin: None,
            keep_workdir: false,
            expose_metadata: true,
            log_level: "warn".to_string(),
            timeout: None,
        }
    }
}

impl HarnessConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this engine executable instead of searching for one
    pub fn with_logstash_bin(mut self, path: impl Into<PathBuf>) -> Self {
        self.logstash_bin = Some(path.into());
        self
    }

    /// Keep (or remove) the working directory after the run
    pub fn with_keep_workdir(mut self, keep: bool) -> Self {
        self.keep_workdir = keep;
        self
    }

    /// Enable or disable the metadata post-processor and debug output
    pub fn with_expose_metadata(mut self, expose: bool) -> Self {
        self.expose_metadata = expose;
        self
    }

    /// Set the engine log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Bound the engine's run time
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Fill unset fields from the environment (`LOGSTASH_BIN`).
    pub fn with_env_overrides(mut self) -> Self {
        if self.logstash_bin.is_none() {
            if let Ok(path) = env::var(LOGSTASH_BIN_ENV) {
                if !path.is_empty() {
                    self.logstash_bin = Some(PathBuf::from(path));
                }
            }
        }
        self
    }

    /// Resolve the engine executable.
    ///
    /// An explicit path is returned as-is, even if it does not exist; spawning
    /// it will report the problem. Otherwise the first existing candidate wins.
    pub fn locate_engine(&self) -> Option<PathBuf> {
        if let Some(path) = &self.logstash_bin {
            return Some(path.clone());
        }
        find_engine_in(LOGSTASH_BIN_CANDIDATES.iter().map(Path::new))
    }
}

/// Return the first candidate path that exists.
pub fn find_engine_in<'a>(candidates: impl IntoIterator<Item = &'a Path>) -> Option<PathBuf> {
    candidates.into_iter().find(|p| p.exists()).map(Path::to_path_buf)
}
