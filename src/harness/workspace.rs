//! Scoped working directory
//!
//! Each run owns a fresh directory. It is removed when the [`Workspace`] is
//! dropped, on success and failure alike, unless the caller asked to keep it.

use std::io;
use std::path::Path;

use tempfile::TempDir;

/// Directory name prefix, so leftovers are easy to spot in the temp dir.
const WORKDIR_PREFIX: &str = "logstash-test-";

/// A uniquely named working directory for one engine run.
#[derive(Debug)]
pub struct Workspace {
    dir: Option<TempDir>,
    keep: bool,
}

impl Workspace {
    /// Create a fresh directory under the system temp dir.
    pub fn create(keep: bool) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(WORKDIR_PREFIX).tempdir()?;
        tracing::debug!(path = %dir.path().display(), "created working directory");
        Ok(Self { dir: Some(dir), keep })
    }

    /// Create a fresh directory inside `parent`.
    pub fn create_in(parent: &Path, keep: bool) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(WORKDIR_PREFIX).tempdir_in(parent)?;
        Ok(Self { dir: Some(dir), keep })
    }

    pub fn path(&self) -> &Path {
        // `dir` is only taken in `drop`.
        self.dir.as_ref().map_or(Path::new(""), TempDir::path)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        if self.keep {
            let path = dir.keep();
            tracing::info!(path = %path.display(), "keeping working directory");
        }
        // Otherwise `TempDir` removes the directory as it goes out of scope.
    }
}
