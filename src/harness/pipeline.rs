//! Pipeline generator - creates the disposable Logstash configuration
//!
//! Generates, inside a working directory:
//! - `config/logstash.yml` (empty settings)
//! - `config/pipelines.yml` (one pipeline, one worker)
//! - `pipeline.d/io.conf` (stdin json_lines in, file outputs out)
//! - `pipeline.d/filter_1_candidate.conf` (the filter under test, verbatim)
//! - `pipeline.d/filter_2_post_processor.conf` (optional `@metadata` exposure)
//! - `data/`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::version::LFT_VERSION;

/// Pipeline id written to `pipelines.yml`.
pub const PIPELINE_ID: &str = "my-pipeline";

/// Field the post-processor copies `[@metadata]` into.
pub const METADATA_FIELD: &str = "__@metadata";

const CANDIDATE_FILTER_FILE: &str = "filter_1_candidate.conf";
const POST_PROCESSOR_FILE: &str = "filter_2_post_processor.conf";

/// Generator for the configuration tree of one harness run
pub struct PipelineGenerator {
    /// Working directory everything is written into
    root: PathBuf,
    /// Whether to add the metadata post-processor and rubydebug output
    expose_metadata: bool,
}

impl PipelineGenerator {
    pub fn new(root: impl AsRef<Path>, expose_metadata: bool) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            expose_metadata,
        }
    }

    /// Passed as `--path.settings`
    pub fn config_dir(&self) -> PathBuf {
        self.root.join("config")
    }

    /// Passed as `--path.data`
    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn pipeline_dir(&self) -> PathBuf {
        self.root.join("pipeline.d")
    }

    /// One JSON document per line, one line per event
    pub fn output_json_path(&self) -> PathBuf {
        self.root.join("output-json")
    }

    /// rubydebug dump including `@metadata`
    pub fn output_debug_path(&self) -> PathBuf {
        self.root.join("output-ap")
    }

    /// Engine stdout and stderr
    pub fn log_path(&self) -> PathBuf {
        self.root.join("engine.log")
    }

    /// Write the full configuration tree.
    pub fn generate(&self, filter_def: &str) -> io::Result<()> {
        let config_dir = self.config_dir();
        let pipeline_dir = self.pipeline_dir();
        fs::create_dir_all(self.data_dir())?;
        fs::create_dir_all(&config_dir)?;
        fs::create_dir_all(&pipeline_dir)?;

        fs::write(config_dir.join("logstash.yml"), "")?;
        fs::write(config_dir.join("pipelines.yml"), self.generate_pipelines_yml())?;
        fs::write(pipeline_dir.join("io.conf"), self.generate_io_conf())?;
        fs::write(pipeline_dir.join(CANDIDATE_FILTER_FILE), filter_def)?;

        if self.expose_metadata {
            fs::write(pipeline_dir.join(POST_PROCESSOR_FILE), generate_post_processor_conf())?;
        }

        Ok(())
    }

    /// Generate `pipelines.yml` content
    fn generate_pipelines_yml(&self) -> String {
        format!(
            r#"# Generated by logstash-filter-test {version}
- pipeline.id: {id}
  path.config: "{path}"
  pipeline.workers: 1
"#,
            version = LFT_VERSION,
            id = PIPELINE_ID,
            path = config_path(&self.pipeline_dir()),
        )
    }

    /// Generate `io.conf` content
    fn generate_io_conf(&self) -> String {
        let debug_output = if self.expose_metadata {
            format!(
                r#"  file {{
    path => "{}"
    codec => rubydebug {{ metadata => true }}
  }}
"#,
                config_path(&self.output_debug_path())
            )
        } else {
            String::new()
        };

        format!(
            r#"# Generated by logstash-filter-test {version}
input {{
  stdin {{
    codec => "json_lines"
  }}
}}
output {{
  file {{
    path => "{json_path}"
  }}
{debug_output}}}
"#,
            version = LFT_VERSION,
            json_path = config_path(&self.output_json_path()),
            debug_output = debug_output,
        )
    }
}

/// Filter that copies the otherwise hidden `[@metadata]` into a visible field,
/// so test cases can assert on metadata values.
fn generate_post_processor_conf() -> String {
    format!(
        r#"filter {{
  mutate {{ copy => {{ "[@metadata]" => "{METADATA_FIELD}" }} }}
}}
"#
    )
}

/// Render a path the way Logstash config files expect it.
///
/// On Windows the path must use forward slashes and carry a leading slash in
/// front of the drive letter.
fn config_path(path: &Path) -> String {
    let text = path.display().to_string();
    if cfg!(windows) {
        format!("/{}", text.replace('\\', "/"))
    } else {
        text
    }
}
