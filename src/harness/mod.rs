//! Harness driver
//!
//! Feeds input records through a filter definition and collects the results.
//!
//! ## Engine Boundary
//!
//! The engine is abstracted via the [`Engine`] trait so the driver logic
//! (shape validation, output counting, output decoding) can run against an
//! in-process fake. [`LogstashEngine`] is the real implementation.
//!
//! ## Modules
//!
//! - `logstash` - subprocess engine
//! - `pipeline` - disposable pipeline configuration
//! - `workspace` - scoped working directory

mod logstash;
mod pipeline;
mod workspace;

pub use logstash::LogstashEngine;
pub use pipeline::{PIPELINE_ID, PipelineGenerator};
pub use workspace::Workspace;

use miette::Diagnostic;
use serde_json::Value;
use thiserror::Error;

use crate::compare::{MismatchReport, compare};
use crate::fixture::{TestSuite, value_kind};

/// Errors that abort a harness run.
///
/// Per-case mismatches are not errors; they end up in a [`MismatchReport`].
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("input record {index} must be a JSON object, found {found}")]
    #[diagnostic(code(lft::harness::input_shape))]
    InvalidInputShape { index: usize, found: &'static str },

    #[error("could not invoke Logstash: {reason}")]
    #[diagnostic(
        code(lft::harness::invocation),
        help("pass --logstash-bin or set LOGSTASH_BIN to the logstash executable")
    )]
    EngineInvocation { reason: String },

    #[error("Logstash returned non-zero return code {status}")]
    #[diagnostic(code(lft::harness::exit))]
    EngineExit {
        status: String,
        /// Last lines of the engine log
        #[help]
        log_tail: String,
    },

    #[error("Logstash did not finish within {seconds}s and was killed")]
    #[diagnostic(code(lft::harness::timeout))]
    EngineTimeout { seconds: u64 },

    #[error("Received {outputs} outputs, expecting {inputs}")]
    #[diagnostic(
        code(lft::harness::output_count),
        help("the filter must emit exactly one event per input (no drop, split or clone)")
    )]
    OutputCountMismatch { outputs: usize, inputs: usize },

    #[error("output line {line} is not a JSON object: {reason}")]
    #[diagnostic(code(lft::harness::malformed_output))]
    MalformedOutput { line: usize, reason: String },

    #[error("{context}: {source}")]
    #[diagnostic(code(lft::harness::workspace))]
    Workspace {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl HarnessError {
    pub(crate) fn workspace(context: impl Into<String>) -> impl FnOnce(std::io::Error) -> Self {
        let context = context.into();
        move |source| HarnessError::Workspace { context, source }
    }
}

/// Something that can run a filter definition over a batch of records.
pub trait Engine {
    /// Run `filter` over `inputs` and return the raw output lines, in order.
    ///
    /// Implementations report engine failures; counting and decoding the
    /// lines is left to [`run`].
    fn execute(&self, filter: &str, inputs: &[Value]) -> Result<Vec<String>, HarnessError>;

    /// Fail early if the engine cannot run at all.
    ///
    /// Checked by [`run`] even when there is nothing to execute.
    fn ensure_available(&self) -> Result<(), HarnessError> {
        Ok(())
    }
}

/// Outputs and comparison report of one fixture run.
#[derive(Debug, Clone)]
pub struct SuiteRun {
    pub outputs: Vec<Value>,
    pub report: MismatchReport,
}

/// Run `inputs` through `filter` and return one output object per input.
///
/// Inputs are checked before the engine is touched, so a bad record never
/// creates a working directory or a process. A missing engine is an error
/// even for an empty input set.
pub fn run<E: Engine + ?Sized>(engine: &E, inputs: &[Value], filter: &str) -> Result<Vec<Value>, HarnessError> {
    validate_inputs(inputs)?;
    engine.ensure_available()?;

    if inputs.is_empty() {
        tracing::debug!("no input records, skipping engine run");
        return Ok(Vec::new());
    }

    let lines = engine.execute(filter, inputs)?;
    if lines.len() != inputs.len() {
        return Err(HarnessError::OutputCountMismatch {
            outputs: lines.len(),
            inputs: inputs.len(),
        });
    }

    lines
        .iter()
        .enumerate()
        .map(|(line, text)| decode_output(line, text))
        .collect()
}

/// Run every case of `suite` and compare the outputs with the expectations.
pub fn run_suite<E: Engine + ?Sized>(engine: &E, suite: &TestSuite, filter: &str) -> Result<SuiteRun, HarnessError> {
    let outputs = run(engine, &suite.inputs(), filter)?;
    let report = compare(suite, &outputs);
    Ok(SuiteRun { outputs, report })
}

fn validate_inputs(inputs: &[Value]) -> Result<(), HarnessError> {
    match inputs.iter().position(|v| !v.is_object()) {
        Some(index) => Err(HarnessError::InvalidInputShape {
            index,
            found: value_kind(&inputs[index]),
        }),
        None => Ok(()),
    }
}

fn decode_output(line: usize, text: &str) -> Result<Value, HarnessError> {
    let value: Value = serde_json::from_str(text).map_err(|e| HarnessError::MalformedOutput {
        line,
        reason: e.to_string(),
    })?;
    if !value.is_object() {
        return Err(HarnessError::MalformedOutput {
            line,
            reason: format!("found {}", value_kind(&value)),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    /// Echoes inputs back, optionally dropping the last one.
    struct EchoEngine {
        drop_last: bool,
        calls: Cell<usize>,
    }

    struct MissingEngine;

    impl Engine for MissingEngine {
        fn execute(&self, _filter: &str, _inputs: &[Value]) -> Result<Vec<String>, HarnessError> {
            unreachable!("never available")
        }

        fn ensure_available(&self) -> Result<(), HarnessError> {
            Err(HarnessError::EngineInvocation {
                reason: "not installed".to_string(),
            })
        }
    }

    impl EchoEngine {
        fn new(drop_last: bool) -> Self {
            Self {
                drop_last,
                calls: Cell::new(0),
            }
        }
    }

    impl Engine for EchoEngine {
        fn execute(&self, _filter: &str, inputs: &[Value]) -> Result<Vec<String>, HarnessError> {
            self.calls.set(self.calls.get() + 1);
            let mut lines: Vec<String> = inputs.iter().map(Value::to_string).collect();
            if self.drop_last {
                lines.pop();
            }
            Ok(lines)
        }
    }

    #[test]
    fn test_run_echo() {
        let engine = EchoEngine::new(false);
        let inputs = vec![json!({"a": 1}), json!({"b": [1, 2]})];
        let outputs = run(&engine, &inputs, "filter {}").unwrap();
        assert_eq!(outputs, inputs);
    }

    #[test]
    fn test_invalid_input_shape_skips_engine() {
        let engine = EchoEngine::new(false);
        let err = run(&engine, &[json!({"a": 1}), json!([1, 2])], "").unwrap_err();
        assert!(matches!(err, HarnessError::InvalidInputShape { index: 1, found: "an array" }));
        assert_eq!(engine.calls.get(), 0);
    }

    #[test]
    fn test_output_count_mismatch() {
        let engine = EchoEngine::new(true);
        let err = run(&engine, &[json!({"a": 1}), json!({"a": 2})], "").unwrap_err();
        assert!(matches!(err, HarnessError::OutputCountMismatch { outputs: 1, inputs: 2 }));
        assert_eq!(err.to_string(), "Received 1 outputs, expecting 2");
    }

    #[test]
    fn test_empty_inputs_skip_engine() {
        let engine = EchoEngine::new(false);
        assert!(run(&engine, &[], "").unwrap().is_empty());
        assert_eq!(engine.calls.get(), 0);
    }

    #[test]
    fn test_unavailable_engine_fails_empty_run() {
        let err = run(&MissingEngine, &[], "").unwrap_err();
        assert!(matches!(err, HarnessError::EngineInvocation { .. }));
    }

    #[test]
    fn test_input_shape_checked_before_availability() {
        let err = run(&MissingEngine, &[json!(1)], "").unwrap_err();
        assert!(matches!(err, HarnessError::InvalidInputShape { index: 0, found: "a number" }));
    }

    #[test]
    fn test_decode_output_rejects_non_objects() {
        assert!(matches!(decode_output(3, "[1]"), Err(HarnessError::MalformedOutput { line: 3, .. })));
        assert!(matches!(decode_output(0, "{oops"), Err(HarnessError::MalformedOutput { line: 0, .. })));
        assert_eq!(decode_output(0, r#"{"a":1}"#).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_exit_error_message() {
        let err = HarnessError::EngineExit {
            status: "2".to_string(),
            log_tail: String::new(),
        };
        assert_eq!(err.to_string(), "Logstash returned non-zero return code 2");
    }
}
