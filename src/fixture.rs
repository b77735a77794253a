//! Fixture loading
//!
//! A fixture is a relaxed JSON document whose top level is an array of
//! `[input, expected]` pairs:
//!
//! ```text
//! [
//!   // plain message gets a level
//!   [{"message": "x"}, {"level": "info"}],
//! ]
//! ```
//!
//! Order matters: the n-th case is paired with the n-th engine output.

use std::fs;
use std::path::Path;

use miette::Diagnostic;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while reading a fixture file.
#[derive(Debug, Error, Diagnostic)]
pub enum FixtureError {
    #[error("failed to read fixture '{path}': {source}")]
    #[diagnostic(code(lft::fixture::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("fixture is not valid JSON after stripping comments: {0}")]
    #[diagnostic(
        code(lft::fixture::syntax),
        help("fixtures may use // and /* */ comments and trailing commas, nothing else")
    )]
    Syntax(#[from] serde_json::Error),

    #[error("test case {index}: {reason}")]
    #[diagnostic(
        code(lft::fixture::shape),
        help("each test case must be a two-element array: [inputObject, expectedObject]")
    )]
    Shape { index: usize, reason: String },

    #[error("fixture must be an array of test cases, found {found}")]
    #[diagnostic(code(lft::fixture::shape))]
    NotAnArray { found: &'static str },
}

/// One `(input, expected)` pair.
///
/// `expected` is a partial match: only its keys are checked against the output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestCase {
    pub input: Map<String, Value>,
    pub expected: Map<String, Value>,
}

/// Ordered test cases from one fixture.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TestSuite {
    pub cases: Vec<TestCase>,
}

impl TestSuite {
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Input records in case order, ready to feed the engine.
    pub fn inputs(&self) -> Vec<Value> {
        self.cases.iter().map(|case| Value::Object(case.input.clone())).collect()
    }
}

/// Decode fixture text into a test suite.
pub fn parse_fixture(text: &str) -> Result<TestSuite, FixtureError> {
    let value = lft_jsonc::parse_relaxed(text)?;

    let Value::Array(entries) = value else {
        return Err(FixtureError::NotAnArray {
            found: value_kind(&value),
        });
    };

    let cases = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| parse_case(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(cases = cases.len(), "parsed fixture");
    Ok(TestSuite { cases })
}

/// Read and decode a fixture file.
pub fn load_fixture(path: &Path) -> Result<TestSuite, FixtureError> {
    let text = fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_fixture(&text)
}

fn parse_case(index: usize, entry: Value) -> Result<TestCase, FixtureError> {
    let shape = |reason: String| FixtureError::Shape { index, reason };

    let Value::Array(pair) = entry else {
        return Err(shape(format!("expected a [input, expected] array, found {}", value_kind(&entry))));
    };
    let [input, expected]: [Value; 2] = pair
        .try_into()
        .map_err(|pair: Vec<Value>| shape(format!("expected 2 elements, found {}", pair.len())))?;

    let Value::Object(input) = input else {
        return Err(shape(format!("input must be an object, found {}", value_kind(&input))));
    };
    let Value::Object(expected) = expected else {
        return Err(shape(format!("expected must be an object, found {}", value_kind(&expected))));
    };

    Ok(TestCase { input, expected })
}

/// Short JSON type name for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_fixture_with_comments() {
        let text = r#"[
            [{"msg": "x"}, {"level": "info"}], // note
        ]"#;
        let suite = parse_fixture(text).unwrap();
        assert_eq!(suite.len(), 1);
        assert_eq!(suite.inputs(), vec![json!({"msg": "x"})]);
        assert_eq!(Value::Object(suite.cases[0].expected.clone()), json!({"level": "info"}));
    }

    #[test]
    fn test_parse_fixture_empty() {
        let suite = parse_fixture("[ /* nothing yet */ ]").unwrap();
        assert!(suite.is_empty());
    }

    #[test]
    fn test_syntax_error() {
        let err = parse_fixture("[[{}, {}] [{}, {}]]").unwrap_err();
        assert!(matches!(err, FixtureError::Syntax(_)));
    }

    #[test]
    fn test_top_level_must_be_array() {
        let err = parse_fixture(r#"{"a": 1}"#).unwrap_err();
        assert!(matches!(err, FixtureError::NotAnArray { found: "an object" }));
    }

    #[test]
    fn test_case_must_be_pair() {
        let err = parse_fixture(r#"[[{}, {}], [{}]]"#).unwrap_err();
        match err {
            FixtureError::Shape { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("found 1"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_case_must_be_array() {
        let err = parse_fixture(r#"[{"input": {}}]"#).unwrap_err();
        assert!(matches!(err, FixtureError::Shape { index: 0, .. }));
    }

    #[test]
    fn test_input_must_be_object() {
        let err = parse_fixture(r#"[[[1, 2], {}]]"#).unwrap_err();
        match err {
            FixtureError::Shape { reason, .. } => assert!(reason.starts_with("input"), "{reason}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_expected_must_be_object() {
        let err = parse_fixture(r#"[[{}, "info"]]"#).unwrap_err();
        match err {
            FixtureError::Shape { reason, .. } => assert!(reason.starts_with("expected must"), "{reason}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_fixture_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_fixture(&dir.path().join("testcases.js")).unwrap_err();
        assert!(matches!(err, FixtureError::Io { .. }));
    }
}
