//! Fixture file tests
//!
//! Loads the files under `tests/fixtures/` through the public API.

use std::path::PathBuf;

use logstash_filter_test::{FixtureError, load_fixture};
use serde_json::json;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

#[test]
fn test_load_commented_fixture() {
    let suite = load_fixture(&fixture("syslog.js")).unwrap();
    assert_eq!(suite.len(), 3);

    let second = &suite.cases[1];
    assert_eq!(second.input["message"], json!("GET http://example.com/a/*b*/c"));
    assert_eq!(second.expected["tags"], json!(["http"]));

    let inputs = suite.inputs();
    assert_eq!(inputs[2], json!({"message": "x"}));
    assert_eq!(suite.cases[2].expected["__@metadata"], json!({"index": "syslog"}));
}

#[test]
fn test_load_empty_fixture() {
    let suite = load_fixture(&fixture("empty.js")).unwrap();
    assert!(suite.is_empty());
}

#[test]
fn test_load_bad_shape() {
    let err = load_fixture(&fixture("bad_shape.js")).unwrap_err();
    assert!(matches!(err, FixtureError::Shape { index: 1, .. }), "{err}");
    assert!(err.to_string().contains("expected 2 elements, found 1"));
}

#[test]
fn test_load_bad_syntax() {
    let err = load_fixture(&fixture("bad_syntax.js")).unwrap_err();
    assert!(matches!(err, FixtureError::Syntax(_)), "{err}");
}

#[test]
fn test_load_missing_file() {
    let err = load_fixture(&fixture("does-not-exist.js")).unwrap_err();
    match err {
        FixtureError::Io { path, .. } => assert!(path.ends_with("does-not-exist.js")),
        other => panic!("expected Io, got {other:?}"),
    }
}

#[test]
fn test_demo_fixture_loads() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/testcases.js");
    let suite = load_fixture(&path).unwrap();
    assert!(!suite.is_empty());
}
