//! Partial-match comparison of engine outputs against expectations
//!
//! A case passes when every key of its `expected` object is present in the
//! output with an equal value. Keys the output has but `expected` does not
//! mention are ignored; fixtures are written against that rule.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::fixture::TestSuite;

/// One key whose output value differs from the expected one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMismatch {
    pub key: String,
    pub expected: Value,
    /// `None` when the key is missing from the output
    pub actual: Option<Value>,
}

/// A failing case with everything needed to explain it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseFailure {
    pub index: usize,
    pub mismatches: Vec<KeyMismatch>,
    /// Full output document, for context
    pub output: Value,
}

/// Outcome of comparing a whole suite.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MismatchReport {
    pub total: usize,
    pub failures: Vec<CaseFailure>,
}

impl MismatchReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn passed(&self) -> usize {
        self.total - self.failed()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Compare outputs with the suite's expectations, index by index.
///
/// A case without a corresponding output is compared against an empty
/// document and therefore fails on every expected key.
pub fn compare(suite: &TestSuite, outputs: &[Value]) -> MismatchReport {
    let empty = Value::Object(Map::new());
    let failures = suite
        .cases
        .iter()
        .enumerate()
        .filter_map(|(index, case)| {
            let output = outputs.get(index).unwrap_or(&empty);
            let mismatches = check_case(&case.expected, output);
            (!mismatches.is_empty()).then(|| CaseFailure {
                index,
                mismatches,
                output: output.clone(),
            })
        })
        .collect();

    MismatchReport {
        total: suite.len(),
        failures,
    }
}

/// Keys of `expected` that `actual` does not satisfy, sorted by key.
///
/// An expected `null` is satisfied by a missing key.
pub fn check_case(expected: &Map<String, Value>, actual: &Value) -> Vec<KeyMismatch> {
    let mut mismatches: Vec<KeyMismatch> = expected
        .iter()
        .filter_map(|(key, want)| {
            let got = actual.get(key);
            let ok = match got {
                Some(got) => values_equal(want, got),
                None => want.is_null(),
            };
            (!ok).then(|| KeyMismatch {
                key: key.clone(),
                expected: want.clone(),
                actual: got.cloned(),
            })
        })
        .collect();
    mismatches.sort_by(|a, b| a.key.cmp(&b.key));
    mismatches
}

/// Deep structural equality where numbers compare by value (`1 == 1.0`).
///
/// Integers compare exactly; only a float on either side goes through `f64`.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if x.is_f64() || y.is_f64() {
                x.as_f64() == y.as_f64()
            } else {
                x.as_i64() == y.as_i64() && x.as_u64() == y.as_u64()
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len() && xs.iter().all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::TestCase;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn suite(expected: Vec<Value>) -> TestSuite {
        TestSuite {
            cases: expected
                .into_iter()
                .map(|e| TestCase {
                    input: Map::new(),
                    expected: obj(e),
                })
                .collect(),
        }
    }

    #[test]
    fn test_extra_output_keys_ignored() {
        let report = compare(&suite(vec![json!({"a": 1})]), &[json!({"a": 1, "b": 2})]);
        assert!(report.is_success());
        assert_eq!(report.passed(), 1);
    }

    #[test]
    fn test_value_mismatch() {
        let report = compare(&suite(vec![json!({"a": 1})]), &[json!({"a": 2})]);
        assert_eq!(report.failed(), 1);
        let failure = &report.failures[0];
        assert_eq!(failure.index, 0);
        assert_eq!(
            failure.mismatches,
            vec![KeyMismatch {
                key: "a".to_string(),
                expected: json!(1),
                actual: Some(json!(2)),
            }]
        );
        assert_eq!(failure.output, json!({"a": 2}));
    }

    #[test]
    fn test_missing_key() {
        let mismatches = check_case(&obj(json!({"level": "info"})), &json!({"message": "x"}));
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].actual, None);
    }

    #[test]
    fn test_expected_null_matches_missing_key() {
        assert!(check_case(&obj(json!({"gone": null})), &json!({})).is_empty());
        assert_eq!(check_case(&obj(json!({"gone": null})), &json!({"gone": 0})).len(), 1);
    }

    #[test]
    fn test_mismatches_sorted_by_key() {
        let mismatches = check_case(&obj(json!({"b": 1, "a": 1, "c": 1})), &json!({}));
        let keys: Vec<&str> = mismatches.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn test_values_equal_numbers() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(values_equal(&json!({"n": [1, 2.5]}), &json!({"n": [1.0, 2.5]})));
        assert!(!values_equal(&json!(1), &json!("1")));
        assert!(!values_equal(&json!([1, 2]), &json!([1, 2, 3])));
        assert!(!values_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
    }

    #[test]
    fn test_values_equal_large_integers_exact() {
        // Both round to the same f64.
        assert!(!values_equal(&json!(9007199254740993u64), &json!(9007199254740992u64)));
        assert!(!values_equal(&json!(-9007199254740993i64), &json!(-9007199254740992i64)));
        assert!(values_equal(&json!(u64::MAX), &json!(u64::MAX)));
        assert!(!values_equal(&json!(u64::MAX), &json!(-1)));

        let expected = obj(json!({"fingerprint": 9007199254740993u64}));
        let mismatches = check_case(&expected, &json!({"fingerprint": 9007199254740992u64}));
        assert_eq!(mismatches.len(), 1);
    }

    #[test]
    fn test_nested_objects_compared_fully() {
        let mismatches = check_case(&obj(json!({"geo": {"city": "x"}})), &json!({"geo": {"city": "x", "cc": "y"}}));
        assert_eq!(mismatches.len(), 1);
    }

    #[test]
    fn test_missing_output_fails() {
        let report = compare(&suite(vec![json!({"a": 1}), json!({})]), &[json!({"a": 1})]);
        assert_eq!(report.total, 2);
        assert!(report.is_success(), "empty expectations pass against an empty document");

        let report = compare(&suite(vec![json!({"a": 1}), json!({"b": 1})]), &[json!({"a": 1})]);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures[0].index, 1);
    }
}
