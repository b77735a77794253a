#![forbid(unsafe_code)]
//! Relaxed JSON decoder for test fixtures
//!
//! Fixture files are JSON with two conveniences borrowed from JavaScript:
//! - `//` line comments and `/* */` block comments
//! - trailing commas before `]` and `}`
//!
//! [`decode_comments`] normalizes such text into strict JSON with a single
//! left-to-right scan. [`parse_relaxed`] hands the result to `serde_json`.
//!
//! ## Module Structure
//!
//! - `strip` - the scanning state machine (`CommentStripper`)

mod strip;

pub use strip::{CommentStripper, State};

/// Strip comments and trailing commas from relaxed JSON text.
///
/// Everything inside string literals is kept byte-for-byte. Unterminated
/// comments swallow the rest of the input.
#[tracing::instrument(skip_all, fields(source_len = text.len()))]
pub fn decode_comments(text: &str) -> String {
    CommentStripper::new(text).strip()
}

/// Decode relaxed JSON text into a `serde_json::Value`.
pub fn parse_relaxed(text: &str) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::from_str(&decode_comments(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_relaxed_fixture_shape() {
        let text = r#"
            // one case per entry
            [
                [{"msg": "x"}, {"level": "info"}], /* trailing comma next */
            ]
        "#;
        let value = parse_relaxed(text).unwrap();
        assert_eq!(value, json!([[{"msg": "x"}, {"level": "info"}]]));
    }

    #[test]
    fn test_parse_relaxed_reports_strict_errors() {
        assert!(parse_relaxed("[1 2]").is_err());
    }
}
