#![forbid(unsafe_code)]
//! Logstash filter test harness
//!
//! Runs input records through a Logstash filter definition and checks each
//! resulting event against an expected partial document. Test cases live in
//! a fixture file: a JSON array of `[input, expected]` pairs that may carry
//! comments and trailing commas.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod compare;
pub mod config;
pub mod fixture;
pub mod harness;
pub mod version;

pub use compare::{CaseFailure, KeyMismatch, MismatchReport, compare};
pub use config::HarnessConfig;
pub use fixture::{FixtureError, TestCase, TestSuite, load_fixture, parse_fixture};
pub use harness::{Engine, HarnessError, LogstashEngine, SuiteRun, run, run_suite};
pub use lft_jsonc::{decode_comments, parse_relaxed};
