//! Report rendering
//!
//! ## Reporter Trait
//!
//! Comparison produces a [`MismatchReport`]; a [`Reporter`] turns it into
//! output. [`ConsoleReporter`] prints the human-readable text format,
//! [`JsonReporter`] prints the report as one JSON document.

use std::io::{self, Write};

use serde_json::Value;

use crate::compare::{CaseFailure, MismatchReport};

const SEPARATOR: &str = "=================================";

/// Trait for reporting comparison results.
pub trait Reporter {
    /// Called once per failing case, in case order
    fn on_case_failed(&mut self, _failure: &CaseFailure) -> io::Result<()> {
        Ok(())
    }

    /// Called after all failures have been reported
    fn on_run_complete(&mut self, report: &MismatchReport) -> io::Result<()>;
}

/// Feed a whole report through a reporter.
pub fn emit<R: Reporter + ?Sized>(reporter: &mut R, report: &MismatchReport) -> io::Result<()> {
    for failure in &report.failures {
        reporter.on_case_failed(failure)?;
    }
    reporter.on_run_complete(report)
}

/// Plain-text reporter
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn on_case_failed(&mut self, failure: &CaseFailure) -> io::Result<()> {
        writeln!(self.out, "Testcase {} failed:", failure.index)?;
        for mismatch in &failure.mismatches {
            let actual = match &mismatch.actual {
                Some(value) => pretty(value),
                None => "<absent>".to_string(),
            };
            writeln!(self.out, "  {}:", mismatch.key)?;
            writeln!(self.out, "    output:   {}", actual)?;
            writeln!(self.out, "    expected: {}", pretty(&mismatch.expected))?;
        }
        writeln!(self.out, "Full output document:")?;
        writeln!(self.out, "{}", pretty(&failure.output))?;
        writeln!(self.out, "{}", SEPARATOR)?;
        writeln!(self.out)
    }

    fn on_run_complete(&mut self, report: &MismatchReport) -> io::Result<()> {
        if report.is_success() {
            writeln!(self.out, "All {} tests successful.", report.total)?;
        } else {
            writeln!(self.out, "{} / {} tests failed.", report.failed(), report.total)?;
        }
        self.out.flush()
    }
}

/// Machine-readable reporter
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn on_run_complete(&mut self, report: &MismatchReport) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.out, report)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

/// Pretty-print a document. Object keys come out sorted (`serde_json::Map`
/// is a `BTreeMap` without the `preserve_order` feature).
fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
