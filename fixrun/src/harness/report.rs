//! Comparison of expected against actual output, and the run report.

use std::io::Write;

use serde::Serialize;

use crate::error::{HarnessError, Result};
use crate::harness::discovery::Fixture;

/// Outcome of one fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
        }
    }
}

/// The two strings shown when a fixture fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub expected: String,
    pub actual: String,
}

/// Verdict for one fixture, with diagnostics on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestResult {
    pub fixture: String,
    pub verdict: Verdict,
    #[serde(flatten)]
    pub diagnostic: Option<Diagnostic>,
}

impl TestResult {
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    /// A failure caused by a pipeline error rather than an output mismatch.
    ///
    /// The error message stands in for the actual output.
    pub fn from_error(fixture: &Fixture, expected: &str, error: &HarnessError) -> Self {
        Self {
            fixture: fixture.name(),
            verdict: Verdict::Fail,
            diagnostic: Some(Diagnostic {
                expected: expected.trim().to_string(),
                actual: error.to_string(),
            }),
        }
    }
}

/// Compare trimmed `expected` and `actual` for exact equality.
pub fn compare(fixture: &Fixture, expected: &str, actual: &str) -> TestResult {
    let expected = expected.trim();
    let actual = actual.trim();

    if expected == actual {
        TestResult {
            fixture: fixture.name(),
            verdict: Verdict::Pass,
            diagnostic: None,
        }
    } else {
        TestResult {
            fixture: fixture.name(),
            verdict: Verdict::Fail,
            diagnostic: Some(Diagnostic {
                expected: expected.to_string(),
                actual: actual.to_string(),
            }),
        }
    }
}

/// Pass/fail counts for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
}

impl Summary {
    pub fn record(&mut self, result: &TestResult) {
        match result.verdict {
            Verdict::Pass => self.passed += 1,
            Verdict::Fail => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    /// A run succeeds when nothing failed, including when nothing ran.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Write one fixture's block of the text report.
///
/// ```text
/// integration_tests/add.hs: FAIL
/// Expected:
/// 1
/// 2
///
/// But Found:
/// 1
/// 3
/// ```
pub fn write_text<W: Write>(out: &mut W, result: &TestResult) -> Result<()> {
    writeln!(out, "{}: {}", result.fixture, result.verdict)?;
    if let Some(diagnostic) = &result.diagnostic {
        writeln!(out, "Expected:")?;
        writeln!(out, "{}", diagnostic.expected)?;
        writeln!(out, "\nBut Found:")?;
        writeln!(out, "{}", diagnostic.actual)?;
    }
    Ok(())
}

pub fn write_summary<W: Write>(out: &mut W, summary: &Summary) -> Result<()> {
    writeln!(out, "\n{} passed, {} failed", summary.passed, summary.failed)?;
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    results: &'a [TestResult],
    #[serde(flatten)]
    summary: Summary,
}

/// Write every result and the totals as one JSON document.
pub fn write_json<W: Write>(out: &mut W, results: &[TestResult], summary: &Summary) -> Result<()> {
    let report = JsonReport {
        results,
        summary: *summary,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Fixture {
        Fixture::new("integration_tests/hello.hs")
    }

    #[test]
    fn test_exact_match_passes() {
        let result = compare(&fixture(), "hi", "hi");
        assert!(result.passed());
        assert!(result.diagnostic.is_none());
        assert_eq!(result.fixture, "integration_tests/hello.hs");
    }

    #[test]
    fn test_boundary_whitespace_is_ignored() {
        assert!(compare(&fixture(), "hi", "hi\n").passed());
        assert!(compare(&fixture(), "1\n2", "\n1\n2\n\n").passed());
        assert!(compare(&fixture(), "  x ", "x").passed());
        assert!(compare(&fixture(), "", "\n").passed());
    }

    #[test]
    fn test_inner_whitespace_matters() {
        assert!(!compare(&fixture(), "1\n2", "1\n\n2").passed());
        assert!(!compare(&fixture(), "a b", "a  b").passed());
    }

    #[test]
    fn test_single_character_divergence_fails_with_both_strings() {
        let result = compare(&fixture(), "1\n2", "1\n3\n");
        assert_eq!(result.verdict, Verdict::Fail);
        assert_eq!(
            result.diagnostic,
            Some(Diagnostic {
                expected: "1\n2".to_string(),
                actual: "1\n3".to_string(),
            })
        );
    }

    #[test]
    fn test_from_error_uses_message_as_actual() {
        let error = HarnessError::Run("boom".to_string());
        let result = TestResult::from_error(&fixture(), "hi\n", &error);
        assert!(!result.passed());
        let diagnostic = result.diagnostic.unwrap();
        assert_eq!(diagnostic.expected, "hi");
        assert_eq!(diagnostic.actual, "Could not run executable: boom");
    }

    #[test]
    fn test_text_report_for_pass() {
        let mut out = Vec::new();
        write_text(&mut out, &compare(&fixture(), "hi", "hi")).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "integration_tests/hello.hs: PASS\n"
        );
    }

    #[test]
    fn test_text_report_for_fail() {
        let mut out = Vec::new();
        write_text(&mut out, &compare(&fixture(), "1\n2", "1\n3")).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "integration_tests/hello.hs: FAIL\nExpected:\n1\n2\n\nBut Found:\n1\n3\n"
        );
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = Summary::default();
        assert!(summary.is_success());
        summary.record(&compare(&fixture(), "a", "a"));
        summary.record(&compare(&fixture(), "a", "b"));
        assert_eq!(summary.total(), 2);
        assert_eq!(summary.passed, 1);
        assert!(!summary.is_success());

        let mut out = Vec::new();
        write_summary(&mut out, &summary).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\n1 passed, 1 failed\n");
    }

    #[test]
    fn test_json_report() {
        let results = vec![
            compare(&fixture(), "hi", "hi"),
            compare(&Fixture::new("integration_tests/bad.hs"), "1", "2"),
        ];
        let mut summary = Summary::default();
        results.iter().for_each(|result| summary.record(result));

        let mut out = Vec::new();
        write_json(&mut out, &results, &summary).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["passed"], 1);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["results"][0]["verdict"], "pass");
        assert!(value["results"][0].get("expected").is_none());
        assert_eq!(value["results"][1]["fixture"], "integration_tests/bad.hs");
        assert_eq!(value["results"][1]["expected"], "1");
        assert_eq!(value["results"][1]["actual"], "2");
    }
}
