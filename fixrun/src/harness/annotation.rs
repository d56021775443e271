//! Expected-output annotations.
//!
//! A fixture declares what it should print with trailing line-comments:
//!
//! ```text
//! main = putStrLn "hi" -- OUT(hi)
//! ```
//!
//! The grammar is a single pattern, `--.*OUT\((.*)\)`: a `--` comment opener
//! somewhere on the line, then the `OUT` marker and a parenthesised payload.
//! The payload is taken verbatim and greedily, so it ends at the last `)` on
//! the line; parentheses inside it are not balanced.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{HarnessError, Result};

static ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"--.*OUT\((.*)\)").unwrap_or_else(|e| panic!("invalid annotation pattern: {e}"))
});

/// The payload of the annotation on `line`, if there is one.
pub fn annotation_payload(line: &str) -> Option<&str> {
    ANNOTATION
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|payload| payload.as_str())
}

/// Collect the expected output declared in `source`, one line per annotation,
/// in source order.
pub fn expected_from_source(source: &str) -> String {
    source
        .lines()
        .filter_map(annotation_payload)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read a fixture and return its expected output.
///
/// A fixture without annotations expects empty output.
pub fn extract_expected(path: &Path) -> Result<String> {
    let source = std::fs::read_to_string(path).map_err(|source| HarnessError::Fixture {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(expected_from_source(&source))
}
