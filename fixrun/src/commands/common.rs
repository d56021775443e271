//! Common types and utilities for fixrun commands.
//!
//! This module provides shared types, constants, and helpers used across
//! the command implementations.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::config::Config;
use crate::error::{HarnessError, Result};

// ============================================================================
// Report Format
// ============================================================================

/// Supported report formats for `fixrun run`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// `name: PASS` / `name: FAIL` lines with Expected / But Found blocks
    #[default]
    Text,
    /// A single JSON document
    Json,
}

impl ReportFormat {
    /// Parse a format name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Resolve an optional `--format` value.
pub fn parse_report_format(format: Option<&str>) -> Result<ReportFormat> {
    match format {
        None => Ok(ReportFormat::default()),
        Some(name) => ReportFormat::parse(name).ok_or_else(|| {
            HarnessError::Validation(format!("{}: {}", error_messages::UNKNOWN_FORMAT, name))
        }),
    }
}

// ============================================================================
// Fixture Selection
// ============================================================================

/// Compile an optional `--filter` pattern.
pub fn compile_filter(filter: Option<&str>) -> Result<Option<Regex>> {
    filter
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| {
                HarnessError::Validation(format!("{} '{}': {}", error_messages::INVALID_FILTER, pattern, e))
            })
        })
        .transpose()
}

/// The fixture directory: the override if given, otherwise the configured one.
pub fn fixture_dir(dir: Option<&Path>, config: &Config) -> PathBuf {
    dir.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.fixture_dir))
}

// ============================================================================
// Error Messages
// ============================================================================

/// Standard error message templates.
pub mod error_messages {
    /// Error when an unknown report format is requested.
    pub const UNKNOWN_FORMAT: &str = "Unknown report format";

    /// Error when the fixture filter is not a valid regular expression.
    pub const INVALID_FILTER: &str = "Invalid fixture filter";

    /// Error when `init` would overwrite an existing configuration.
    pub const CONFIG_EXISTS: &str = "Configuration file already exists";

    /// Error when the init target exists but is not a directory.
    pub const TARGET_NOT_DIR: &str = "Target path is not a directory";

    /// Error when the job count is zero on the command line.
    pub const ZERO_JOBS: &str = "Number of jobs must be at least 1";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format_parse() {
        assert_eq!(ReportFormat::parse("text"), Some(ReportFormat::Text));
        assert_eq!(ReportFormat::parse("JSON"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::parse("xml"), None);
    }

    #[test]
    fn test_parse_report_format_defaults_to_text() {
        assert_eq!(parse_report_format(None).unwrap(), ReportFormat::Text);
        let err = parse_report_format(Some("yaml")).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Unknown report format: yaml");
    }

    #[test]
    fn test_compile_filter() {
        assert!(compile_filter(None).unwrap().is_none());
        let filter = compile_filter(Some("^gc_")).unwrap().unwrap();
        assert!(filter.is_match("gc_strings.hs"));
        assert!(matches!(
            compile_filter(Some("(")),
            Err(HarnessError::Validation(_))
        ));
    }

    #[test]
    fn test_fixture_dir_override() {
        let config = Config::default();
        assert_eq!(fixture_dir(None, &config), PathBuf::from("integration_tests"));
        assert_eq!(
            fixture_dir(Some(Path::new("other")), &config),
            PathBuf::from("other")
        );
    }
}
