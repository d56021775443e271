//! Error handling module for the fixrun harness.
//!
//! This module provides the error taxonomy used throughout the harness.
//! Per-fixture errors are turned into FAIL results by the driver; only
//! discovery and CLI-level errors end a run.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// The external tool that failed while building a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    /// The compiler under test.
    Compiler,
    /// The native toolchain that turns the artifact into an executable.
    Toolchain,
}

impl std::fmt::Display for BuildStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildStage::Compiler => write!(f, "compiler"),
            BuildStage::Toolchain => write!(f, "native toolchain"),
        }
    }
}

/// Main error type for the fixrun harness.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// The fixture directory does not exist or cannot be listed.
    ///
    /// This is the only error that aborts a whole run.
    #[error("Cannot read fixture directory {}: {source}", .path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fixture file could not be opened or decoded as text.
    #[error("Cannot read fixture {}: {source}", .path.display())]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The compiler or the native toolchain did not succeed.
    #[error("{stage} failed: {detail}")]
    Build { stage: BuildStage, detail: String },

    /// The produced executable could not be started or awaited.
    #[error("Could not run executable: {0}")]
    Run(String),

    /// The produced executable exceeded its deadline and was killed.
    #[error("Executable timed out after {}s", .limit.as_secs_f64())]
    RunTimeout { limit: Duration },

    /// The executable printed the expected output but exited unsuccessfully.
    #[error("Executable exited with {}", describe_code(*code))]
    ExitStatus { code: Option<i32> },

    /// Error when the configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error when command-line input fails validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error when IO operations fail.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Render an exit code, or its absence when the process was killed by a signal.
pub fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "no exit status (terminated by signal)".to_string(),
    }
}

/// Result type alias using HarnessError.
pub type Result<T> = std::result::Result<T, HarnessError>;
