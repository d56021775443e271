//! fixrun - integration-test harness for a compiler.
//!
//! Fixtures are source files whose trailing `-- ... OUT(text)` comments spell
//! out what the compiled program must print. For every fixture the harness
//! runs the compiler under test, builds the emitted artifact with the native
//! toolchain, executes the result and compares its standard output with the
//! annotations.

pub mod commands;
pub mod config;
pub mod error;
pub mod harness;

pub use config::Config;
pub use error::{HarnessError, Result};
