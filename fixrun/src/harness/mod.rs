//! The fixture pipeline: discovery, annotation extraction, building,
//! execution and comparison.

pub mod annotation;
pub mod builder;
pub mod discovery;
pub mod process;
pub mod report;
pub mod runner;
pub mod session;

pub use discovery::{discover_fixtures, Fixture};
pub use process::SystemRunner;
pub use report::{Summary, TestResult};
pub use session::Session;
