//! Command modules for the fixrun CLI.
//!
//! Each subcommand is implemented in its own file following the same
//! pattern: an `*Args` struct, a handler implementing [`traits::Command`],
//! and a `run_*` convenience function.

pub mod common;
pub mod traits;

pub mod init;
pub mod list;
pub mod run;

pub use init::{run_init, InitArgs};
pub use list::{run_list, ListArgs};
pub use run::{run_fixtures, RunArgs};
