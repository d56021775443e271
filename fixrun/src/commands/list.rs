//! List command implementation.
//!
//! Shows which fixtures a run would pick up and the output each one
//! expects, without invoking any external tool.

use std::io::Write;
use std::path::PathBuf;

use crate::commands::common::{compile_filter, fixture_dir};
use crate::commands::traits::{dispatch, Command};
use crate::config::Config;
use crate::error::Result;
use crate::harness::annotation::extract_expected;
use crate::harness::{discover_fixtures, Fixture};

/// Arguments for the list command.
#[derive(Debug, Clone, Default)]
pub struct ListArgs {
    pub config: Config,
    /// Fixture directory override.
    pub dir: Option<PathBuf>,
    /// Regular expression matched against fixture file names.
    pub filter: Option<String>,
}

/// List command handler.
pub struct ListCommand {
    args: ListArgs,
}

impl ListCommand {
    pub fn run(&self) -> Result<usize> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.run_with(&mut out)
    }

    /// Write every fixture with its indented expected output; returns the count.
    pub fn run_with<W: Write>(&self, out: &mut W) -> Result<usize> {
        let dir = fixture_dir(self.args.dir.as_deref(), &self.args.config);
        let filter = compile_filter(self.args.filter.as_deref())?;

        let mut fixtures: Vec<Fixture> = discover_fixtures(&dir, &self.args.config.extension)?
            .with_filter(filter)
            .collect();
        fixtures.sort();

        for fixture in &fixtures {
            writeln!(out, "{}", fixture.name())?;
            match extract_expected(fixture.path()) {
                Ok(expected) if expected.is_empty() => writeln!(out, "    (no output expected)")?,
                Ok(expected) => {
                    for line in expected.lines() {
                        writeln!(out, "    {}", line)?;
                    }
                }
                Err(e) => writeln!(out, "    error: {}", e)?,
            }
        }

        Ok(fixtures.len())
    }
}

impl Command for ListCommand {
    type Args = ListArgs;
    type Output = usize;

    fn new(args: Self::Args) -> Self {
        Self { args }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "list"
    }
}

/// Run the list command.
pub fn run_list(args: ListArgs) -> Result<usize> {
    dispatch::<ListCommand>(args)
}
