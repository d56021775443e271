//! Run command implementation.
//!
//! Discovers the fixtures, evaluates every one of them and writes the report
//! to standard output. The returned [`Summary`] decides the exit status.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use crate::commands::common::{
    compile_filter, error_messages, fixture_dir, parse_report_format, ReportFormat,
};
use crate::commands::traits::{dispatch, Command};
use crate::config::Config;
use crate::error::{HarnessError, Result};
use crate::harness::process::ProcessRunner;
use crate::harness::report::{write_json, write_summary, write_text};
use crate::harness::{discover_fixtures, Fixture, Session, Summary, SystemRunner};

/// Arguments for the run command.
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    /// Loaded configuration, before command-line overrides.
    pub config: Config,
    /// Fixture directory override.
    pub dir: Option<PathBuf>,
    /// Regular expression matched against fixture file names.
    pub filter: Option<String>,
    /// Number of fixtures evaluated concurrently.
    pub jobs: Option<u32>,
    /// Deadline in seconds for each executable under test.
    pub timeout: Option<u64>,
    /// Report format name.
    pub format: Option<String>,
    /// Fail fixtures whose executable exits unsuccessfully.
    pub check_exit_code: bool,
}

/// Run command handler.
pub struct RunCommand {
    args: RunArgs,
}

impl RunCommand {
    /// Configuration with command-line overrides applied.
    pub fn effective_config(&self) -> Config {
        let mut config = self.args.config.clone();

        if let Some(jobs) = self.args.jobs {
            config.jobs = jobs;
        }

        if let Some(timeout) = self.args.timeout {
            config.timeouts.run_secs = Some(timeout);
        }

        if self.args.check_exit_code {
            config.run.check_exit_code = true;
        }

        config
    }

    /// Execute with the real process runner, reporting to stdout.
    pub fn run(&self) -> Result<Summary> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.run_with(SystemRunner, &mut out)
    }

    /// Execute with `runner`, writing the report to `out`.
    pub fn run_with<R: ProcessRunner, W: Write>(&self, runner: R, out: &mut W) -> Result<Summary> {
        let start_time = Instant::now();
        if self.args.jobs == Some(0) {
            return Err(HarnessError::Validation(error_messages::ZERO_JOBS.to_string()));
        }

        let format = parse_report_format(self.args.format.as_deref())?;
        let config = self.effective_config();
        let fixtures = self.discover(&config)?;
        let jobs = config.effective_jobs();

        let session = Session::new(runner, config);
        let mut summary = Summary::default();

        let results = session.run_all(fixtures, jobs, |result| {
            summary.record(result);
            if format == ReportFormat::Text {
                write_text(&mut *out, result)?;
                out.flush()?;
            }
            Ok(())
        })?;

        match format {
            ReportFormat::Text => write_summary(out, &summary)?,
            ReportFormat::Json => write_json(out, &results, &summary)?,
        }

        tracing::info!(
            total = summary.total(),
            passed = summary.passed,
            failed = summary.failed,
            "finished in {:.2}s",
            start_time.elapsed().as_secs_f64()
        );
        Ok(summary)
    }

    fn discover(&self, config: &Config) -> Result<Vec<Fixture>> {
        let dir = fixture_dir(self.args.dir.as_deref(), config);
        let filter = compile_filter(self.args.filter.as_deref())?;

        let fixtures: Vec<Fixture> = discover_fixtures(&dir, &config.extension)?
            .with_filter(filter)
            .collect();

        tracing::info!("discovered {} fixture(s) in {}", fixtures.len(), dir.display());
        Ok(fixtures)
    }
}

impl Command for RunCommand {
    type Args = RunArgs;
    type Output = Summary;

    fn new(args: Self::Args) -> Self {
        Self { args }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "run"
    }
}

/// Run the run command.
pub fn run_fixtures(args: RunArgs) -> Result<Summary> {
    dispatch::<RunCommand>(args)
}
