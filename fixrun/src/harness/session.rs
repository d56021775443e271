//! The per-fixture pipeline and the loop over all fixtures.
//!
//! Each fixture goes through extract, build, run and compare, in that order.
//! Any error along the way ends that fixture with a FAIL result; it never
//! stops the other fixtures. Every fixture builds inside its own scratch
//! directory, so fixtures can be evaluated on several threads at once.

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::config::Config;
use crate::error::{HarnessError, Result};
use crate::harness::annotation::extract_expected;
use crate::harness::builder::ArtifactBuilder;
use crate::harness::discovery::Fixture;
use crate::harness::process::ProcessRunner;
use crate::harness::report::{compare, TestResult};
use crate::harness::runner::{run_executable, Execution};

const SCRATCH_PREFIX: &str = "fixrun-";

/// Evaluates fixtures against one configuration.
pub struct Session<R: ProcessRunner> {
    runner: R,
    config: Config,
}

impl<R: ProcessRunner> Session<R> {
    pub fn new(runner: R, config: Config) -> Self {
        Self { runner, config }
    }

    /// Evaluate one fixture. Never fails: errors become FAIL results.
    pub fn evaluate(&self, fixture: &Fixture) -> TestResult {
        let expected = match extract_expected(fixture.path()) {
            Ok(expected) => expected,
            Err(e) => return self.failed(fixture, "", e),
        };

        let result = self
            .execute(fixture)
            .and_then(|execution| self.judge(fixture, &expected, execution));

        match result {
            Ok(result) => {
                tracing::debug!(fixture = %result.fixture, verdict = %result.verdict, "evaluated");
                result
            }
            Err(e) => self.failed(fixture, &expected, e),
        }
    }

    /// Evaluate `fixtures` in path order and hand each result to `on_result`.
    ///
    /// With `jobs > 1` the fixtures are evaluated on a thread pool and
    /// reported once all of them have finished, still in path order.
    pub fn run_all<F>(&self, mut fixtures: Vec<Fixture>, jobs: usize, mut on_result: F) -> Result<Vec<TestResult>>
    where
        F: FnMut(&TestResult) -> Result<()>,
    {
        fixtures.sort();

        if jobs <= 1 || fixtures.len() <= 1 {
            let mut results = Vec::with_capacity(fixtures.len());
            for fixture in &fixtures {
                let result = self.evaluate(fixture);
                on_result(&result)?;
                results.push(result);
            }
            return Ok(results);
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| HarnessError::Config(format!("Failed to start {} workers: {}", jobs, e)))?;
        tracing::debug!(jobs, fixtures = fixtures.len(), "evaluating in parallel");

        let results: Vec<TestResult> =
            pool.install(|| fixtures.par_iter().map(|fixture| self.evaluate(fixture)).collect());
        for result in &results {
            on_result(result)?;
        }
        Ok(results)
    }

    /// Build the fixture in a fresh scratch directory and run it.
    fn execute(&self, fixture: &Fixture) -> Result<Execution> {
        let scratch = tempfile::Builder::new().prefix(SCRATCH_PREFIX).tempdir()?;

        let builder = ArtifactBuilder::new(&self.runner, &self.config.compiler, &self.config.toolchain)
            .with_timeout(self.config.timeouts.build_limit());
        let executable = builder.build(fixture.path(), scratch.path())?;

        run_executable(&self.runner, &executable, self.config.timeouts.run_limit())
    }

    fn judge(&self, fixture: &Fixture, expected: &str, execution: Execution) -> Result<TestResult> {
        let result = compare(fixture, expected, &execution.stdout);
        if result.passed() && self.config.run.check_exit_code && !execution.exited_cleanly() {
            return Err(HarnessError::ExitStatus {
                code: execution.code,
            });
        }
        Ok(result)
    }

    fn failed(&self, fixture: &Fixture, expected: &str, error: HarnessError) -> TestResult {
        tracing::debug!(fixture = %fixture.name(), error = %error, "fixture failed before comparison");
        TestResult::from_error(fixture, expected, &error)
    }
}
