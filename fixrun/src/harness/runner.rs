//! Runs a freshly built executable and captures what it prints.

use std::path::Path;
use std::time::Duration;

use crate::error::{HarnessError, Result};
use crate::harness::process::{Invocation, ProcessError, ProcessRunner};

/// What an executable printed, plus how it exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub stdout: String,
    pub code: Option<i32>,
}

impl Execution {
    pub fn exited_cleanly(&self) -> bool {
        self.code == Some(0)
    }
}

/// Run `executable` with no input and wait for it to finish.
///
/// The exit code is reported but not judged here.
pub fn run_executable<R: ProcessRunner + ?Sized>(
    runner: &R,
    executable: &Path,
    timeout: Option<Duration>,
) -> Result<Execution> {
    let mut invocation = Invocation::new(executable);
    if let Some(dir) = executable.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        invocation = invocation.current_dir(dir);
    }

    let captured = runner
        .execute(&invocation, timeout)
        .map_err(|e| match e {
            ProcessError::TimedOut { limit, .. } => HarnessError::RunTimeout { limit },
            other => HarnessError::Run(other.to_string()),
        })?;

    Ok(Execution {
        stdout: captured.stdout,
        code: captured.code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::process::{Captured, MockProcessRunner};

    #[test]
    fn test_captures_stdout_and_code() {
        let mut runner = MockProcessRunner::new();
        runner
            .expect_execute()
            .withf(|invocation, _| {
                invocation.display_name() == "/scratch/a.out"
                    && invocation.working_dir() == Some(Path::new("/scratch"))
                    && invocation.arguments().is_empty()
            })
            .returning(|_, _| {
                Ok(Captured {
                    code: Some(2),
                    stdout: "hi\n".to_string(),
                    stderr: "ignored".to_string(),
                })
            });

        let execution = run_executable(&runner, Path::new("/scratch/a.out"), None).unwrap();
        assert_eq!(execution.stdout, "hi\n");
        assert_eq!(execution.code, Some(2));
        assert!(!execution.exited_cleanly());
    }

    #[test]
    fn test_timeout_maps_to_run_timeout() {
        let mut runner = MockProcessRunner::new();
        runner.expect_execute().returning(|invocation, timeout| {
            Err(ProcessError::TimedOut {
                program: invocation.display_name(),
                limit: timeout.unwrap_or_default(),
            })
        });

        let result = run_executable(
            &runner,
            Path::new("/scratch/a.out"),
            Some(Duration::from_secs(2)),
        );
        match result {
            Err(HarnessError::RunTimeout { limit }) => assert_eq!(limit, Duration::from_secs(2)),
            other => panic!("Expected RunTimeout, got {other:?}"),
        }
    }

    #[test]
    fn test_spawn_failure_maps_to_run_error() {
        let mut runner = MockProcessRunner::new();
        runner.expect_execute().returning(|invocation, _| {
            Err(ProcessError::Spawn {
                program: invocation.display_name(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            })
        });

        let result = run_executable(&runner, Path::new("/scratch/a.out"), None);
        assert!(matches!(result, Err(HarnessError::Run(msg)) if msg.contains("missing")));
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_real_executable() {
        use crate::harness::process::SystemRunner;

        let execution = run_executable(&SystemRunner, Path::new("/bin/echo"), None).unwrap();
        assert_eq!(execution.stdout, "\n");
        assert!(execution.exited_cleanly());
    }
}
