//! Child-process seam shared by the artifact builder and the execution runner.
//!
//! Every external invocation goes through [`ProcessRunner`], which lets the
//! driver be exercised with a mock in tests.

use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

/// How often a child with a deadline is polled for termination.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A fully described external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// The program name as it appears in log lines and error messages.
    pub fn display_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.cwd {
            command.current_dir(dir);
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Output of a child that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    /// Exit code, `None` when the child was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Both output streams, labelled, for inclusion in diagnostics.
    pub fn combined_output(&self) -> String {
        let mut text = String::new();
        let stderr = self.stderr.trim_end();
        let stdout = self.stdout.trim_end();
        if !stderr.is_empty() {
            text.push_str("stderr:\n");
            text.push_str(stderr);
        }
        if !stdout.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str("stdout:\n");
            text.push_str(stdout);
        }
        text
    }

    fn from_output(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Failure to obtain a [`Captured`] result from a child.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` did not finish within {}s", .limit.as_secs_f64())]
    TimedOut { program: String, limit: Duration },
}

/// Runs external commands to completion.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessRunner: Send + Sync {
    /// Run `invocation` with stdin closed and both output streams captured.
    ///
    /// With a `timeout`, the child is killed once the deadline passes.
    fn execute(
        &self,
        invocation: &Invocation,
        timeout: Option<Duration>,
    ) -> Result<Captured, ProcessError>;
}

/// [`ProcessRunner`] backed by `std::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn execute(
        &self,
        invocation: &Invocation,
        timeout: Option<Duration>,
    ) -> Result<Captured, ProcessError> {
        let program = invocation.display_name();
        tracing::debug!(command = %invocation, "spawning");

        let mut command = invocation.to_command();
        if timeout.is_some() {
            own_process_group(&mut command);
        }
        let mut child = command.spawn().map_err(|source| ProcessError::Spawn {
            program: program.clone(),
            source,
        })?;

        let Some(limit) = timeout else {
            let output = child
                .wait_with_output()
                .map_err(|source| ProcessError::Wait { program, source })?;
            return Ok(Captured::from_output(output));
        };

        // Pipes are drained on their own threads so a chatty child cannot
        // block on a full pipe while we poll for its exit.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let deadline = Instant::now() + limit;

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    terminate(&mut child);
                    tracing::warn!(command = %invocation, ?limit, "killed after deadline");
                    return Err(ProcessError::TimedOut { program, limit });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(source) => return Err(ProcessError::Wait { program, source }),
            }
        };

        // Descendants of the child may still hold the pipes open.
        match (collect(stdout, deadline), collect(stderr, deadline)) {
            (Some(stdout), Some(stderr)) => Ok(Captured {
                code: status.code(),
                stdout,
                stderr,
            }),
            _ => {
                terminate(&mut child);
                tracing::warn!(command = %invocation, ?limit, "output still open after deadline");
                Err(ProcessError::TimedOut { program, limit })
            }
        }
    }
}

#[cfg(unix)]
fn own_process_group(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(not(unix))]
fn own_process_group(_command: &mut Command) {}

/// Kill the child and, on unix, every process left in its group.
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
        // SAFETY: killpg takes plain integers and touches no memory.
        unsafe {
            libc::killpg(pgid, libc::SIGKILL);
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Receiver<Vec<u8>>> {
    pipe.map(|mut pipe| {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let mut buffer = Vec::new();
            let _ = pipe.read_to_end(&mut buffer);
            let _ = sender.send(buffer);
        });
        receiver
    })
}

/// The drained bytes of one pipe, or `None` if it is still open at `deadline`.
fn collect(receiver: Option<Receiver<Vec<u8>>>, deadline: Instant) -> Option<String> {
    let Some(receiver) = receiver else {
        return Some(String::new());
    };
    match receiver.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => Some(String::new()),
    }
}
