//! Two-stage artifact builder.
//!
//! The compiler under test translates a fixture into an intermediate artifact
//! inside a scratch directory, then the native toolchain turns that artifact
//! into an executable in the same directory. Only exit statuses are
//! inspected; tool output is kept for diagnostics.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{CompilerConfig, ToolchainConfig};
use crate::error::{describe_code, BuildStage, HarnessError, Result};
use crate::harness::process::{Captured, Invocation, ProcessError, ProcessRunner};

/// Builds an executable for one fixture at a time.
pub struct ArtifactBuilder<'a, R: ProcessRunner + ?Sized> {
    runner: &'a R,
    compiler: &'a CompilerConfig,
    toolchain: &'a ToolchainConfig,
    timeout: Option<Duration>,
}

impl<'a, R: ProcessRunner + ?Sized> ArtifactBuilder<'a, R> {
    pub fn new(runner: &'a R, compiler: &'a CompilerConfig, toolchain: &'a ToolchainConfig) -> Self {
        Self {
            runner,
            compiler,
            toolchain,
            timeout: None,
        }
    }

    /// Deadline applied to each of the two tool invocations.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Where the intermediate artifact is written inside `scratch`.
    pub fn artifact_path(&self, scratch: &Path) -> PathBuf {
        scratch.join(&self.compiler.artifact_name)
    }

    /// Where the toolchain leaves the executable inside `scratch`.
    pub fn executable_path(&self, scratch: &Path) -> PathBuf {
        scratch.join(&self.toolchain.executable_name)
    }

    /// `<compiler> <args..> compile <fixture> <artifact>`
    pub fn compile_invocation(&self, fixture: &Path, artifact: &Path) -> Invocation {
        Invocation::new(&self.compiler.program)
            .args(&self.compiler.args)
            .arg(&self.compiler.subcommand)
            .arg(fixture)
            .arg(artifact)
    }

    /// `<toolchain> <args..> <std-flag> <artifact>`, run inside `scratch`.
    pub fn link_invocation(&self, artifact: &Path, scratch: &Path) -> Invocation {
        Invocation::new(&self.toolchain.program)
            .args(&self.toolchain.args)
            .arg(&self.toolchain.std_flag)
            .arg(artifact)
            .current_dir(scratch)
    }

    /// Compile `fixture` and link the result, returning the executable path.
    ///
    /// The toolchain is not invoked when the compiler fails.
    pub fn build(&self, fixture: &Path, scratch: &Path) -> Result<PathBuf> {
        let artifact = self.artifact_path(scratch);

        let compile = self.compile_invocation(fixture, &artifact);
        self.invoke(BuildStage::Compiler, &compile)?;

        let link = self.link_invocation(&artifact, scratch);
        self.invoke(BuildStage::Toolchain, &link)?;

        Ok(self.executable_path(scratch))
    }

    fn invoke(&self, stage: BuildStage, invocation: &Invocation) -> Result<()> {
        let captured = self
            .runner
            .execute(invocation, self.timeout)
            .map_err(|e| stage_error(stage, e))?;

        if captured.success() {
            return Ok(());
        }

        tracing::debug!(
            %stage,
            command = %invocation,
            code = ?captured.code,
            output = %captured.combined_output(),
            "build step failed"
        );
        Err(HarnessError::Build {
            stage,
            detail: failure_detail(&captured),
        })
    }
}

fn stage_error(stage: BuildStage, error: ProcessError) -> HarnessError {
    HarnessError::Build {
        stage,
        detail: error.to_string(),
    }
}

fn failure_detail(captured: &Captured) -> String {
    let output = captured.combined_output();
    if output.is_empty() {
        describe_code(captured.code)
    } else {
        format!("{}\n{}", describe_code(captured.code), output)
    }
}
