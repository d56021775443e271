//! Init command implementation.
//!
//! Writes a `fixrun.toml` holding the current configuration and creates the
//! fixture directory it points at.

use std::path::{Path, PathBuf};

use crate::commands::common::error_messages;
use crate::commands::traits::{dispatch, Command};
use crate::config::{Config, CONFIG_FILE_NAME};
use crate::error::{HarnessError, Result};

/// Arguments for the init command.
#[derive(Debug, Clone, Default)]
pub struct InitArgs {
    pub config: Config,
    /// Directory to initialize.
    pub path: Option<PathBuf>,
    /// Overwrite an existing configuration file.
    pub force: bool,
}

/// Init command handler.
pub struct InitCommand {
    args: InitArgs,
}

impl InitCommand {
    /// Execute the command, returning the path of the written configuration.
    pub fn run(&self) -> Result<PathBuf> {
        let target_path = self.get_target_path();
        self.validate_directory(&target_path)?;

        let config_path = target_path.join(CONFIG_FILE_NAME);
        if config_path.exists() && !self.args.force {
            return Err(HarnessError::Validation(format!(
                "{}: {}",
                error_messages::CONFIG_EXISTS,
                config_path.display()
            )));
        }

        self.args.config.save_to_path(&config_path)?;
        tracing::info!("created {}", config_path.display());

        let fixtures = target_path.join(&self.args.config.fixture_dir);
        if !fixtures.exists() {
            std::fs::create_dir_all(&fixtures)?;
            tracing::info!("created {}", fixtures.display());
        }

        Ok(config_path)
    }

    fn get_target_path(&self) -> PathBuf {
        self.args
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn validate_directory(&self, path: &Path) -> Result<()> {
        if path.exists() && !path.is_dir() {
            return Err(HarnessError::Validation(format!(
                "{}: {}",
                error_messages::TARGET_NOT_DIR,
                path.display()
            )));
        }
        Ok(())
    }
}

impl Command for InitCommand {
    type Args = InitArgs;
    type Output = PathBuf;

    fn new(args: Self::Args) -> Self {
        Self { args }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "init"
    }
}

/// Run the init command.
pub fn run_init(args: InitArgs) -> Result<PathBuf> {
    dispatch::<InitCommand>(args)
}
