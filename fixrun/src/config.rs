//! Configuration module for the fixrun harness.
//!
//! This module handles loading, saving, and managing the `fixrun.toml`
//! settings: where fixtures live and how the external tools are invoked.

use dirs::{config_dir, home_dir};
use num_cpus::get as get_num_cpus;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{HarnessError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "fixrun.toml";

/// Application configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Directory scanned for fixtures.
    #[serde(default = "default_fixture_dir")]
    pub fixture_dir: String,

    /// File extension (without the dot) that marks a fixture.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Number of fixtures evaluated concurrently. `0` means one per CPU.
    #[serde(default = "default_jobs")]
    pub jobs: u32,

    /// How the compiler under test is invoked.
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// How the native toolchain is invoked.
    #[serde(default)]
    pub toolchain: ToolchainConfig,

    /// How produced executables are judged.
    #[serde(default)]
    pub run: RunConfig,

    /// Optional deadlines for external processes.
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

/// Compiler invocation: `<program> <args..> <subcommand> <fixture> <artifact>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompilerConfig {
    #[serde(default = "default_compiler_program")]
    pub program: String,

    /// Arguments placed before the subcommand.
    #[serde(default = "default_compiler_args")]
    pub args: Vec<String>,

    #[serde(default = "default_compiler_subcommand")]
    pub subcommand: String,

    /// File name of the intermediate artifact inside the scratch directory.
    #[serde(default = "default_artifact_name")]
    pub artifact_name: String,
}

/// Toolchain invocation: `<program> <args..> <std_flag> <artifact>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolchainConfig {
    #[serde(default = "default_toolchain_program")]
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default = "default_std_flag")]
    pub std_flag: String,

    /// Name of the executable the toolchain writes into its working directory.
    #[serde(default = "default_executable_name")]
    pub executable_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Treat a non-zero exit of the executable as a failure.
    #[serde(default)]
    pub check_exit_code: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TimeoutConfig {
    /// Deadline in seconds for each compiler and toolchain invocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_secs: Option<u64>,

    /// Deadline in seconds for each executable under test.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_secs: Option<u64>,
}

fn default_fixture_dir() -> String {
    "integration_tests".to_string()
}

fn default_extension() -> String {
    "hs".to_string()
}

fn default_jobs() -> u32 {
    1
}

fn default_compiler_program() -> String {
    "cabal".to_string()
}

fn default_compiler_args() -> Vec<String> {
    vec![
        "run".to_string(),
        "haskell-in-haskell".to_string(),
        "--".to_string(),
    ]
}

fn default_compiler_subcommand() -> String {
    "compile".to_string()
}

fn default_artifact_name() -> String {
    ".output.c".to_string()
}

fn default_toolchain_program() -> String {
    "gcc".to_string()
}

fn default_std_flag() -> String {
    "-std=c99".to_string()
}

fn default_executable_name() -> String {
    "a.out".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fixture_dir: default_fixture_dir(),
            extension: default_extension(),
            jobs: default_jobs(),
            compiler: CompilerConfig::default(),
            toolchain: ToolchainConfig::default(),
            run: RunConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: default_compiler_program(),
            args: default_compiler_args(),
            subcommand: default_compiler_subcommand(),
            artifact_name: default_artifact_name(),
        }
    }
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            program: default_toolchain_program(),
            args: Vec::new(),
            std_flag: default_std_flag(),
            executable_name: default_executable_name(),
        }
    }
}

impl TimeoutConfig {
    pub fn build_limit(&self) -> Option<Duration> {
        self.build_secs.map(Duration::from_secs)
    }

    pub fn run_limit(&self) -> Option<Duration> {
        self.run_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Resolve the configured job count, mapping `0` to the number of CPUs.
    pub fn effective_jobs(&self) -> usize {
        match self.jobs {
            0 => get_num_cpus(),
            n => n as usize,
        }
    }

    /// Load configuration from the default location.
    ///
    /// Searches for configuration in the following order:
    /// 1. Current directory
    /// 2. User's home directory
    /// 3. System configuration directory
    ///
    /// Returns the default configuration if no config file is found.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HarnessError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            HarnessError::Config(format!(
                "Failed to parse configuration {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            HarnessError::Config(format!("Failed to serialize configuration: {}", e))
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    fn check_home_config() -> Option<PathBuf> {
        home_dir()
            .map(|dir| dir.join(".config").join("fixrun").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn check_system_config() -> Option<PathBuf> {
        config_dir()
            .map(|dir| dir.join("fixrun").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    /// Find the configuration file in standard locations.
    fn find_config_file() -> Option<PathBuf> {
        Self::check_current_dir_config()
            .or_else(Self::check_home_config)
            .or_else(Self::check_system_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config() -> Config {
        Config {
            fixture_dir: "/tmp/fixtures".to_string(),
            extension: "lang".to_string(),
            jobs: 4,
            compiler: CompilerConfig {
                program: "mycc".to_string(),
                args: vec!["--quiet".to_string()],
                subcommand: "build".to_string(),
                artifact_name: "out.c".to_string(),
            },
            toolchain: ToolchainConfig {
                program: "clang".to_string(),
                args: vec!["-O0".to_string()],
                std_flag: "-std=c11".to_string(),
                executable_name: "a.out".to_string(),
            },
            run: RunConfig {
                check_exit_code: true,
            },
            timeouts: TimeoutConfig {
                build_secs: Some(60),
                run_secs: Some(5),
            },
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.fixture_dir, "integration_tests");
        assert_eq!(config.extension, "hs");
        assert_eq!(config.jobs, 1);
        assert_eq!(config.compiler.program, "cabal");
        assert_eq!(
            config.compiler.args,
            vec!["run", "haskell-in-haskell", "--"]
        );
        assert_eq!(config.compiler.subcommand, "compile");
        assert_eq!(config.compiler.artifact_name, ".output.c");
        assert_eq!(config.toolchain.program, "gcc");
        assert_eq!(config.toolchain.std_flag, "-std=c99");
        assert_eq!(config.toolchain.executable_name, "a.out");
        assert!(!config.run.check_exit_code);
        assert!(config.timeouts.run_limit().is_none());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join(CONFIG_FILE_NAME);

        let original_config = create_test_config();
        original_config.save_to_path(&config_path).unwrap();

        let loaded_config = Config::load_from_path(&config_path).unwrap();

        assert_eq!(original_config, loaded_config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &config_path,
            "fixture_dir = \"cases\"\n[toolchain]\nprogram = \"cc\"\n[timeouts]\nrun_secs = 2\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.fixture_dir, "cases");
        assert_eq!(config.extension, "hs");
        assert_eq!(config.toolchain.program, "cc");
        assert_eq!(config.toolchain.std_flag, "-std=c99");
        assert_eq!(config.compiler, CompilerConfig::default());
        assert_eq!(config.timeouts.run_limit(), Some(Duration::from_secs(2)));
        assert_eq!(config.timeouts.build_limit(), None);
    }

    #[test]
    fn test_malformed_config_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "jobs = \"many\"").unwrap();

        let result = Config::load_from_path(&config_path);
        assert!(matches!(result, Err(HarnessError::Config(_))));
    }

    #[test]
    fn test_load_from_nonexistent_path() {
        let result = Config::load_from_path(Path::new("/nonexistent/path/fixrun.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_effective_jobs() {
        let mut config = Config::default();
        assert_eq!(config.effective_jobs(), 1);
        config.jobs = 3;
        assert_eq!(config.effective_jobs(), 3);
        config.jobs = 0;
        assert!(config.effective_jobs() >= 1);
    }
}
