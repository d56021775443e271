//! Fixrun CLI - compile, run and check annotated fixtures.
//!
//! This is the main entry point for the fixrun CLI application.
//! It uses clap for argument parsing and dispatches to the command handlers.
//! Without a subcommand it behaves like `fixrun run`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fixrun::commands::{run_fixtures, run_init, run_list, InitArgs, ListArgs, RunArgs};
use fixrun::config::Config;

/// Fixrun - integration-test harness for a compiler
///
/// Compiles every fixture with the compiler under test, builds the result
/// with the native toolchain, runs it and compares what it prints with the
/// fixture's `OUT(...)` annotations.
#[derive(Parser, Debug)]
#[command(name = "fixrun")]
#[command(author = "Fixrun Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Integration-test harness for a compiler", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "FIXRUN_VERBOSE")]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "FIXRUN_CONFIG")]
    config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, global = true, env = "FIXRUN_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands for the fixrun CLI.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build, run and check every fixture (the default)
    Run(RunCommand),

    /// List fixtures and the output they expect, without building
    List(ListCommand),

    /// Write a default fixrun.toml and create the fixture directory
    Init(InitCommand),
}

/// Arguments for the run subcommand.
#[derive(Parser, Debug, Default)]
struct RunCommand {
    /// Fixture directory (default: from config)
    dir: Option<PathBuf>,

    /// Only run fixtures whose file name matches this regular expression
    #[arg(short, long)]
    filter: Option<String>,

    /// Number of fixtures to evaluate in parallel
    #[arg(short, long)]
    jobs: Option<u32>,

    /// Seconds each executable may run before it is killed
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Report format (text, json)
    #[arg(short = 'F', long)]
    format: Option<String>,

    /// Also fail fixtures whose executable exits with a non-zero status
    #[arg(long)]
    check_exit_code: bool,
}

/// Arguments for the list subcommand.
#[derive(Parser, Debug)]
struct ListCommand {
    /// Fixture directory (default: from config)
    dir: Option<PathBuf>,

    /// Only list fixtures whose file name matches this regular expression
    #[arg(short, long)]
    filter: Option<String>,
}

/// Arguments for the init subcommand.
#[derive(Parser, Debug)]
struct InitCommand {
    /// Directory to initialize (default: current directory)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Overwrite an existing fixrun.toml
    #[arg(short, long)]
    force: bool,
}

/// Main entry point for the fixrun CLI.
///
/// Exits with status 0 only when every fixture passed.
fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.no_color) {
        eprintln!("fixrun: {:#}", e);
        return ExitCode::FAILURE;
    }

    match execute_command(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize the logging system.
///
/// Logs go to stderr so that stdout carries only the report. `RUST_LOG`
/// takes precedence over `--verbose`.
fn init_logging(verbose: bool, no_color: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .context("failed to initialize logging")
}

/// Load configuration from file or use defaults.
fn load_config(config_path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    config.context("failed to load configuration")
}

/// Execute the selected command; `Ok(false)` means fixtures failed.
fn execute_command(cli: Cli) -> anyhow::Result<bool> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        None => execute_run(RunCommand::default(), config),
        Some(Commands::Run(args)) => execute_run(args, config),
        Some(Commands::List(args)) => execute_list(args, config),
        Some(Commands::Init(args)) => execute_init(args, config),
    }
}

fn execute_run(args: RunCommand, config: Config) -> anyhow::Result<bool> {
    let run_args = RunArgs {
        config,
        dir: args.dir,
        filter: args.filter,
        jobs: args.jobs,
        timeout: args.timeout,
        format: args.format,
        check_exit_code: args.check_exit_code,
    };
    let summary = run_fixtures(run_args)?;
    Ok(summary.is_success())
}

fn execute_list(args: ListCommand, config: Config) -> anyhow::Result<bool> {
    let list_args = ListArgs {
        config,
        dir: args.dir,
        filter: args.filter,
    };
    run_list(list_args)?;
    Ok(true)
}

fn execute_init(args: InitCommand, config: Config) -> anyhow::Result<bool> {
    let init_args = InitArgs {
        config,
        path: args.path,
        force: args.force,
    };
    let written = run_init(init_args)?;
    println!("{}", written.display());
    Ok(true)
}
