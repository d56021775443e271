//! Command trait for the fixrun CLI.
//!
//! Every subcommand implements [`Command`] so the entry point can dispatch
//! them the same way.

use crate::error::Result;

/// Standard command trait that all fixrun commands implement.
///
/// # Type Parameters
/// * `Args` - The arguments type for this command
/// * `Output` - The output type returned by this command
pub trait Command {
    /// The arguments type for this command.
    type Args;

    /// The output type returned by this command.
    type Output;

    /// Create a new command instance with the given arguments.
    fn new(args: Self::Args) -> Self;

    /// Execute the command.
    fn execute(&self) -> Result<Self::Output>;

    /// Get the command name.
    fn name() -> &'static str;
}

/// Construct and execute a command, logging which one runs.
pub fn dispatch<C: Command>(args: C::Args) -> Result<C::Output> {
    tracing::debug!(command = C::name(), "executing");
    C::new(args).execute()
}
