//! Command-line interface for Startpage.
//!
//! Commands operate on the settings file of the local board. Mutating
//! commands go through a [`Session`](crate::grid::Session), so the CLI is
//! held to the same placement rules as interactive editing.

mod board;
mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::StartpageError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), StartpageError> {
    let cli = Cli::parse();
    cli.execute()
}
