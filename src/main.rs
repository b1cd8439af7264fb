//! matrix-lock: ordered mutual exclusion for CI matrix jobs.
//!
//! This is the main entry point for the `matrix-lock` CLI. It parses
//! arguments, installs logging, dispatches to the step handler, and maps
//! errors to exit codes.

mod cli;
mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod lock;
pub mod logging;
pub mod queue;
pub mod store;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.global.verbose);

    match commands::dispatch(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
