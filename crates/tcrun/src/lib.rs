//! tcrun: locate or run a tool from an installed Swift toolchain
//!
//! The binary is a thin wrapper around [`run`]; argument handling, error
//! rendering and logging setup live here so they can be tested in-process.

pub mod cli;
pub mod commands;
pub mod tracing;

use cli::{Cli, CliError};
use commands::Command;
use std::io::Write;

/// Execute a parsed invocation, writing results to `out`.
///
/// Returns the process exit code: `0` for informational output and `find`,
/// the tool's own code for `run`.
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<i32, CliError> {
    Command::from_cli(cli)?.execute(out)
}
