//! Locating and launching the requested tool.

use super::{resolve_selectors, write_line};
use crate::cli::{CliError, EXIT_OK, Mode};
use std::ffi::OsString;
use std::io::Write;
use tcrun_core::Dispatch;
use tcrun_core::Selectors;
use tcrun_core::search::executable_extensions;
use tracing::{debug, instrument};

/// Resolve `name` and print its path or run it.
///
/// In run mode the returned code is the tool's own exit code.
#[instrument(level = "debug", skip(out, arguments))]
pub fn execute_tool(
    out: &mut dyn Write,
    name: &str,
    arguments: Vec<OsString>,
    mode: Mode,
    selectors: &Selectors,
) -> Result<i32, CliError> {
    let resolution = resolve_selectors(selectors)?;

    let Some(toolchain) = resolution.toolchain() else {
        return Err(CliError::not_found(format!(
            "no usable toolchain in the installation of version {}",
            resolution.installation().version()
        )));
    };

    let extensions = executable_extensions();
    let Some(path) = resolution.find_tool(name, &extensions) else {
        return Err(CliError::not_found(format!(
            "tool '{name}' not found in toolchain '{}' ({})",
            toolchain.identifier(),
            toolchain.bindir().display()
        )));
    };
    debug!(tool = %path.display(), ?mode, "Resolved tool");

    match mode {
        Mode::Find => {
            write_line(out, &path.display().to_string())?;
            Ok(EXIT_OK)
        }
        Mode::Run => {
            out.flush()
                .map_err(|e| CliError::other(format!("Failed to flush output: {e}")))?;
            let dispatch = Dispatch::new(
                path,
                arguments,
                resolution.sdk_path().map(std::path::Path::to_path_buf),
            );
            Ok(dispatch.run()?.code())
        }
    }
}
