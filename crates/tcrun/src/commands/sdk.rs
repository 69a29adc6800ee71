//! `--show-sdk-path` and `--show-sdk-platform-path`

use super::{resolve_selectors, write_line};
use crate::cli::CliError;
use tcrun_core::Selectors;

/// Print the directory of the resolved SDK.
pub fn execute_show_sdk_path(
    out: &mut dyn std::io::Write,
    selectors: &Selectors,
) -> Result<(), CliError> {
    let resolution = resolve_selectors(selectors)?;
    let path = resolution
        .sdk_path()
        .ok_or_else(|| CliError::not_found("no SDK was resolved"))?;
    write_line(out, &path.display().to_string())
}

/// Print `<install-root>/Platforms/<version>/<platform>` for the resolved SDK.
pub fn execute_show_sdk_platform_path(
    out: &mut dyn std::io::Write,
    selectors: &Selectors,
) -> Result<(), CliError> {
    let resolution = resolve_selectors(selectors)?;
    let path = resolution
        .platform_path()
        .ok_or_else(|| CliError::not_found("no platform was resolved"))?;
    write_line(out, &path.display().to_string())
}
