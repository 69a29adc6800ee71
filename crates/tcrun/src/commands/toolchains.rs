//! `--toolchains`: list every discovered installation.

use super::discover;
use crate::cli::{CliError, OkEnvelope};
use std::io::{self, Write};
use tcrun_core::Installation;

/// Print all installations, newest first, as text blocks or a JSON envelope.
pub fn execute_toolchains(out: &mut dyn Write, json: bool) -> Result<(), CliError> {
    let installations = discover()?;

    if json {
        let json = serde_json::to_string_pretty(&OkEnvelope::new(&installations))
            .map_err(|e| CliError::other(format!("Failed to serialize installations: {e}")))?;
        return writeln!(out, "{json}").map_err(write_error);
    }

    for installation in &installations {
        render_installation(out, installation)?;
    }
    Ok(())
}

/// Write the text block describing `installation`.
pub fn render_installation(out: &mut dyn Write, installation: &Installation) -> Result<(), CliError> {
    writeln!(out, "Installation {{").map_err(write_error)?;
    writeln!(out, "  System: {}", installation.is_system()).map_err(write_error)?;
    writeln!(out, "  Vendor: {}", installation.vendor()).map_err(write_error)?;
    writeln!(out, "  Version: {}", installation.version()).map_err(write_error)?;

    writeln!(out, "  Toolchains:").map_err(write_error)?;
    for toolchain in installation.toolchains() {
        let toolchain = toolchain?;
        writeln!(
            out,
            "    - {} [{}]",
            toolchain.identifier(),
            toolchain.location().display()
        )
        .map_err(write_error)?;
    }

    writeln!(out, "  Platforms:").map_err(write_error)?;
    for platform in installation.platforms() {
        let platform = platform?;
        writeln!(out, "    - {}", platform.identifier()).map_err(write_error)?;
        writeln!(out, "      SDKs:").map_err(write_error)?;
        for sdk in platform.sdks() {
            let sdk = sdk?;
            writeln!(out, "        - {} [{}]", sdk.identifier(), sdk.location().display())
                .map_err(write_error)?;
        }
    }

    writeln!(out, "}}").map_err(write_error)
}

fn write_error(e: io::Error) -> CliError {
    CliError::other(format!("Failed to write output: {e}"))
}
