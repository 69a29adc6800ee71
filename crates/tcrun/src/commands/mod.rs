//! Command implementations.
//!
//! Every command writes its result to the `out` it is given, so tests can
//! capture output without touching the process's stdout.

pub mod sdk;
pub mod tool;
pub mod toolchains;
pub mod version;

use crate::cli::{Cli, CliError, EXIT_OK, Mode};
use std::ffi::OsString;
use std::io::Write;
use tcrun_core::{
    FileStore, InstallationSet, Resolution, Selectors, StoreLocations, resolve,
};
use tracing::{debug, instrument};

/// A validated request, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the tcrun version
    Version,
    /// List every installation
    Toolchains {
        /// Emit a JSON envelope instead of text
        json: bool,
    },
    /// Print the platform directory owning the resolved SDK
    ShowSdkPlatformPath {
        /// What to resolve
        selectors: Selectors,
    },
    /// Print the resolved SDK directory
    ShowSdkPath {
        /// What to resolve
        selectors: Selectors,
    },
    /// Locate or launch a tool
    Tool {
        /// Tool name, with or without an executable extension
        name: String,
        /// Arguments passed to the tool
        arguments: Vec<OsString>,
        /// Print or launch
        mode: Mode,
        /// What to resolve
        selectors: Selectors,
    },
}

impl Command {
    /// Turn parsed arguments into a command.
    ///
    /// Informational flags win over a tool name, in the order `--version`,
    /// `--toolchains`, `--show-sdk-platform-path`, `--show-sdk-path`.
    pub fn from_cli(cli: Cli) -> Result<Self, CliError> {
        if cli.version {
            return Ok(Self::Version);
        }
        if cli.toolchains {
            return Ok(Self::Toolchains { json: cli.json });
        }

        let mode = cli.mode();
        let selectors = Selectors::from_environment(cli.toolchain, cli.sdk);
        if cli.show_sdk_platform_path {
            return Ok(Self::ShowSdkPlatformPath { selectors });
        }
        if cli.show_sdk_path {
            return Ok(Self::ShowSdkPath { selectors });
        }

        match cli.tool {
            Some(name) if !name.is_empty() => Ok(Self::Tool {
                name,
                arguments: cli.arguments,
                mode,
                selectors,
            }),
            _ => Err(CliError::config_with_help(
                "Missing expected argument '<TOOL>'",
                "Run 'tcrun --help' for usage information",
            )),
        }
    }

    /// Run the command, returning the process exit code.
    #[instrument(level = "debug", skip(out))]
    pub fn execute(self, out: &mut dyn Write) -> Result<i32, CliError> {
        match self {
            Self::Version => {
                write_line(out, &version::version_string())?;
                Ok(EXIT_OK)
            }
            Self::Toolchains { json } => toolchains::execute_toolchains(out, json).map(|()| EXIT_OK),
            Self::ShowSdkPlatformPath { selectors } => {
                sdk::execute_show_sdk_platform_path(out, &selectors).map(|()| EXIT_OK)
            }
            Self::ShowSdkPath { selectors } => {
                sdk::execute_show_sdk_path(out, &selectors).map(|()| EXIT_OK)
            }
            Self::Tool {
                name,
                arguments,
                mode,
                selectors,
            } => tool::execute_tool(out, &name, arguments, mode, &selectors),
        }
    }
}

/// Read every installation from the configured store documents.
pub(crate) fn discover() -> Result<InstallationSet, CliError> {
    let locations = StoreLocations::from_environment();
    debug!(
        machine = %locations.machine.display(),
        user = ?locations.user,
        "Opening installation store"
    );
    let store = FileStore::open(&locations)?;
    Ok(InstallationSet::enumerate(&store)?)
}

/// Resolve `selectors`, reporting a miss as [`CliError::NotFound`].
pub(crate) fn resolve_selectors(selectors: &Selectors) -> Result<Resolution, CliError> {
    let installations = discover()?;
    resolve(&installations, selectors)?.ok_or_else(|| {
        CliError::not_found_with_help(
            format!("no installation provides {}", describe(selectors)),
            "Run 'tcrun --toolchains' to list the installed toolkits",
        )
    })
}

fn describe(selectors: &Selectors) -> String {
    match (&selectors.toolchain, &selectors.sdk) {
        (Some(toolchain), Some(sdk)) => format!("toolchain '{toolchain}' with SDK '{sdk}'"),
        (Some(toolchain), None) => format!("toolchain '{toolchain}'"),
        (None, Some(sdk)) => format!("SDK '{sdk}'"),
        (None, None) => "a toolchain".to_string(),
    }
}

pub(crate) fn write_line(out: &mut dyn Write, line: &str) -> Result<(), CliError> {
    writeln!(out, "{line}").map_err(|e| CliError::other(format!("Failed to write output: {e}")))
}
