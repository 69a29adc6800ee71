use crate::tracing::{LogLevel, TracingFormat};
use clap::Parser;
use miette::{Diagnostic, Report};
use serde::Serialize;
use std::ffi::OsString;
use std::io::{self, Write};
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// Nothing matched the request
pub const EXIT_NOT_FOUND: i32 = 1;
/// CLI usage error exit code
pub const EXIT_CLI: i32 = 2;
/// Discovery, store or launch failure exit code
pub const EXIT_ERROR: i32 = 3;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// CLI usage error (exit code 2)
    #[error("CLI error: {message}")]
    #[diagnostic(code(tcrun::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Nothing matched the selectors or tool name (exit code 1)
    #[error("{message}")]
    #[diagnostic(code(tcrun::cli::not_found))]
    NotFound {
        /// What was not found
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Other failure (exit code 3)
    #[error("{message}")]
    #[diagnostic(code(tcrun::cli::other))]
    Other {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new usage error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new usage error with help text
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new not-found error
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new not-found error with help text
    #[must_use]
    pub fn not_found_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new other error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new other error with help text
    #[must_use]
    pub fn other_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

/// Convert `tcrun_core::Error` to a `CliError`.
///
/// Every library error is a hard failure (exit code 3); soft "not found"
/// outcomes never reach this conversion.
impl From<tcrun_core::Error> for CliError {
    fn from(err: tcrun_core::Error) -> Self {
        match err {
            tcrun_core::Error::MalformedRecord { .. } => Self::other_with_help(
                err.to_string(),
                "Repair or uninstall the toolkit that registered this record",
            ),
            tcrun_core::Error::Io {
                source,
                path,
                operation,
            } => {
                let path_str = path
                    .as_ref()
                    .map_or(String::new(), |p| format!(" on {}", p.display()));
                Self::other_with_help(
                    format!("I/O {operation} failed{path_str}: {source}"),
                    "Check file permissions and ensure the path exists",
                )
            }
            tcrun_core::Error::Store { message } => Self::other_with_help(
                format!("Configuration store error: {message}"),
                "Check the installation store documents (TCRUN_MACHINE_STORE, TCRUN_USER_STORE)",
            ),
            tcrun_core::Error::Launch { .. } => Self::other(err.to_string()),
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } => EXIT_CLI,
        CliError::NotFound { .. } => EXIT_NOT_FOUND,
        CliError::Other { .. } => EXIT_ERROR,
    }
}

/// Render error appropriately based on JSON flag
#[allow(clippy::print_stdout, clippy::print_stderr)]
pub fn render_error(err: &CliError, json_mode: bool) {
    if json_mode {
        let error_envelope = ErrorEnvelope::new(serde_json::json!({
            "code": match err {
                CliError::Config { .. } => "config",
                CliError::NotFound { .. } => "not_found",
                CliError::Other { .. } => "other",
            },
            "message": err.to_string()
        }));

        match serde_json::to_string(&error_envelope) {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("Error serializing error response"),
        }
    } else if let CliError::NotFound { .. } = err {
        eprintln!("tcrun: {err}");
    } else {
        let report = Report::new(err.clone());
        eprintln!("{report:?}");
    }
    let _ = io::stderr().flush();
}

/// Success response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct OkEnvelope<T> {
    /// Status indicator - always "ok" for success
    pub status: &'static str,
    /// The actual data payload
    pub data: T,
}

impl<T> OkEnvelope<T> {
    /// Create a new success envelope
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self { status: "ok", data }
    }
}

/// Error response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope<E> {
    /// Status indicator - always "error" for failures
    pub status: &'static str,
    /// The error details
    pub error: E,
}

impl<E> ErrorEnvelope<E> {
    /// Create a new error envelope
    #[must_use]
    pub const fn new(error: E) -> Self {
        Self {
            status: "error",
            error,
        }
    }
}

/// Whether the tool is located or launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Print the resolved path
    Find,
    /// Launch the tool (default)
    #[default]
    Run,
}

/// Locate or run a tool from an installed Swift toolchain.
///
/// Options may also be spelled with a single dash (`-sdk`, `-find`) up to
/// the tool name; everything after the tool name is passed to the tool.
#[derive(Parser, Debug)]
#[command(name = "tcrun")]
#[command(about = "Locate or run a tool from an installed Swift toolchain")]
#[command(long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// SDK to resolve (defaults to the last component of SDKROOT, then Windows.sdk).
    #[arg(long, value_name = "SDK")]
    pub sdk: Option<String>,

    /// Toolchain identifier to resolve (defaults to TOOLCHAINS).
    #[arg(long, value_name = "IDENTIFIER")]
    pub toolchain: Option<String>,

    /// Print the path of the tool instead of running it.
    #[arg(short = 'f', long, conflicts_with = "run")]
    pub find: bool,

    /// Run the tool (default).
    #[arg(short = 'r', long)]
    pub run: bool,

    /// Print the tcrun version.
    #[arg(long)]
    pub version: bool,

    /// List the installed toolkits.
    #[arg(long)]
    pub toolchains: bool,

    /// Print the path of the resolved SDK.
    #[arg(long)]
    pub show_sdk_path: bool,

    /// Print the path of the platform owning the resolved SDK.
    #[arg(long)]
    pub show_sdk_platform_path: bool,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    /// Format of log output on stderr.
    #[arg(long, default_value = "compact", value_enum)]
    pub log_format: TracingFormat,

    /// Emit JSON envelopes for listings and errors.
    #[arg(long, help = "Emit JSON envelope for listings and errors")]
    pub json: bool,

    /// Name of the tool to locate or run.
    #[arg(value_name = "TOOL")]
    pub tool: Option<String>,

    /// Arguments passed to the tool verbatim.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub arguments: Vec<OsString>,
}

impl Cli {
    /// Selected mode; `run` unless `--find` was given.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        if self.find { Mode::Find } else { Mode::Run }
    }

    /// Whether an informational flag makes the tool name optional.
    #[must_use]
    pub const fn is_informational(&self) -> bool {
        self.version || self.toolchains || self.show_sdk_path || self.show_sdk_platform_path
    }
}

/// Long options that may be written with a single dash.
const LONG_OPTIONS: &[&str] = &[
    "sdk",
    "toolchain",
    "find",
    "run",
    "version",
    "toolchains",
    "show-sdk-path",
    "show-sdk-platform-path",
    "level",
    "log-format",
    "json",
    "help",
];

/// Long options whose value may be the following argument.
const VALUE_OPTIONS: &[&str] = &["sdk", "toolchain", "level", "log-format"];

/// Short options whose value may be the following argument.
const SHORT_VALUE_OPTIONS: &[&str] = &["-L"];

/// Rewrite launcher-style arguments into a form clap accepts.
///
/// Single-dash long options before the tool name become double-dash ones,
/// and a `--` is inserted before the tool name so nothing after it is
/// interpreted as an option of tcrun.
#[must_use]
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();

    while let Some(arg) = args.next() {
        let Some(text) = arg.to_str() else {
            normalized.push(OsString::from("--"));
            normalized.push(arg);
            break;
        };

        if text == "--" {
            normalized.push(arg);
            break;
        }

        if let Some(long) = text.strip_prefix("--") {
            let takes_value = !long.contains('=') && VALUE_OPTIONS.contains(&long);
            normalized.push(arg);
            if takes_value && let Some(value) = args.next() {
                normalized.push(value);
            }
            continue;
        }

        if let Some(name) = text.strip_prefix('-')
            && !name.is_empty()
        {
            let base = name.split_once('=').map_or(name, |(base, _)| base);
            if LONG_OPTIONS.contains(&base) {
                let takes_value = base == name && VALUE_OPTIONS.contains(&base);
                normalized.push(OsString::from(format!("--{name}")));
                if takes_value && let Some(value) = args.next() {
                    normalized.push(value);
                }
            } else {
                let takes_value = SHORT_VALUE_OPTIONS.contains(&text);
                normalized.push(arg);
                if takes_value && let Some(value) = args.next() {
                    normalized.push(value);
                }
            }
            continue;
        }

        normalized.push(OsString::from("--"));
        normalized.push(arg);
        break;
    }

    normalized.extend(args);
    normalized
}

/// Parse the process arguments
#[must_use]
pub fn parse() -> Cli {
    Cli::parse_from(normalize_args(std::env::args_os()))
}
