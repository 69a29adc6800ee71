//! Error types for tcrun-core

use miette::Diagnostic;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Main error type for discovery, resolution and dispatch.
///
/// A selector that matches nothing is not an error; those outcomes are
/// reported as `None` by the resolver. Errors are `Clone` so that the
/// memoizing sequence can replay a failed directory read on every traversal.
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum Error {
    /// A record passed the display-name filter but carries an unparsable version
    #[error("Malformed installation record '{key}': unparsable version '{version}'")]
    #[diagnostic(
        code(tcrun::store::malformed_record),
        help("Repair or uninstall the toolkit that registered this record")
    )]
    MalformedRecord {
        /// Name of the configuration store key holding the record
        key: String,
        /// The raw `DisplayVersion` value
        version: String,
    },

    /// I/O error with path context
    #[error("I/O error during {operation}: {source}")]
    #[diagnostic(code(tcrun::io::error))]
    Io {
        /// The underlying I/O error
        #[source]
        source: Arc<std::io::Error>,
        /// The path where the I/O error occurred, if applicable
        path: Option<PathBuf>,
        /// Description of the operation that failed
        operation: String,
    },

    /// The configuration store could not be read
    #[error("Configuration store error: {message}")]
    #[diagnostic(code(tcrun::store::error))]
    Store {
        /// The error message describing the store failure
        message: String,
    },

    /// The resolved executable could not be spawned
    #[error("Failed to launch {}: {source}", program.display())]
    #[diagnostic(code(tcrun::dispatch::launch))]
    Launch {
        /// The executable that failed to start
        program: PathBuf,
        /// The underlying spawn error
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl Error {
    /// Create a malformed record error
    pub fn malformed_record(key: impl Into<String>, version: impl Into<String>) -> Self {
        Self::MalformedRecord {
            key: key.into(),
            version: version.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(source: std::io::Error, path: Option<PathBuf>, operation: impl Into<String>) -> Self {
        Self::Io {
            source: Arc::new(source),
            path,
            operation: operation.into(),
        }
    }

    /// Create a configuration store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create a launch error
    pub fn launch(program: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Launch {
            program: program.into(),
            source: Arc::new(source),
        }
    }
}

/// Result type for tcrun-core operations
pub type Result<T> = std::result::Result<T, Error>;
