//! Launching the resolved tool.
//!
//! The child inherits this process's environment and standard streams, with
//! two changes: `SDKROOT` points at the resolved SDK (or is removed when
//! there is none) and `TOOLCHAINS` is removed, since the toolchain has
//! already been applied.

use crate::selectors::{SDKROOT, TOOLCHAINS};
use crate::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, info};

/// A fully resolved launch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    program: PathBuf,
    arguments: Vec<OsString>,
    sdk_root: Option<PathBuf>,
}

impl Dispatch {
    /// Launch `program` with `arguments`, passed through verbatim.
    #[must_use]
    pub fn new(
        program: impl Into<PathBuf>,
        arguments: impl IntoIterator<Item = impl Into<OsString>>,
        sdk_root: Option<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
            sdk_root,
        }
    }

    /// The executable to launch.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments forwarded to the executable.
    #[must_use]
    pub fn arguments(&self) -> &[OsString] {
        &self.arguments
    }

    /// Value the child sees in `SDKROOT`.
    #[must_use]
    pub fn sdk_root(&self) -> Option<&Path> {
        self.sdk_root.as_deref()
    }

    /// The child process, configured but not started.
    #[must_use]
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.arguments)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .env_remove(TOOLCHAINS);
        match &self.sdk_root {
            Some(root) => command.env(SDKROOT, root),
            None => command.env_remove(SDKROOT),
        };
        command
    }

    /// Run the child to completion.
    pub fn run(&self) -> Result<ExitOutcome> {
        info!(
            program = %self.program.display(),
            args = ?self.arguments,
            sdk_root = ?self.sdk_root,
            "Launching"
        );
        let status = self
            .command()
            .status()
            .map_err(|e| Error::launch(&self.program, e))?;
        let outcome = ExitOutcome::from(status);
        debug!(code = outcome.code(), "Child exited");
        Ok(outcome)
    }
}

/// How the launched child finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    code: i32,
}

impl ExitOutcome {
    /// Status code the launcher should exit with.
    ///
    /// The child's own code; a child killed by a signal on Unix maps to
    /// `128 + signal`, as shells report it.
    #[must_use]
    pub const fn code(self) -> i32 {
        self.code
    }

    /// Whether the child reported success.
    #[must_use]
    pub const fn success(self) -> bool {
        self.code == 0
    }
}

impl From<ExitStatus> for ExitOutcome {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: exit_code(status),
        }
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
