//! Toolchains and the `ToolchainInfo.plist` that identifies them.

use crate::search::find_executable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Metadata file expected at the root of every toolchain directory.
pub const TOOLCHAIN_INFO: &str = "ToolchainInfo.plist";

/// Why a directory under `Toolchains` is not a usable toolchain.
#[derive(Debug, Error)]
pub enum InvalidToolchain {
    #[error("missing {TOOLCHAIN_INFO}")]
    Missing,

    #[error("invalid {TOOLCHAIN_INFO}: {0}")]
    Parse(#[from] plist::Error),

    #[error("empty Identifier in {TOOLCHAIN_INFO}")]
    EmptyIdentifier,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ToolchainInfo {
    identifier: String,
}

/// A bundle of tools under an installation's `Toolchains` directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toolchain {
    identifier: String,
    location: PathBuf,
}

impl Toolchain {
    /// Create a toolchain record directly.
    #[must_use]
    pub fn new(identifier: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            identifier: identifier.into(),
            location: location.into(),
        }
    }

    /// Read the toolchain at `location`, validating its metadata.
    pub(crate) fn load(location: &Path) -> Result<Self, InvalidToolchain> {
        let info_path = location.join(TOOLCHAIN_INFO);
        if !info_path.is_file() {
            return Err(InvalidToolchain::Missing);
        }

        let info: ToolchainInfo = plist::from_file(&info_path)?;
        if info.identifier.is_empty() {
            return Err(InvalidToolchain::EmptyIdentifier);
        }

        Ok(Self::new(info.identifier, location))
    }

    /// Identifier from the toolchain metadata, e.g. `6.0.1-RELEASE`.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Filesystem path of the toolchain directory.
    #[must_use]
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Directory holding the toolchain's executables.
    #[must_use]
    pub fn bindir(&self) -> PathBuf {
        self.location.join("usr").join("bin")
    }

    /// Locate `tool` in [`Self::bindir`].
    ///
    /// See [`find_executable`] for how `extensions` is applied.
    #[must_use]
    pub fn find(&self, tool: &str, extensions: &[String]) -> Option<PathBuf> {
        find_executable(tool, &self.bindir(), extensions)
    }
}
