//! SDK bundles.

use crate::enumerate::last_component;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A `*.sdk` directory inside a platform.
///
/// The identifier is the directory name itself, e.g. `Windows.sdk`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sdk {
    identifier: String,
    location: PathBuf,
}

impl Sdk {
    /// Describe the SDK rooted at `location`.
    #[must_use]
    pub fn new(location: impl Into<PathBuf>) -> Self {
        let location = location.into();
        Self {
            identifier: last_component(&location),
            location,
        }
    }

    /// Directory name of the SDK.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Filesystem path of the SDK, exported to tools as `SDKROOT`.
    #[must_use]
    pub fn location(&self) -> &Path {
        &self.location
    }
}
