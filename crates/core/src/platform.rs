//! Platforms and the SDKs they own.

use crate::Result;
use crate::enumerate::{Sdks, SdkEnumerator, last_component, serialize_entries, try_find};
use crate::memoized::Memoized;
use crate::sdk::Sdk;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A `*.platform` directory, grouping the SDKs for one target family.
///
/// SDKs live under `<location>/Developer/SDKs` and are scanned lazily, once,
/// the first time they are asked for.
#[derive(Debug, Clone, Serialize)]
pub struct Platform {
    identifier: String,
    location: PathBuf,
    #[serde(rename = "sdks", serialize_with = "serialize_entries")]
    sdks: Sdks,
}

impl Platform {
    /// Describe the platform rooted at `location`.
    #[must_use]
    pub fn new(location: impl Into<PathBuf>) -> Self {
        let location = location.into();
        let sdks = Memoized::new(SdkEnumerator::new(Self::sdks_root(&location)));
        Self {
            identifier: last_component(&location),
            location,
            sdks,
        }
    }

    fn sdks_root(location: &Path) -> PathBuf {
        location.join("Developer").join("SDKs")
    }

    /// Directory name of the platform, e.g. `Windows.platform`.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Filesystem path of the platform directory.
    #[must_use]
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// The platform's SDKs.
    #[must_use]
    pub fn sdks(&self) -> &Sdks {
        &self.sdks
    }

    /// First SDK named `name`.
    pub fn sdk(&self, name: &str) -> Result<Option<Sdk>> {
        try_find(self.sdks.iter(), |sdk| sdk.identifier() == name)
    }

    /// Whether the platform owns an SDK named `name`.
    pub fn contains_sdk(&self, name: &str) -> Result<bool> {
        Ok(self.sdk(name)?.is_some())
    }
}
