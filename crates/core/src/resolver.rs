//! Picks the installation, platform, SDK and toolchain for a request.

use crate::installation::{Installation, InstallationSet};
use crate::platform::Platform;
use crate::sdk::Sdk;
use crate::selectors::Selectors;
use crate::toolchain::Toolchain;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Outcome of [`resolve`].
#[derive(Debug, Clone)]
pub struct Resolution {
    installation: Installation,
    platform: Option<Platform>,
    sdk: Option<Sdk>,
    toolchain: Option<Toolchain>,
}

impl Resolution {
    /// The selected installation.
    #[must_use]
    pub fn installation(&self) -> &Installation {
        &self.installation
    }

    /// Platform owning the selected SDK; `None` when no SDK was requested.
    #[must_use]
    pub fn platform(&self) -> Option<&Platform> {
        self.platform.as_ref()
    }

    /// The selected SDK; `None` when no SDK was requested.
    #[must_use]
    pub fn sdk(&self) -> Option<&Sdk> {
        self.sdk.as_ref()
    }

    /// The selected toolchain; `None` when the installation has none usable.
    #[must_use]
    pub fn toolchain(&self) -> Option<&Toolchain> {
        self.toolchain.as_ref()
    }

    /// Filesystem path of the selected SDK.
    #[must_use]
    pub fn sdk_path(&self) -> Option<&Path> {
        self.sdk.as_ref().map(Sdk::location)
    }

    /// `<install-root>/Platforms/<version>/<platform>` for the selected platform.
    #[must_use]
    pub fn platform_path(&self) -> Option<PathBuf> {
        self.platform
            .as_ref()
            .map(|platform| self.installation.platforms_root().join(platform.identifier()))
    }

    /// Locate `tool` in the selected toolchain's binary directory.
    #[must_use]
    pub fn find_tool(&self, tool: &str, extensions: &[String]) -> Option<PathBuf> {
        let toolchain = self.toolchain.as_ref()?;
        let found = toolchain.find(tool, extensions);
        debug!(
            tool,
            bindir = %toolchain.bindir().display(),
            found = ?found,
            "Tool lookup"
        );
        found
    }
}

/// Resolve `selectors` against `installations`.
///
/// The installation is the newest one satisfying every set selector. Within
/// it, the platform is the first owning the requested SDK and the toolchain
/// is the one requested, or the first one when none is. `Ok(None)` means no
/// installation matched.
#[instrument(level = "debug", skip(installations))]
pub fn resolve(installations: &InstallationSet, selectors: &Selectors) -> Result<Option<Resolution>> {
    let Some(installation) = installations.select(selectors)? else {
        debug!("No installation satisfies the selectors");
        return Ok(None);
    };

    let (platform, sdk) = match &selectors.sdk {
        Some(name) => match installation.platform_containing(name)? {
            Some((platform, sdk)) => (Some(platform), Some(sdk)),
            None => return Ok(None),
        },
        None => (None, None),
    };

    let toolchain = installation.toolchain(selectors.toolchain.as_deref())?;

    info!(
        version = %installation.version(),
        platform = platform.as_ref().map(Platform::identifier),
        sdk = sdk.as_ref().map(|sdk| sdk.location().display().to_string()),
        toolchain = toolchain.as_ref().map(Toolchain::identifier),
        "Resolved"
    );

    Ok(Some(Resolution {
        installation: installation.clone(),
        platform,
        sdk,
        toolchain,
    }))
}
