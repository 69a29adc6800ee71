//! Installations discovered from the configuration store.
//!
//! Each toolkit installer leaves a record under the uninstall root of one of
//! the two hives. A record is accepted when its `DisplayName` starts with
//! [`PRODUCT_PREFIX`] and it carries `DisplayVersion`, `Publisher` and
//! `Variables\InstallRoot`. Everything else under the uninstall root belongs
//! to other products and is silently passed over.

use crate::enumerate::{
    PlatformEnumerator, Platforms, ToolchainEnumerator, Toolchains, serialize_entries, try_find,
};
use crate::memoized::Memoized;
use crate::platform::Platform;
use crate::sdk::Sdk;
use crate::selectors::Selectors;
use crate::store::{ConfigStore, Hive, KeyPath};
use crate::toolchain::Toolchain;
use crate::version::Version;
use crate::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, trace};

/// `DisplayName` prefix identifying records of the toolkit.
pub const PRODUCT_PREFIX: &str = "Swift Developer Toolkit";

/// One installed copy of the toolkit.
///
/// Toolchains live under `<install-root>/Toolchains` and platforms under
/// `<install-root>/Platforms/<version>`; both are scanned lazily and at most
/// once per `Installation`.
#[derive(Debug, Clone, Serialize)]
pub struct Installation {
    system: bool,
    vendor: String,
    version: Version,
    install_root: PathBuf,
    #[serde(serialize_with = "serialize_entries")]
    toolchains: Toolchains,
    #[serde(serialize_with = "serialize_entries")]
    platforms: Platforms,
}

impl Installation {
    /// Describe the installation rooted at `install_root`.
    #[must_use]
    pub fn new(
        system: bool,
        vendor: impl Into<String>,
        version: Version,
        install_root: impl Into<PathBuf>,
    ) -> Self {
        let install_root = install_root.into();
        let toolchains = Memoized::new(ToolchainEnumerator::new(install_root.join("Toolchains")));
        let platforms = Memoized::new(PlatformEnumerator::new(
            install_root.join("Platforms").join(version.to_string()),
        ));
        Self {
            system,
            vendor: vendor.into(),
            version,
            install_root,
            toolchains,
            platforms,
        }
    }

    /// Build an installation from the record at `key`.
    ///
    /// Returns `Ok(None)` for records of other products or records missing a
    /// required value. A toolkit record whose `DisplayVersion` does not parse
    /// is an [`Error::MalformedRecord`].
    #[instrument(level = "trace", skip(store, key), fields(key = %key))]
    pub fn from_record(
        store: &dyn ConfigStore,
        key: &KeyPath,
        system: bool,
    ) -> Result<Option<Self>> {
        let Some(display_name) = store.string_value(key, "DisplayName")? else {
            trace!("No DisplayName");
            return Ok(None);
        };
        if !display_name.starts_with(PRODUCT_PREFIX) {
            trace!(%display_name, "Not a toolkit record");
            return Ok(None);
        }

        let (Some(display_version), Some(publisher)) = (
            store.string_value(key, "DisplayVersion")?,
            store.string_value(key, "Publisher")?,
        ) else {
            debug!(%display_name, "Toolkit record without DisplayVersion or Publisher");
            return Ok(None);
        };

        let Some(version) = Version::parse(&display_version) else {
            return Err(Error::malformed_record(
                key.leaf().unwrap_or_default(),
                display_version,
            ));
        };

        let Some(install_root) = store.string_value(&key.join("Variables"), "InstallRoot")? else {
            debug!(%display_name, %version, "Toolkit record without InstallRoot");
            return Ok(None);
        };

        debug!(%version, vendor = %publisher, %install_root, system, "Found installation");
        Ok(Some(Self::new(system, publisher, version, install_root)))
    }

    /// Whether the record came from the machine-wide hive.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.system
    }

    /// Publisher of the toolkit.
    #[must_use]
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// Installed toolkit version.
    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Root directory of the installation.
    #[must_use]
    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    /// `<install-root>/Platforms/<version>`
    #[must_use]
    pub fn platforms_root(&self) -> PathBuf {
        self.install_root
            .join("Platforms")
            .join(self.version.to_string())
    }

    /// `<install-root>/Toolchains`
    #[must_use]
    pub fn toolchains_root(&self) -> PathBuf {
        self.install_root.join("Toolchains")
    }

    /// The installation's toolchains.
    #[must_use]
    pub fn toolchains(&self) -> &Toolchains {
        &self.toolchains
    }

    /// The installation's platforms.
    #[must_use]
    pub fn platforms(&self) -> &Platforms {
        &self.platforms
    }

    /// Whether a toolchain identified `identifier` is installed.
    pub fn has_toolchain(&self, identifier: &str) -> Result<bool> {
        Ok(self.toolchain(Some(identifier))?.is_some())
    }

    /// The toolchain identified `identifier`, or the first one when `None`.
    pub fn toolchain(&self, identifier: Option<&str>) -> Result<Option<Toolchain>> {
        try_find(self.toolchains.iter(), |toolchain| {
            identifier.is_none_or(|id| toolchain.identifier() == id)
        })
    }

    /// Whether any platform owns an SDK named `sdk`.
    pub fn has_sdk(&self, sdk: &str) -> Result<bool> {
        Ok(self.platform_containing(sdk)?.is_some())
    }

    /// The first platform owning an SDK named `sdk`, with that SDK.
    pub fn platform_containing(&self, sdk: &str) -> Result<Option<(Platform, Sdk)>> {
        for platform in &self.platforms {
            let platform = platform?;
            if let Some(found) = platform.sdk(sdk)? {
                return Ok(Some((platform, found)));
            }
        }
        Ok(None)
    }

    /// Whether the installation satisfies every selector that is set.
    pub fn matches(&self, selectors: &Selectors) -> Result<bool> {
        if let Some(toolchain) = &selectors.toolchain
            && !self.has_toolchain(toolchain)?
        {
            return Ok(false);
        }
        if let Some(sdk) = &selectors.sdk
            && !self.has_sdk(sdk)?
        {
            return Ok(false);
        }
        Ok(true)
    }
}

/// Every discovered installation, newest first.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct InstallationSet {
    installations: Vec<Installation>,
}

impl InstallationSet {
    /// Scan the uninstall roots of both hives, machine-wide first.
    ///
    /// Fails on the first malformed toolkit record or store error.
    #[instrument(level = "debug", skip(store))]
    pub fn enumerate(store: &dyn ConfigStore) -> Result<Self> {
        let mut installations = Vec::new();
        for hive in Hive::ALL {
            let root = KeyPath::uninstall_root(hive);
            for name in store.child_keys(&root)? {
                if let Some(installation) =
                    Installation::from_record(store, &root.join(&name), hive.is_system())?
                {
                    installations.push(installation);
                }
            }
        }
        debug!(count = installations.len(), "Enumerated installations");
        Ok(Self::from_installations(installations))
    }

    /// Order `installations` by descending version; ties keep their order.
    #[must_use]
    pub fn from_installations(mut installations: Vec<Installation>) -> Self {
        installations.sort_by(|a, b| b.version.cmp(&a.version));
        Self { installations }
    }

    /// Installations, newest first.
    pub fn iter(&self) -> std::slice::Iter<'_, Installation> {
        self.installations.iter()
    }

    /// Number of installations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.installations.len()
    }

    /// Whether nothing is installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.installations.is_empty()
    }

    /// The newest installation.
    #[must_use]
    pub fn first(&self) -> Option<&Installation> {
        self.installations.first()
    }

    /// The newest installation satisfying every set selector.
    pub fn select(&self, selectors: &Selectors) -> Result<Option<&Installation>> {
        for installation in &self.installations {
            if installation.matches(selectors)? {
                return Ok(Some(installation));
            }
        }
        Ok(None)
    }
}

impl<'a> IntoIterator for &'a InstallationSet {
    type Item = &'a Installation;
    type IntoIter = std::slice::Iter<'a, Installation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_utils::{register, write_sdk, write_toolchain};
    use tempfile::TempDir;

    fn versions(set: &InstallationSet) -> Vec<String> {
        set.iter().map(|i| i.version().to_string()).collect()
    }

    #[test]
    fn test_enumerate_sorts_by_descending_version() {
        let temp = TempDir::new().unwrap();
        let mut store = MemoryStore::new();
        for (key, version) in [("a", "5.9.0"), ("b", "6.0.1"), ("c", "6.0.0")] {
            register(
                &mut store,
                Hive::LocalMachine,
                key,
                "Swift Developer Toolkit",
                version,
                &temp.path().join(key),
            );
        }

        let set = InstallationSet::enumerate(&store).unwrap();
        assert_eq!(versions(&set), ["6.0.1", "6.0.0", "5.9.0"]);
    }

    #[test]
    fn test_ties_keep_machine_records_first() {
        let temp = TempDir::new().unwrap();
        let mut store = MemoryStore::new();
        register(
            &mut store,
            Hive::CurrentUser,
            "user",
            "Swift Developer Toolkit",
            "6.0.0",
            &temp.path().join("user"),
        );
        register(
            &mut store,
            Hive::LocalMachine,
            "machine",
            "Swift Developer Toolkit (x64)",
            "6.0.0-rc1",
            &temp.path().join("machine"),
        );

        let set = InstallationSet::enumerate(&store).unwrap();
        let scopes: Vec<bool> = set.iter().map(Installation::is_system).collect();
        assert_eq!(scopes, [true, false]);
        assert_eq!(set.iter().nth(1).unwrap().install_root(), temp.path().join("user"));
    }

    #[test]
    fn test_other_products_are_excluded() {
        let temp = TempDir::new().unwrap();
        let mut store = MemoryStore::new();
        register(
            &mut store,
            Hive::LocalMachine,
            "other",
            "Other Product",
            "not a version",
            temp.path(),
        );
        store
            .uninstall_root_mut(Hive::LocalMachine)
            .subkey("nameless")
            .set_value("DisplayVersion", "1.0.0");

        let set = InstallationSet::enumerate(&store).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_incomplete_records_are_excluded() {
        let temp = TempDir::new().unwrap();
        let mut store = MemoryStore::new();
        store
            .uninstall_root_mut(Hive::LocalMachine)
            .subkey("no-publisher")
            .set_value("DisplayName", "Swift Developer Toolkit")
            .set_value("DisplayVersion", "6.0.1");
        store
            .uninstall_root_mut(Hive::LocalMachine)
            .subkey("no-root")
            .set_value("DisplayName", "Swift Developer Toolkit")
            .set_value("DisplayVersion", "6.0.1")
            .set_value("Publisher", "swift.org");
        register(
            &mut store,
            Hive::CurrentUser,
            "complete",
            "Swift Developer Toolkit",
            "6.0.1",
            temp.path(),
        );

        let set = InstallationSet::enumerate(&store).unwrap();
        assert_eq!(set.len(), 1);
        let installation = set.first().unwrap();
        assert!(!installation.is_system());
        assert_eq!(installation.vendor(), "swift.org");
    }

    #[test]
    fn test_unparsable_version_fails_enumeration() {
        let temp = TempDir::new().unwrap();
        let mut store = MemoryStore::new();
        register(
            &mut store,
            Hive::LocalMachine,
            "good",
            "Swift Developer Toolkit",
            "6.0.1",
            temp.path(),
        );
        register(
            &mut store,
            Hive::CurrentUser,
            "{BAD}",
            "Swift Developer Toolkit",
            "6.0",
            temp.path(),
        );

        let err = InstallationSet::enumerate(&store).unwrap_err();
        match err {
            Error::MalformedRecord { key, version } => {
                assert_eq!(key, "{BAD}");
                assert_eq!(version, "6.0");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_roots_follow_version() {
        let installation = Installation::new(true, "swift.org", Version::new(6, 0, 1), "/swift");
        assert_eq!(
            installation.platforms_root(),
            Path::new("/swift").join("Platforms").join("6.0.1")
        );
        assert_eq!(
            installation.toolchains_root(),
            Path::new("/swift").join("Toolchains")
        );
    }

    #[test]
    fn test_toolchain_selection() {
        let temp = TempDir::new().unwrap();
        let toolchains = temp.path().join("Toolchains");
        write_toolchain(&toolchains, "only", "org.swift.601");
        let installation = Installation::new(false, "swift.org", Version::new(6, 0, 1), temp.path());

        assert!(installation.has_toolchain("org.swift.601").unwrap());
        assert!(!installation.has_toolchain("org.swift.600").unwrap());
        assert_eq!(
            installation.toolchain(None).unwrap().unwrap().identifier(),
            "org.swift.601"
        );
        assert!(installation.toolchain(Some("missing")).unwrap().is_none());
    }

    #[test]
    fn test_platform_containing_sdk() {
        let temp = TempDir::new().unwrap();
        let sdk = write_sdk(temp.path(), "6.0.1", "Windows.platform", "Windows.sdk");
        write_sdk(temp.path(), "6.0.0", "Android.platform", "Android.sdk");
        let installation = Installation::new(true, "swift.org", Version::new(6, 0, 1), temp.path());

        let (platform, found) = installation
            .platform_containing("Windows.sdk")
            .unwrap()
            .unwrap();
        assert_eq!(platform.identifier(), "Windows.platform");
        assert_eq!(found.location(), sdk);
        assert!(!installation.has_sdk("Android.sdk").unwrap());
    }

    fn installation_with(
        root: &Path,
        version: &str,
        toolchain: Option<&str>,
        sdk: Option<&str>,
    ) -> Installation {
        if let Some(identifier) = toolchain {
            write_toolchain(&root.join("Toolchains"), identifier, identifier);
        }
        if let Some(sdk) = sdk {
            write_sdk(root, version, "Windows.platform", sdk);
        }
        Installation::new(true, "swift.org", Version::parse(version).unwrap(), root)
    }

    #[test]
    fn test_select_requires_every_selector() {
        let temp = TempDir::new().unwrap();
        let set = InstallationSet::from_installations(vec![
            installation_with(&temp.path().join("a"), "6.0.1", Some("X"), None),
            installation_with(&temp.path().join("b"), "6.0.0", None, Some("Y.sdk")),
            installation_with(&temp.path().join("c"), "5.9.0", Some("X"), Some("Y.sdk")),
        ]);

        let both = Selectors::new(Some("X".to_string()), Some("Y.sdk".to_string()));
        let selected = set.select(&both).unwrap().unwrap();
        assert_eq!(selected.version(), Version::new(5, 9, 0));

        let toolchain_only = Selectors::new(Some("X".to_string()), None);
        let selected = set.select(&toolchain_only).unwrap().unwrap();
        assert_eq!(selected.version(), Version::new(6, 0, 1));

        let sdk_only = Selectors::new(None, Some("Y.sdk".to_string()));
        let selected = set.select(&sdk_only).unwrap().unwrap();
        assert_eq!(selected.version(), Version::new(6, 0, 0));

        let unmatched = Selectors::new(Some("Z".to_string()), Some("Y.sdk".to_string()));
        assert!(set.select(&unmatched).unwrap().is_none());
    }

    #[test]
    fn test_select_without_selectors_picks_newest() {
        let temp = TempDir::new().unwrap();
        let set = InstallationSet::from_installations(vec![
            installation_with(&temp.path().join("old"), "5.10.1", None, None),
            installation_with(&temp.path().join("new"), "6.0.0", None, None),
        ]);

        let selected = set.select(&Selectors::default()).unwrap().unwrap();
        assert_eq!(selected.version(), Version::new(6, 0, 0));
        assert_eq!(set.first().unwrap().version(), Version::new(6, 0, 0));
    }

    #[test]
    fn test_serializes_lazy_sequences() {
        let temp = TempDir::new().unwrap();
        let installation = installation_with(temp.path(), "6.0.1", Some("org.swift.601"), Some("Windows.sdk"));
        let set = InstallationSet::from_installations(vec![installation]);

        let json = serde_json::to_value(&set).unwrap();
        let first = &json[0];
        assert_eq!(first["version"], "6.0.1");
        assert_eq!(first["system"], true);
        assert_eq!(first["toolchains"][0]["identifier"], "org.swift.601");
        assert_eq!(first["platforms"][0]["identifier"], "Windows.platform");
        assert_eq!(first["platforms"][0]["sdks"][0]["identifier"], "Windows.sdk");
    }
}
