//! Lazy, non-recursive directory enumerators.
//!
//! Each enumerator scans the immediate children of one root and yields the
//! entries accepted by its filter. The directory is opened on the first call
//! to `next`, never at construction, and a root that does not exist yields an
//! empty sequence. No ordering is imposed beyond what the directory listing
//! returns.
//!
//! | Enumerator | Root | Accepts |
//! |------------|------|---------|
//! | [`SdkEnumerator`] | `<platform>/Developer/SDKs` | names ending in `.sdk` |
//! | [`PlatformEnumerator`] | `<install-root>/Platforms/<version>` | names ending in `.platform` |
//! | [`ToolchainEnumerator`] | `<install-root>/Toolchains` | entries with a valid `ToolchainInfo.plist` |

use crate::memoized::Memoized;
use crate::platform::Platform;
use crate::sdk::Sdk;
use crate::toolchain::Toolchain;
use crate::{Error, Result};
use serde::ser::{Error as _, SerializeSeq};
use serde::{Serialize, Serializer};
use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Restartable SDK sequence owned by a [`Platform`].
pub type Sdks = Memoized<SdkEnumerator>;
/// Restartable platform sequence owned by an installation.
pub type Platforms = Memoized<PlatformEnumerator>;
/// Restartable toolchain sequence owned by an installation.
pub type Toolchains = Memoized<ToolchainEnumerator>;

enum ScanState {
    Pending,
    Reading(fs::ReadDir),
    Done,
}

/// Immediate children of a directory, read on demand.
struct DirectoryScan {
    root: PathBuf,
    state: ScanState,
}

impl DirectoryScan {
    fn new(root: PathBuf) -> Self {
        Self {
            root,
            state: ScanState::Pending,
        }
    }
}

impl Iterator for DirectoryScan {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match &mut self.state {
                ScanState::Pending => match fs::read_dir(&self.root) {
                    Ok(entries) => {
                        trace!(root = %self.root.display(), "Scanning directory");
                        self.state = ScanState::Reading(entries);
                    }
                    Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                        debug!(root = %self.root.display(), "Directory absent, nothing to enumerate");
                        self.state = ScanState::Done;
                        return None;
                    }
                    Err(e) => {
                        self.state = ScanState::Done;
                        return Some(Err(Error::io(
                            e,
                            Some(self.root.clone()),
                            "read directory",
                        )));
                    }
                },
                ScanState::Reading(entries) => {
                    return match entries.next() {
                        Some(Ok(entry)) => Some(Ok(entry.path())),
                        Some(Err(e)) => Some(Err(Error::io(
                            e,
                            Some(self.root.clone()),
                            "read directory entry",
                        ))),
                        None => {
                            self.state = ScanState::Done;
                            None
                        }
                    };
                }
                ScanState::Done => return None,
            }
        }
    }
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(OsStr::to_str)
        .is_some_and(|name| name.ends_with(suffix))
}

/// Final path segment, used as the identifier of SDKs and platforms.
pub(crate) fn last_component(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// SDK directories (`*.sdk`) under a platform's `Developer/SDKs`.
pub struct SdkEnumerator {
    scan: DirectoryScan,
}

impl SdkEnumerator {
    /// Enumerate SDKs directly under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            scan: DirectoryScan::new(root.into()),
        }
    }
}

impl Iterator for SdkEnumerator {
    type Item = Result<Sdk>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let path = match self.scan.next()? {
                Ok(path) => path,
                Err(e) => return Some(Err(e)),
            };
            if has_suffix(&path, ".sdk") {
                debug!(sdk = %path.display(), "Found SDK");
                return Some(Ok(Sdk::new(path)));
            }
        }
    }
}

/// Platform directories (`*.platform`) under a versioned platforms root.
pub struct PlatformEnumerator {
    scan: DirectoryScan,
}

impl PlatformEnumerator {
    /// Enumerate platforms directly under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            scan: DirectoryScan::new(root.into()),
        }
    }
}

impl Iterator for PlatformEnumerator {
    type Item = Result<Platform>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let path = match self.scan.next()? {
                Ok(path) => path,
                Err(e) => return Some(Err(e)),
            };
            if has_suffix(&path, ".platform") {
                debug!(platform = %path.display(), "Found platform");
                return Some(Ok(Platform::new(path)));
            }
        }
    }
}

/// Toolchain directories under an installation's `Toolchains` root.
///
/// An entry whose `ToolchainInfo.plist` is missing, unreadable or lacks an
/// identifier is skipped with a warning; its siblings are still enumerated.
pub struct ToolchainEnumerator {
    scan: DirectoryScan,
}

impl ToolchainEnumerator {
    /// Enumerate toolchains directly under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            scan: DirectoryScan::new(root.into()),
        }
    }
}

impl Iterator for ToolchainEnumerator {
    type Item = Result<Toolchain>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let path = match self.scan.next()? {
                Ok(path) => path,
                Err(e) => return Some(Err(e)),
            };
            match Toolchain::load(&path) {
                Ok(toolchain) => {
                    debug!(
                        toolchain = %toolchain.identifier(),
                        location = %path.display(),
                        "Found toolchain"
                    );
                    return Some(Ok(toolchain));
                }
                Err(reason) => {
                    warn!(location = %path.display(), %reason, "Skipping invalid toolchain");
                }
            }
        }
    }
}

/// First element satisfying `predicate`, propagating the first error met.
pub(crate) fn try_find<T>(
    items: impl Iterator<Item = Result<T>>,
    mut predicate: impl FnMut(&T) -> bool,
) -> Result<Option<T>> {
    for item in items {
        let item = item?;
        if predicate(&item) {
            return Ok(Some(item));
        }
    }
    Ok(None)
}

/// Serialize a memoized sequence as a list, failing on the first scan error.
pub(crate) fn serialize_entries<I, T, S>(
    entries: &Memoized<I>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    I: Iterator<Item = Result<T>>,
    T: Serialize + Clone,
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(None)?;
    for entry in entries {
        let entry = entry.map_err(S::Error::custom)?;
        seq.serialize_element(&entry)?;
    }
    seq.end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{write_invalid_toolchain, write_toolchain};
    use tempfile::TempDir;

    fn names<T>(items: impl Iterator<Item = Result<T>>, name: impl Fn(&T) -> String) -> Vec<String> {
        let mut names: Vec<_> = items.map(|item| name(&item.unwrap())).collect();
        names.sort();
        names
    }

    #[test]
    fn test_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("does-not-exist");

        assert_eq!(SdkEnumerator::new(&missing).count(), 0);
        assert_eq!(PlatformEnumerator::new(&missing).count(), 0);
        assert_eq!(ToolchainEnumerator::new(&missing).count(), 0);
    }

    #[test]
    fn test_root_that_is_a_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("Toolchains");
        fs::write(&file, "not a directory").unwrap();

        assert_eq!(ToolchainEnumerator::new(&file).count(), 0);
    }

    #[test]
    fn test_construction_does_not_read() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("SDKs");
        let mut sdks = SdkEnumerator::new(&root);

        // Created after construction, still observed by the first pull
        fs::create_dir_all(root.join("Windows.sdk")).unwrap();
        let sdk = sdks.next().unwrap().unwrap();
        assert_eq!(sdk.identifier(), "Windows.sdk");
    }

    #[test]
    fn test_sdk_suffix_filter() {
        let temp = TempDir::new().unwrap();
        for name in ["Windows.sdk", "Android.sdk", "README.md", "sdk", "Windows.sdk.bak"] {
            fs::create_dir_all(temp.path().join(name)).unwrap();
        }

        let found = names(SdkEnumerator::new(temp.path()), |s: &Sdk| {
            s.identifier().to_string()
        });
        assert_eq!(found, vec!["Android.sdk", "Windows.sdk"]);
    }

    #[test]
    fn test_platform_suffix_filter_and_sdk_root() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("Windows.platform/Developer/SDKs/Windows.sdk"))
            .unwrap();
        fs::create_dir_all(temp.path().join("Shared")).unwrap();

        let platforms: Vec<_> = PlatformEnumerator::new(temp.path())
            .map(Result::unwrap)
            .collect();
        assert_eq!(platforms.len(), 1);
        assert_eq!(platforms[0].identifier(), "Windows.platform");
        assert!(platforms[0].contains_sdk("Windows.sdk").unwrap());
    }

    #[test]
    fn test_invalid_toolchain_is_skipped() {
        let temp = TempDir::new().unwrap();
        write_toolchain(temp.path(), "swift-6.0.1", "6.0.1-RELEASE");
        write_invalid_toolchain(temp.path(), "broken");
        fs::create_dir_all(temp.path().join("no-metadata")).unwrap();
        write_toolchain(temp.path(), "swift-main", "main-SNAPSHOT");

        let found = names(ToolchainEnumerator::new(temp.path()), |t: &Toolchain| {
            t.identifier().to_string()
        });
        assert_eq!(found, vec!["6.0.1-RELEASE", "main-SNAPSHOT"]);
    }

    #[test]
    fn test_memoized_scan_is_stable_after_directory_changes() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("A.sdk")).unwrap();
        fs::create_dir_all(temp.path().join("B.sdk")).unwrap();

        let sdks: Sdks = Memoized::new(SdkEnumerator::new(temp.path()));
        let first: Vec<_> = sdks.iter().map(Result::unwrap).collect();

        fs::remove_dir(temp.path().join("A.sdk")).unwrap();
        fs::create_dir_all(temp.path().join("C.sdk")).unwrap();

        let second: Vec<_> = sdks.iter().map(Result::unwrap).collect();
        assert_eq!(first, second);
        assert_eq!(second.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_root_is_an_error() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let root = temp.path().join("locked");
        fs::create_dir_all(&root).unwrap();
        fs::set_permissions(&root, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can read the directory regardless of its mode
        if fs::read_dir(&root).is_ok() {
            fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let mut sdks = SdkEnumerator::new(&root);
        assert!(matches!(sdks.next(), Some(Err(Error::Io { .. }))));
        assert!(sdks.next().is_none());

        fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_try_find_propagates_errors() {
        let items = vec![Ok(1), Err(Error::store("boom")), Ok(3)];
        assert!(try_find(items.into_iter(), |x| *x == 3).is_err());

        let items: Vec<Result<i32>> = vec![Ok(1), Ok(2)];
        assert_eq!(try_find(items.into_iter(), |x| *x == 2).unwrap(), Some(2));
    }
}
