//! Read-only configuration store holding installation records.
//!
//! The store is modelled on a system registry: two hives, each a tree of
//! keys, where every key has named string values and named subkeys. Key and
//! value names compare case-insensitively. Discovery only ever needs two
//! operations, so backends implement just [`ConfigStore::child_keys`] and
//! [`ConfigStore::string_value`]:
//!
//! - [`MemoryStore`] - an in-memory tree, built programmatically
//! - [`FileStore`] - one TOML document per hive, loaded at open time

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::Result;
use std::collections::BTreeMap;
use std::fmt;

/// Uninstall records written by machine-wide installers.
pub const MACHINE_UNINSTALL_ROOT: &str = r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall";
/// Uninstall records written by per-user installers.
pub const USER_UNINSTALL_ROOT: &str = r"Software\Microsoft\Windows\CurrentVersion\Uninstall";

/// Top-level tree of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hive {
    /// Machine-wide records.
    LocalMachine,
    /// Records belonging to the current user.
    CurrentUser,
}

impl Hive {
    /// Hives in the order they are scanned.
    pub const ALL: [Self; 2] = [Self::LocalMachine, Self::CurrentUser];

    /// Conventional name of the hive.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LocalMachine => "HKEY_LOCAL_MACHINE",
            Self::CurrentUser => "HKEY_CURRENT_USER",
        }
    }

    /// Whether records in this hive describe machine-wide installations.
    #[must_use]
    pub const fn is_system(self) -> bool {
        matches!(self, Self::LocalMachine)
    }

    /// Path of the uninstall-records key within this hive.
    #[must_use]
    pub const fn uninstall_root(self) -> &'static str {
        match self {
            Self::LocalMachine => MACHINE_UNINSTALL_ROOT,
            Self::CurrentUser => USER_UNINSTALL_ROOT,
        }
    }
}

impl fmt::Display for Hive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Location of a key: a hive plus `\`-separated segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    hive: Hive,
    segments: Vec<String>,
}

impl KeyPath {
    /// Parse `path` (e.g. `SOFTWARE\Microsoft`) relative to `hive`.
    #[must_use]
    pub fn new(hive: Hive, path: &str) -> Self {
        Self {
            hive,
            segments: split_path(path),
        }
    }

    /// The uninstall-records key of `hive`.
    #[must_use]
    pub fn uninstall_root(hive: Hive) -> Self {
        Self::new(hive, hive.uninstall_root())
    }

    /// Path of the subkey `name` below this key.
    #[must_use]
    pub fn join(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(split_path(name));
        Self {
            hive: self.hive,
            segments,
        }
    }

    /// The hive this path lives in.
    #[must_use]
    pub const fn hive(&self) -> Hive {
        self.hive
    }

    /// Key names from the hive root down.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Name of the last key on the path.
    #[must_use]
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hive.name())?;
        for segment in &self.segments {
            write!(f, "\\{segment}")?;
        }
        Ok(())
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('\\')
        .filter(|segment| !segment.is_empty())
        .map(String::from)
        .collect()
}

/// Read access to a registry-like tree.
pub trait ConfigStore {
    /// Names of the direct subkeys of `path`; empty when `path` does not exist.
    fn child_keys(&self, path: &KeyPath) -> Result<Vec<String>>;

    /// String value `name` of the key at `path`, if both exist.
    fn string_value(&self, path: &KeyPath, name: &str) -> Result<Option<String>>;
}

/// One key of an in-memory tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyNode {
    values: BTreeMap<String, String>,
    children: BTreeMap<String, KeyNode>,
}

impl KeyNode {
    /// Create an empty key.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct subkey `name`, created if missing.
    pub fn subkey(&mut self, name: &str) -> &mut Self {
        let key = self
            .children
            .keys()
            .find(|existing| existing.eq_ignore_ascii_case(name))
            .cloned()
            .unwrap_or_else(|| name.to_string());
        self.children.entry(key).or_default()
    }

    /// Nested subkey at a `\`-separated `path`, creating every missing key.
    pub fn subkey_path(&mut self, path: &str) -> &mut Self {
        split_path(path)
            .iter()
            .fold(self, |node, segment| node.subkey(segment))
    }

    /// Set string value `name`, replacing any value of the same name.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        let key = self
            .values
            .keys()
            .find(|existing| existing.eq_ignore_ascii_case(name))
            .cloned()
            .unwrap_or_else(|| name.to_string());
        self.values.insert(key, value.into());
        self
    }

    /// Direct subkey `name`, if present.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, node)| node)
    }

    /// String value `name`, if present.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Names of the direct subkeys.
    pub fn subkey_names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Key reached by following `segments` from this key.
    #[must_use]
    pub fn lookup(&self, segments: &[String]) -> Option<&Self> {
        segments
            .iter()
            .try_fold(self, |node, segment| node.child(segment))
    }
}
