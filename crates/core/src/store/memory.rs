use super::{ConfigStore, Hive, KeyNode, KeyPath};
use crate::Result;

/// Configuration store held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    machine: KeyNode,
    user: KeyNode,
}

impl MemoryStore {
    /// Create a store with two empty hives.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from pre-populated hive roots.
    #[must_use]
    pub fn from_hives(machine: KeyNode, user: KeyNode) -> Self {
        Self { machine, user }
    }

    /// Root key of `hive`.
    #[must_use]
    pub fn hive(&self, hive: Hive) -> &KeyNode {
        match hive {
            Hive::LocalMachine => &self.machine,
            Hive::CurrentUser => &self.user,
        }
    }

    /// Mutable root key of `hive`.
    pub fn hive_mut(&mut self, hive: Hive) -> &mut KeyNode {
        match hive {
            Hive::LocalMachine => &mut self.machine,
            Hive::CurrentUser => &mut self.user,
        }
    }

    /// Uninstall-records key of `hive`, created if missing.
    pub fn uninstall_root_mut(&mut self, hive: Hive) -> &mut KeyNode {
        self.hive_mut(hive).subkey_path(hive.uninstall_root())
    }

    fn node(&self, path: &KeyPath) -> Option<&KeyNode> {
        self.hive(path.hive()).lookup(path.segments())
    }
}

impl ConfigStore for MemoryStore {
    fn child_keys(&self, path: &KeyPath) -> Result<Vec<String>> {
        Ok(self
            .node(path)
            .map(|node| node.subkey_names().map(String::from).collect())
            .unwrap_or_default())
    }

    fn string_value(&self, path: &KeyPath, name: &str) -> Result<Option<String>> {
        Ok(self
            .node(path)
            .and_then(|node| node.value(name))
            .map(String::from))
    }
}
