use super::{ConfigStore, Hive, KeyNode, KeyPath, MemoryStore};
use crate::paths::StoreLocations;
use crate::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Configuration store loaded from one TOML document per hive.
///
/// Tables are keys and string entries are values:
///
/// ```toml
/// [SOFTWARE.Microsoft.Windows.CurrentVersion.Uninstall."{6F2C}"]
/// DisplayName = "Swift Developer Toolkit"
/// DisplayVersion = "6.0.1"
/// Publisher = "swift.org"
///
/// [SOFTWARE.Microsoft.Windows.CurrentVersion.Uninstall."{6F2C}".Variables]
/// InstallRoot = 'C:\Swift'
/// ```
///
/// Documents are read once, at [`FileStore::open`]; the store never writes.
#[derive(Debug, Clone, Default)]
pub struct FileStore {
    tree: MemoryStore,
}

impl FileStore {
    /// Load both hives from `locations`. A missing document is an empty hive.
    pub fn open(locations: &StoreLocations) -> Result<Self> {
        let machine = load_hive(Hive::LocalMachine, Some(&locations.machine))?;
        let user = load_hive(Hive::CurrentUser, locations.user.as_deref())?;
        Ok(Self {
            tree: MemoryStore::from_hives(machine, user),
        })
    }

    /// Build a store from in-memory documents.
    pub fn from_documents(machine: &str, user: &str) -> Result<Self> {
        let machine = parse_document(machine, Hive::LocalMachine.name())?;
        let user = parse_document(user, Hive::CurrentUser.name())?;
        Ok(Self {
            tree: MemoryStore::from_hives(machine, user),
        })
    }
}

impl ConfigStore for FileStore {
    fn child_keys(&self, path: &KeyPath) -> Result<Vec<String>> {
        self.tree.child_keys(path)
    }

    fn string_value(&self, path: &KeyPath, name: &str) -> Result<Option<String>> {
        self.tree.string_value(path, name)
    }
}

fn load_hive(hive: Hive, path: Option<&Path>) -> Result<KeyNode> {
    let Some(path) = path else {
        debug!(%hive, "No store location for hive");
        return Ok(KeyNode::new());
    };

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(%hive, path = %path.display(), "Store document not found, hive is empty");
            return Ok(KeyNode::new());
        }
        Err(e) => {
            return Err(Error::io(
                e,
                Some(path.to_path_buf()),
                "reading configuration store",
            ));
        }
    };

    debug!(%hive, path = %path.display(), "Loaded store document");
    parse_document(&text, &path.display().to_string())
}

fn parse_document(text: &str, origin: &str) -> Result<KeyNode> {
    let table: toml::Table =
        toml::from_str(text).map_err(|e| Error::store(format!("{origin}: {e}")))?;
    let mut root = KeyNode::new();
    fill_node(&mut root, &table, origin);
    Ok(root)
}

fn fill_node(node: &mut KeyNode, table: &toml::Table, origin: &str) {
    for (name, value) in table {
        match value {
            toml::Value::String(s) => {
                node.set_value(name, s.as_str());
            }
            toml::Value::Table(child) => fill_node(node.subkey(name), child, origin),
            other => {
                warn!(
                    origin,
                    name,
                    kind = other.type_str(),
                    "Ignoring non-string store value"
                );
            }
        }
    }
}
