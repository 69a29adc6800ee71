//! Locations of the configuration store documents.
//!
//! | Hive | Default |
//! |------|---------|
//! | machine (Windows) | `%PROGRAMDATA%\tcrun\installations.toml` |
//! | machine (other) | `/etc/tcrun/installations.toml` |
//! | user | `<config dir>/tcrun/installations.toml` (`dirs::config_dir()`) |
//!
//! Both can be overridden for testing and packaging:
//! - `TCRUN_MACHINE_STORE` - machine-wide document
//! - `TCRUN_USER_STORE` - per-user document

use std::path::PathBuf;

/// Overrides the machine-wide store document.
pub const MACHINE_STORE_ENV: &str = "TCRUN_MACHINE_STORE";
/// Overrides the per-user store document.
pub const USER_STORE_ENV: &str = "TCRUN_USER_STORE";

const STORE_FILE: &str = "installations.toml";

/// Where each hive of the file-backed store is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLocations {
    /// Machine-wide document.
    pub machine: PathBuf,
    /// Per-user document; `None` when no configuration directory exists.
    pub user: Option<PathBuf>,
}

impl StoreLocations {
    /// Resolve both locations from the environment and platform defaults.
    #[must_use]
    pub fn from_environment() -> Self {
        Self {
            machine: machine_store(),
            user: user_store(),
        }
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// The machine-wide store document.
///
/// Resolution order:
/// 1. `TCRUN_MACHINE_STORE` environment variable
/// 2. The platform's shared configuration directory + `tcrun/installations.toml`
#[must_use]
pub fn machine_store() -> PathBuf {
    env_path(MACHINE_STORE_ENV).unwrap_or_else(|| machine_config_dir().join("tcrun").join(STORE_FILE))
}

#[cfg(windows)]
fn machine_config_dir() -> PathBuf {
    env_path("PROGRAMDATA").unwrap_or_else(|| PathBuf::from(r"C:\ProgramData"))
}

#[cfg(not(windows))]
fn machine_config_dir() -> PathBuf {
    PathBuf::from("/etc")
}

/// The per-user store document.
///
/// Resolution order:
/// 1. `TCRUN_USER_STORE` environment variable
/// 2. `dirs::config_dir()` + `tcrun/installations.toml`
#[must_use]
pub fn user_store() -> Option<PathBuf> {
    env_path(USER_STORE_ENV)
        .or_else(|| dirs::config_dir().map(|dir| dir.join("tcrun").join(STORE_FILE)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win() {
        temp_env::with_vars(
            [
                (MACHINE_STORE_ENV, Some("/tmp/machine.toml")),
                (USER_STORE_ENV, Some("/tmp/user.toml")),
            ],
            || {
                let locations = StoreLocations::from_environment();
                assert_eq!(locations.machine, PathBuf::from("/tmp/machine.toml"));
                assert_eq!(locations.user, Some(PathBuf::from("/tmp/user.toml")));
            },
        );
    }

    #[test]
    fn test_empty_override_is_ignored() {
        temp_env::with_var(MACHINE_STORE_ENV, Some(""), || {
            let machine = machine_store();
            assert!(machine.ends_with(PathBuf::from("tcrun").join(STORE_FILE)));
            assert_ne!(machine, PathBuf::new());
        });
    }

    #[cfg(unix)]
    #[test]
    fn test_unix_machine_default() {
        temp_env::with_var_unset(MACHINE_STORE_ENV, || {
            assert_eq!(
                machine_store(),
                PathBuf::from("/etc/tcrun/installations.toml")
            );
        });
    }

    #[test]
    fn test_user_default_under_config_dir() {
        temp_env::with_var_unset(USER_STORE_ENV, || {
            if let Some(config) = dirs::config_dir() {
                assert_eq!(
                    user_store(),
                    Some(config.join("tcrun").join(STORE_FILE))
                );
            }
        });
    }
}
