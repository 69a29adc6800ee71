//! Shared test fixtures for tcrun-core tests.
//!
//! Builds install-root layouts on disk:
//!
//! ```text
//! <root>/Toolchains/<dir>/ToolchainInfo.plist
//! <root>/Toolchains/<dir>/usr/bin/<tool>
//! <root>/Platforms/<version>/<platform>/Developer/SDKs/<sdk>
//! ```

use crate::store::{Hive, MemoryStore};
use crate::toolchain::TOOLCHAIN_INFO;
use std::fs;
use std::path::{Path, PathBuf};

/// Write a toolchain directory with a valid metadata file.
pub fn write_toolchain(toolchains: &Path, dir: &str, identifier: &str) -> PathBuf {
    let location = toolchains.join(dir);
    fs::create_dir_all(&location).unwrap();
    fs::write(
        location.join(TOOLCHAIN_INFO),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>Identifier</key>
  <string>{identifier}</string>
  <key>DisplayName</key>
  <string>Swift {identifier}</string>
</dict>
</plist>
"#
        ),
    )
    .unwrap();
    location
}

/// Write a toolchain directory whose metadata cannot be parsed.
pub fn write_invalid_toolchain(toolchains: &Path, dir: &str) -> PathBuf {
    let location = toolchains.join(dir);
    fs::create_dir_all(&location).unwrap();
    fs::write(location.join(TOOLCHAIN_INFO), "<plist><dict><key>").unwrap();
    location
}

/// Write an empty file standing in for an executable.
pub fn write_tool(bindir: &Path, name: &str) -> PathBuf {
    let path = write_data_file(bindir, name);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }
    path
}

/// Write a plain `0644` file that is not executable.
pub fn write_data_file(dir: &Path, name: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, b"").unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
    }
    path
}

/// Create `Platforms/<version>/<platform>/Developer/SDKs/<sdk>` under `root`.
pub fn write_sdk(root: &Path, version: &str, platform: &str, sdk: &str) -> PathBuf {
    let location = root
        .join("Platforms")
        .join(version)
        .join(platform)
        .join("Developer")
        .join("SDKs")
        .join(sdk);
    fs::create_dir_all(&location).unwrap();
    location
}

/// Register a toolkit record under the uninstall root of `hive`.
pub fn register(
    store: &mut MemoryStore,
    hive: Hive,
    key: &str,
    display_name: &str,
    version: &str,
    install_root: &Path,
) {
    let record = store.uninstall_root_mut(hive).subkey(key);
    record
        .set_value("DisplayName", display_name)
        .set_value("DisplayVersion", version)
        .set_value("Publisher", "swift.org");
    record
        .subkey("Variables")
        .set_value("InstallRoot", install_root.to_string_lossy());
}
