//! Executable lookup inside a toolchain's binary directory.

use std::path::{Component, Path, PathBuf};
use tracing::trace;

/// Environment variable holding the executable-extension search list.
pub const PATHEXT: &str = "PATHEXT";

#[cfg(windows)]
const DEFAULT_EXTENSIONS: &str = ".COM;.EXE;.BAT;.CMD";
#[cfg(not(windows))]
const DEFAULT_EXTENSIONS: &str = "";

/// Split a `PATHEXT`-style list (`.EXE;.BAT`) into its entries.
#[must_use]
pub fn parse_extensions(list: &str) -> Vec<String> {
    list.split(';')
        .map(str::trim)
        .filter(|ext| !ext.is_empty())
        .map(String::from)
        .collect()
}

/// The host's extension search list.
///
/// Uses `PATHEXT` when set; otherwise `.COM;.EXE;.BAT;.CMD` on Windows and
/// nothing elsewhere.
#[must_use]
pub fn executable_extensions() -> Vec<String> {
    std::env::var(PATHEXT).map_or_else(
        |_| parse_extensions(DEFAULT_EXTENSIONS),
        |list| parse_extensions(&list),
    )
}

/// Find the executable `name` in `directory`.
///
/// `name` must be a single plain path component; anything else (an absolute
/// path, a separator, `..`) would leave `directory` and is never found. A
/// name that already carries an extension is only checked verbatim. An
/// extensionless name is checked verbatim first, then with each entry of
/// `extensions` appended, in order; the first executable file wins.
#[must_use]
pub fn find_executable(name: &str, directory: &Path, extensions: &[String]) -> Option<PathBuf> {
    if !is_plain_name(name) {
        trace!(name, "Tool name is not a plain file name");
        return None;
    }

    if Path::new(name).extension().is_some() {
        return executable_in(name, directory);
    }

    executable_in(name, directory).or_else(|| {
        extensions.iter().find_map(|ext| {
            let ext = ext.strip_prefix('.').unwrap_or(ext);
            executable_in(&format!("{name}.{ext}"), directory)
        })
    })
}

fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

fn executable_in(candidate: &str, directory: &Path) -> Option<PathBuf> {
    trace!(candidate, directory = %directory.display(), "Checking executable candidate");
    let found = which::which_in(candidate, Some(directory), directory).ok()?;
    Some(std::path::absolute(&found).unwrap_or(found))
}
