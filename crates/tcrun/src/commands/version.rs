//! `--version`

/// `tcrun <version>`, as printed by `--version`.
#[must_use]
pub fn version_string() -> String {
    format!("tcrun {}", env!("CARGO_PKG_VERSION"))
}
