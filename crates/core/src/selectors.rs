//! Toolchain and SDK selectors, with defaults taken from the environment.

use tracing::debug;

/// Names the SDK to resolve; only its last path component is used.
pub const SDKROOT: &str = "SDKROOT";
/// Names the toolchain identifier to resolve.
pub const TOOLCHAINS: &str = "TOOLCHAINS";
/// SDK used when neither `--sdk` nor `SDKROOT` names one.
pub const DEFAULT_SDK: &str = "Windows.sdk";

/// What the caller asked for.
///
/// `None` leaves that dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selectors {
    /// Toolchain identifier, e.g. `org.swift.601`.
    pub toolchain: Option<String>,
    /// SDK directory name, e.g. `Windows.sdk`.
    pub sdk: Option<String>,
}

impl Selectors {
    /// Explicit selectors with no environment fallback.
    #[must_use]
    pub fn new(toolchain: Option<String>, sdk: Option<String>) -> Self {
        Self { toolchain, sdk }
    }

    /// Combine explicit selectors with the environment.
    ///
    /// The toolchain falls back to `TOOLCHAINS`. The SDK falls back to the
    /// last component of `SDKROOT`, then to [`DEFAULT_SDK`], so it is always
    /// set. Empty variables count as unset.
    #[must_use]
    pub fn from_environment(toolchain: Option<String>, sdk: Option<String>) -> Self {
        let toolchain = toolchain.or_else(|| non_empty_var(TOOLCHAINS));
        let sdk = sdk
            .or_else(|| non_empty_var(SDKROOT).and_then(|root| sdk_name(&root)))
            .unwrap_or_else(|| DEFAULT_SDK.to_string());

        debug!(toolchain = ?toolchain, %sdk, "Selectors");
        Self {
            toolchain,
            sdk: Some(sdk),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Last path component of an `SDKROOT` value, accepting either separator.
fn sdk_name(root: &str) -> Option<String> {
    root.split(['/', '\\'])
        .filter(|component| !component.is_empty())
        .last()
        .map(String::from)
}
