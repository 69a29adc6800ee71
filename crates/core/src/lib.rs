//! Toolchain discovery and dispatch for tcrun
//!
//! This crate finds installed copies of the Swift developer toolkit and picks
//! the toolchain and SDK a tool invocation should use:
//! - Installation records are read from a registry-like configuration store
//! - Toolchains, platforms and SDKs are scanned lazily from each install root
//! - Selectors narrow the choice; the environment supplies defaults
//! - The resolved tool is located and launched with an adjusted environment
//!
//! # Layout of an installation
//!
//! ```text
//! <install-root>/Toolchains/<dir>/ToolchainInfo.plist
//! <install-root>/Toolchains/<dir>/usr/bin/<tool>
//! <install-root>/Platforms/<version>/<name>.platform/Developer/SDKs/<name>.sdk
//! ```

pub mod dispatch;
pub mod enumerate;
pub mod error;
pub mod installation;
pub mod memoized;
pub mod paths;
pub mod platform;
pub mod resolver;
pub mod sdk;
pub mod search;
pub mod selectors;
pub mod store;
pub mod toolchain;
pub mod version;

#[cfg(test)]
mod test_utils;

pub use dispatch::{Dispatch, ExitOutcome};
pub use error::{Error, Result};
pub use installation::{Installation, InstallationSet};
pub use memoized::Memoized;
pub use paths::StoreLocations;
pub use platform::Platform;
pub use resolver::{Resolution, resolve};
pub use sdk::Sdk;
pub use selectors::Selectors;
pub use store::{ConfigStore, FileStore, Hive, KeyPath, MemoryStore};
pub use toolchain::{InvalidToolchain, Toolchain};
pub use version::Version;
