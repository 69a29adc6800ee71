//! Three-component toolkit versions.
//!
//! Versions come from the `DisplayVersion` value of an installation record,
//! e.g. `"6.0.1"` or `"6.0.1-rc1"`. Anything after the first `-` is dropped
//! before parsing and never takes part in ordering.

use serde::{Serialize, Serializer};
use std::fmt;

/// A `major.minor.patch` version, ordered field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major component.
    pub major: u64,
    /// Minor component.
    pub minor: u64,
    /// Patch component.
    pub patch: u64,
}

impl Version {
    /// Create a version from its components.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string.
    ///
    /// Returns `None` unless the part before the first `-` is exactly three
    /// dot-separated non-negative integers.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let release = s.split('-').next()?;
        let mut components = release.split('.').map(|c| c.parse::<u64>().ok());

        let major = components.next()??;
        let minor = components.next()??;
        let patch = components.next()??;
        if components.next().is_some() {
            return None;
        }

        Some(Self::new(major, minor, patch))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_release() {
        assert_eq!(Version::parse("6.0.1"), Some(Version::new(6, 0, 1)));
        assert_eq!(Version::parse("10.20.30"), Some(Version::new(10, 20, 30)));
    }

    #[test]
    fn test_parse_ignores_prerelease_suffix() {
        assert_eq!(Version::parse("6.0.1-rc1"), Some(Version::new(6, 0, 1)));
        assert_eq!(
            Version::parse("6.0.1-rc1-build.7"),
            Some(Version::new(6, 0, 1))
        );
        assert_eq!(Version::parse("6.0.1-rc1"), Version::parse("6.0.1"));
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        assert_eq!(Version::parse("6.0"), None);
        assert_eq!(Version::parse("6.0.1.2"), None);
        assert_eq!(Version::parse("abc"), None);
        assert_eq!(Version::parse(""), None);
        assert_eq!(Version::parse("-rc1"), None);
        assert_eq!(Version::parse("6.x.1"), None);
        assert_eq!(Version::parse("6..1"), None);
        assert_eq!(Version::parse("-1.0.0"), None);
    }

    #[test]
    fn test_ordering() {
        assert!(Version::new(6, 1, 0) > Version::new(6, 0, 9));
        assert!(Version::new(5, 10, 0) < Version::new(6, 0, 0));
        assert_eq!(
            Version::new(6, 0, 1).cmp(&Version::new(6, 0, 1)),
            std::cmp::Ordering::Equal
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Version::new(6, 0, 1).to_string(), "6.0.1");
        let parsed = Version::parse("6.2.0-snapshot").map(|v| v.to_string());
        assert_eq!(parsed.as_deref(), Some("6.2.0"));
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Version::new(6, 0, 1)).unwrap();
        assert_eq!(json, "\"6.0.1\"");
    }

    proptest! {
        #[test]
        fn prop_ordering_matches_component_tuples(
            a in (0u64..50, 0u64..50, 0u64..50),
            b in (0u64..50, 0u64..50, 0u64..50),
        ) {
            let va = Version::new(a.0, a.1, a.2);
            let vb = Version::new(b.0, b.1, b.2);
            prop_assert_eq!(va.cmp(&vb), a.cmp(&b));
        }
    }
}
