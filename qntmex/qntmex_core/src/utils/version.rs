//! Version utilities.
//!
//! Gradle distributions are named with two or three numeric components
//! (`7.6`, `7.5.1`, `8.3`). The version type keeps track of whether the
//! patch component was written so it renders back exactly as it was parsed,
//! which matters when the version is spliced into a distribution URL.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Error parsing a version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionParseError {
    /// The invalid version string.
    pub version: String,

    /// The reason for the error.
    pub reason: String,
}

impl fmt::Display for VersionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid version '{}': {}", self.version, self.reason)
    }
}

impl std::error::Error for VersionParseError {}

/// A dotted tool version such as `7.6` or `7.5.1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    /// Major version number.
    pub major: u32,

    /// Minor version number.
    pub minor: u32,

    /// Patch version number, when one was written.
    pub patch: Option<u32>,
}

impl Version {
    /// Create a two-component version.
    pub fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            patch: None,
        }
    }

    /// Add a patch component to this version.
    pub fn with_patch(mut self, patch: u32) -> Self {
        self.patch = Some(patch);
        self
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.unwrap_or(0).cmp(&other.patch.unwrap_or(0)))
            .then(self.patch.cmp(&other.patch))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(patch) = self.patch {
            write!(f, ".{}", patch)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = |reason: &str| VersionParseError {
            version: s.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = s.trim().split('.');

        let major = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| error("Missing major version"))?
            .parse()
            .map_err(|_| error("Invalid major version"))?;

        let minor = parts
            .next()
            .ok_or_else(|| error("Missing minor version"))?
            .parse()
            .map_err(|_| error("Invalid minor version"))?;

        let patch = match parts.next() {
            Some(p) => Some(p.parse().map_err(|_| error("Invalid patch version"))?),
            None => None,
        };

        if parts.next().is_some() {
            return Err(error("Too many components"));
        }

        Ok(Self {
            major,
            minor,
            patch,
        })
    }
}

impl TryFrom<String> for Version {
    type Error = VersionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parsing() {
        let version = Version::from_str("7.6").unwrap();
        assert_eq!(version.major, 7);
        assert_eq!(version.minor, 6);
        assert_eq!(version.patch, None);

        let version = Version::from_str("7.5.1").unwrap();
        assert_eq!(version.patch, Some(1));

        assert!(Version::from_str("").is_err());
        assert!(Version::from_str("7").is_err());
        assert!(Version::from_str("7.x").is_err());
        assert!(Version::from_str("1.2.3.4").is_err());
    }

    #[test]
    fn test_version_display_round_trips_written_form() {
        assert_eq!(Version::new(7, 6).to_string(), "7.6");
        assert_eq!(Version::new(7, 5).with_patch(1).to_string(), "7.5.1");
        assert_eq!("8.3".parse::<Version>().unwrap().to_string(), "8.3");
    }

    #[test]
    fn test_version_comparison() {
        assert!(Version::new(7, 5).with_patch(1) < Version::new(7, 6));
        assert!(Version::new(7, 6) < Version::new(8, 3));
        assert!(Version::new(7, 6) < Version::new(7, 6).with_patch(1));
    }

    #[test]
    fn test_version_serialization() {
        let json = serde_json::to_string(&Version::new(7, 6)).unwrap();
        assert_eq!(json, "\"7.6\"");
        let back: Version = serde_json::from_str("\"7.5.1\"").unwrap();
        assert_eq!(back, Version::new(7, 5).with_patch(1));
        assert!(serde_json::from_str::<Version>("\"seven\"").is_err());
    }
}
