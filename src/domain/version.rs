use crate::error::{ReleaseError, Result};
use std::fmt;

/// A release version in strict `MAJOR.MINOR.PATCH` form.
///
/// Pre-release and build metadata are not accepted, and neither is a `v`
/// prefix. Ordering is numeric on (major, minor, patch).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(semver::Version);

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version(semver::Version::new(major, minor, patch))
    }

    /// Parse a caller-supplied version string.
    ///
    /// Accepts exactly three dot-separated non-negative integers. Leading
    /// zeros are tolerated (`01.2.3` is read as `1.2.3`).
    pub fn parse(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split('.').collect();
        let well_formed = parts.len() == 3
            && parts
                .iter()
                .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()));
        if !well_formed {
            return Err(ReleaseError::version(format!(
                "Invalid version format: '{}' - expected MAJOR.MINOR.PATCH",
                input
            )));
        }

        let component = |part: &str, label: &str| -> Result<u64> {
            part.parse::<u64>()
                .map_err(|_| ReleaseError::version(format!("Invalid {} version: {}", label, part)))
        };

        Ok(Version::new(
            component(parts[0], "major")?,
            component(parts[1], "minor")?,
            component(parts[2], "patch")?,
        ))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Version {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}
