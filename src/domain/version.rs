use crate::error::{ReleaseError, Result};
use semver::Version;
use std::fmt;

/// Version assigned to the first release of a repository
pub fn initial_version() -> Version {
    Version::new(1, 0, 0)
}

/// Parse a semantic version, tolerating a single leading `v`/`V`
pub fn parse_version(input: &str) -> Result<Version> {
    let trimmed = input.trim();
    let clean = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
    Version::parse(clean).map_err(|e| {
        ReleaseError::version(format!("Invalid semantic version '{}': {}", input, e))
    })
}

/// Magnitude of a version increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BumpLevel {
    Patch,
    Minor,
    Major,
}

impl BumpLevel {
    /// Increment `version` by this level.
    ///
    /// A pre-release of exactly the version the bump would reach is
    /// finalised instead (`1.2.3-beta.1` patch -> `1.2.3`, `1.3.0-rc.1`
    /// minor -> `1.3.0`). Build metadata is dropped. A breaking change on a
    /// `0.x` line still moves to the next major version.
    pub fn apply(&self, version: &Version) -> Result<Version> {
        let pre = !version.pre.is_empty();
        let (major, minor, patch) = (version.major, version.minor, version.patch);

        let next = match self {
            BumpLevel::Major if pre && minor == 0 && patch == 0 => Version::new(major, 0, 0),
            BumpLevel::Major => Version::new(increment(major, version)?, 0, 0),
            BumpLevel::Minor if pre && patch == 0 => Version::new(major, minor, 0),
            BumpLevel::Minor => Version::new(major, increment(minor, version)?, 0),
            BumpLevel::Patch if pre => Version::new(major, minor, patch),
            BumpLevel::Patch => Version::new(major, minor, increment(patch, version)?),
        };
        Ok(next)
    }
}

fn increment(component: u64, version: &Version) -> Result<u64> {
    component.checked_add(1).ok_or_else(|| {
        ReleaseError::version(format!("Cannot increment version {}: component overflow", version))
    })
}

impl fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpLevel::Major => f.write_str("major"),
            BumpLevel::Minor => f.write_str("minor"),
            BumpLevel::Patch => f.write_str("patch"),
        }
    }
}
