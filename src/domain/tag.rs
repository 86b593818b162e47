use crate::domain::version::parse_version;
use crate::error::{ReleaseError, Result};
use semver::Version;
use std::fmt;

/// A release tag: a semantic version, optionally namespaced by package (`name@1.2.3`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    pub package: Option<String>,
    pub version: Version,
}

impl ReleaseTag {
    pub fn new(package: Option<String>, version: Version) -> Self {
        ReleaseTag { package, version }
    }

    /// Parse a tag name such as `1.2.3`, `v1.2.3` or `web@1.2.3`
    pub fn parse(name: &str) -> Result<Self> {
        match name.rsplit_once('@') {
            Some((package, version)) => {
                if package.is_empty() {
                    return Err(ReleaseError::tag(format!(
                        "Tag '{}' has an empty package name",
                        name
                    )));
                }
                Ok(ReleaseTag {
                    package: Some(package.to_string()),
                    version: parse_version(version)?,
                })
            }
            None => Ok(ReleaseTag {
                package: None,
                version: parse_version(name)?,
            }),
        }
    }

    /// The git tag name
    pub fn name(&self) -> String {
        self.to_string()
    }

    pub fn belongs_to(&self, package: Option<&str>) -> bool {
        self.package.as_deref() == package
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.package {
            Some(package) => write!(f, "{}@{}", package, self.version),
            None => write!(f, "{}", self.version),
        }
    }
}

/// Pick the highest-versioned release tag for `package` among `tag_names`,
/// together with the git name it was found under (which may carry a `v`).
///
/// Names that are not semantic versions are skipped.
pub fn latest_release_tag<S: AsRef<str>>(
    tag_names: &[S],
    package: Option<&str>,
) -> Option<(String, ReleaseTag)> {
    tag_names
        .iter()
        .filter_map(|name| {
            let name = name.as_ref();
            ReleaseTag::parse(name).ok().map(|tag| (name.to_string(), tag))
        })
        .filter(|(_, tag)| tag.belongs_to(package))
        .max_by(|(_, a), (_, b)| a.version.cmp(&b.version))
}
