use crate::error::{ReleaseError, Result};
use std::fmt;

/// Location of a project on the hosting service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDescriptor {
    pub domain: String,
    /// Owning user or group path; nested groups keep their `/` separators
    pub user: String,
    pub project: String,
}

impl RepositoryDescriptor {
    pub fn new(
        domain: impl Into<String>,
        user: impl Into<String>,
        project: impl Into<String>,
    ) -> Result<Self> {
        let descriptor = RepositoryDescriptor {
            domain: domain.into(),
            user: user.into(),
            project: project.into(),
        };
        if descriptor.domain.trim().is_empty() {
            return Err(ReleaseError::configuration(
                "Repository domain must not be empty",
            ));
        }
        if descriptor.user.is_empty() || descriptor.project.is_empty() {
            return Err(ReleaseError::configuration(format!(
                "Repository on '{}' is missing its owner or project name",
                descriptor.domain
            )));
        }
        Ok(descriptor)
    }

    /// Derive the descriptor from a remote URL.
    ///
    /// Accepts `https://host/user/project.git`, `git+https://...`,
    /// `ssh://git@host:22/user/project.git` and `git@host:user/project.git`.
    /// Ports are kept for http(s) remotes only, since ssh ports say nothing
    /// about where the API listens.
    pub fn from_remote_url(url: &str) -> Result<Self> {
        let url = url.trim();
        let url = url.strip_prefix("git+").unwrap_or(url);

        let (host, path) = if let Some((scheme, rest)) = url.split_once("://") {
            let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));
            let host = authority
                .rsplit_once('@')
                .map_or(authority, |(_, host)| host);
            let host = match scheme {
                "http" | "https" => host,
                _ => host.split_once(':').map_or(host, |(name, _)| name),
            };
            (host, path)
        } else if let Some((authority, path)) = url.split_once(':') {
            let host = authority
                .rsplit_once('@')
                .map_or(authority, |(_, host)| host);
            (host, path)
        } else {
            return Err(ReleaseError::configuration(format!(
                "Cannot determine repository from remote URL '{}'",
                url
            )));
        };

        let path = path.trim_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        let (user, project) = path.rsplit_once('/').ok_or_else(|| {
            ReleaseError::configuration(format!(
                "Remote URL '{}' does not name an owner and a project",
                url
            ))
        })?;

        RepositoryDescriptor::new(host, user, project)
    }

    /// `user/project`, the unescaped project identifier used by the API
    pub fn project_path(&self) -> String {
        format!("{}/{}", self.user, self.project)
    }

    /// Public web URL of a tag on the hosting service
    pub fn tag_url(&self, tag: &str) -> String {
        format!(
            "https://{}/{}/{}/tags/{}",
            self.domain, self.user, self.project, tag
        )
    }
}

impl fmt::Display for RepositoryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.domain, self.user, self.project)
    }
}
