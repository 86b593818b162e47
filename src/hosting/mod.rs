//! Hosting service (GitLab v4) abstraction layer
//!
//! The pipeline talks to the hosting service through [HostingApi]:
//!
//! - [gitlab::GitLabClient]: blocking `reqwest` client for the GitLab v4 API
//! - [mock::MockHostingApi]: records calls and replays scripted failures

pub mod gitlab;
pub mod mock;

pub use gitlab::GitLabClient;
pub use mock::MockHostingApi;

use crate::error::{ReleaseError, Result};
use reqwest::Url;
use serde::Serialize;
use std::fmt;

/// Which project an API call addresses, and with which credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiTarget {
    /// `scheme://domain/api/v4/`
    pub base_url: Url,
    /// Unescaped `user/project` identifier
    pub project: String,
    pub token: String,
}

impl ApiTarget {
    /// URL for `segments` below `projects/:id/`, with the project id escaped
    /// as a single path segment (`user%2Fproject`)
    pub fn project_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ReleaseError::configuration(format!(
                    "API base URL '{}' cannot hold a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push("projects")
            .push(&self.project)
            .extend(segments);
        Ok(url)
    }
}

/// Build the API root for a hosting domain
pub fn api_base_url(domain: &str, insecure: bool) -> Result<Url> {
    let scheme = if insecure { "http" } else { "https" };
    let raw = format!("{}://{}/api/v4/", scheme, domain);
    Url::parse(&raw).map_err(|e| {
        ReleaseError::configuration(format!("Invalid API URL '{}': {}", raw, e))
    })
}

/// Body of `POST projects/:id/repository/tags`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTag {
    pub tag_name: String,
    pub message: String,
    #[serde(rename = "ref")]
    pub reference: String,
}

/// A call that did not succeed: the HTTP status (if a response arrived) and
/// the server's or transport's message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub status: Option<u16>,
    pub message: String,
}

impl ApiFailure {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        ApiFailure {
            status,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Write operations the release pipeline performs on the hosting service
///
/// Each call is attempted exactly once; implementors must not retry.
pub trait HostingApi: Send + Sync {
    /// Create a tag (and its release message) on the remote repository
    fn create_tag(&self, target: &ApiTarget, tag: &NewTag) -> std::result::Result<(), ApiFailure>;

    /// Post a comment on an issue
    fn create_issue_note(
        &self,
        target: &ApiTarget,
        issue: u64,
        body: &str,
    ) -> std::result::Result<(), ApiFailure>;
}
