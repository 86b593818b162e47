//! Release pipeline
//!
//! [orchestrator::Orchestrator] sequences the stages:
//!
//! - [resolver]: decide whether to release and which version
//! - [tagger]: provisional local tag, removed again on failure or dry run
//! - [releaser]: tag + release message on the hosting service
//! - [notifier]: one comment per referenced issue

pub mod notifier;
pub mod orchestrator;
pub mod releaser;
pub mod resolver;
pub mod tagger;

pub use notifier::IssueNotifier;
pub use orchestrator::{Orchestrator, ReleaseOutcome};
pub use releaser::RemoteReleaser;
pub use resolver::{ReleasePlan, Resolution, VersionResolver};
pub use tagger::ReleaseTagger;

use crate::domain::Preset;
use crate::error::{ReleaseError, Result};
use std::fmt;

/// Why an attempt ended without releasing anything
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoReleaseReason {
    /// No commits since the latest release tag
    NoNewCommits { latest_tag: Option<String> },
    /// Commits exist but none of them calls for a version bump
    NoReleasableCommits { preset: Preset, commits: usize },
}

impl fmt::Display for NoReleaseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoReleaseReason::NoNewCommits {
                latest_tag: Some(tag),
            } => write!(f, "No new commits since tag '{}'", tag),
            NoReleaseReason::NoNewCommits { latest_tag: None } => {
                write!(f, "Repository has no commits to release")
            }
            NoReleaseReason::NoReleasableCommits { preset, commits } => write!(
                f,
                "None of the {} new commit(s) warrants a release under the '{}' preset",
                commits, preset
            ),
        }
    }
}

/// The token, if it is present and not blank
pub(crate) fn require_token(token: Option<&str>) -> Result<&str> {
    match token.map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(ReleaseError::configuration(
            "A GitLab access token is required (set GITLAB_AUTH_TOKEN or pass --token)",
        )),
    }
}
