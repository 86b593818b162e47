use crate::domain::{Commit, ReleaseTag, RepositoryDescriptor};
use crate::error::{ReleaseError, Result};
use crate::hosting::{api_base_url, ApiTarget, HostingApi};
use crate::release::require_token;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Inputs of one notification pass
#[derive(Debug, Clone)]
pub struct NotifyRequest<'a> {
    pub commits: &'a [Commit],
    pub repository: &'a RepositoryDescriptor,
    pub token: Option<&'a str>,
    pub tag: &'a ReleaseTag,
    pub insecure_api: bool,
    pub dry_run: bool,
}

/// Comments on every issue the released commits reference
pub struct IssueNotifier<'a, H: HostingApi + ?Sized> {
    api: &'a H,
}

/// Distinct issue numbers referenced by `commits`, ascending
pub fn referenced_issues(commits: &[Commit]) -> BTreeSet<u64> {
    commits
        .iter()
        .flat_map(|commit| commit.issue_ids.iter().copied())
        .collect()
}

/// Markdown comment announcing `tag` with a link to its page
pub fn release_note(repository: &RepositoryDescriptor, tag: &ReleaseTag) -> String {
    let name = tag.name();
    format!(
        "Version [{}]({}) has been released.",
        name,
        repository.tag_url(&name)
    )
}

impl<'a, H: HostingApi + ?Sized> IssueNotifier<'a, H> {
    pub fn new(api: &'a H) -> Self {
        IssueNotifier { api }
    }

    /// Post the release note once per referenced issue.
    ///
    /// Issues are notified in ascending order and the first failure aborts
    /// the pass; notes already posted stay.
    pub fn notify(&self, request: &NotifyRequest<'_>) -> Result<()> {
        let issues = referenced_issues(request.commits);
        if issues.is_empty() {
            debug!("no issues referenced by the released commits");
            return Ok(());
        }

        if request.dry_run {
            info!(?issues, "dry run: skipping issue notifications");
            return Ok(());
        }

        let target = ApiTarget {
            base_url: api_base_url(&request.repository.domain, request.insecure_api)?,
            project: request.repository.project_path(),
            token: require_token(request.token)?.to_string(),
        };
        let body = release_note(request.repository, request.tag);

        for issue in issues {
            self.api
                .create_issue_note(&target, issue, &body)
                .map_err(|failure| ReleaseError::Notification {
                    issue,
                    status: failure.status,
                    message: failure.message,
                })?;
            debug!(issue, "posted release note");
        }

        Ok(())
    }
}
