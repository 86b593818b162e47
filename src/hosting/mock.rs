use crate::hosting::{ApiFailure, ApiTarget, HostingApi, NewTag};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A call received by [MockHostingApi]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    CreateTag {
        target: ApiTarget,
        tag: NewTag,
    },
    IssueNote {
        target: ApiTarget,
        issue: u64,
        body: String,
    },
}

/// Hosting API double that records every call and fails on demand
#[derive(Default)]
pub struct MockHostingApi {
    tag_failure: Option<ApiFailure>,
    issue_failures: HashMap<u64, ApiFailure>,
    calls: Mutex<Vec<ApiCall>>,
}

impl MockHostingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make tag creation answer with `status`
    pub fn fail_tag_creation(mut self, status: u16, message: impl Into<String>) -> Self {
        self.tag_failure = Some(ApiFailure::new(Some(status), message));
        self
    }

    /// Make notes on `issue` answer with `status`
    pub fn fail_issue(mut self, issue: u64, status: u16, message: impl Into<String>) -> Self {
        self.issue_failures
            .insert(issue, ApiFailure::new(Some(status), message));
        self
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().clone()
    }

    /// Issue numbers that received a note attempt, in order
    pub fn noted_issues(&self) -> Vec<u64> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                ApiCall::IssueNote { issue, .. } => Some(*issue),
                ApiCall::CreateTag { .. } => None,
            })
            .collect()
    }

    /// Tag names that were sent for creation, in order
    pub fn created_tags(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                ApiCall::CreateTag { tag, .. } => Some(tag.tag_name.clone()),
                ApiCall::IssueNote { .. } => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ApiCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HostingApi for MockHostingApi {
    fn create_tag(&self, target: &ApiTarget, tag: &NewTag) -> Result<(), ApiFailure> {
        self.lock().push(ApiCall::CreateTag {
            target: target.clone(),
            tag: tag.clone(),
        });
        match &self.tag_failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }

    fn create_issue_note(&self, target: &ApiTarget, issue: u64, body: &str) -> Result<(), ApiFailure> {
        self.lock().push(ApiCall::IssueNote {
            target: target.clone(),
            issue,
            body: body.to_string(),
        });
        match self.issue_failures.get(&issue) {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }
}
