use crate::error::{ReleaseError, Result};
use crate::hosting::{ApiFailure, ApiTarget, HostingApi, NewTag};
use reqwest::blocking::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

#[derive(Serialize)]
struct NoteBody<'a> {
    body: &'a str,
}

/// Blocking client for the GitLab v4 REST API
pub struct GitLabClient {
    client: Client,
}

impl GitLabClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gitlab-release/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReleaseError::configuration(format!("Cannot build HTTP client: {}", e)))?;
        Ok(GitLabClient { client })
    }

    /// Wrap an existing client, e.g. one with custom timeouts or proxies
    pub fn with_client(client: Client) -> Self {
        GitLabClient { client }
    }

    fn post<B: Serialize>(
        &self,
        target: &ApiTarget,
        segments: &[&str],
        body: &B,
    ) -> std::result::Result<(), ApiFailure> {
        let url = target
            .project_url(segments)
            .map_err(|e| ApiFailure::new(None, e.to_string()))?;
        debug!(%url, "POST");

        let response = self
            .client
            .post(url)
            .header(TOKEN_HEADER, &target.token)
            .json(body)
            .send()
            .map_err(|e| ApiFailure::new(e.status().map(|s| s.as_u16()), e.to_string()))?;

        check_response(response)
    }
}

fn check_response(response: Response) -> std::result::Result<(), ApiFailure> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let text = response.text().unwrap_or_default();
    Err(ApiFailure::new(
        Some(status.as_u16()),
        error_message(&text).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        }),
    ))
}

/// Extract GitLab's error text from a response body.
///
/// GitLab answers with `{"message": ...}` or `{"error": ...}`, where
/// `message` may itself be a string, a list or an object of field errors.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(json) => json
            .get("message")
            .or_else(|| json.get("error"))
            .map(|value| match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .or_else(|| Some(trimmed.to_string())),
        Err(_) => Some(trimmed.to_string()),
    }
}

impl HostingApi for GitLabClient {
    fn create_tag(&self, target: &ApiTarget, tag: &NewTag) -> std::result::Result<(), ApiFailure> {
        self.post(target, &["repository", "tags"], tag)
    }

    fn create_issue_note(
        &self,
        target: &ApiTarget,
        issue: u64,
        body: &str,
    ) -> std::result::Result<(), ApiFailure> {
        let issue = issue.to_string();
        self.post(target, &["issues", &issue, "notes"], &NoteBody { body })
    }
}
