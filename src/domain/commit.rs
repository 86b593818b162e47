use crate::domain::Preset;
use regex::Regex;
use std::sync::LazyLock;

static ISSUE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w&/#])#(\d+)\b").expect("valid issue reference"));

const BREAKING_NOTES: [&str; 2] = ["BREAKING CHANGE", "BREAKING-CHANGE"];

/// A commit classified against a preset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub subject: String,
    pub body: Option<String>,
    pub commit_type: String,
    pub scope: Option<String>,
    pub breaking_change: bool,
    pub issue_ids: Vec<u64>,
}

impl Commit {
    /// Parse a raw commit message according to `preset`.
    ///
    /// Headers that do not follow the preset keep the whole first line as the
    /// subject and get the type `unknown`. A commit is breaking when the header
    /// carries the `!` marker, when the preset's type is itself a breaking tag,
    /// or when any line of the message starts with a `BREAKING CHANGE` note.
    pub fn parse(hash: impl Into<String>, message: &str, preset: Preset) -> Self {
        let message = message.trim();
        let (header_line, rest) = match message.split_once('\n') {
            Some((header, rest)) => (header.trim_end(), rest.trim()),
            None => (message, ""),
        };
        let body = Some(rest.to_string()).filter(|b| !b.is_empty());

        let (commit_type, scope, marker, subject) = match preset.parse_header(header_line) {
            Some(header) => (
                header
                    .commit_type
                    .unwrap_or_else(|| "unknown".to_string()),
                header.scope,
                header.breaking_marker,
                header.subject,
            ),
            None => (
                "unknown".to_string(),
                None,
                false,
                header_line.to_string(),
            ),
        };

        let breaking_change =
            marker || is_breaking_type(&commit_type) || has_breaking_note(message);

        Commit {
            hash: hash.into(),
            subject,
            body,
            commit_type,
            scope,
            breaking_change,
            issue_ids: issue_references(message),
        }
    }
}

fn is_breaking_type(commit_type: &str) -> bool {
    matches!(commit_type, "breaking" | "breaking change")
}

fn has_breaking_note(message: &str) -> bool {
    message.lines().any(|line| {
        let line = line.trim_start();
        BREAKING_NOTES.iter().any(|note| {
            line.strip_prefix(note)
                .is_some_and(|rest| rest.starts_with(':'))
        })
    })
}

/// Issue numbers referenced as `#N` anywhere in the message, in discovery order
pub fn issue_references(message: &str) -> Vec<u64> {
    ISSUE_REFERENCE
        .captures_iter(message)
        .filter_map(|captures| captures.get(1)?.as_str().parse().ok())
        .collect()
}
