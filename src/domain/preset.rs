use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Named commit-message convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Preset {
    #[default]
    Angular,
    Atom,
    Ember,
    Eslint,
    Jquery,
    Jshint,
}

// Header layouts, capture groups: 1 = type, 2 = scope, 3 = breaking marker, 4 = subject
static ANGULAR_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z]+)(?:\(([^)]*)\))?(!)?: (.+)$").expect("valid angular header")
});
static ATOM_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(:[a-z0-9_+-]+:)()()\s+(.+)$").expect("valid atom header"));
static EMBER_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([A-Z]+)(?: ([^\]]*))?\]()\s+(.+)$").expect("valid ember header")
});
static ESLINT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Fix|Update|New|Breaking|Docs|Build|Upgrade|Chore)()(): (.+)$")
        .expect("valid eslint header")
});
static JQUERY_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^()([A-Za-z][\w.-]*)(): (.+)$").expect("valid jquery header"));
static JSHINT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\[([A-Z ]+)\]\]()()\s+(.+)$").expect("valid jshint header")
});

/// Components extracted from a commit header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub commit_type: Option<String>,
    pub scope: Option<String>,
    pub breaking_marker: bool,
    pub subject: String,
}

impl Preset {
    /// Every supported preset, in detection tie-break order
    pub const ALL: [Preset; 6] = [
        Preset::Angular,
        Preset::Eslint,
        Preset::Ember,
        Preset::Jshint,
        Preset::Atom,
        Preset::Jquery,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Angular => "angular",
            Preset::Atom => "atom",
            Preset::Ember => "ember",
            Preset::Eslint => "eslint",
            Preset::Jquery => "jquery",
            Preset::Jshint => "jshint",
        }
    }

    fn header_pattern(&self) -> &'static Regex {
        match self {
            Preset::Angular => &ANGULAR_HEADER,
            Preset::Atom => &ATOM_HEADER,
            Preset::Ember => &EMBER_HEADER,
            Preset::Eslint => &ESLINT_HEADER,
            Preset::Jquery => &JQUERY_HEADER,
            Preset::Jshint => &JSHINT_HEADER,
        }
    }

    /// Whether the first line of `message` follows this preset's header layout
    pub fn matches(&self, message: &str) -> bool {
        let first_line = message.lines().next().unwrap_or("").trim_end();
        self.header_pattern().is_match(first_line)
    }

    /// Split a header line into its components, or `None` if it does not match
    pub fn parse_header(&self, line: &str) -> Option<Header> {
        let captures = self.header_pattern().captures(line.trim_end())?;
        let non_empty = |idx: usize| {
            captures
                .get(idx)
                .map(|m| m.as_str().trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Some(Header {
            commit_type: non_empty(1).map(|t| t.to_lowercase()),
            scope: non_empty(2),
            breaking_marker: non_empty(3).is_some(),
            subject: non_empty(4).unwrap_or_default(),
        })
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_lowercase();
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name() == name)
            .ok_or_else(|| {
                ReleaseError::convention(format!(
                    "Unknown preset '{}' (expected one of: angular, atom, ember, eslint, jquery, jshint)",
                    s
                ))
            })
    }
}
