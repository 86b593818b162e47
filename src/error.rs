use thiserror::Error;

/// Unified error type for gitlab-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Convention error: {0}")]
    Convention(String),

    #[error("Release API error{}: {message}", describe_status(.status))]
    ReleaseApi {
        status: Option<u16>,
        message: String,
    },

    #[error("Notification error on issue #{issue}{}: {message}", describe_status(.status))]
    Notification {
        issue: u64,
        status: Option<u16>,
        message: String,
    },

    #[error("Version error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in gitlab-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

fn describe_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => " (no response)".to_string(),
    }
}

impl ReleaseError {
    /// Create a configuration error with context
    pub fn configuration(msg: impl Into<String>) -> Self {
        ReleaseError::Configuration(msg.into())
    }

    /// Create a convention (preset) error with context
    pub fn convention(msg: impl Into<String>) -> Self {
        ReleaseError::Convention(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ReleaseError::Tag(msg.into())
    }
}
