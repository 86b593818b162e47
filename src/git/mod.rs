//! Git operations abstraction layer
//!
//! The release pipeline reads history and manages its local tag through the
//! [Repository] trait. Two implementations are provided:
//!
//! - [repository::Git2Repository]: the working copy, via the `git2` crate
//! - [mock::MockRepository]: in-memory history for tests
//!
//! ```rust
//! # use gitlab_release::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> gitlab_release::Result<()> {
//! let head = repo.head_oid()?;
//! let tags = repo.reachable_tags()?;
//! let commits = repo.commits_since(None)?;
//! # let _ = (head, tags, commits);
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;

/// Raw commit as read from history, before classification
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// The commit message
    pub message: String,
    /// The commit author
    pub author: String,
}

/// Repository history reader and tag writer
///
/// All implementors must be `Send + Sync`. Methods map underlying failures
/// (like `git2::Error`) onto [crate::error::ReleaseError].
pub trait Repository: Send + Sync {
    /// OID of the commit HEAD points at
    fn head_oid(&self) -> Result<Oid>;

    /// Names of tags whose target commit is reachable from HEAD
    ///
    /// Both lightweight and annotated tags are reported.
    fn reachable_tags(&self) -> Result<Vec<String>>;

    /// All tag names in the repository, sorted alphabetically
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Commits reachable from HEAD but not from `since_tag`, oldest first
    ///
    /// With `None`, the entire history of HEAD is returned.
    fn commits_since(&self, since_tag: Option<&str>) -> Result<Vec<CommitInfo>>;

    /// Create a lightweight tag pointing at `oid`
    ///
    /// Fails if a tag with that name already exists.
    fn create_tag(&self, name: &str, oid: Oid) -> Result<()>;

    /// Delete a tag; deleting a tag that does not exist succeeds
    fn delete_tag(&self, name: &str) -> Result<()>;

    /// URL configured for a remote, or `None` if the remote is not defined
    fn remote_url(&self, remote: &str) -> Result<Option<String>>;
}
