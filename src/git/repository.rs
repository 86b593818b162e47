use crate::error::{ReleaseError, Result};
use crate::git::CommitInfo;
use git2::{ErrorCode, Oid, Repository as Git2Repo};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Mutex<Git2Repo>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo: Mutex::new(repo),
        }
    }

    fn with_repo<T>(&self, f: impl FnOnce(&Git2Repo) -> Result<T>) -> Result<T> {
        let repo = self
            .repo
            .lock()
            .map_err(|_| ReleaseError::tag("Repository handle was poisoned"))?;
        f(&repo)
    }
}

fn head_commit_oid(repo: &Git2Repo) -> Result<Oid> {
    let head = repo.head()?;
    let commit = head.peel_to_commit()?;
    Ok(commit.id())
}

fn tag_target(repo: &Git2Repo, tag_name: &str) -> Result<Option<Oid>> {
    match repo.find_reference(&format!("refs/tags/{}", tag_name)) {
        Ok(reference) => {
            let commit = reference.peel_to_commit().map_err(|e| {
                ReleaseError::tag(format!("Cannot peel tag '{}': {}", tag_name, e))
            })?;
            Ok(Some(commit.id()))
        }
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(ReleaseError::tag(format!(
            "Cannot find tag '{}': {}",
            tag_name, e
        ))),
    }
}

impl super::Repository for Git2Repository {
    fn head_oid(&self) -> Result<Oid> {
        self.with_repo(head_commit_oid)
    }

    fn reachable_tags(&self) -> Result<Vec<String>> {
        self.with_repo(|repo| {
            let mut revwalk = repo.revwalk()?;
            revwalk.push(head_commit_oid(repo)?)?;
            let reachable: HashSet<Oid> = revwalk.collect::<std::result::Result<_, _>>()?;

            let mut tags = Vec::new();
            for name in repo.tag_names(None)?.iter().flatten() {
                // Tags on trees or blobs cannot be release tags
                let target = match tag_target(repo, name) {
                    Ok(target) => target,
                    Err(e) => {
                        debug!(tag = name, error = %e, "skipping tag without a commit target");
                        continue;
                    }
                };
                if target.is_some_and(|oid| reachable.contains(&oid)) {
                    tags.push(name.to_string());
                }
            }
            Ok(tags)
        })
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        self.with_repo(|repo| {
            let tags = repo.tag_names(None)?;
            let mut names: Vec<String> = tags.iter().flatten().map(|s| s.to_string()).collect();
            names.sort();
            Ok(names)
        })
    }

    fn commits_since(&self, since_tag: Option<&str>) -> Result<Vec<CommitInfo>> {
        self.with_repo(|repo| {
            let mut revwalk = repo.revwalk()?;
            revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::REVERSE)?;
            revwalk.push(head_commit_oid(repo)?)?;

            if let Some(tag) = since_tag {
                let boundary = tag_target(repo, tag)?.ok_or_else(|| {
                    ReleaseError::tag(format!("Tag '{}' not found in repository", tag))
                })?;
                revwalk.hide(boundary)?;
            }

            let mut commits = Vec::new();
            for oid in revwalk {
                let commit = repo.find_commit(oid?)?;

                let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
                let author = commit.author().name().unwrap_or("unknown").to_string();

                commits.push(CommitInfo {
                    hash: commit.id().to_string(),
                    message,
                    author,
                });
            }
            Ok(commits)
        })
    }

    fn create_tag(&self, name: &str, oid: Oid) -> Result<()> {
        self.with_repo(|repo| {
            let object = repo
                .find_object(oid, None)
                .map_err(|e| ReleaseError::tag(format!("Cannot find object: {}", e)))?;

            repo.tag_lightweight(name, &object, false)
                .map_err(|e| ReleaseError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

            Ok(())
        })
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.with_repo(|repo| match repo.tag_delete(name) {
            Ok(()) => Ok(()),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(()),
            Err(e) => Err(ReleaseError::tag(format!(
                "Cannot delete tag '{}': {}",
                name, e
            ))),
        })
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        self.with_repo(|repo| match repo.find_remote(remote) {
            Ok(found) => Ok(found.url().map(str::to_string)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        })
    }
}
