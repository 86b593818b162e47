use crate::error::{ReleaseError, Result};
use crate::git::{CommitInfo, Repository};
use git2::Oid;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A tag write observed by [MockRepository]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagEvent {
    Created(String),
    Deleted(String),
}

#[derive(Default)]
struct TagState {
    tags: BTreeMap<String, Oid>,
    events: Vec<TagEvent>,
}

/// Mock repository for testing without actual git operations
///
/// History is linear: commits are appended oldest first and HEAD is the last
/// one added.
#[derive(Default)]
pub struct MockRepository {
    history: Vec<(Oid, CommitInfo)>,
    remotes: HashMap<String, String>,
    fail_tag_deletion: bool,
    state: Mutex<TagState>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a commit on top of HEAD and return its OID
    pub fn add_commit(&mut self, message: impl Into<String>) -> Result<Oid> {
        let mut bytes = [0u8; 20];
        let sequence = self.history.len() as u32 + 1;
        bytes[16..].copy_from_slice(&sequence.to_be_bytes());
        let oid = Oid::from_bytes(&bytes)?;

        self.history.push((
            oid,
            CommitInfo {
                hash: oid.to_string(),
                message: message.into(),
                author: "Mock Author".to_string(),
            },
        ));
        Ok(oid)
    }

    /// Add a tag pointing to an OID without recording a tag event
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        let state = self
            .state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        state.tags.insert(name.into(), oid);
    }

    /// Configure a remote URL
    pub fn set_remote(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.remotes.insert(name.into(), url.into());
    }

    /// Make every `delete_tag` call fail
    pub fn fail_tag_deletion(&mut self) {
        self.fail_tag_deletion = true;
    }

    /// Tag creations and deletions performed through the trait, in order
    pub fn tag_events(&self) -> Vec<TagEvent> {
        self.lock().events.clone()
    }

    fn lock(&self) -> MutexGuard<'_, TagState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn position(&self, oid: Oid) -> Option<usize> {
        self.history.iter().position(|(candidate, _)| *candidate == oid)
    }
}

impl Repository for MockRepository {
    fn head_oid(&self) -> Result<Oid> {
        self.history
            .last()
            .map(|(oid, _)| *oid)
            .ok_or_else(|| ReleaseError::tag("Mock repository has no commits"))
    }

    fn reachable_tags(&self) -> Result<Vec<String>> {
        Ok(self
            .lock()
            .tags
            .iter()
            .filter(|(_, oid)| self.position(**oid).is_some())
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.lock().tags.keys().cloned().collect())
    }

    fn commits_since(&self, since_tag: Option<&str>) -> Result<Vec<CommitInfo>> {
        let start = match since_tag {
            None => 0,
            Some(tag) => {
                let oid = self
                    .lock()
                    .tags
                    .get(tag)
                    .copied()
                    .ok_or_else(|| ReleaseError::tag(format!("Tag '{}' not found", tag)))?;
                self.position(oid)
                    .map(|idx| idx + 1)
                    .ok_or_else(|| ReleaseError::tag(format!("Tag '{}' is not on HEAD", tag)))?
            }
        };

        Ok(self.history[start..]
            .iter()
            .map(|(_, info)| info.clone())
            .collect())
    }

    fn create_tag(&self, name: &str, oid: Oid) -> Result<()> {
        let mut state = self.lock();
        if state.tags.contains_key(name) {
            return Err(ReleaseError::tag(format!("Tag '{}' already exists", name)));
        }
        state.tags.insert(name.to_string(), oid);
        state.events.push(TagEvent::Created(name.to_string()));
        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        if self.fail_tag_deletion {
            return Err(ReleaseError::tag(format!("Cannot delete tag '{}'", name)));
        }
        let mut state = self.lock();
        if state.tags.remove(name).is_some() {
            state.events.push(TagEvent::Deleted(name.to_string()));
        }
        Ok(())
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        Ok(self.remotes.get(remote).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_history() {
        let mut repo = MockRepository::new();
        let first = repo.add_commit("chore: init").unwrap();
        let second = repo.add_commit("feat: thing").unwrap();
        repo.add_tag("1.0.0", first);

        assert_eq!(repo.head_oid().unwrap(), second);
        let commits = repo.commits_since(Some("1.0.0")).unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].message, "feat: thing");
        assert_eq!(repo.commits_since(None).unwrap().len(), 2);
    }

    #[test]
    fn test_mock_repository_tags() {
        let mut repo = MockRepository::new();
        let oid = repo.add_commit("fix: x").unwrap();

        repo.create_tag("1.0.0", oid).unwrap();
        assert!(repo.create_tag("1.0.0", oid).is_err());
        repo.delete_tag("1.0.0").unwrap();
        repo.delete_tag("1.0.0").unwrap();

        assert!(repo.list_tags().unwrap().is_empty());
        assert_eq!(
            repo.tag_events(),
            vec![
                TagEvent::Created("1.0.0".to_string()),
                TagEvent::Deleted("1.0.0".to_string())
            ]
        );
    }

    #[test]
    fn test_mock_repository_unreachable_tag() {
        let mut repo = MockRepository::new();
        repo.add_commit("fix: x").unwrap();
        repo.add_tag("0.9.0", Oid::zero());

        assert!(repo.reachable_tags().unwrap().is_empty());
        assert_eq!(repo.list_tags().unwrap().len(), 1);
    }

    #[test]
    fn test_mock_repository_default() {
        let repo = MockRepository::default();
        assert!(repo.list_tags().unwrap().is_empty());
        assert!(repo.head_oid().is_err());
        assert_eq!(repo.remote_url("origin").unwrap(), None);
    }
}
