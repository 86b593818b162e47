use crate::domain::ReleaseTag;
use crate::error::Result;
use crate::git::Repository;
use git2::Oid;
use tracing::{debug, warn};

/// Creates the provisional local release tag and removes it again on rollback
pub struct ReleaseTagger<'a, R: Repository + ?Sized> {
    repo: &'a R,
}

impl<'a, R: Repository + ?Sized> ReleaseTagger<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        ReleaseTagger { repo }
    }

    /// Write a lightweight tag named after `tag` at `target`
    pub fn create(&self, tag: &ReleaseTag, target: Oid) -> Result<()> {
        let name = tag.name();
        self.repo.create_tag(&name, target)?;
        debug!(tag = %name, %target, "created local tag");
        Ok(())
    }

    /// Best-effort removal of the local tag.
    ///
    /// Failures are logged, never returned, so they cannot hide the error
    /// that triggered the rollback.
    pub fn remove(&self, tag: &ReleaseTag) {
        let name = tag.name();
        match self.repo.delete_tag(&name) {
            Ok(()) => debug!(tag = %name, "removed local tag"),
            Err(e) => warn!(tag = %name, error = %e, "failed to remove local tag"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::TagEvent;
    use crate::git::MockRepository;

    #[test]
    fn test_create_then_remove() {
        let mut repo = MockRepository::new();
        let head = repo.add_commit("fix: x").unwrap();
        let tag = ReleaseTag::parse("1.0.1").unwrap();

        let tagger = ReleaseTagger::new(&repo);
        tagger.create(&tag, head).unwrap();
        assert_eq!(repo.list_tags().unwrap(), vec!["1.0.1".to_string()]);

        tagger.remove(&tag);
        assert!(repo.list_tags().unwrap().is_empty());
    }

    #[test]
    fn test_create_existing_tag_fails() {
        let mut repo = MockRepository::new();
        let head = repo.add_commit("fix: x").unwrap();
        repo.add_tag("1.0.1", head);

        let tagger = ReleaseTagger::new(&repo);
        assert!(tagger
            .create(&ReleaseTag::parse("1.0.1").unwrap(), head)
            .is_err());
    }

    #[test]
    fn test_remove_absent_tag_is_silent() {
        let repo = MockRepository::new();
        ReleaseTagger::new(&repo).remove(&ReleaseTag::parse("3.0.0").unwrap());
        assert!(repo.tag_events().is_empty());
    }

    #[test]
    fn test_remove_failure_is_swallowed() {
        let mut repo = MockRepository::new();
        let head = repo.add_commit("fix: x").unwrap();
        repo.fail_tag_deletion();
        let tag = ReleaseTag::parse("1.0.0").unwrap();

        let tagger = ReleaseTagger::new(&repo);
        tagger.create(&tag, head).unwrap();
        tagger.remove(&tag);

        assert_eq!(repo.tag_events(), vec![TagEvent::Created("1.0.0".to_string())]);
    }
}
