// tests/pipeline_test.rs
//
// Drives the orchestrator against real git repositories in temporary
// directories, with the hosting service replaced by MockHostingApi.

use git2::{Oid, Repository, Signature};
use gitlab_release::config::ReleaseOptions;
use gitlab_release::git::{Git2Repository, Repository as _};
use gitlab_release::hosting::mock::ApiCall;
use gitlab_release::hosting::MockHostingApi;
use gitlab_release::release::{NoReleaseReason, Orchestrator, ReleaseOutcome};
use gitlab_release::ReleaseError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct TestRepo {
    dir: TempDir,
    repo: Repository,
    counter: usize,
}

impl TestRepo {
    fn new() -> Self {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");
        {
            let mut config = repo.config().expect("Could not get config");
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }
        TestRepo {
            dir,
            repo,
            counter: 0,
        }
    }

    fn commit(&mut self, message: &str) -> Oid {
        self.counter += 1;
        let path = self.dir.path().join("CHANGELOG.md");
        fs::write(&path, format!("change {}\n", self.counter)).unwrap();

        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new("CHANGELOG.md")).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let sig = Signature::now("Test User", "test@example.com").unwrap();

        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    fn tag(&self, name: &str, oid: Oid) {
        let object = self.repo.find_object(oid, None).unwrap();
        self.repo.tag_lightweight(name, &object, false).unwrap();
    }

    fn open(&self) -> Git2Repository {
        Git2Repository::open(self.dir.path()).unwrap()
    }

    fn tag_names(&self) -> Vec<String> {
        let names = self.repo.tag_names(None).unwrap();
        let mut names: Vec<String> = names.iter().flatten().map(str::to_string).collect();
        names.sort();
        names
    }
}

fn options() -> ReleaseOptions {
    ReleaseOptions {
        token: Some("glpat-test".to_string()),
        repository_url: Some("https://gitlab.com/user/project.git".to_string()),
        ..ReleaseOptions::default()
    }
}

#[test]
fn test_first_release_is_one_zero_zero() {
    let mut test_repo = TestRepo::new();
    test_repo.commit("fix: initial bug fix");
    let repo = test_repo.open();
    let api = MockHostingApi::new();

    let outcome = Orchestrator::new(&repo, &api).run(&options()).unwrap();

    assert_eq!(outcome.version().as_deref(), Some("1.0.0"));
    assert_eq!(test_repo.tag_names(), vec!["1.0.0".to_string()]);
    assert_eq!(api.created_tags(), vec!["1.0.0".to_string()]);

    match &api.calls()[0] {
        ApiCall::CreateTag { tag, .. } => {
            assert_eq!(tag.message, "Release 1.0.0");
            assert_eq!(tag.reference, repo.head_oid().unwrap().to_string());
        }
        other => panic!("unexpected call: {:?}", other),
    }
}

#[test]
fn test_rerun_without_new_commits_is_noop() {
    let mut test_repo = TestRepo::new();
    test_repo.commit("feat: first feature");
    let repo = test_repo.open();
    let api = MockHostingApi::new();
    let orchestrator = Orchestrator::new(&repo, &api);

    let first = orchestrator.run(&options()).unwrap();
    assert_eq!(first.version().as_deref(), Some("1.0.0"));
    let calls_after_first = api.calls().len();

    let second = orchestrator.run(&options()).unwrap();
    assert_eq!(
        second,
        ReleaseOutcome::NoRelease(NoReleaseReason::NoNewCommits {
            latest_tag: Some("1.0.0".to_string())
        })
    );
    assert_eq!(second.version(), None);
    assert_eq!(api.calls().len(), calls_after_first);
    assert_eq!(test_repo.tag_names(), vec!["1.0.0".to_string()]);
}

#[test]
fn test_version_increment_from_existing_tag() {
    let cases = [
        ("fix: patch level", "1.0.2"),
        ("feat: minor level", "1.1.0"),
        ("feat: major level\n\nBREAKING CHANGE: config format changed", "2.0.0"),
    ];

    for (message, expected) in cases {
        let mut test_repo = TestRepo::new();
        let base = test_repo.commit("fix: base");
        test_repo.tag("1.0.1", base);
        test_repo.commit(message);
        let repo = test_repo.open();
        let api = MockHostingApi::new();

        let outcome = Orchestrator::new(&repo, &api).run(&options()).unwrap();
        assert_eq!(outcome.version().as_deref(), Some(expected), "for '{}'", message);
    }
}

#[test]
fn test_remote_failure_rolls_back_local_tag() {
    let mut test_repo = TestRepo::new();
    test_repo.commit("feat: something");
    let repo = test_repo.open();
    let api = MockHostingApi::new().fail_tag_creation(401, "401 Unauthorized");

    let err = Orchestrator::new(&repo, &api).run(&options()).unwrap_err();

    match err {
        ReleaseError::ReleaseApi { status, message } => {
            assert_eq!(status, Some(401));
            assert_eq!(message, "401 Unauthorized");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(test_repo.tag_names().is_empty());
    assert!(api.noted_issues().is_empty());
}

#[test]
fn test_dry_run_has_no_side_effects() {
    let mut test_repo = TestRepo::new();
    let base = test_repo.commit("feat: base");
    test_repo.tag("2.0.0", base);
    test_repo.commit("feat: new thing (#12)");
    let repo = test_repo.open();
    let api = MockHostingApi::new();
    let options = ReleaseOptions {
        dry_run: true,
        token: None,
        ..options()
    };

    let outcome = Orchestrator::new(&repo, &api).run(&options).unwrap();

    match &outcome {
        ReleaseOutcome::DryRun(plan) => assert_eq!(plan.version(), "2.1.0"),
        other => panic!("expected a dry run, got {:?}", other),
    }
    assert_eq!(outcome.version(), None);
    assert!(api.calls().is_empty());
    assert_eq!(test_repo.tag_names(), vec!["2.0.0".to_string()]);
}

#[test]
fn test_each_issue_notified_once() {
    let mut test_repo = TestRepo::new();
    test_repo.commit("fix: first (#7)");
    test_repo.commit("fix: second, closes #3");
    test_repo.commit("feat: third\n\nRelated to #7 and #3");
    let repo = test_repo.open();
    let api = MockHostingApi::new();

    Orchestrator::new(&repo, &api).run(&options()).unwrap();

    assert_eq!(api.noted_issues(), vec![3, 7]);
    let bodies: Vec<String> = api
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            ApiCall::IssueNote { body, .. } => Some(body),
            ApiCall::CreateTag { .. } => None,
        })
        .collect();
    assert!(bodies.iter().all(|body| body
        == "Version [1.0.0](https://gitlab.com/user/project/tags/1.0.0) has been released."));
}

#[test]
fn test_notification_failure_stops_and_rolls_back() {
    let mut test_repo = TestRepo::new();
    test_repo.commit("fix: a #1");
    test_repo.commit("fix: b #2");
    test_repo.commit("fix: c #3");
    let repo = test_repo.open();
    let api = MockHostingApi::new().fail_issue(2, 403, "403 Forbidden");

    let err = Orchestrator::new(&repo, &api).run(&options()).unwrap_err();

    match err {
        ReleaseError::Notification { issue, status, .. } => {
            assert_eq!(issue, 2);
            assert_eq!(status, Some(403));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(api.noted_issues(), vec![1, 2]);
    assert!(test_repo.tag_names().is_empty());
}

#[test]
fn test_missing_token_fails_before_tagging() {
    let mut test_repo = TestRepo::new();
    test_repo.commit("feat: something");
    let repo = test_repo.open();
    let api = MockHostingApi::new();
    let options = ReleaseOptions {
        token: None,
        ..options()
    };

    let err = Orchestrator::new(&repo, &api).run(&options).unwrap_err();

    assert!(matches!(err, ReleaseError::Configuration(_)));
    assert!(test_repo.tag_names().is_empty());
    assert!(api.calls().is_empty());
}

#[test]
fn test_non_release_commits_do_nothing() {
    let mut test_repo = TestRepo::new();
    let base = test_repo.commit("feat: base");
    test_repo.tag("1.0.0", base);
    test_repo.commit("docs: update readme");
    test_repo.commit("chore: bump dependencies");
    let repo = test_repo.open();
    let api = MockHostingApi::new();

    let outcome = Orchestrator::new(&repo, &api).run(&options()).unwrap();

    assert!(matches!(
        outcome,
        ReleaseOutcome::NoRelease(NoReleaseReason::NoReleasableCommits { commits: 2, .. })
    ));
    assert!(api.calls().is_empty());
    assert_eq!(test_repo.tag_names(), vec!["1.0.0".to_string()]);
}

#[test]
fn test_repository_read_from_git_remote() {
    let mut test_repo = TestRepo::new();
    test_repo.commit("fix: something");
    test_repo
        .repo
        .remote("origin", "git@gitlab.example.com:group/sub/app.git")
        .unwrap();
    let repo = test_repo.open();
    let api = MockHostingApi::new();
    let options = ReleaseOptions {
        repository_url: None,
        ..options()
    };

    Orchestrator::new(&repo, &api).run(&options).unwrap();

    match &api.calls()[0] {
        ApiCall::CreateTag { target, .. } => {
            assert_eq!(target.project, "group/sub/app");
            assert_eq!(
                target.project_url(&["repository", "tags"]).unwrap().as_str(),
                "https://gitlab.example.com/api/v4/projects/group%2Fsub%2Fapp/repository/tags"
            );
        }
        other => panic!("unexpected call: {:?}", other),
    }
}

#[test]
fn test_detected_preset_drives_bump() {
    let mut test_repo = TestRepo::new();
    let base = test_repo.commit("Fix: base");
    test_repo.tag("3.2.1", base);
    test_repo.commit("New: add rule");
    test_repo.commit("Update: tweak docs");
    let repo = test_repo.open();
    let api = MockHostingApi::new();

    let outcome = Orchestrator::new(&repo, &api).run(&options()).unwrap();

    match outcome {
        ReleaseOutcome::Released(plan) => {
            assert_eq!(plan.preset.name(), "eslint");
            assert_eq!(plan.version(), "3.3.0");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}
