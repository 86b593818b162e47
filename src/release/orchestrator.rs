//! Release workflow orchestration
//!
//! [Orchestrator::run] drives one release attempt from the commit history to
//! the issue notes:
//!
//! 1. Resolve the hosting project from configuration or the git remote
//! 2. Find the latest release tag on HEAD and the commits made since
//! 3. Decide whether to release and at which version
//! 4. Check for a token (skipped on dry run)
//! 5. Tag HEAD locally
//! 6. Create the tag on the hosting service
//! 7. Comment on referenced issues
//!
//! A failure after step 5 removes the local tag again before the error is
//! returned. A dry run always removes it.

use crate::config::ReleaseOptions;
use crate::domain::tag::latest_release_tag;
use crate::domain::RepositoryDescriptor;
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::hosting::HostingApi;
use crate::release::notifier::NotifyRequest;
use crate::release::releaser::ReleaseRequest;
use crate::release::{
    require_token, IssueNotifier, NoReleaseReason, ReleasePlan, ReleaseTagger, RemoteReleaser,
    Resolution, VersionResolver,
};
use git2::Oid;
use tracing::info;

/// How a release attempt ended
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseOutcome {
    /// Nothing to release; no side effects happened
    NoRelease(NoReleaseReason),
    /// Everything was computed, nothing was published
    DryRun(ReleasePlan),
    Released(ReleasePlan),
}

impl ReleaseOutcome {
    /// The published version, only when a release actually happened
    pub fn version(&self) -> Option<String> {
        match self {
            ReleaseOutcome::Released(plan) => Some(plan.version()),
            ReleaseOutcome::NoRelease(_) | ReleaseOutcome::DryRun(_) => None,
        }
    }

    pub fn plan(&self) -> Option<&ReleasePlan> {
        match self {
            ReleaseOutcome::DryRun(plan) | ReleaseOutcome::Released(plan) => Some(plan),
            ReleaseOutcome::NoRelease(_) => None,
        }
    }
}

pub struct Orchestrator<'a, R: Repository + ?Sized, H: HostingApi + ?Sized> {
    repo: &'a R,
    api: &'a H,
    resolver: VersionResolver,
}

impl<'a, R: Repository + ?Sized, H: HostingApi + ?Sized> Orchestrator<'a, R, H> {
    pub fn new(repo: &'a R, api: &'a H) -> Self {
        Self::with_resolver(repo, api, VersionResolver::default())
    }

    pub fn with_resolver(repo: &'a R, api: &'a H, resolver: VersionResolver) -> Self {
        Orchestrator {
            repo,
            api,
            resolver,
        }
    }

    /// Run one release attempt
    pub fn run(&self, options: &ReleaseOptions) -> Result<ReleaseOutcome> {
        let repository = self.repository_descriptor(options)?;
        info!(project = %repository, dry_run = options.dry_run, "starting release");

        let tags = self.repo.reachable_tags()?;
        let latest = latest_release_tag(&tags, options.package.as_deref());
        let since = latest.as_ref().map(|(name, _)| name.as_str());
        let commits = self.repo.commits_since(since)?;
        info!(
            latest = since.unwrap_or("none"),
            commits = commits.len(),
            "read history"
        );

        let plan = match self.resolver.resolve(
            latest.as_ref().map(|(_, tag)| tag),
            &commits,
            options.preset.as_deref(),
            options.package.as_deref(),
        )? {
            Resolution::NoRelease(reason) => {
                info!(%reason, "no release");
                return Ok(ReleaseOutcome::NoRelease(reason));
            }
            Resolution::Release(plan) => plan,
        };

        if !options.dry_run {
            require_token(options.token.as_deref())?;
        }

        let target = self.repo.head_oid()?;
        let tagger = ReleaseTagger::new(self.repo);
        tagger.create(&plan.tag, target)?;

        if let Err(e) = self.publish(options, &repository, &plan, target) {
            tagger.remove(&plan.tag);
            return Err(e);
        }

        if options.dry_run {
            tagger.remove(&plan.tag);
            info!(tag = %plan.tag, "dry run complete");
            return Ok(ReleaseOutcome::DryRun(plan));
        }

        info!(tag = %plan.tag, "released");
        Ok(ReleaseOutcome::Released(plan))
    }

    fn publish(
        &self,
        options: &ReleaseOptions,
        repository: &RepositoryDescriptor,
        plan: &ReleasePlan,
        target: Oid,
    ) -> Result<()> {
        RemoteReleaser::new(self.api).release(&ReleaseRequest {
            repository,
            token: options.token.as_deref(),
            tag: &plan.tag,
            target,
            insecure_api: options.insecure_api,
            dry_run: options.dry_run,
        })?;

        if options.skip_notifications {
            info!("skipping issue notifications");
            return Ok(());
        }

        IssueNotifier::new(self.api).notify(&NotifyRequest {
            commits: &plan.commits,
            repository,
            token: options.token.as_deref(),
            tag: &plan.tag,
            insecure_api: options.insecure_api,
            dry_run: options.dry_run,
        })
    }

    fn repository_descriptor(&self, options: &ReleaseOptions) -> Result<RepositoryDescriptor> {
        let url = match &options.repository_url {
            Some(url) => url.clone(),
            None => self.repo.remote_url(&options.remote)?.ok_or_else(|| {
                ReleaseError::configuration(format!(
                    "No repository URL configured and remote '{}' is not defined",
                    options.remote
                ))
            })?,
        };
        RepositoryDescriptor::from_remote_url(&url)
    }
}
