use crate::analyzer::{BumpRecommender, ConventionDetector, HeaderDetector, PresetRecommender};
use crate::domain::version::initial_version;
use crate::domain::{BumpLevel, Commit, Preset, ReleaseTag};
use crate::error::Result;
use crate::git::CommitInfo;
use crate::release::NoReleaseReason;
use tracing::{debug, info};

/// Everything decided about a release before any side effect happens
#[derive(Debug, Clone, PartialEq)]
pub struct ReleasePlan {
    pub tag: ReleaseTag,
    pub previous: Option<ReleaseTag>,
    pub preset: Preset,
    /// Level recommended by the commits; not applied to a first release
    pub level: BumpLevel,
    pub commits: Vec<Commit>,
}

impl ReleasePlan {
    /// Version string of the new release, without any package prefix
    pub fn version(&self) -> String {
        self.tag.version.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    NoRelease(NoReleaseReason),
    Release(ReleasePlan),
}

/// Decides whether new commits warrant a release and computes its version
pub struct VersionResolver {
    detector: Box<dyn ConventionDetector>,
    recommender: Box<dyn BumpRecommender>,
}

impl Default for VersionResolver {
    fn default() -> Self {
        VersionResolver::new(HeaderDetector, PresetRecommender)
    }
}

impl VersionResolver {
    pub fn new(
        detector: impl ConventionDetector + 'static,
        recommender: impl BumpRecommender + 'static,
    ) -> Self {
        VersionResolver {
            detector: Box::new(detector),
            recommender: Box::new(recommender),
        }
    }

    /// Resolve the next release from the commits made after `latest`.
    ///
    /// `package` namespaces the new tag; when it is `None` the previous
    /// tag's package is kept.
    pub fn resolve(
        &self,
        latest: Option<&ReleaseTag>,
        raw_commits: &[CommitInfo],
        preset_override: Option<&str>,
        package: Option<&str>,
    ) -> Result<Resolution> {
        if raw_commits.is_empty() {
            return Ok(Resolution::NoRelease(NoReleaseReason::NoNewCommits {
                latest_tag: latest.map(ReleaseTag::name),
            }));
        }

        let preset = match preset_override {
            Some(name) => name.parse::<Preset>()?,
            None => {
                let messages: Vec<String> =
                    raw_commits.iter().map(|c| c.message.clone()).collect();
                match self.detector.detect(&messages)? {
                    Some(preset) => preset,
                    None => {
                        debug!("no known convention detected, falling back to angular");
                        Preset::default()
                    }
                }
            }
        };

        let commits: Vec<Commit> = raw_commits
            .iter()
            .map(|raw| Commit::parse(raw.hash.clone(), &raw.message, preset))
            .collect();

        let level = match self.recommender.recommend(preset, &commits)? {
            Some(level) => level,
            None => {
                return Ok(Resolution::NoRelease(NoReleaseReason::NoReleasableCommits {
                    preset,
                    commits: commits.len(),
                }))
            }
        };

        let version = match latest {
            Some(previous) => level.apply(&previous.version)?,
            None => initial_version(),
        };
        let package = package
            .map(str::to_string)
            .or_else(|| latest.and_then(|tag| tag.package.clone()));
        let tag = ReleaseTag::new(package, version);

        let previous = latest.map_or_else(|| "none".to_string(), ReleaseTag::name);
        info!(
            %preset,
            %level,
            %previous,
            next = %tag,
            commits = commits.len(),
            "resolved next release"
        );

        Ok(Resolution::Release(ReleasePlan {
            tag,
            previous: latest.cloned(),
            preset,
            level,
            commits,
        }))
    }
}
