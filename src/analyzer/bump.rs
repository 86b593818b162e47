use crate::domain::{BumpLevel, Commit, Preset};
use crate::error::Result;

/// Recommends how far to move the version for a batch of commits
pub trait BumpRecommender: Send + Sync {
    /// Returns `None` when none of the commits warrants a release
    fn recommend(&self, preset: Preset, commits: &[Commit]) -> Result<Option<BumpLevel>>;
}

/// Bump rules keyed on each preset's commit types.
///
/// Breaking commits always ask for a major bump. Types with no release
/// meaning (docs, chores, tests and the like) contribute nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct PresetRecommender;

impl PresetRecommender {
    fn level_for(preset: Preset, commit: &Commit) -> Option<BumpLevel> {
        if commit.breaking_change {
            return Some(BumpLevel::Major);
        }

        let commit_type = commit.commit_type.as_str();
        match preset {
            Preset::Angular => match commit_type {
                "feat" => Some(BumpLevel::Minor),
                "fix" | "perf" | "revert" => Some(BumpLevel::Patch),
                _ => None,
            },
            Preset::Atom => match commit_type {
                ":sparkles:" | ":tada:" | ":new:" => Some(BumpLevel::Minor),
                ":bug:" | ":racehorse:" | ":lock:" | ":penguin:" | ":apple:"
                | ":checkered_flag:" | ":fire:" => Some(BumpLevel::Patch),
                _ => None,
            },
            Preset::Ember => match commit_type {
                "feature" => Some(BumpLevel::Minor),
                "bugfix" | "security" => Some(BumpLevel::Patch),
                _ => None,
            },
            Preset::Eslint => match commit_type {
                "new" => Some(BumpLevel::Minor),
                "fix" | "update" | "upgrade" => Some(BumpLevel::Patch),
                _ => None,
            },
            // jQuery headers carry a component, not a type: any conforming commit is a patch
            Preset::Jquery => commit.scope.as_ref().map(|_| BumpLevel::Patch),
            Preset::Jshint => match commit_type {
                "feat" => Some(BumpLevel::Minor),
                "fix" => Some(BumpLevel::Patch),
                _ => None,
            },
        }
    }
}

impl BumpRecommender for PresetRecommender {
    fn recommend(&self, preset: Preset, commits: &[Commit]) -> Result<Option<BumpLevel>> {
        Ok(commits
            .iter()
            .filter_map(|commit| Self::level_for(preset, commit))
            .max())
    }
}
