//! User-facing output.
//!
//! The release runs unattended, so there are no prompts; this module only
//! reports results. Diagnostics go through `tracing` instead (see
//! [crate::logging]).

pub mod formatter;

pub use formatter::{
    display_error, display_no_release, display_release_plan, display_status, display_success,
};

use crate::release::ReleaseOutcome;

/// Print the summary of a finished release attempt
pub fn display_outcome(outcome: &ReleaseOutcome) {
    match outcome {
        ReleaseOutcome::NoRelease(reason) => display_no_release(reason),
        ReleaseOutcome::DryRun(plan) => {
            display_release_plan(plan);
            display_status(&format!(
                "Dry run: tag {} was not published and no issues were notified",
                plan.tag
            ));
        }
        ReleaseOutcome::Released(plan) => {
            display_release_plan(plan);
            display_success(&format!("Released version {}", plan.version()));
        }
    }
}
