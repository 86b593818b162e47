//! Pure formatting functions for UI output.
//!
//! `format_*` functions build the text; `display_*` functions print it.
//! Colors come from `console` and switch off automatically when the output is
//! not a terminal.

use crate::domain::Commit;
use crate::release::{NoReleaseReason, ReleasePlan};
use console::style;

const MAX_LISTED_COMMITS: usize = 10;
const MAX_SUBJECT_WIDTH: usize = 60;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// One line per commit, at most ten, with subjects cut to sixty characters
pub fn format_commit_list(commits: &[Commit]) -> Vec<String> {
    let mut lines: Vec<String> = commits
        .iter()
        .take(MAX_LISTED_COMMITS)
        .enumerate()
        .map(|(i, commit)| {
            let subject: String = commit.subject.chars().take(MAX_SUBJECT_WIDTH).collect();
            let short_hash: String = commit.hash.chars().take(7).collect();
            format!("  {}. {} {}: {}", i + 1, short_hash, commit.commit_type, subject)
        })
        .collect();

    if commits.len() > MAX_LISTED_COMMITS {
        lines.push(format!(
            "  ... and {} more commits",
            commits.len() - MAX_LISTED_COMMITS
        ));
    }
    lines
}

/// "From -> To" summary of a plan; the first release only names the new tag
pub fn format_tag_change(plan: &ReleasePlan) -> String {
    match &plan.previous {
        Some(previous) => format!(
            "{} {} {} ({} bump, {} preset)",
            style(previous).red(),
            style("->").dim(),
            style(&plan.tag).green(),
            plan.level,
            plan.preset
        ),
        None => format!(
            "Initial release {} ({} preset)",
            style(&plan.tag).green(),
            plan.preset
        ),
    }
}

/// Display what a release plan contains
pub fn display_release_plan(plan: &ReleasePlan) {
    println!("\n{}", style("Release plan:").bold());
    println!("  {}", format_tag_change(plan));
    println!(
        "{}",
        style(format!("  {} commit(s):", plan.commits.len())).underlined()
    );
    for line in format_commit_list(&plan.commits) {
        println!("{}", line);
    }
}

/// Display why nothing was released
pub fn display_no_release(reason: &NoReleaseReason) {
    display_status(&format!("{}; nothing to release", reason));
}
