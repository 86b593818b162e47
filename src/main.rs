use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use gitlab_release::config::{self, Overrides, ReleaseOptions};
use gitlab_release::git::Git2Repository;
use gitlab_release::hosting::GitLabClient;
use gitlab_release::logging::{self, LogFormat, LogLevel};
use gitlab_release::release::{Orchestrator, ReleaseOutcome};
use gitlab_release::ui;

#[derive(clap::Parser)]
#[command(
    name = "gitlab-release",
    version,
    about = "Version, tag and announce GitLab releases from conventional commits"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Commit convention (angular, atom, ember, eslint, jquery, jshint)")]
    preset: Option<String>,

    #[arg(long, env = "GITLAB_AUTH_TOKEN", hide_env_values = true, help = "GitLab access token")]
    token: Option<String>,

    #[arg(long, help = "Compute the release without publishing anything")]
    dry_run: bool,

    #[arg(long, help = "Do not comment on referenced issues")]
    skip_notifications: bool,

    #[arg(long, env = "GITLAB_INSECURE_API", help = "Talk to the API over plain http")]
    insecure_api: bool,

    #[arg(long, help = "Package name for namespaced name@version tags")]
    package: Option<String>,

    #[arg(long, help = "Project URL, instead of reading it from the git remote")]
    repository: Option<String>,

    #[arg(long, help = "Git remote that names the project [default: origin]")]
    remote: Option<String>,

    #[arg(long, value_enum, default_value_t = LogLevel::Warn, help = "Diagnostic log level")]
    log_level: LogLevel,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact, help = "Diagnostic log format")]
    log_format: LogFormat,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            preset: self.preset.clone(),
            token: self.token.clone(),
            dry_run: self.dry_run,
            skip_notifications: self.skip_notifications,
            insecure_api: self.insecure_api,
            package: self.package.clone(),
            repository_url: self.repository.clone(),
            remote: self.remote.clone(),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init(args.log_level, args.log_format) {
        ui::display_error(&e.to_string());
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(outcome) => {
            ui::display_outcome(&outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ReleaseOutcome> {
    let file_config =
        config::load_config(args.config.as_deref()).context("Error loading config")?;
    let options = ReleaseOptions::merge(file_config, args.overrides());

    let repo = Git2Repository::open(".").context("Git repository error")?;
    let api = GitLabClient::new()?;

    let outcome = Orchestrator::new(&repo, &api).run(&options)?;
    Ok(outcome)
}
