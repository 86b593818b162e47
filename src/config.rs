use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "gitlab-release.toml";

fn default_remote() -> String {
    "origin".to_string()
}

/// Settings read from `gitlab-release.toml`.
///
/// Tokens are never read from files; they come from the command line or
/// the environment.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Commit convention; detected from history when unset
    #[serde(default)]
    pub preset: Option<String>,

    /// Package name for namespaced `name@version` tags
    #[serde(default)]
    pub package: Option<String>,

    /// Project URL on the hosting service; the git remote is used when unset
    #[serde(default)]
    pub repository: Option<String>,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default)]
    pub insecure_api: bool,

    #[serde(default)]
    pub skip_notifications: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        FileConfig {
            preset: None,
            package: None,
            repository: None,
            remote: default_remote(),
            insecure_api: false,
            skip_notifications: false,
        }
    }
}

/// Everything one release attempt needs to know, fixed before the pipeline starts
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOptions {
    pub preset: Option<String>,
    pub token: Option<String>,
    pub dry_run: bool,
    pub skip_notifications: bool,
    pub insecure_api: bool,
    pub package: Option<String>,
    pub repository_url: Option<String>,
    pub remote: String,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        ReleaseOptions::from(FileConfig::default())
    }
}

impl From<FileConfig> for ReleaseOptions {
    fn from(file: FileConfig) -> Self {
        ReleaseOptions {
            preset: file.preset,
            token: None,
            dry_run: false,
            skip_notifications: file.skip_notifications,
            insecure_api: file.insecure_api,
            package: file.package,
            repository_url: file.repository,
            remote: file.remote,
        }
    }
}

/// Values given on the command line (or through their environment fallbacks)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub preset: Option<String>,
    pub token: Option<String>,
    pub dry_run: bool,
    pub skip_notifications: bool,
    pub insecure_api: bool,
    pub package: Option<String>,
    pub repository_url: Option<String>,
    pub remote: Option<String>,
}

impl ReleaseOptions {
    /// Layer command-line values over file settings.
    ///
    /// Flags can only switch behaviour on; a flag left off keeps the file's value.
    /// Blank strings count as absent.
    pub fn merge(file: FileConfig, overrides: Overrides) -> Self {
        let base = ReleaseOptions::from(file);
        ReleaseOptions {
            preset: non_blank(overrides.preset).or(base.preset),
            token: non_blank(overrides.token),
            dry_run: overrides.dry_run,
            skip_notifications: overrides.skip_notifications || base.skip_notifications,
            insecure_api: overrides.insecure_api || base.insecure_api,
            package: non_blank(overrides.package).or(base.package),
            repository_url: non_blank(overrides.repository_url).or(base.repository_url),
            remote: non_blank(overrides.remote).unwrap_or(base.remote),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Where configuration is looked up when no explicit path is given
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".").join(CONFIG_FILE_NAME)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(CONFIG_FILE_NAME));
    }
    paths
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter (must exist)
/// 2. `gitlab-release.toml` in current directory
/// 3. `gitlab-release.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&Path>) -> Result<FileConfig> {
    let path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_paths().into_iter().find(|p| p.exists()),
    };

    match path {
        Some(path) => parse_config_file(&path),
        None => Ok(FileConfig::default()),
    }
}

fn parse_config_file(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        ReleaseError::configuration(format!("Cannot read {}: {}", path.display(), e))
    })?;
    toml::from_str(&content).map_err(|e| {
        ReleaseError::configuration(format!("Invalid config {}: {}", path.display(), e))
    })
}
