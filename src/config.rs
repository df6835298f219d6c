use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;

/// Plugin configuration, read from a JSON file in the web app's repository.
///
/// Keys are camelCase because the file lives next to the bundler config and
/// is usually maintained by the same people.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Auth token. Falls back to the SENTRY_AUTH_TOKEN environment variable.
    pub auth_token: Option<String>,
    pub org: Option<String>,
    pub project: Option<String>,
    /// Sentry server URL, for self-hosted instances.
    pub url: Option<String>,
    /// Version control remote name used for commit association.
    pub vcs_remote: Option<String>,
    /// Path to a sentry-cli properties file.
    pub config_file: Option<PathBuf>,
    /// Explicit release identifier. Negotiated with the server when absent.
    pub release: Option<String>,
    /// Log intended actions instead of performing them.
    #[serde(default)]
    pub dry_run: bool,
    /// Run the lifecycle even for non-production builds.
    #[serde(default)]
    pub skip_environment_check: bool,
    pub source_maps: SourceMapsConfig,
    /// Delete artifacts uploaded for this release by previous runs.
    #[serde(default)]
    pub clean_artifacts: bool,
    pub set_commits: Option<SetCommitsConfig>,
    /// Mark the release as closed after uploading.
    #[serde(default)]
    pub finalize: bool,
    pub deploy: Option<DeployConfig>,
    /// Suppress live sentry-cli output.
    #[serde(default)]
    pub silent: bool,
}

/// Where generated sourcemaps live and how they are tagged on upload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SourceMapsConfig {
    /// Directories to scan for generated sourcemaps.
    pub include: Vec<PathBuf>,
    /// Glob patterns excluded from the upload.
    #[serde(default)]
    pub ignore: Vec<String>,
    /// Prefix prepended to artifact URLs, e.g. "~/assets".
    pub url_prefix: Option<String>,
    /// Distribution tag attached to uploaded artifacts.
    pub dist: Option<String>,
}

/// Commit association settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SetCommitsConfig {
    /// Let the server determine commits from the repository remote.
    #[serde(default)]
    pub auto: bool,
    pub repo: Option<String>,
    pub commit: Option<String>,
}

impl SetCommitsConfig {
    /// Whether there is enough information to associate commits at all.
    /// Explicit association needs both a repo and a commit.
    pub fn applies(&self) -> bool {
        self.auto || (self.repo.is_some() && self.commit.is_some())
    }
}

/// Deploy registration settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeployConfig {
    /// Environment name. Registration is skipped when empty.
    pub env: String,
    pub name: Option<String>,
    pub url: Option<String>,
}

impl Config {
    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        if config.auth_token.is_none() {
            config.auth_token = std::env::var("SENTRY_AUTH_TOKEN").ok();
        }

        Ok(config)
    }

    /// Default config for tests
    pub fn default_for_tests() -> Self {
        Self {
            auth_token: Some("token".to_string()),
            org: Some("acme".to_string()),
            project: Some("frontend".to_string()),
            url: None,
            vcs_remote: None,
            config_file: None,
            release: None,
            dry_run: false,
            skip_environment_check: false,
            source_maps: SourceMapsConfig {
                include: vec![],
                ignore: vec![],
                url_prefix: None,
                dist: None,
            },
            clean_artifacts: false,
            set_commits: None,
            finalize: false,
            deploy: None,
            silent: false,
        }
    }
}
