#![allow(async_fn_in_trait)]

use std::fmt::Display;
use std::path::PathBuf;
use std::process::Stdio;

use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
#[cfg(test)]
use mockall::automock;
use regex::Regex;
use tokio::process::Command;

use crate::config::DeployConfig;
use crate::config::SetCommitsConfig;
use crate::config::SourceMapsConfig;

// -----------------------------------------------------------------------------
// SentryOps trait

/// Operations a release client must expose.
///
/// One instance exists per invocation, selected at startup and immutable
/// afterwards. Every method resolves fully before the caller issues the next,
/// so implementations never see overlapping calls.
#[cfg_attr(test, automock)]
pub trait SentryOps {
    /// Ask the server for the next release identifier. Read-only.
    async fn propose_version(&self) -> Result<Release>;

    /// Register a release, returning it on success.
    async fn new_release(&self, release: &Release) -> Result<Release>;

    /// Upload generated sourcemaps as artifacts of the release.
    async fn upload_source_maps(
        &self,
        release: &Release,
        config: &SourceMapsConfig,
    ) -> Result<Release>;

    /// Mark the release as closed.
    async fn finalize(&self, release: &Release) -> Result<Release>;

    /// Associate commits with the release.
    async fn set_commits(&self, release: &Release, config: &SetCommitsConfig) -> Result<Release>;

    /// Register a deploy of the release to an environment.
    async fn new_deploy(&self, release: &Release, config: &DeployConfig) -> Result<Release>;

    /// List deploys registered for the release.
    async fn list_deploys(&self, release: &Release) -> Result<Vec<Deploy>>;

    /// Low-level escape hatch: run a raw sentry-cli invocation.
    /// With `live` the child inherits stdio; otherwise output is captured and returned.
    async fn execute(&self, args: &[String], live: bool) -> Result<String>;
}

/// A release identifier, opaque to this tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release(pub String);

impl Display for Release {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A deploy record as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deploy {
    pub environment: String,
    pub name: Option<String>,
    pub finished: Option<String>,
}

/// Error kinds surfaced by release clients beyond plain subprocess failures.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The operation has no side-effect-free analog in dry-run mode.
    #[error("{0} is not implemented in dry-run mode")]
    NotImplemented(&'static str),
}

/// Connection settings for the sentry-cli binary. Immutable after construction.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub auth_token: Option<String>,
    pub org: Option<String>,
    pub project: Option<String>,
    pub url: Option<String>,
    pub vcs_remote: Option<String>,
    pub config_file: Option<PathBuf>,
    pub silent: bool,
}

// -----------------------------------------------------------------------------
// RealSentry

/// Real implementation that calls the sentry-cli binary
pub struct RealSentry {
    connection: ConnectionConfig,
    binary: String,
}

impl RealSentry {
    pub fn new(connection: ConnectionConfig) -> Self {
        // Same override the official wrappers honor, useful for pinned installs
        let binary =
            std::env::var("SENTRY_CLI_EXECUTABLE").unwrap_or_else(|_| "sentry-cli".to_string());
        Self { connection, binary }
    }

    /// Base invocation with connection settings applied through the
    /// environment variables the binary recognizes.
    fn command(&self) -> Command {
        let mut command = Command::new(&self.binary);
        if let Some(auth_token) = &self.connection.auth_token {
            command.env("SENTRY_AUTH_TOKEN", auth_token);
        }
        if let Some(org) = &self.connection.org {
            command.env("SENTRY_ORG", org);
        }
        if let Some(project) = &self.connection.project {
            command.env("SENTRY_PROJECT", project);
        }
        if let Some(url) = &self.connection.url {
            command.env("SENTRY_URL", url);
        }
        if let Some(vcs_remote) = &self.connection.vcs_remote {
            command.env("SENTRY_VCS_REMOTE", vcs_remote);
        }
        if let Some(config_file) = &self.connection.config_file {
            command.env("SENTRY_PROPERTIES", config_file);
        }
        command
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        let output = self
            .command()
            .args(args)
            .output()
            .await
            .context("Failed to execute sentry-cli command")?;

        if !output.status.success() {
            return Err(anyhow!(
                "sentry-cli command failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        Ok(String::from_utf8(output.stdout)?.trim().to_string())
    }
}

impl SentryOps for RealSentry {
    async fn propose_version(&self) -> Result<Release> {
        let version = self.run(&["releases", "propose-version"]).await?;
        Ok(Release(version))
    }

    async fn new_release(&self, release: &Release) -> Result<Release> {
        self.run(&["releases", "new", &release.0]).await?;
        Ok(release.clone())
    }

    async fn upload_source_maps(
        &self,
        release: &Release,
        config: &SourceMapsConfig,
    ) -> Result<Release> {
        let mut args = vec![
            "releases".to_string(),
            "files".to_string(),
            release.0.clone(),
            "upload-sourcemaps".to_string(),
        ];
        for path in &config.include {
            args.push(path.display().to_string());
        }
        if let Some(dist) = &config.dist {
            args.push("--dist".to_string());
            args.push(dist.clone());
        }
        if let Some(url_prefix) = &config.url_prefix {
            args.push("--url-prefix".to_string());
            args.push(url_prefix.clone());
        }
        for pattern in &config.ignore {
            args.push("--ignore".to_string());
            args.push(pattern.clone());
        }

        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(&args).await?;
        Ok(release.clone())
    }

    async fn finalize(&self, release: &Release) -> Result<Release> {
        self.run(&["releases", "finalize", &release.0]).await?;
        Ok(release.clone())
    }

    async fn set_commits(&self, release: &Release, config: &SetCommitsConfig) -> Result<Release> {
        let mut args = vec![
            "releases".to_string(),
            "set-commits".to_string(),
            release.0.clone(),
        ];
        if config.auto {
            args.push("--auto".to_string());
        } else if let (Some(repo), Some(commit)) = (&config.repo, &config.commit) {
            args.push("--commit".to_string());
            args.push(format!("{}@{}", repo, commit));
        }

        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(&args).await?;
        Ok(release.clone())
    }

    async fn new_deploy(&self, release: &Release, config: &DeployConfig) -> Result<Release> {
        let mut args = vec![
            "releases".to_string(),
            "deploys".to_string(),
            release.0.clone(),
            "new".to_string(),
            "--env".to_string(),
            config.env.clone(),
        ];
        if let Some(name) = &config.name {
            args.push("--name".to_string());
            args.push(name.clone());
        }
        if let Some(url) = &config.url {
            args.push("--url".to_string());
            args.push(url.clone());
        }

        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(&args).await?;
        Ok(release.clone())
    }

    async fn list_deploys(&self, release: &Release) -> Result<Vec<Deploy>> {
        let output = self
            .run(&["releases", "deploys", &release.0, "list"])
            .await?;
        Ok(parse_deploy_table(&output))
    }

    async fn execute(&self, args: &[String], live: bool) -> Result<String> {
        if live && !self.connection.silent {
            let status = self
                .command()
                .args(args)
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .await
                .context("Failed to execute sentry-cli command")?;

            if !status.success() {
                return Err(anyhow!("sentry-cli command failed with {}", status));
            }
            return Ok(String::new());
        }

        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(&args).await
    }
}

/// Parse the ascii table sentry-cli prints for `releases deploys list`.
/// Tolerant of rules and extra columns; header and separator rows are dropped.
fn parse_deploy_table(output: &str) -> Vec<Deploy> {
    let row = Regex::new(r"^\s*\|(.+)\|\s*$").unwrap();

    output
        .lines()
        .filter_map(|line| row.captures(line))
        .filter_map(|captures| {
            let cells: Vec<String> = captures[1]
                .split('|')
                .map(|cell| cell.trim().to_string())
                .collect();

            let environment = cells.first().cloned().unwrap_or_default();
            if environment.is_empty() || environment == "Environment" {
                return None;
            }

            Some(Deploy {
                environment,
                name: cells.get(1).filter(|name| !name.is_empty()).cloned(),
                finished: cells.get(2).filter(|date| !date.is_empty()).cloned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deploy_table() {
        let output = "\
+-------------+-----------+---------------------+
| Environment | Name      | Finished            |
+-------------+-----------+---------------------+
| production  | deploy-1  | 2024-03-01 10:00:00 |
| staging     |           |                     |
+-------------+-----------+---------------------+";

        let deploys = parse_deploy_table(output);
        assert_eq!(deploys.len(), 2);
        assert_eq!(deploys[0].environment, "production");
        assert_eq!(deploys[0].name.as_deref(), Some("deploy-1"));
        assert_eq!(deploys[0].finished.as_deref(), Some("2024-03-01 10:00:00"));
        assert_eq!(deploys[1].environment, "staging");
        assert_eq!(deploys[1].name, None);
    }

    #[test]
    fn test_parse_deploy_table_ignores_noise() {
        assert!(parse_deploy_table("").is_empty());
        assert!(parse_deploy_table("no deploys found\n").is_empty());
    }
}
