use anyhow::Result;

use super::dry_run::DryRunSentry;
use super::sentry::ConnectionConfig;
use super::sentry::Deploy;
use super::sentry::RealSentry;
use super::sentry::Release;
use super::sentry::SentryOps;
use crate::config::Config;
use crate::config::DeployConfig;
use crate::config::SetCommitsConfig;
use crate::config::SourceMapsConfig;

// -----------------------------------------------------------------------------
// SentryClient

/// The client selected for this invocation: the real sentry-cli wrapper, or
/// the observing stand-in around it. Satisfies [`SentryOps`] uniformly so
/// command code never branches on which variant it got.
pub enum SentryClient {
    Real(RealSentry),
    DryRun(DryRunSentry<RealSentry>),
}

/// Build the client for this invocation.
///
/// The real client is constructed unconditionally: the observing stand-in
/// still delegates version negotiation to it. The only defaulting done here
/// is structural (`silent` is off unless configured); credential validation
/// belongs to sentry-cli itself.
pub fn select_client(config: &Config) -> SentryClient {
    let connection = ConnectionConfig {
        auth_token: config.auth_token.clone(),
        org: config.org.clone(),
        project: config.project.clone(),
        url: config.url.clone(),
        vcs_remote: config.vcs_remote.clone(),
        config_file: config.config_file.clone(),
        silent: config.silent,
    };
    let real = RealSentry::new(connection);

    if config.dry_run {
        SentryClient::DryRun(DryRunSentry::new(real))
    } else {
        SentryClient::Real(real)
    }
}

impl SentryOps for SentryClient {
    async fn propose_version(&self) -> Result<Release> {
        match self {
            Self::Real(client) => client.propose_version().await,
            Self::DryRun(client) => client.propose_version().await,
        }
    }

    async fn new_release(&self, release: &Release) -> Result<Release> {
        match self {
            Self::Real(client) => client.new_release(release).await,
            Self::DryRun(client) => client.new_release(release).await,
        }
    }

    async fn upload_source_maps(
        &self,
        release: &Release,
        config: &SourceMapsConfig,
    ) -> Result<Release> {
        match self {
            Self::Real(client) => client.upload_source_maps(release, config).await,
            Self::DryRun(client) => client.upload_source_maps(release, config).await,
        }
    }

    async fn finalize(&self, release: &Release) -> Result<Release> {
        match self {
            Self::Real(client) => client.finalize(release).await,
            Self::DryRun(client) => client.finalize(release).await,
        }
    }

    async fn set_commits(&self, release: &Release, config: &SetCommitsConfig) -> Result<Release> {
        match self {
            Self::Real(client) => client.set_commits(release, config).await,
            Self::DryRun(client) => client.set_commits(release, config).await,
        }
    }

    async fn new_deploy(&self, release: &Release, config: &DeployConfig) -> Result<Release> {
        match self {
            Self::Real(client) => client.new_deploy(release, config).await,
            Self::DryRun(client) => client.new_deploy(release, config).await,
        }
    }

    async fn list_deploys(&self, release: &Release) -> Result<Vec<Deploy>> {
        match self {
            Self::Real(client) => client.list_deploys(release).await,
            Self::DryRun(client) => client.list_deploys(release).await,
        }
    }

    async fn execute(&self, args: &[String], live: bool) -> Result<String> {
        match self {
            Self::Real(client) => client.execute(args, live).await,
            Self::DryRun(client) => client.execute(args, live).await,
        }
    }
}
