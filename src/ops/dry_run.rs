use std::fmt::Debug;

use anyhow::Result;
use tracing::info;

use super::sentry::ClientError;
use super::sentry::Deploy;
use super::sentry::Release;
use super::sentry::SentryOps;
use crate::config::DeployConfig;
use crate::config::SetCommitsConfig;
use crate::config::SourceMapsConfig;

/// Sink for observed calls. Swappable so tests can capture emissions.
pub type LogSink = Box<dyn Fn(&str) + Send + Sync>;

// -----------------------------------------------------------------------------
// DryRunSentry

/// Observing stand-in for a real release client.
///
/// Lifecycle mutations perform no network action: each call reports the
/// intended action through the sink and resolves with its input release
/// unchanged, keeping the same shape and timing contract as the wrapped
/// client. Version negotiation is read-only, so it still delegates.
///
/// `list_deploys` and `execute` have no safe side-effect-free analog and
/// fail with [`ClientError::NotImplemented`].
pub struct DryRunSentry<S> {
    inner: S,
    log: LogSink,
}

impl<S> DryRunSentry<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            log: Box::new(|line| info!("{line}")),
        }
    }

    /// Replace the default sink. Lets tests capture what was observed.
    pub fn with_log_sink(inner: S, log: LogSink) -> Self {
        Self { inner, log }
    }

    fn observe(&self, label: &str, payload: &dyn Debug) {
        (self.log)(&format!("{} {:?}", label, payload));
    }
}

impl<S: SentryOps> SentryOps for DryRunSentry<S> {
    async fn propose_version(&self) -> Result<Release> {
        let version = self.inner.propose_version().await?;
        self.observe("Proposed version:", &version.0);
        Ok(version)
    }

    async fn new_release(&self, release: &Release) -> Result<Release> {
        self.observe("Creating new release:", &release.0);
        Ok(release.clone())
    }

    async fn upload_source_maps(
        &self,
        release: &Release,
        config: &SourceMapsConfig,
    ) -> Result<Release> {
        self.observe("Calling upload-sourcemaps with:", config);
        Ok(release.clone())
    }

    async fn finalize(&self, release: &Release) -> Result<Release> {
        self.observe("Finalizing release:", &release.0);
        Ok(release.clone())
    }

    async fn set_commits(&self, release: &Release, config: &SetCommitsConfig) -> Result<Release> {
        self.observe("Calling set-commits with:", config);
        Ok(release.clone())
    }

    async fn new_deploy(&self, release: &Release, config: &DeployConfig) -> Result<Release> {
        self.observe("Calling deploys new with:", config);
        Ok(release.clone())
    }

    async fn list_deploys(&self, _release: &Release) -> Result<Vec<Deploy>> {
        Err(ClientError::NotImplemented("list_deploys").into())
    }

    async fn execute(&self, _args: &[String], _live: bool) -> Result<String> {
        Err(ClientError::NotImplemented("execute").into())
    }
}
