use anyhow::Result;
use serde::Serialize;

use crate::App;
use crate::commands::warn;
use crate::ops::sentry::SentryOps;

/// Release metadata the bundler inlines as build-time constants.
#[derive(Debug, Serialize)]
pub struct ReleaseMetadata {
    pub release: Option<String>,
    pub dist: Option<String>,
}

/// Output format for `emit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EmitFormat {
    Json,
    Env,
}

impl<S: SentryOps> App<S> {
    /// Print resolved release metadata, either as a JSON object or as dotenv
    /// lines, for the build pipeline to inject into application code.
    ///
    /// An unresolvable release warns and emits empty values; like the
    /// lifecycle itself, this never fails the surrounding build.
    pub async fn cmd_emit(
        &self,
        format: EmitFormat,
        stdout: &mut impl std::io::Write,
        stderr: &mut impl std::io::Write,
    ) -> Result<()> {
        let release = self.resolve_release().await;
        if release.is_none() {
            warn(
                stderr,
                "Release returned from Sentry is empty! Please check your config",
            )?;
        }

        let metadata = ReleaseMetadata {
            release: release.map(|release| release.0),
            dist: self.config.source_maps.dist.clone(),
        };

        match format {
            EmitFormat::Json => writeln!(stdout, "{}", serde_json::to_string(&metadata)?)?,
            EmitFormat::Env => {
                writeln!(
                    stdout,
                    "SENTRY_RELEASE={}",
                    metadata.release.as_deref().unwrap_or_default()
                )?;
                writeln!(
                    stdout,
                    "SENTRY_DIST={}",
                    metadata.dist.as_deref().unwrap_or_default()
                )?;
            }
        }

        Ok(())
    }
}
