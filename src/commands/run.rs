use anyhow::Result;

use crate::App;
use crate::commands::warn;
use crate::ops::sentry::Release;
use crate::ops::sentry::SentryOps;
use crate::state::BuildState;

impl<S: SentryOps> App<S> {
    /// Run the post-build release lifecycle.
    ///
    /// 1. Register the release (negotiating a version first if none is configured).
    /// 2. Optionally delete artifacts left over from previous runs.
    /// 3. Upload sourcemaps.
    /// 4. Optionally associate commits, finalize, and register a deploy.
    ///
    /// Skip conditions and upstream failures degrade to warnings on `stderr`;
    /// this command never fails the surrounding build.
    pub async fn cmd_run(
        &self,
        mode: &str,
        stdout: &mut impl std::io::Write,
        stderr: &mut impl std::io::Write,
    ) -> Result<()> {
        let state = BuildState::resolve(&self.config, mode);

        if !state.enabled {
            if !state.is_production {
                warn(
                    stderr,
                    "Skipped because running non-production build. If you want to run it anyway set the skipEnvironmentCheck option to true",
                )?;
            } else if !state.sourcemaps_created {
                warn(
                    stderr,
                    "Skipped because no sourcemaps were found under the configured sourceMaps.include paths",
                )?;
            }
            return Ok(());
        }

        if !state.is_production && self.config.skip_environment_check {
            warn(stderr, "Running in non-production mode!")?;
        }

        let Some(release) = self.resolve_release().await else {
            warn(
                stderr,
                "Release returned from Sentry is empty! Please check your config",
            )?;
            return Ok(());
        };

        if let Err(error) = self.release_lifecycle(&release, stdout).await {
            warn(
                stderr,
                &format!("Error while uploading sourcemaps to Sentry: {error:#}"),
            )?;
        }

        Ok(())
    }

    /// The sequential chain: create, clean, upload, commits, finalize, deploy.
    /// Each step completes before the next is issued.
    async fn release_lifecycle(
        &self,
        release: &Release,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        self.sentry.new_release(release).await?;
        writeln!(stdout, "Created release {}", release)?;

        if self.config.clean_artifacts {
            // Artifact deletion has no named capability, only the raw escape hatch
            let args = ["releases", "files", release.0.as_str(), "delete", "--all"]
                .map(String::from)
                .to_vec();
            self.sentry.execute(&args, true).await?;
            writeln!(stdout, "Cleaned previous artifacts for {}", release)?;
        }

        self.sentry
            .upload_source_maps(release, &self.config.source_maps)
            .await?;
        writeln!(stdout, "Uploaded sourcemaps for {}", release)?;

        if let Some(set_commits) = &self.config.set_commits
            && set_commits.applies()
        {
            self.sentry.set_commits(release, set_commits).await?;
            writeln!(stdout, "Set commits for {}", release)?;
        }

        if self.config.finalize {
            self.sentry.finalize(release).await?;
            writeln!(stdout, "Finalized release {}", release)?;
        }

        if let Some(deploy) = &self.config.deploy
            && !deploy.env.is_empty()
        {
            self.sentry.new_deploy(release, deploy).await?;
            writeln!(stdout, "Registered {} deploy for {}", deploy.env, release)?;
        }

        Ok(())
    }
}
