use anyhow::Result;
use colored::Colorize;

use crate::App;
use crate::commands::warn;
use crate::ops::sentry::SentryOps;

impl<S: SentryOps> App<S> {
    /// List deploys registered for the resolved release.
    pub async fn cmd_deploys(
        &self,
        stdout: &mut impl std::io::Write,
        stderr: &mut impl std::io::Write,
    ) -> Result<()> {
        let Some(release) = self.resolve_release().await else {
            warn(
                stderr,
                "Release returned from Sentry is empty! Please check your config",
            )?;
            return Ok(());
        };

        let deploys = self.sentry.list_deploys(&release).await?;
        if deploys.is_empty() {
            writeln!(stdout, "No deploys for release {}", release)?;
            return Ok(());
        }

        for deploy in deploys {
            let line = format!(
                "{} {}",
                deploy.environment.cyan(),
                deploy.name.unwrap_or_default()
            );
            writeln!(stdout, "{}", line.trim_end())?;
            if let Some(finished) = deploy.finished {
                let finished_line = format!("  finished {}", finished);
                writeln!(stdout, "{}", finished_line.dimmed())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::App;
    use crate::config::Config;
    use crate::ops::sentry::Deploy;
    use crate::ops::sentry::MockSentryOps;
    use crate::ops::sentry::Release;

    #[tokio::test]
    async fn test_lists_deploys_for_release() {
        let mut config = Config::default_for_tests();
        config.release = Some("1.2.3".to_string());

        let mut mock = MockSentryOps::new();
        mock.expect_list_deploys()
            .withf(|release| release == &Release("1.2.3".to_string()))
            .times(1)
            .returning(|_| {
                Ok(vec![
                    Deploy {
                        environment: "production".to_string(),
                        name: Some("deploy-1".to_string()),
                        finished: Some("2024-03-01 10:00:00".to_string()),
                    },
                    Deploy {
                        environment: "staging".to_string(),
                        name: None,
                        finished: None,
                    },
                ])
            });

        let app = App::new(config, mock);
        let mut out = Vec::new();
        let mut err = Vec::new();
        app.cmd_deploys(&mut out, &mut err).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        insta::assert_snapshot!(out, @r"
        production deploy-1
          finished 2024-03-01 10:00:00
        staging
        ");
    }

    #[tokio::test]
    async fn test_reports_empty_deploy_list() {
        let mut config = Config::default_for_tests();
        config.release = Some("1.2.3".to_string());

        let mut mock = MockSentryOps::new();
        mock.expect_list_deploys().returning(|_| Ok(vec![]));

        let app = App::new(config, mock);
        let mut out = Vec::new();
        let mut err = Vec::new();
        app.cmd_deploys(&mut out, &mut err).await.unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "No deploys for release 1.2.3\n"
        );
    }

    #[tokio::test]
    async fn test_unresolvable_release_warns_and_skips() {
        let mut mock = MockSentryOps::new();
        mock.expect_propose_version()
            .returning(|| Ok(Release(String::new())));

        let app = App::new(Config::default_for_tests(), mock);
        let mut out = Vec::new();
        let mut err = Vec::new();
        app.cmd_deploys(&mut out, &mut err).await.unwrap();

        assert!(out.is_empty());
        assert!(String::from_utf8(err).unwrap().contains("empty"));
    }
}
