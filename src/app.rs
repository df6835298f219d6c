use crate::config::Config;
use crate::ops::sentry::Release;
use crate::ops::sentry::SentryOps;

pub struct App<S> {
    pub config: Config,
    pub sentry: S,
}

impl<S> App<S> {
    pub fn new(config: Config, sentry: S) -> Self {
        Self { config, sentry }
    }
}

/// Shared helper methods for App
impl<S: SentryOps> App<S> {
    /// Resolve the release for this build: an explicit configured release
    /// wins, otherwise the client negotiates one with the server.
    ///
    /// The result is trimmed. An empty identifier or a failed negotiation
    /// degrades to `None` so callers can skip quietly instead of failing
    /// the surrounding build.
    pub(crate) async fn resolve_release(&self) -> Option<Release> {
        let version = match &self.config.release {
            Some(release) => release.clone(),
            None => match self.sentry.propose_version().await {
                Ok(release) => release.0,
                Err(_) => return None,
            },
        };

        let version = version.trim();
        if version.is_empty() {
            None
        } else {
            Some(Release(version.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::sentry::MockSentryOps;

    #[tokio::test]
    async fn test_explicit_release_wins() {
        // No expectations: negotiating would panic the mock
        let mut config = Config::default_for_tests();
        config.release = Some("1.2.3".to_string());
        let app = App::new(config, MockSentryOps::new());

        assert_eq!(
            app.resolve_release().await,
            Some(Release("1.2.3".to_string()))
        );
    }

    #[tokio::test]
    async fn test_negotiated_release_is_trimmed() {
        let mut mock = MockSentryOps::new();
        mock.expect_propose_version()
            .times(1)
            .returning(|| Ok(Release(" 7.8.9 ".to_string())));
        let app = App::new(Config::default_for_tests(), mock);

        assert_eq!(
            app.resolve_release().await,
            Some(Release("7.8.9".to_string()))
        );
    }

    #[tokio::test]
    async fn test_empty_release_becomes_none() {
        let mut mock = MockSentryOps::new();
        mock.expect_propose_version()
            .returning(|| Ok(Release("  ".to_string())));
        let app = App::new(Config::default_for_tests(), mock);

        assert_eq!(app.resolve_release().await, None);
    }

    #[tokio::test]
    async fn test_failed_negotiation_becomes_none() {
        let mut mock = MockSentryOps::new();
        mock.expect_propose_version()
            .returning(|| Err(anyhow::anyhow!("401 unauthorized")));
        let app = App::new(Config::default_for_tests(), mock);

        assert_eq!(app.resolve_release().await, None);
    }
}
