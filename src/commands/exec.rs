use anyhow::Result;

use crate::App;
use crate::ops::sentry::SentryOps;

impl<S: SentryOps> App<S> {
    /// Forward raw arguments to the underlying client.
    ///
    /// Escape hatch for sentry-cli functionality without a named capability;
    /// unlike the lifecycle, failures here propagate.
    pub async fn cmd_exec(
        &self,
        args: &[String],
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let output = self.sentry.execute(args, false).await?;
        if !output.is_empty() {
            writeln!(stdout, "{}", output)?;
        }
        Ok(())
    }
}
