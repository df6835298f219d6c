//! Command implementations, one per CLI subcommand.
//!
//! Commands write user-facing output to injected sinks so tests can capture
//! it. Lifecycle failures in [`run`] degrade to warnings: release bookkeeping
//! must never break an otherwise-successful build.

pub mod deploys;
pub mod emit;
pub mod exec;
pub mod run;

use colored::Colorize;

/// Write a warning line to the given sink.
pub(crate) fn warn(sink: &mut impl std::io::Write, message: &str) -> std::io::Result<()> {
    writeln!(sink, "{} {}", "warning:".yellow().bold(), message)
}
