use std::path::Path;

use log::warn;
use walkdir::WalkDir;

use crate::config::Config;

/// Build mode that passes the environment check.
pub const PRODUCTION_MODE: &str = "production";

/// Snapshot of the build environment, resolved once before the release
/// lifecycle starts and read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildState {
    /// Whether the lifecycle should run at all.
    pub enabled: bool,
    /// Whether the build produced sourcemaps under the configured paths.
    pub sourcemaps_created: bool,
    pub is_production: bool,
}

impl BuildState {
    /// Resolve the state from configuration and the build mode.
    ///
    /// The lifecycle only makes sense when there are sourcemaps to upload,
    /// and only for production builds unless the environment check is
    /// explicitly bypassed.
    pub fn resolve(config: &Config, mode: &str) -> Self {
        let is_production = mode == PRODUCTION_MODE;
        let sourcemaps_created = config
            .source_maps
            .include
            .iter()
            .any(|dir| has_sourcemaps(dir));
        let enabled = sourcemaps_created && (config.skip_environment_check || is_production);

        Self {
            enabled,
            sourcemaps_created,
            is_production,
        }
    }
}

/// Check whether a directory tree contains at least one generated `.map` file.
fn has_sourcemaps(dir: &Path) -> bool {
    if !dir.exists() {
        warn!("Sourcemap path {} does not exist", dir.display());
        return false;
    }

    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .any(|entry| {
            entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "map")
        })
}
