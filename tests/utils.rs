use std::path::Path;
use std::path::PathBuf;

/// Shell stub standing in for the sentry-cli binary.
///
/// Records every invocation to the file named by SENTRY_STUB_LOG and answers
/// the two read commands the tests exercise; everything else succeeds
/// silently, like a healthy cli run with --quiet.
const STUB_SCRIPT: &str = r#"#!/bin/sh
if [ -n "$SENTRY_STUB_LOG" ]; then
    echo "$@" >> "$SENTRY_STUB_LOG"
fi
if [ "$1" = "releases" ] && [ "$2" = "propose-version" ]; then
    echo " 7.8.9 "
fi
if [ "$1" = "releases" ] && [ "$2" = "deploys" ] && [ "$4" = "list" ]; then
    cat <<'TABLE'
+-------------+----------+---------------------+
| Environment | Name     | Finished            |
+-------------+----------+---------------------+
| production  | deploy-1 | 2024-03-01 10:00:00 |
+-------------+----------+---------------------+
TABLE
fi
exit 0
"#;

/// Write the stub into `dir` and make it executable.
pub fn install_stub(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt as _;

    let path = dir.join("sentry-cli");
    std::fs::write(&path, STUB_SCRIPT).unwrap();

    let mut permissions = std::fs::metadata(&path).unwrap().permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(&path, permissions).unwrap();

    path
}

/// Per-test invocation log for the stub. Tests run serially, so pointing the
/// process-global SENTRY_STUB_LOG at a fresh file per test is race-free.
pub struct StubLog {
    file: tempfile::NamedTempFile,
}

impl StubLog {
    pub fn install() -> Self {
        let file = tempfile::NamedTempFile::new().unwrap();
        // SAFETY: tests are marked #[serial]; no other thread is touching
        // the environment while this runs.
        unsafe { std::env::set_var("SENTRY_STUB_LOG", file.path()) };
        Self { file }
    }

    /// Every recorded invocation, one line of arguments per call.
    pub fn calls(&self) -> String {
        std::fs::read_to_string(self.file.path()).unwrap()
    }
}

/// A build output directory containing one generated sourcemap.
pub fn dist_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("app.js.map"), "{}").unwrap();
    dir
}
