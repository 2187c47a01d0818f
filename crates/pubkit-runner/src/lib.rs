//! # pubkit-runner
//!
//! Shells out to the host package manager (`dart pub` or `flutter pub`)
//! for a project directory, with a hard timeout so a wedged resolver
//! can never hang the caller.

#![warn(missing_docs)]

mod detect;
mod error;

pub use detect::is_flutter_project;
pub use error::{Error, Result};

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Hard limit for a single pub command
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs pub commands for one project directory
///
/// The host command is picked once at construction: `flutter` when the
/// project's pubspec declares a Flutter dependency, `dart` otherwise.
#[derive(Debug, Clone)]
pub struct PubRunner {
    project_root: PathBuf,
    use_flutter: bool,
}

impl PubRunner {
    /// Create a runner for the project rooted at `project_root`
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let use_flutter = is_flutter_project(&project_root);
        Self {
            project_root,
            use_flutter,
        }
    }

    /// The host command this runner invokes
    pub fn command(&self) -> &'static str {
        if self.use_flutter {
            "flutter"
        } else {
            "dart"
        }
    }

    /// Fetch dependencies (`pub get`)
    ///
    /// # Errors
    /// Returns [`Error::Timeout`] after 60 seconds, or
    /// [`Error::CommandFailed`] carrying stderr on a non-zero exit.
    pub async fn pub_get(&self) -> Result<String> {
        self.run(&["pub", "get"]).await
    }

    /// Add a dependency (`pub add`), optionally to dev_dependencies
    ///
    /// # Errors
    /// Same failure modes as [`pub_get`](PubRunner::pub_get).
    pub async fn pub_add(&self, package: &str, dev: bool) -> Result<String> {
        if dev {
            self.run(&["pub", "add", "--dev", package]).await
        } else {
            self.run(&["pub", "add", package]).await
        }
    }

    /// Remove a dependency (`pub remove`)
    ///
    /// # Errors
    /// Same failure modes as [`pub_get`](PubRunner::pub_get).
    pub async fn pub_remove(&self, package: &str) -> Result<String> {
        self.run(&["pub", "remove", package]).await
    }

    /// Report outdated packages (`pub outdated`)
    ///
    /// # Errors
    /// Same failure modes as [`pub_get`](PubRunner::pub_get).
    pub async fn pub_outdated(&self) -> Result<String> {
        self.run(&["pub", "outdated"]).await
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        self.run_with_timeout(self.command(), args, COMMAND_TIMEOUT)
            .await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        limit: Duration,
    ) -> Result<String> {
        let display_cmd = format!("{} {}", program, args.join(" "));
        tracing::debug!(command = %display_cmd, root = %self.project_root.display(), "running pub command");

        let child = Command::new(program)
            .args(args)
            .current_dir(&self.project_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::Spawn {
                command: display_cmd.clone(),
                source,
            })?;

        let output = tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| Error::Timeout {
                command: display_cmd.clone(),
                limit,
            })?
            .map_err(|source| Error::Spawn {
                command: display_cmd.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: display_cmd,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner_in(dir: &tempfile::TempDir) -> PubRunner {
        PubRunner::new(dir.path())
    }

    #[test]
    fn test_defaults_to_dart_without_pubspec() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(runner_in(&dir).command(), "dart");
    }

    #[test]
    fn test_picks_flutter_for_flutter_projects() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("pubspec.yaml"),
            "name: app\ndependencies:\n  flutter:\n    sdk: flutter\n",
        )
        .unwrap();
        assert_eq!(runner_in(&dir).command(), "flutter");
    }

    #[tokio::test]
    async fn test_success_returns_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let out = runner_in(&dir)
            .run_with_timeout("sh", &["-c", "echo hello"], COMMAND_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(out, "hello\n");
    }

    #[tokio::test]
    async fn test_failure_carries_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let result = runner_in(&dir)
            .run_with_timeout("sh", &["-c", "echo broken >&2; exit 1"], COMMAND_TIMEOUT)
            .await;
        match result {
            Err(Error::CommandFailed { stderr, .. }) => assert!(stderr.contains("broken")),
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_a_distinct_failure() {
        let dir = tempfile::tempdir().unwrap();
        let result = runner_in(&dir)
            .run_with_timeout("sleep", &["5"], Duration::from_millis(50))
            .await;
        assert!(matches!(result, Err(Error::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_missing_program_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = runner_in(&dir)
            .run_with_timeout("pubkit-no-such-command", &[], COMMAND_TIMEOUT)
            .await;
        assert!(matches!(result, Err(Error::Spawn { .. })));
    }
}
