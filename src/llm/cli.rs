//! Spawning of provider command-line tools.
//!
//! Both providers are driven the same way: an install check through `which`
//! and `--version`, then one non-interactive invocation per prompt that is
//! killed once its timeout elapses. Each provider names its binary and the
//! environment variable that overrides the timeout.

use std::env;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::CliError;

/// Default timeout for one provider invocation (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// A provider binary and its timeout override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderCli {
    binary: &'static str,
    timeout_var: &'static str,
}

impl ProviderCli {
    pub const fn new(binary: &'static str, timeout_var: &'static str) -> Self {
        Self {
            binary,
            timeout_var,
        }
    }

    pub fn binary(&self) -> &'static str {
        self.binary
    }

    /// The configured timeout.
    ///
    /// Reads the override variable if set, otherwise uses
    /// [`DEFAULT_TIMEOUT_SECS`]. Logs a warning if the variable holds an
    /// invalid value.
    pub fn timeout(&self) -> Duration {
        match env::var(self.timeout_var) {
            Ok(v) if !v.is_empty() => match v.parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => {
                    warn!(
                        "Invalid {} value '{}', using default {}s",
                        self.timeout_var, v, DEFAULT_TIMEOUT_SECS
                    );
                    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
                }
            },
            _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Check that the binary is on PATH and answers `--version`.
    pub async fn check_installed(&self) -> Result<(), CliError> {
        let not_installed = || CliError::NotInstalled {
            binary: self.binary.to_string(),
        };

        if which::which(self.binary).is_err() {
            return Err(not_installed());
        }

        let version_check = Command::new(self.binary)
            .arg("--version")
            .output()
            .await
            .map_err(|source| self.spawn_failed(source))?;

        if !version_check.status.success() {
            return Err(not_installed());
        }

        Ok(())
    }

    /// Run the binary with `args` and return its stdout.
    pub async fn run(&self, args: &[&str]) -> Result<String, CliError> {
        let timeout_duration = self.timeout();
        debug!(
            "Running {} with a {}s timeout",
            self.binary,
            timeout_duration.as_secs()
        );

        let mut cmd = Command::new(self.binary);
        cmd.args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = timeout(timeout_duration, cmd.output())
            .await
            .map_err(|_| CliError::Timeout {
                binary: self.binary.to_string(),
                secs: timeout_duration.as_secs(),
            })?
            .map_err(|source| self.spawn_failed(source))?;

        if !output.status.success() {
            return Err(CliError::NonZeroExit {
                binary: self.binary.to_string(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn spawn_failed(&self, source: std::io::Error) -> CliError {
        CliError::SpawnFailed {
            binary: self.binary.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VAR: &str = "SQUAWK_TEST_CLI_TIMEOUT";

    fn cli() -> ProviderCli {
        ProviderCli::new("sh", VAR)
    }

    #[test]
    fn test_timeout_default() {
        temp_env::with_var_unset(VAR, || {
            assert_eq!(cli().timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        });
    }

    #[test]
    fn test_timeout_from_env() {
        temp_env::with_var(VAR, Some("60"), || {
            assert_eq!(cli().timeout(), Duration::from_secs(60));
        });
    }

    #[test]
    fn test_timeout_invalid_or_empty_env_uses_default() {
        for value in ["not_a_number", "-5", ""] {
            temp_env::with_var(VAR, Some(value), || {
                assert_eq!(
                    cli().timeout(),
                    Duration::from_secs(DEFAULT_TIMEOUT_SECS),
                    "value {:?}",
                    value
                );
            });
        }
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_run_returns_stdout() {
        let stdout = cli().run(&["-c", "echo hello"]).await.unwrap();
        assert_eq!(stdout, "hello\n");
    }

    /// Non-zero exit codes map to NonZeroExit with stderr.
    #[tokio::test]
    #[cfg(unix)]
    async fn test_stderr_captured_in_error() {
        let error_message = "API rate limit exceeded";
        let script = format!("echo '{}' >&2; exit 1", error_message);

        let err = cli().run(&["-c", &script]).await.unwrap_err();

        match err {
            CliError::NonZeroExit {
                ref binary,
                code,
                ref stderr,
            } => {
                assert_eq!(binary, "sh");
                assert_eq!(code, 1);
                assert!(stderr.contains(error_message));
            }
            other => panic!("expected NonZeroExit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_binary_is_not_installed() {
        let missing = ProviderCli::new("squawk-no-such-binary", VAR);
        let result = missing.check_installed().await;
        assert!(matches!(result, Err(CliError::NotInstalled { .. })));
    }

    #[test]
    fn test_failures_map_onto_provider_errors() {
        use crate::error::{ClaudeError, CodexError};

        let timeout = CliError::Timeout {
            binary: "claude".to_string(),
            secs: 5,
        };
        assert!(matches!(ClaudeError::from(timeout), ClaudeError::Timeout(5)));

        let exit = CliError::NonZeroExit {
            binary: "codex".to_string(),
            code: 3,
            stderr: "not logged in".to_string(),
        };
        let err = CodexError::from(exit);
        assert!(err.to_string().contains("exited with code 3: not logged in"));
    }
}
