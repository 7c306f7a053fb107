// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`CliInvoker`] backed by the 1Password CLI.
//!
//! Runs `op inject [--account <account>]` with the batch request on stdin
//! and captures stdout, stderr and the exit code. No output parsing happens
//! here.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use opconf_config::model::CliConfig;
use opconf_core::{CliInvoker, InvokeOutput, OpconfError};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Default executable name, looked up on `PATH`.
pub const DEFAULT_OP_PATH: &str = "op";

/// Invokes the `op` executable once per batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpCliInvoker {
    op_path: String,
    timeout: Option<Duration>,
}

impl Default for OpCliInvoker {
    fn default() -> Self {
        Self::new(DEFAULT_OP_PATH)
    }
}

impl OpCliInvoker {
    pub fn new(op_path: impl Into<String>) -> Self {
        Self {
            op_path: op_path.into(),
            timeout: None,
        }
    }

    /// Kill the process and fail if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn from_config(config: &CliConfig) -> Self {
        let invoker = Self::new(config.op_path.clone());
        match config.timeout_secs {
            Some(secs) => invoker.with_timeout(Duration::from_secs(secs)),
            None => invoker,
        }
    }

    pub fn op_path(&self) -> &str {
        &self.op_path
    }

    /// Arguments passed to `op`. An empty account is treated as absent.
    pub fn inject_args(account: Option<&str>) -> Vec<String> {
        let mut args = vec!["inject".to_string()];
        if let Some(account) = account.filter(|a| !a.is_empty()) {
            args.push("--account".to_string());
            args.push(account.to_string());
        }
        args
    }

    fn start_failure(&self, message: String) -> OpconfError {
        OpconfError::Invocation {
            exit_code: None,
            stderr: message,
        }
    }
}

#[async_trait]
impl CliInvoker for OpCliInvoker {
    async fn invoke(
        &self,
        account: Option<&str>,
        request: &str,
    ) -> Result<InvokeOutput, OpconfError> {
        let args = Self::inject_args(account);
        debug!(op = %self.op_path, has_account = args.len() > 1, "invoking op inject");

        let mut child = Command::new(&self.op_path)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.start_failure(format!("failed to start '{}': {e}", self.op_path)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.start_failure("stdin of op process unavailable".to_string()))?;

        // Feed stdin while draining stdout so a large batch cannot deadlock on
        // a full pipe. Write errors surface through the exit status instead.
        let feed = async move {
            if let Err(e) = stdin.write_all(request.as_bytes()).await {
                debug!(
                    error = %e,
                    bytes = request.len(),
                    "op closed stdin before the full request was written"
                );
            }
            drop(stdin);
        };
        let run = async {
            let ((), output) = tokio::join!(feed, child.wait_with_output());
            output
        };

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, run).await.map_err(|_| {
                self.start_failure(format!("op did not finish within {}s", limit.as_secs_f64()))
            })?,
            None => run.await,
        }
        .map_err(|e| self.start_failure(format!("failed to wait for op: {e}")))?;

        let result = InvokeOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(exit_code = ?result.exit_code, "op inject finished");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_without_account() {
        assert_eq!(OpCliInvoker::inject_args(None), vec!["inject"]);
        assert_eq!(OpCliInvoker::inject_args(Some("")), vec!["inject"]);
    }

    #[test]
    fn args_with_account() {
        assert_eq!(
            OpCliInvoker::inject_args(Some("my.1password.com")),
            vec!["inject", "--account", "my.1password.com"]
        );
    }

    #[test]
    fn from_config_applies_timeout() {
        let config = CliConfig {
            op_path: "/opt/op".into(),
            timeout_secs: Some(7),
        };
        let invoker = OpCliInvoker::from_config(&config);
        assert_eq!(invoker.op_path(), "/opt/op");
        assert_eq!(invoker.timeout, Some(Duration::from_secs(7)));
    }

    #[tokio::test]
    async fn missing_binary_is_invocation_error_without_exit_code() {
        let invoker = OpCliInvoker::new("/nonexistent/opconf-test/op");
        let err = invoker.invoke(None, "A=\"op://x\"").await.unwrap_err();
        match err {
            OpconfError::Invocation { exit_code, stderr } => {
                assert_eq!(exit_code, None);
                assert!(stderr.contains("failed to start"));
            }
            other => panic!("expected invocation error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use serial_test::serial;
        use std::os::unix::fs::PermissionsExt;
        use std::path::PathBuf;

        fn script(dir: &tempfile::TempDir, body: &str) -> PathBuf {
            let path = dir.path().join("op");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn invoker(path: PathBuf) -> OpCliInvoker {
            OpCliInvoker::new(path.to_string_lossy().into_owned())
        }

        #[tokio::test]
        #[serial]
        async fn request_is_written_to_stdin() {
            let dir = tempfile::tempdir().unwrap();
            let op = invoker(script(&dir, "cat"));

            let output = op.invoke(None, "A:B=\"op://vault/item/field\"").await.unwrap();
            assert!(output.is_success());
            assert_eq!(output.stdout, "A:B=\"op://vault/item/field\"");
        }

        #[tokio::test]
        #[serial]
        async fn account_is_forwarded_as_arguments() {
            let dir = tempfile::tempdir().unwrap();
            let op = invoker(script(&dir, "echo \"$@\""));

            let output = op.invoke(Some("team.1password.com"), "").await.unwrap();
            assert_eq!(output.stdout.trim(), "inject --account team.1password.com");
        }

        #[tokio::test]
        #[serial]
        async fn nonzero_exit_is_reported_in_output() {
            let dir = tempfile::tempdir().unwrap();
            let op = invoker(script(&dir, "echo 'not signed in' >&2\nexit 3"));

            let output = op.invoke(None, "A=\"op://x\"").await.unwrap();
            assert_eq!(output.exit_code, Some(3));
            assert_eq!(output.stderr.trim(), "not signed in");
            assert!(!output.is_success());
        }

        #[tokio::test]
        #[serial]
        async fn large_batch_does_not_deadlock() {
            let dir = tempfile::tempdir().unwrap();
            let op = invoker(script(&dir, "cat"));
            let request = (0..5000)
                .map(|i| format!("Section:Key{i}=\"op://vault/item{i}/field\""))
                .collect::<Vec<_>>()
                .join("\n");

            let output = op.invoke(None, &request).await.unwrap();
            assert_eq!(output.stdout.len(), request.len());
        }

        #[tokio::test]
        #[serial]
        #[tracing_test::traced_test]
        async fn unread_request_is_logged() {
            let dir = tempfile::tempdir().unwrap();
            let op = invoker(script(&dir, "exit 2"));
            let request = "K=\"op://vault/item/field\"\n".repeat(40_000);

            let output = op.invoke(None, &request).await.unwrap();
            assert_eq!(output.exit_code, Some(2));
            assert!(logs_contain("op closed stdin before the full request was written"));
        }

        #[tokio::test]
        #[serial]
        async fn timeout_kills_slow_process() {
            let dir = tempfile::tempdir().unwrap();
            let op = invoker(script(&dir, "sleep 5")).with_timeout(Duration::from_millis(200));

            let err = op.invoke(None, "").await.unwrap_err();
            match err {
                OpconfError::Invocation { exit_code, stderr } => {
                    assert_eq!(exit_code, None);
                    assert!(stderr.contains("did not finish"));
                }
                other => panic!("expected invocation error, got {other:?}"),
            }
        }
    }

    /// Needs a signed-in `op` and `OPCONF_TEST_REFERENCE` pointing at a real secret.
    #[tokio::test]
    #[ignore]
    async fn live_op_inject() {
        let Ok(reference) = std::env::var("OPCONF_TEST_REFERENCE") else {
            return;
        };
        let output = OpCliInvoker::default()
            .invoke(None, &format!("Live=\"{reference}\""))
            .await
            .unwrap();
        assert!(output.is_success(), "stderr: {}", output.stderr);
        assert!(!output.stdout.contains(&reference));
    }
}
