//! Orchestrator CLI client: issues subcommands and decodes their output.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;

use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt as _;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::command::{FlagValue, Invocation};
use crate::error::OrchestratorError;

/// Thin async adapter over a container-orchestrator CLI binary (a
/// `kubectl`-shaped tool). Every call spawns a fresh subprocess; there is no
/// persistent connection to manage.
#[derive(Debug, Clone)]
pub struct OrchestratorAdapter {
    binary: PathBuf,
    default_flags: BTreeMap<String, FlagValue>,
}

impl OrchestratorAdapter {
    /// Creates an adapter that shells out to `binary`.
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into(), default_flags: BTreeMap::new() }
    }

    /// Sets a flag applied to every invocation unless overridden per-call.
    #[must_use]
    pub fn with_default_flag(mut self, key: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        self.default_flags.insert(key.into(), value.into());
        self
    }

    /// Runs `invocation` with `--output=json` appended and decodes stdout as `T`.
    ///
    /// # Errors
    /// Returns [`OrchestratorError::SpawnFailed`] if the binary cannot be
    /// started, [`OrchestratorError::NonZeroExit`] on a non-zero exit,
    /// [`OrchestratorError::InvalidUtf8`] if stdout is not UTF-8, or
    /// [`OrchestratorError::Decode`] if stdout is not valid JSON for `T`.
    pub async fn invoke_json<T: DeserializeOwned>(
        &self,
        invocation: Invocation,
    ) -> Result<T, OrchestratorError> {
        let invocation = invocation.flag("output", "json");
        let stdout = self.run(invocation).await?;
        serde_json::from_slice(&stdout).map_err(OrchestratorError::Decode)
    }

    /// Runs `invocation` and returns stdout decoded as UTF-8 text.
    ///
    /// # Errors
    /// Returns [`OrchestratorError::SpawnFailed`], [`OrchestratorError::NonZeroExit`],
    /// or [`OrchestratorError::InvalidUtf8`].
    pub async fn invoke_text(&self, invocation: Invocation) -> Result<String, OrchestratorError> {
        let stdout = self.run(invocation).await?;
        String::from_utf8(stdout).map_err(|_| OrchestratorError::InvalidUtf8)
    }

    /// Spawns `invocation` and returns the live child process with piped
    /// stdio, for callers that need to stream output (e.g. `exec` sessions)
    /// rather than wait for completion.
    ///
    /// # Errors
    /// Returns [`OrchestratorError::SpawnFailed`] if the binary cannot be started.
    pub fn exec_raw(&self, invocation: Invocation) -> Result<Child, OrchestratorError> {
        let args = invocation.render_args(&self.default_flags);
        debug!(binary = %self.binary.display(), ?args, "spawning streaming orchestrator command");
        Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(OrchestratorError::SpawnFailed)
    }

    async fn run(&self, invocation: Invocation) -> Result<Vec<u8>, OrchestratorError> {
        let args = invocation.render_args(&self.default_flags);
        let stdin_payload = invocation.stdin.clone();
        debug!(binary = %self.binary.display(), ?args, "spawning orchestrator command");

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(OrchestratorError::SpawnFailed)?;

        if let Some(payload) = stdin_payload {
            let mut stdin = child.stdin.take().expect("stdin was piped");
            stdin.write_all(&payload).await.map_err(OrchestratorError::SpawnFailed)?;
            drop(stdin);
        } else {
            drop(child.stdin.take());
        }

        let output = child.wait_with_output().await.map_err(OrchestratorError::SpawnFailed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            warn!(code = ?output.status.code(), %stderr, "orchestrator command exited non-zero");
            return Err(OrchestratorError::NonZeroExit { code: output.status.code(), stderr });
        }

        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[tokio::test]
    async fn invoke_text_returns_stdout_on_success() {
        let adapter = OrchestratorAdapter::new("/bin/echo");
        let text = adapter.invoke_text(Invocation::new().arg("hello")).await.expect("invoke");
        assert_eq!(text.trim(), "hello");
    }

    #[tokio::test]
    async fn invoke_text_non_zero_exit_is_non_zero_exit_error() {
        let adapter = OrchestratorAdapter::new("/bin/false");
        let result = adapter.invoke_text(Invocation::new()).await;
        assert!(matches!(result, Err(OrchestratorError::NonZeroExit { .. })));
    }

    #[tokio::test]
    async fn invoke_text_missing_binary_is_spawn_failed() {
        let adapter = OrchestratorAdapter::new("/does/not/exist/forge-orch-binary");
        let result = adapter.invoke_text(Invocation::new()).await;
        assert!(matches!(result, Err(OrchestratorError::SpawnFailed(_))));
    }

    #[tokio::test]
    async fn invoke_json_decodes_stdout() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Payload {
            ok: bool,
        }
        // `sh -c cat` ignores the trailing --output=json (an unused shell
        // positional parameter) and just relays stdin, standing in for a
        // real CLI's --output=json handling in this offline test.
        let adapter = OrchestratorAdapter::new("/bin/sh");
        let invocation = Invocation::new()
            .arg("-c")
            .arg("cat")
            .stdin(crate::command::StdinInput::Text(r#"{"ok":true}"#.to_owned()));
        let payload: Payload = adapter.invoke_json(invocation).await.expect("decode");
        assert_eq!(payload, Payload { ok: true });
    }

    #[test]
    fn is_transient_distinguishes_decode_from_spawn_errors() {
        let decode_err = OrchestratorError::Decode(serde_json::from_str::<()>("not json").unwrap_err());
        assert!(!decode_err.is_transient());
    }
}
