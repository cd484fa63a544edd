//! Errors produced by the orchestrator adapter.

/// Errors from issuing a command against the orchestrator CLI.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum OrchestratorError {
    /// The subcommand could not be spawned at all (binary missing, fork
    /// failure, …). Treated as transient — the binary or daemon may come
    /// back.
    #[error("failed to spawn orchestrator command: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// The subcommand exited non-zero. Carries the decoded stderr.
    #[error("orchestrator command exited with status {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    /// stdout was not valid UTF-8.
    #[error("orchestrator command produced non-UTF-8 output")]
    InvalidUtf8,

    /// JSON-returning command produced output that did not parse.
    #[error("failed to decode JSON output: {0}")]
    Decode(#[from] serde_json::Error),
}

impl OrchestratorError {
    /// Whether the outer retry loop (spawn sites, the execution engine)
    /// should retry this error. Spawn failures and non-zero exits may be
    /// transient (the orchestrator daemon restarting, a momentary quota
    /// blip); decode and UTF-8 errors indicate a persistent mismatch and
    /// never resolve by retrying.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::SpawnFailed(_) | Self::NonZeroExit { .. })
    }
}
