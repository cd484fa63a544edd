//! Errors produced by the sandbox pool.

/// Errors from provisioning or acquiring a sandbox.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PoolError {
    /// All spawn attempts for a sandbox were exhausted.
    #[error("failed to provision sandbox after retries: {0}")]
    SpawnExhausted(#[source] forge_orchestrator::OrchestratorError),

    /// The orchestrator never reported the sandbox as `Ready` within its wait budget.
    #[error("sandbox {name} did not become ready: {reason}")]
    NotReady { name: String, reason: String },

    /// The queue was drained and no spawn could satisfy a synchronous `acquire`.
    #[error("sandbox pool has no available sandbox and synchronous spawn failed: {0}")]
    AcquireFailed(#[source] Box<PoolError>),
}
