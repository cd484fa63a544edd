//! Errors produced by the execution engine.

/// Errors from running one `execute` operation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ExecutorError {
    /// Failed to acquire a sandbox from the pool.
    #[error("sandbox pool error: {0}")]
    Pool(#[from] forge_pool::PoolError),

    /// The sandbox HTTP endpoint could not be reached, or the request
    /// itself failed at the transport layer.
    #[error("sandbox HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The sandbox's `/execute` endpoint responded with a non-success
    /// status. Carries the body for diagnostics.
    #[error("sandbox execute endpoint returned {status}: {body}")]
    SandboxRejected { status: u16, body: String },

    /// Object store read/write failure while staging or syncing files.
    #[error("object store error: {0}")]
    Store(#[from] forge_store::StoreError),

    /// A hash or path in the request or sandbox response failed validation.
    #[error("invalid value: {0}")]
    Invalid(#[from] forge_core::CoreError),

    /// The sandbox descriptor had no network address at hand-out time.
    #[error("sandbox {name} has no assigned network address")]
    NoAddress { name: String },
}

impl ExecutorError {
    /// Whether the outer `execute` retry loop should retry this error.
    /// Only sandbox-pool failures are transient; a rejected execute call,
    /// a store failure, or an invalid value will not resolve by retrying.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Pool(_))
    }
}
