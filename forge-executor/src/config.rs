//! Execution engine configuration.

use std::time::Duration;

/// Default port the sandbox's HTTP endpoint listens on.
pub const DEFAULT_SANDBOX_PORT: u16 = 8000;

/// Default per-request timeout for sandbox HTTP calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Static configuration for an [`crate::ExecutionEngine`].
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Port the sandbox's HTTP endpoint listens on.
    pub sandbox_port: u16,
    /// Timeout applied to every sandbox HTTP call (upload, execute, download).
    pub request_timeout: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self { sandbox_port: DEFAULT_SANDBOX_PORT, request_timeout: DEFAULT_REQUEST_TIMEOUT }
    }
}
