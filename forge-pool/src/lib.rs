//! Warm sandbox pool.
//!
//! Maintains a FIFO queue of pre-provisioned, `Ready` sandboxes so that
//! [`SandboxPool::acquire`] can usually hand one out without waiting on a
//! cold spawn. Every acquired sandbox is consumed by exactly one execution:
//! the returned [`SandboxLease`] schedules the sandbox's deletion when
//! dropped, and the pool immediately kicks off background replenishment to
//! keep the warm queue topped up.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
mod lease;
mod pool;

pub use config::PoolConfig;
pub use error::PoolError;
pub use lease::SandboxLease;
pub use pool::SandboxPool;

#[cfg(test)]
mod tests {
    use super::*;
    use forge_orchestrator::OrchestratorAdapter;

    fn test_pool() -> SandboxPool {
        // `/bin/false` always exits non-zero, so every orchestrator call
        // fails fast; these tests only exercise the counters, not a live
        // spawn.
        let orchestrator = OrchestratorAdapter::new("/bin/false");
        let config = PoolConfig::new("forge/sandbox:latest", 2, "forge-pool-test");
        SandboxPool::new(orchestrator, config)
    }

    #[tokio::test]
    async fn new_pool_starts_with_empty_queue() {
        let pool = test_pool();
        assert_eq!(pool.queue_len().await, 0);
        assert_eq!(pool.spawning().await, 0);
    }

    #[tokio::test]
    async fn acquire_with_empty_queue_and_failing_orchestrator_reports_acquire_failed() {
        let pool = test_pool();
        let result = pool.acquire().await;
        assert!(matches!(result, Err(PoolError::AcquireFailed(_))));
    }
}
