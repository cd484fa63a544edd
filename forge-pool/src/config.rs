//! Sandbox pool configuration.

/// Static configuration for a [`crate::SandboxPool`].
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Container image reference new sandboxes are created from.
    pub image: String,
    /// Target warm-queue length: `acquire` tries to keep this many ready
    /// sandboxes available at all times.
    pub target_len: usize,
    /// Label applied to every sandbox this pool spawns, so the orchestrator
    /// can garbage-collect them by ownership when the service terminates.
    pub owner_label: String,
}

impl PoolConfig {
    #[must_use]
    pub fn new(image: impl Into<String>, target_len: usize, owner_label: impl Into<String>) -> Self {
        Self { image: image.into(), target_len, owner_label: owner_label.into() }
    }
}
