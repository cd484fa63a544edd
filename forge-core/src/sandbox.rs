//! Sandbox descriptor and lifecycle phase.

use serde::{Deserialize, Serialize};

/// Opaque metadata record returned by the orchestrator for a provisioned
/// sandbox. Treated as read-only once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct SandboxDescriptor {
    /// Orchestrator-assigned unique name.
    pub name: String,
    /// Network address (`host:port`) at which the sandbox's HTTP endpoint
    /// is reachable, once `Ready`.
    pub address: Option<String>,
    /// Current lifecycle phase as last observed from the orchestrator.
    pub phase: SandboxPhase,
}

/// Lifecycle phase of a sandbox, as tracked by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SandboxPhase {
    /// Created but not yet reachable.
    Pending,
    /// Reachable and available for exactly one execution.
    Ready,
    /// Scheduled for deletion; must not be handed out again.
    Terminating,
}
