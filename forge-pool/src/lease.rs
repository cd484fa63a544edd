//! Scoped sandbox lease returned by [`crate::SandboxPool::acquire`].

use std::ops::Deref;

use forge_core::SandboxDescriptor;
use tracing::warn;

use crate::pool::Inner;
use std::sync::Arc;

/// A sandbox handed out for exactly one execution.
///
/// Dropping the lease schedules deletion of the sandbox via the
/// orchestrator adapter in a detached background task — the pool never
/// reuses a sandbox across executions, and the caller never has to
/// remember to return it.
pub struct SandboxLease {
    descriptor: Option<SandboxDescriptor>,
    inner: Arc<Inner>,
}

impl SandboxLease {
    pub(crate) fn new(descriptor: SandboxDescriptor, inner: Arc<Inner>) -> Self {
        Self { descriptor: Some(descriptor), inner }
    }
}

impl Deref for SandboxLease {
    type Target = SandboxDescriptor;

    fn deref(&self) -> &Self::Target {
        self.descriptor.as_ref().expect("descriptor present for lease lifetime")
    }
}

impl Drop for SandboxLease {
    fn drop(&mut self) {
        let Some(descriptor) = self.descriptor.take() else {
            return;
        };
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            if let Err(err) = inner.delete(&descriptor.name).await {
                warn!(sandbox = %descriptor.name, error = %err, "failed to delete sandbox on lease release");
            }
        });
    }
}
