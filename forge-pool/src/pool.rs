//! Warm sandbox pool.

use std::collections::VecDeque;
use std::sync::Arc;

use forge_core::retry::{retry, DEFAULT_ATTEMPTS, DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY};
use forge_core::{SandboxDescriptor, SandboxPhase};
use forge_orchestrator::{Invocation, OrchestratorAdapter};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::lease::SandboxLease;

struct State {
    queue: VecDeque<SandboxDescriptor>,
    spawning: usize,
}

pub(crate) struct Inner {
    orchestrator: OrchestratorAdapter,
    config: PoolConfig,
    state: Mutex<State>,
}

impl Inner {
    async fn spawn_one(&self) -> Result<SandboxDescriptor, PoolError> {
        let name = format!("forge-sandbox-{}", Uuid::new_v4());
        let config = &self.config;
        let orchestrator = &self.orchestrator;

        retry(
            DEFAULT_ATTEMPTS,
            DEFAULT_BASE_DELAY,
            DEFAULT_MAX_DELAY,
            |err: &PoolError| matches!(err, PoolError::SpawnExhausted(_)),
            || async {
                let create = Invocation::new()
                    .arg("run")
                    .arg(&name)
                    .flag("image", config.image.as_str())
                    .flag("labels", format!("forge.owner={}", config.owner_label));
                let _descriptor: SandboxDescriptor = orchestrator
                    .invoke_json(create)
                    .await
                    .map_err(PoolError::SpawnExhausted)?;

                let wait = Invocation::new()
                    .arg("wait")
                    .arg(&name)
                    .flag("for", "condition=Ready")
                    .flag("timeout", "60s");
                orchestrator.invoke_text(wait).await.map_err(PoolError::SpawnExhausted)?;

                let get = Invocation::new().arg("get").arg(&name);
                let ready: SandboxDescriptor =
                    orchestrator.invoke_json(get).await.map_err(PoolError::SpawnExhausted)?;

                if ready.phase != SandboxPhase::Ready {
                    return Err(PoolError::NotReady {
                        name: name.clone(),
                        reason: format!("orchestrator reports phase {:?}", ready.phase),
                    });
                }
                Ok(ready)
            },
        )
        .await
    }

    pub(crate) async fn delete(&self, name: &str) -> Result<(), PoolError> {
        let invocation = Invocation::new().arg("delete").arg(name);
        self.orchestrator
            .invoke_text(invocation)
            .await
            .map(|_| ())
            .map_err(PoolError::SpawnExhausted)
    }
}

/// Maintains a warm FIFO queue of ready sandboxes, replenished asynchronously
/// as they are handed out.
#[derive(Clone)]
pub struct SandboxPool {
    inner: Arc<Inner>,
}

impl SandboxPool {
    /// Creates an empty pool. Call [`SandboxPool::replenish`] (or
    /// [`SandboxPool::acquire`], which triggers it implicitly) to start
    /// filling the warm queue.
    #[must_use]
    pub fn new(orchestrator: OrchestratorAdapter, config: PoolConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                orchestrator,
                config,
                state: Mutex::new(State { queue: VecDeque::new(), spawning: 0 }),
            }),
        }
    }

    /// Hands out one ready sandbox, spawning one synchronously if the queue
    /// is empty. Triggers a background replenishment either way. The
    /// returned [`SandboxLease`] schedules the sandbox's deletion when
    /// dropped — the pool never reuses a sandbox across executions.
    ///
    /// # Errors
    /// Returns [`PoolError::AcquireFailed`] if the queue was empty and the
    /// synchronous spawn also failed.
    pub async fn acquire(&self) -> Result<SandboxLease, PoolError> {
        let popped = {
            let mut state = self.inner.state.lock().await;
            state.queue.pop_front()
        };

        let descriptor = match popped {
            Some(descriptor) => descriptor,
            None => {
                debug!("warm queue empty, spawning sandbox synchronously");
                self.inner
                    .spawn_one()
                    .await
                    .map_err(|err| PoolError::AcquireFailed(Box::new(err)))?
            }
        };

        self.replenish();
        Ok(SandboxLease::new(descriptor, Arc::clone(&self.inner)))
    }

    /// Schedules replenishment on a detached background task. Safe to call
    /// concurrently with itself and with [`SandboxPool::acquire`]: the
    /// `to_spawn` computation and the `spawning` increment happen under a
    /// single lock hold, so the queue-plus-in-flight count never exceeds
    /// `target_len`.
    pub fn replenish(&self) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let to_spawn = {
                let mut state = inner.state.lock().await;
                let have = state.queue.len() + state.spawning;
                let target = inner.config.target_len;
                let to_spawn = target.saturating_sub(have);
                if to_spawn == 0 {
                    return;
                }
                state.spawning += to_spawn;
                to_spawn
            };

            info!(to_spawn, "replenishing sandbox pool");
            let mut tasks = Vec::with_capacity(to_spawn);
            for _ in 0..to_spawn {
                let inner = Arc::clone(&inner);
                tasks.push(tokio::spawn(async move { inner.spawn_one().await }));
            }

            for task in tasks {
                let outcome = task.await;
                let mut state = inner.state.lock().await;
                state.spawning -= 1;
                match outcome {
                    Ok(Ok(descriptor)) => state.queue.push_back(descriptor),
                    Ok(Err(err)) => warn!(error = %err, "sandbox replenishment spawn failed"),
                    Err(join_err) => warn!(error = %join_err, "sandbox replenishment task panicked"),
                }
            }
        });
    }

    /// Number of ready sandboxes currently sitting in the warm queue.
    pub async fn queue_len(&self) -> usize {
        self.inner.state.lock().await.queue.len()
    }

    /// Number of spawns currently in flight.
    pub async fn spawning(&self) -> usize {
        self.inner.state.lock().await.spawning
    }
}
