//! The facade: `execute`, `parse_tool`, and `execute_tool`, the three
//! operations every front-end is a thin adapter over.

use std::collections::BTreeMap;

use forge_core::{ExecutionResult, FileMap, ToolDescriptor};
use forge_executor::{ExecutionEngine, ExecutorConfig, ExecutorError};
use forge_orchestrator::OrchestratorAdapter;
use forge_pool::SandboxPool;
use forge_store::ObjectStore;
use forge_tool::{ParseErrors, ToolError};

use crate::config::Settings;
use crate::error::ServiceError;

/// Owns the execution engine and exposes the three facade operations.
///
/// Cheaply `Clone`-able: the engine's own constituents (`SandboxPool`,
/// `ObjectStore`) are themselves cheap handles over shared state.
#[derive(Clone)]
pub struct Facade {
    engine: ExecutionEngine,
}

impl Facade {
    /// Builds a facade from fully resolved settings: opens the object
    /// store, constructs the orchestrator adapter and sandbox pool, and
    /// wires them into one execution engine.
    ///
    /// # Errors
    /// Returns [`ServiceError::Store`] if the object store root cannot be
    /// created.
    pub async fn new(settings: &Settings) -> Result<Self, ServiceError> {
        let store = ObjectStore::open(settings.store_root.as_str()).await?;
        let orchestrator = OrchestratorAdapter::new(settings.orchestrator_binary.as_str());
        let pool = SandboxPool::new(orchestrator, settings.pool_config());
        let executor_config = ExecutorConfig {
            sandbox_port: settings.sandbox_port,
            request_timeout: settings.sandbox_request_timeout(),
        };
        let engine = ExecutionEngine::new(pool, store, executor_config);
        Ok(Self { engine })
    }

    /// Wraps an already-constructed execution engine directly, bypassing
    /// [`Settings`] — primarily useful in tests that assemble their own
    /// pool/store/config fixtures.
    #[must_use]
    pub fn from_engine(engine: ExecutionEngine) -> Self {
        Self { engine }
    }

    /// `execute(source, files) -> Result`, per spec §4.6.
    ///
    /// # Errors
    /// Returns [`ExecutorError`] for any sandbox, object-store, or
    /// orchestrator failure surviving retry.
    pub async fn execute(
        &self,
        source: &str,
        files: &FileMap,
        env: Option<&BTreeMap<String, String>>,
    ) -> Result<ExecutionResult, ExecutorError> {
        self.engine.execute(source, files, env).await
    }

    /// `parseTool(source) -> ToolDescriptor | ParseErrors`, per spec §4.6.
    ///
    /// # Errors
    /// Returns [`ParseErrors`] if `source` doesn't define a single
    /// annotated function with a supported signature.
    pub fn parse_tool(&self, source: &str) -> Result<ToolDescriptor, ParseErrors> {
        forge_tool::parse(source)
    }

    /// `executeTool(source, inputJson) -> outputJson | ToolExecError`, per
    /// spec §4.6.
    ///
    /// # Errors
    /// Returns [`ToolError`] if the tool source fails to parse, the
    /// sandboxed driver exits non-zero, or the underlying execution fails.
    pub async fn execute_tool(&self, source: &str, input_json: &str) -> Result<String, ToolError> {
        forge_tool::execute_tool(source, input_json, &self.engine).await
    }

    /// Current warm-pool depth (queue length, in-flight spawn count), for
    /// the health-check endpoint.
    pub async fn pool_depth(&self) -> (usize, usize) {
        let pool = self.engine.pool();
        (pool.queue_len().await, pool.spawning().await)
    }
}
