//! Execution engine: runs one workspace against a warm sandbox end to end.

use std::collections::BTreeMap;

use forge_core::retry::{retry, DEFAULT_ATTEMPTS, DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY};
use forge_core::{changed_files, ExecutionResult, FileMap, ObjectHash, WorkspacePath};
use forge_pool::SandboxPool;
use forge_store::ObjectStore;
use futures::future::try_join_all;
use tracing::info;

use crate::client::SandboxClient;
use crate::config::ExecutorConfig;
use crate::error::ExecutorError;

/// Runs `execute(source, files) → Result` against a warm sandbox pool.
#[derive(Clone)]
pub struct ExecutionEngine {
    pool: SandboxPool,
    store: ObjectStore,
    client: SandboxClient,
    config: ExecutorConfig,
}

impl ExecutionEngine {
    #[must_use]
    pub fn new(pool: SandboxPool, store: ObjectStore, config: ExecutorConfig) -> Self {
        let client = SandboxClient::new(config.request_timeout);
        Self { pool, store, client, config }
    }

    /// The underlying sandbox pool, for callers reporting warm-queue depth.
    #[must_use]
    pub fn pool(&self) -> &SandboxPool {
        &self.pool
    }

    /// Executes `source` against the workspace described by `files`,
    /// wrapped in bounded retry (3 attempts, exponential backoff from 1s to
    /// 10s) restricted to transient sandbox-pool errors.
    ///
    /// # Errors
    /// Returns [`ExecutorError`] for any non-transient failure (a rejected
    /// sandbox HTTP call, an object-store failure, an invalid hash), or the
    /// last transient error if retries are exhausted.
    pub async fn execute(
        &self,
        source: &str,
        files: &FileMap,
        env: Option<&BTreeMap<String, String>>,
    ) -> Result<ExecutionResult, ExecutorError> {
        retry(
            DEFAULT_ATTEMPTS,
            DEFAULT_BASE_DELAY,
            DEFAULT_MAX_DELAY,
            ExecutorError::is_transient,
            || self.execute_once(source, files, env),
        )
        .await
    }

    async fn execute_once(
        &self,
        source: &str,
        files: &FileMap,
        env: Option<&BTreeMap<String, String>>,
    ) -> Result<ExecutionResult, ExecutorError> {
        let lease = self.pool.acquire().await?;
        let addr = lease
            .address
            .clone()
            .ok_or_else(|| ExecutorError::NoAddress { name: lease.name.clone() })?;
        let addr = with_port(&addr, self.config.sandbox_port);

        info!(sandbox = %lease.name, file_count = files.len(), "uploading workspace");
        let uploads = files.iter().map(|(path, hash)| self.upload_one(&addr, path, hash));
        try_join_all(uploads).await?;

        let response = self.client.execute(&addr, source, env).await?;

        let deltas: Vec<(WorkspacePath, Option<ObjectHash>, String)> = response
            .files
            .into_iter()
            .filter_map(|delta| {
                let path = WorkspacePath::parse(delta.path).ok()?;
                let old_hash = files.get(&path).cloned();
                Some((path, old_hash, delta.new_hash))
            })
            .collect();
        let changed = changed_files(deltas.iter().map(|(p, old, new)| (p, old.as_ref(), new.as_str())));

        info!(sandbox = %lease.name, changed = changed.len(), "downloading changed files");
        let downloads = changed.iter().map(|(path, hash)| self.download_one(&addr, path, hash));
        try_join_all(downloads).await?;

        Ok(ExecutionResult {
            stdout: response.stdout,
            stderr: response.stderr,
            exit_code: response.exit_code,
            files: changed,
        })
    }

    async fn upload_one(
        &self,
        addr: &str,
        path: &WorkspacePath,
        hash: &ObjectHash,
    ) -> Result<(), ExecutorError> {
        let bytes = self.store.read(hash).await?;
        let suffix = path.strip_workspace_prefix();
        self.client.put_file(addr, suffix, bytes).await
    }

    async fn download_one(
        &self,
        addr: &str,
        path: &WorkspacePath,
        hash: &ObjectHash,
    ) -> Result<(), ExecutorError> {
        if self.store.exists(hash).await {
            return Ok(());
        }
        let suffix = path.strip_workspace_prefix();
        let bytes = self.client.get_file(addr, suffix).await?;
        self.store.write(&bytes).await?;
        Ok(())
    }
}

fn with_port(addr: &str, port: u16) -> String {
    if addr.contains(':') {
        addr.to_owned()
    } else {
        format!("{addr}:{port}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_port_appends_default_port_when_address_is_bare_host() {
        assert_eq!(with_port("10.0.0.5", 8000), "10.0.0.5:8000");
    }

    #[test]
    fn with_port_leaves_explicit_port_untouched() {
        assert_eq!(with_port("10.0.0.5:9090", 8000), "10.0.0.5:9090");
    }
}
