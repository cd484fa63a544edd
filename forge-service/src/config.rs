//! Shared service configuration: defaults layered under an optional TOML
//! file, layered under `FORGE_`-prefixed environment variables.

use std::time::Duration;

use forge_pool::PoolConfig;
use serde::Deserialize;

use crate::error::ServiceError;

/// Fully resolved configuration for a running `forge-service` instance,
/// shared by both the HTTP and binary RPC front-ends.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Address the HTTP front-end binds to.
    pub http_listen_addr: String,
    /// Address the binary RPC front-end binds to.
    pub rpc_listen_addr: String,
    /// Path to the orchestrator CLI binary (e.g. `kubectl`).
    pub orchestrator_binary: String,
    /// Container image reference new sandboxes are created from.
    pub sandbox_image: String,
    /// Warm-pool target length.
    pub pool_target_len: usize,
    /// Label applied to every sandbox this service spawns.
    pub pool_owner_label: String,
    /// Local filesystem root for the content-addressed object store.
    pub store_root: String,
    /// Port the sandbox's HTTP surface listens on.
    pub sandbox_port: u16,
    /// Per-request timeout for sandbox HTTP calls, in seconds.
    pub sandbox_request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            http_listen_addr: "127.0.0.1:3456".to_owned(),
            rpc_listen_addr: "127.0.0.1:3457".to_owned(),
            orchestrator_binary: "kubectl".to_owned(),
            sandbox_image: "forge-sandbox:latest".to_owned(),
            pool_target_len: 4,
            pool_owner_label: "forge-service".to_owned(),
            store_root: "./forge-store-data".to_owned(),
            sandbox_port: 8000,
            sandbox_request_timeout_secs: 60,
        }
    }
}

impl Settings {
    /// Loads settings from built-in defaults, an optional `forge.toml` in
    /// the current directory, then `FORGE_`-prefixed environment variables,
    /// each layer overriding the previous.
    ///
    /// # Errors
    /// Returns [`ServiceError::Config`] if a present layer fails to parse or
    /// deserialize.
    pub fn load() -> Result<Self, ServiceError> {
        let defaults = Self::default();
        let built = config::Config::builder()
            .set_default("http_listen_addr", defaults.http_listen_addr)?
            .set_default("rpc_listen_addr", defaults.rpc_listen_addr)?
            .set_default("orchestrator_binary", defaults.orchestrator_binary)?
            .set_default("sandbox_image", defaults.sandbox_image)?
            .set_default("pool_target_len", defaults.pool_target_len as i64)?
            .set_default("pool_owner_label", defaults.pool_owner_label)?
            .set_default("store_root", defaults.store_root)?
            .set_default("sandbox_port", i64::from(defaults.sandbox_port))?
            .set_default("sandbox_request_timeout_secs", defaults.sandbox_request_timeout_secs as i64)?
            .add_source(config::File::with_name("forge").required(false))
            .add_source(config::Environment::with_prefix("FORGE").separator("_"))
            .build()?;
        Ok(built.try_deserialize()?)
    }

    #[must_use]
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(self.sandbox_image.clone(), self.pool_target_len, self.pool_owner_label.clone())
    }

    #[must_use]
    pub fn sandbox_request_timeout(&self) -> Duration {
        Duration::from_secs(self.sandbox_request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_internally_consistent() {
        let settings = Settings::default();
        assert_eq!(settings.pool_target_len, 4);
        assert_eq!(settings.sandbox_port, 8000);
    }

    #[test]
    fn load_succeeds_with_no_config_file_or_env_present() {
        let settings = Settings::load().expect("load should fall back to defaults");
        assert_eq!(settings.http_listen_addr, "127.0.0.1:3456");
    }
}
