//! HTTP client for a sandbox's in-guest execution endpoint.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ExecutorError;

/// One file delta as reported by the sandbox's `/execute` response.
#[derive(Debug, Clone, Deserialize)]
pub struct FileDelta {
    pub path: String,
    pub old_hash: String,
    pub new_hash: String,
}

/// Body returned by the sandbox's `POST /execute`.
#[derive(Debug, Clone, Deserialize)]
pub struct SandboxExecuteResponse {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub files: Vec<FileDelta>,
}

#[derive(Debug, Serialize)]
struct ExecuteRequestBody<'a> {
    source_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    env: Option<&'a BTreeMap<String, String>>,
}

/// Thin `reqwest`-backed client for the three endpoints a sandbox exposes:
/// `PUT`/`GET /workspace/<path>` for file sync and `POST /execute` to run
/// the submitted source.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    http: reqwest::Client,
}

impl SandboxClient {
    /// Builds a client with the given per-request timeout.
    ///
    /// # Panics
    /// Panics if the underlying `reqwest` client cannot be constructed
    /// (only possible with an invalid TLS configuration, which this crate
    /// never sets).
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        #[allow(clippy::unwrap_used)]
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client with default TLS config always builds");
        Self { http }
    }

    /// `PUT`s `bytes` to `http://<addr>/workspace/<suffix>`.
    ///
    /// # Errors
    /// Returns [`ExecutorError::Http`] on a transport failure, or
    /// [`ExecutorError::SandboxRejected`] on a non-success status.
    pub async fn put_file(&self, addr: &str, suffix: &str, bytes: Vec<u8>) -> Result<(), ExecutorError> {
        let url = format!("http://{addr}/workspace/{suffix}");
        let response = self.http.put(&url).body(bytes).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ExecutorError::SandboxRejected { status, body });
        }
        Ok(())
    }

    /// `GET`s `http://<addr>/workspace/<suffix>` and returns the body bytes.
    ///
    /// # Errors
    /// Returns [`ExecutorError::Http`] on a transport failure, or
    /// [`ExecutorError::SandboxRejected`] on a non-success status.
    pub async fn get_file(&self, addr: &str, suffix: &str) -> Result<Vec<u8>, ExecutorError> {
        let url = format!("http://{addr}/workspace/{suffix}");
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ExecutorError::SandboxRejected { status, body });
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// `POST`s the source (and optional environment passthrough) to
    /// `http://<addr>/execute`.
    ///
    /// # Errors
    /// Returns [`ExecutorError::Http`] on a transport failure, or
    /// [`ExecutorError::SandboxRejected`] on a non-success status.
    pub async fn execute(
        &self,
        addr: &str,
        source_code: &str,
        env: Option<&BTreeMap<String, String>>,
    ) -> Result<SandboxExecuteResponse, ExecutorError> {
        let url = format!("http://{addr}/execute");
        let body = ExecuteRequestBody { source_code, env };
        let response = self.http.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(ExecutorError::SandboxRejected { status, body: text });
        }
        Ok(response.json().await?)
    }
}
