//! Axum route handlers for the Forge gateway API.

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use forge_core::FileMap;
use forge_service::Facade;
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::instrument;
use uuid::Uuid;

use crate::error::GatewayError;

// ── Request / response types ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExecuteBody {
    pub source_code: String,
    #[serde(default)]
    pub files: FileMap,
    #[serde(default)]
    pub env: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub files: FileMap,
}

#[derive(Debug, Deserialize)]
pub struct ParseCustomToolBody {
    pub tool_source_code: String,
}

#[derive(Debug, Deserialize)]
pub struct ExecuteCustomToolBody {
    pub tool_source_code: String,
    pub tool_input_json: serde_json::Value,
    #[serde(default)]
    pub env: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Serialize)]
pub struct ExecuteCustomToolResponse {
    pub tool_output_json: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub queue_len: usize,
    pub spawning: usize,
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the application router over a shared facade.
pub fn create_router(facade: Facade) -> Router {
    Router::new()
        .route("/v1/execute", post(execute))
        .route("/v1/parse-custom-tool", post(parse_custom_tool))
        .route("/v1/execute-custom-tool", post(execute_custom_tool))
        .route("/health", get(health))
        .with_state(facade)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /health` — liveness probe reporting warm-pool depth.
pub async fn health(State(facade): State<Facade>) -> impl IntoResponse {
    let (queue_len, spawning) = facade.pool_depth().await;
    Json(HealthResponse { status: "ok", queue_len, spawning })
}

/// `POST /v1/execute` — run source code against a workspace snapshot.
///
/// # Errors
/// Returns [`GatewayError::Executor`] if the sandbox execution fails after
/// retries are exhausted.
#[instrument(skip(facade, body), fields(request_id = %Uuid::new_v4()))]
pub async fn execute(
    State(facade): State<Facade>,
    Json(body): Json<ExecuteBody>,
) -> Result<impl IntoResponse, GatewayError> {
    let result = facade.execute(&body.source_code, &body.files, body.env.as_ref()).await?;
    Ok(Json(ExecuteResponse {
        stdout: result.stdout,
        stderr: result.stderr,
        exit_code: result.exit_code,
        files: result.files,
    }))
}

/// `POST /v1/parse-custom-tool` — compile a tool function into its JSON
/// Schema descriptor.
///
/// # Errors
/// Returns [`GatewayError::ToolParse`] if the tool source does not define a
/// single annotated function with a supported signature.
#[instrument(skip(facade, body), fields(request_id = %Uuid::new_v4()))]
pub async fn parse_custom_tool(
    State(facade): State<Facade>,
    Json(body): Json<ParseCustomToolBody>,
) -> Result<impl IntoResponse, GatewayError> {
    let descriptor = facade.parse_tool(&body.tool_source_code)?;
    Ok((StatusCode::OK, Json(descriptor)))
}

/// `POST /v1/execute-custom-tool` — run a tool function's trampoline and
/// return its JSON output.
///
/// # Errors
/// Returns [`GatewayError::ToolParse`] if the source fails to parse,
/// [`GatewayError::ToolExec`] if the sandboxed driver exits non-zero, or
/// [`GatewayError::Executor`] for any other execution failure.
#[instrument(skip(facade, body), fields(request_id = %Uuid::new_v4()))]
pub async fn execute_custom_tool(
    State(facade): State<Facade>,
    Json(body): Json<ExecuteCustomToolBody>,
) -> Result<impl IntoResponse, GatewayError> {
    let input_json = body.tool_input_json.to_string();
    let output = facade.execute_tool(&body.tool_source_code, &input_json).await?;
    let tool_output_json: serde_json::Value = serde_json::from_str(&output)
        .map_err(|err| GatewayError::InvalidRequest(format!("tool produced invalid JSON: {err}")))?;
    Ok((StatusCode::OK, Json(ExecuteCustomToolResponse { tool_output_json })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use forge_executor::ExecutorConfig;
    use forge_orchestrator::OrchestratorAdapter;
    use forge_pool::{PoolConfig, SandboxPool};
    use forge_store::ObjectStore;
    use tower::ServiceExt;

    async fn test_facade() -> Facade {
        let tmp = std::env::temp_dir().join(format!("forge-gateway-test-{}", Uuid::new_v4()));
        let store = ObjectStore::open(tmp).await.expect("open store");
        let orchestrator = OrchestratorAdapter::new("/bin/false");
        let pool = SandboxPool::new(orchestrator, PoolConfig::new("test-image", 0, "test"));
        let engine = forge_executor::ExecutionEngine::new(pool, store, ExecutorConfig::default());
        Facade::from_engine(engine)
    }

    #[tokio::test]
    async fn health_reports_status_and_pool_depth() {
        let app = create_router(test_facade().await);
        let req = Request::builder().uri("/health").body(Body::empty()).expect("build request");
        let resp = app.oneshot(req).await.expect("handler error");
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.expect("read body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("valid json");
        assert_eq!(body["status"], "ok");
        assert_eq!(body["queue_len"], 0);
    }
}
