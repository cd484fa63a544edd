//! Error types for the gateway crate.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use forge_tool::ToolError;
use serde_json::json;

/// Errors that can occur during gateway request handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// The request body is malformed or contains invalid values.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The custom-tool source failed to parse or validate.
    #[error("tool source failed to parse: {0}")]
    ToolParse(#[from] forge_tool::ParseErrors),

    /// The custom-tool driver exited non-zero inside the sandbox.
    #[error("tool execution failed: {0}")]
    ToolExec(#[from] forge_tool::ToolExecError),

    /// An error propagated from the execution engine (sandbox, object
    /// store, or orchestrator).
    #[error("execution failed: {0}")]
    Executor(#[from] forge_executor::ExecutorError),
}

impl From<ToolError> for GatewayError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::Parse(errors) => Self::ToolParse(errors),
            ToolError::Exec(err) => Self::ToolExec(err),
            ToolError::Executor(err) => Self::Executor(err),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::ToolParse(_) | GatewayError::ToolExec(_) => StatusCode::BAD_REQUEST,
            GatewayError::Executor(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = match &self {
            GatewayError::ToolParse(errors) => json!({"error_messages": errors.messages()}),
            GatewayError::ToolExec(err) => json!({"stderr": err.stderr}),
            _ => json!({"error": self.to_string()}),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_request_maps_to_400() {
        let err = GatewayError::InvalidRequest("missing field".to_owned());
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn tool_parse_errors_map_to_400_with_messages() {
        let errors = forge_tool::ParseErrors(vec![forge_tool::ParseError {
            message: "bad shape".to_owned(),
            pos: None,
        }]);
        let err = GatewayError::from(errors);
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn tool_exec_error_maps_to_400_with_stderr() {
        let err = GatewayError::from(forge_tool::ToolExecError { stderr: "boom".to_owned() });
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
