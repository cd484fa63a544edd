//! `CodeInterpreterService` implementation: validates the wire shapes the
//! HTTP front-end's extractors handle for free, then delegates to the
//! shared facade.

use std::collections::BTreeMap;

use forge_core::{FileMap, ObjectHash, WorkspacePath};
use forge_service::Facade;
use forge_tool::ToolError;
use tonic::{Request, Response, Status};
use tracing::instrument;
use uuid::Uuid;

use crate::proto::code_interpreter_service_server::CodeInterpreterService;
use crate::proto::{
    execute_custom_tool_response, parse_custom_tool_response, ExecuteCustomToolError,
    ExecuteCustomToolRequest, ExecuteCustomToolResponse, ExecuteCustomToolSuccess, ExecuteRequest,
    ExecuteResponse, ParseCustomToolError, ParseCustomToolRequest, ParseCustomToolResponse,
    ParseCustomToolSuccess,
};

/// Adapts the facade's three operations to the generated tonic server
/// trait.
#[derive(Clone)]
pub struct CodeInterpreterServiceImpl {
    facade: Facade,
}

impl CodeInterpreterServiceImpl {
    #[must_use]
    pub fn new(facade: Facade) -> Self {
        Self { facade }
    }
}

#[tonic::async_trait]
impl CodeInterpreterService for CodeInterpreterServiceImpl {
    #[instrument(skip(self, request), fields(request_id = %Uuid::new_v4()))]
    async fn execute(&self, request: Request<ExecuteRequest>) -> Result<Response<ExecuteResponse>, Status> {
        let req = request.into_inner();
        let files = parse_file_map(&req.files)?;

        let result = self
            .facade
            .execute(&req.source_code, &files, None)
            .await
            .map_err(|err| Status::internal(err.to_string()))?;

        Ok(Response::new(ExecuteResponse {
            stdout: result.stdout,
            stderr: result.stderr,
            exit_code: result.exit_code,
            files: render_file_map(&result.files),
        }))
    }

    #[instrument(skip(self, request), fields(request_id = %Uuid::new_v4()))]
    async fn parse_custom_tool(
        &self,
        request: Request<ParseCustomToolRequest>,
    ) -> Result<Response<ParseCustomToolResponse>, Status> {
        let req = request.into_inner();
        let result = match self.facade.parse_tool(&req.tool_source_code) {
            Ok(descriptor) => parse_custom_tool_response::Result::Success(ParseCustomToolSuccess {
                tool_name: descriptor.name,
                tool_input_schema_json: descriptor.input_schema.to_string(),
                tool_description: descriptor.description,
            }),
            Err(errors) => parse_custom_tool_response::Result::Error(ParseCustomToolError {
                error_messages: errors.messages(),
            }),
        };
        Ok(Response::new(ParseCustomToolResponse { result: Some(result) }))
    }

    #[instrument(skip(self, request), fields(request_id = %Uuid::new_v4()))]
    async fn execute_custom_tool(
        &self,
        request: Request<ExecuteCustomToolRequest>,
    ) -> Result<Response<ExecuteCustomToolResponse>, Status> {
        let req = request.into_inner();
        let result = match self.facade.execute_tool(&req.tool_source_code, &req.tool_input_json).await {
            Ok(output) => execute_custom_tool_response::Result::Success(ExecuteCustomToolSuccess {
                tool_output_json: output,
            }),
            Err(ToolError::Parse(errors)) => {
                return Err(Status::invalid_argument(errors.messages().join("; ")))
            }
            Err(ToolError::Exec(err)) => {
                execute_custom_tool_response::Result::Error(ExecuteCustomToolError { stderr: err.stderr })
            }
            Err(ToolError::Executor(err)) => return Err(Status::internal(err.to_string())),
        };
        Ok(Response::new(ExecuteCustomToolResponse { result: Some(result) }))
    }
}

fn parse_file_map(raw: &BTreeMap<String, String>) -> Result<FileMap, Status> {
    let mut files = FileMap::new();
    for (path, hash) in raw {
        let path = WorkspacePath::parse(path.clone())
            .map_err(|err| Status::invalid_argument(format!("invalid path {path:?}: {err}")))?;
        let hash = ObjectHash::parse(hash.clone())
            .map_err(|err| Status::invalid_argument(format!("invalid hash {hash:?}: {err}")))?;
        files.insert(path, hash);
    }
    Ok(files)
}

fn render_file_map(files: &FileMap) -> BTreeMap<String, String> {
    files.iter().map(|(path, hash)| (path.as_str().to_owned(), hash.as_str().to_owned())).collect()
}
