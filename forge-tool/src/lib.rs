//! Custom-tool compiler: parses a user-submitted callable definition,
//! statically validates its shape, compiles a JSON Schema (draft-07) and
//! description for its arguments, and can drive its execution inside a
//! sandbox via a synthesized trampoline program.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod alias;
pub mod ast;
pub mod compiler;
pub mod docstring;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod schema;
pub mod trampoline;

use forge_core::FileMap;
use forge_executor::ExecutionEngine;

pub use compiler::parse;
pub use error::{ParseError, ParseErrors, ToolError, ToolExecError};

/// Parses `source`, synthesizes its trampoline driver with `input_json`
/// embedded, and runs it through `engine` with an empty file map.
///
/// # Errors
/// Returns [`ToolError::Parse`] if `source` doesn't define a single
/// annotated function, [`ToolError::Exec`] if the driver exits non-zero
/// inside the sandbox (carrying its stderr), or [`ToolError::Executor`] for
/// any other execution-engine failure.
pub async fn execute_tool(
    source: &str,
    input_json: &str,
    engine: &ExecutionEngine,
) -> Result<String, ToolError> {
    let tokens = lexer::tokenize(source)
        .map_err(|err| ParseErrors(vec![ParseError { message: err.message, pos: Some(err.pos) }]))?;
    let module = parser::parse(&tokens).map_err(|err| ParseErrors(vec![err]))?;

    let driver = trampoline::build(&module, source, input_json);
    let result = engine.execute(&driver, &FileMap::new(), None).await?;

    if result.exit_code != 0 {
        return Err(ToolExecError { stderr: result.stderr }.into());
    }
    Ok(result.stdout)
}
