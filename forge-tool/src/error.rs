//! Errors produced by the custom-tool compiler.

use std::fmt;

use crate::lexer::Position;

/// One parse or validation failure.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub pos: Option<Position>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pos {
            Some(pos) => write!(f, "{} ({pos})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// All violations accumulated while validating a tool function's shape,
/// returned together rather than failing on the first one.
#[derive(Debug, Clone, Default, thiserror::Error)]
#[error("tool source failed to parse: {}", messages_joined(.0))]
pub struct ParseErrors(pub Vec<ParseError>);

fn messages_joined(errors: &[ParseError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

impl ParseErrors {
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

/// The synthesized driver program exited non-zero inside the sandbox.
#[derive(Debug, Clone, thiserror::Error)]
#[error("tool execution failed: {stderr}")]
pub struct ToolExecError {
    pub stderr: String,
}

/// Everything that can go wrong running a custom tool end to end: the
/// source failing to parse, the sandbox driver exiting non-zero, or the
/// underlying execution engine failing outright.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ToolError {
    #[error(transparent)]
    Parse(#[from] ParseErrors),
    #[error(transparent)]
    Exec(#[from] ToolExecError),
    #[error(transparent)]
    Executor(#[from] forge_executor::ExecutorError),
}
