//! Custom-tool descriptor type shared between the compiler and front-ends.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name + description + JSON Schema (draft-07) derived from a user-supplied
/// function definition by the custom-tool compiler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ToolDescriptor {
    /// The function's identifier.
    pub name: String,
    /// Function docstring, with a trailing `Returns: ...` line when present.
    pub description: String,
    /// Draft-07 JSON Schema document describing the function's arguments.
    pub input_schema: Value,
}
