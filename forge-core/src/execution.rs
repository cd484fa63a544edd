//! Execution result type shared across the fabric.

use serde::{Deserialize, Serialize};

use crate::file_map::FileMap;

/// The outcome of executing a program inside a sandbox.
///
/// `files` reports only paths whose final hash differs from the input hash
/// for that path and is non-empty — see [`crate::file_map::changed_files`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ExecutionResult {
    /// Captured standard output, decoded as UTF-8.
    pub stdout: String,
    /// Captured standard error, decoded as UTF-8.
    pub stderr: String,
    /// Process exit code.
    pub exit_code: i32,
    /// Files created or modified in the workspace during this execution.
    pub files: FileMap,
}
