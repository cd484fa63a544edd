//! Absolute workspace path validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A validated absolute path inside a sandbox workspace.
///
/// Must begin with `/workspace/`, contain no `..` segments, and contain no
/// embedded NUL byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkspacePath(String);

const PREFIX: &str = "/workspace/";

impl WorkspacePath {
    /// Validates and wraps `s`.
    ///
    /// # Errors
    /// Returns [`CoreError::Invalid`] if `s` does not begin with `/workspace/`,
    /// contains a `..` segment, or contains a NUL byte.
    pub fn parse(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        if !s.starts_with(PREFIX) {
            return Err(CoreError::Invalid {
                reason: format!("path must begin with {PREFIX}: {s:?}"),
            });
        }
        if s.contains('\0') {
            return Err(CoreError::Invalid { reason: format!("path contains NUL: {s:?}") });
        }
        if s.split('/').any(|segment| segment == "..") {
            return Err(CoreError::Invalid {
                reason: format!("path contains a '..' segment: {s:?}"),
            });
        }
        Ok(Self(s))
    }

    /// Returns the path as a `&str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the path with the `/workspace/` prefix stripped, suitable for
    /// use as the relative path in the sandbox's `PUT`/`GET` routes.
    #[must_use]
    pub fn strip_workspace_prefix(&self) -> &str {
        self.0.strip_prefix(PREFIX).unwrap_or(&self.0)
    }
}

impl TryFrom<String> for WorkspacePath {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<WorkspacePath> for String {
    fn from(p: WorkspacePath) -> Self {
        p.0
    }
}

impl fmt::Display for WorkspacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_well_formed_path() {
        let path = WorkspacePath::parse("/workspace/file.txt").expect("valid path");
        assert_eq!(path.as_str(), "/workspace/file.txt");
    }

    #[test]
    fn parse_rejects_missing_prefix() {
        assert!(WorkspacePath::parse("/etc/passwd").is_err());
    }

    #[test]
    fn parse_rejects_dot_dot() {
        assert!(WorkspacePath::parse("/workspace/../etc/passwd").is_err());
    }

    #[test]
    fn parse_rejects_nul_byte() {
        assert!(WorkspacePath::parse("/workspace/a\0b").is_err());
    }

    #[test]
    fn strip_workspace_prefix_returns_relative_suffix() {
        let path = WorkspacePath::parse("/workspace/dir/file.txt").expect("valid path");
        assert_eq!(path.strip_workspace_prefix(), "dir/file.txt");
    }
}
