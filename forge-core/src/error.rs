//! Shared error types for the Forge code-execution fabric.

/// Errors produced when validating or looking up core domain values.
///
/// These two variants correspond directly to the `Invalid` and `NotFound`
/// error kinds in the error-handling design: malformed input is surfaced
/// immediately and never retried, as is a missing object.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// A hash, path, or request payload failed validation.
    #[error("invalid value: {reason}")]
    Invalid { reason: String },

    /// A referenced object or resource does not exist.
    #[error("not found: {reason}")]
    NotFound { reason: String },
}
