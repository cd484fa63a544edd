//! Errors produced by the object store.

use forge_core::CoreError;

/// Errors that can occur reading or writing blobs.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// A hash argument failed format validation.
    #[error("invalid hash: {0}")]
    Invalid(#[from] CoreError),

    /// The requested hash has no corresponding blob on disk.
    #[error("object not found: {hash}")]
    NotFound { hash: String },

    /// Underlying filesystem I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
