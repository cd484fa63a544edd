//! Errors produced while loading configuration or constructing the facade.

/// Failures building or configuring a [`crate::Facade`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("failed to open object store: {0}")]
    Store(#[from] forge_store::StoreError),
}
