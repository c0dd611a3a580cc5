//! Error types for platform adapters.

use thiserror::Error;

/// Result type alias for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Errors that can occur while talking to a container platform.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("could not find a controller named {0}")]
    RevisionNotFound(String),

    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("platform provider error: {0}")]
    Provider(#[from] anyhow::Error),
}
