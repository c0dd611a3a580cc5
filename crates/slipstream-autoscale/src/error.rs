//! Autoscaler error types.

use thiserror::Error;

/// Result type alias for autoscaler operations.
pub type AutoscaleResult<T> = Result<T, AutoscaleError>;

/// Errors that can occur while rendering or reconciling an autoscaler.
#[derive(Debug, Error)]
pub enum AutoscaleError {
    /// Configuration-class failure: bad runtime arguments.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The operator-supplied custom-metric YAML could not be used.
    #[error("couldn't parse horizontal autoscaler YAML: {0}")]
    InvalidYaml(String),

    #[error("platform error: {0}")]
    Platform(#[from] slipstream_platform::PlatformError),
}
