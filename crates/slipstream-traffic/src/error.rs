//! Traffic and validation error types.

use thiserror::Error;

/// Result type alias for traffic-weight operations.
pub type TrafficResult<T> = Result<T, TrafficError>;

/// Errors that can occur while reading traffic state.
#[derive(Debug, Error)]
pub enum TrafficError {
    /// The routing object an active revision depends on does not exist.
    #[error("Virtual Service [{0}] not found")]
    RouteNotFound(String),

    #[error("platform error: {0}")]
    Platform(#[from] slipstream_platform::PlatformError),
}

/// Blue-green configuration problems, reported as a value rather than
/// thrown: the orchestrator converts one of these into a fatal transition
/// at its own boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("blue/green deployment is incompatible with a plain {0} service; \
             configure primary and stage services instead")]
    ServiceTypeMismatch(String),

    #[error("BlueGreenConfig is not specified")]
    MissingConfig,

    #[error("PrimaryService is not specified in BlueGreenConfig")]
    MissingPrimaryService,

    #[error("StageService is not specified in BlueGreenConfig")]
    MissingStageService,
}
