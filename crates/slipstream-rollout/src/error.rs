//! Rollout error types.

use thiserror::Error;

/// Result type alias for rollout operations.
pub type RolloutResult<T> = Result<T, RolloutError>;

/// Errors that abort a resize run.
///
/// Per-revision scale timeouts are deliberately *not* here: those are
/// recorded as FAILURE results on the affected containers and folded into
/// the aggregate status, while already-applied steps stay applied.
#[derive(Debug, Error)]
pub enum RolloutError {
    /// Blue-green configuration failed pre-flight validation.
    #[error("{0}")]
    Validation(#[from] slipstream_traffic::ValidationError),

    /// The current replica count of a revision could not be read before a
    /// scale-up. Mutation is never attempted on an uncertain base state.
    #[error("could not read the current replica count of [{0}]; refusing to scale up")]
    UnreadableState(String),

    #[error(transparent)]
    Plan(#[from] slipstream_plan::PlanError),

    #[error(transparent)]
    Autoscale(#[from] slipstream_autoscale::AutoscaleError),

    #[error(transparent)]
    Traffic(#[from] slipstream_traffic::TrafficError),

    #[error("platform error: {0}")]
    Platform(#[from] slipstream_platform::PlatformError),
}
