//! Planning error types.

use thiserror::Error;

/// Result type alias for planning operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors that can occur while computing a resize plan.
///
/// All of these are configuration-class failures: non-retriable, reported
/// before any platform mutation is attempted.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
