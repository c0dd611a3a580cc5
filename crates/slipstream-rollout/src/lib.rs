//! slipstream-rollout — executes a resize plan against a container platform.
//!
//! This is the stateful half of the resize engine. `slipstream-plan`
//! decides *what* the replica counts should be; this crate drives the
//! platform there: scale the new revision up, hold for steady state under
//! a timeout-bound cancellable poll, drain old revisions best-effort, then
//! reconcile the autoscaler and staged-traffic state.
//!
//! # Components
//!
//! - **`scaler`** — per-revision scale + steady-state wait
//! - **`orchestrator`** — the resize phase machine
//! - **`execution`** — terminal status and execution data for the caller
//!
//! Ordering invariant: the new revision always reaches its target (or its
//! partial best) before any old revision is told to scale down.

pub mod error;
pub mod execution;
pub mod orchestrator;
pub mod scaler;

pub use error::{RolloutError, RolloutResult};
pub use execution::{
    CommandExecutionStatus, ContainerServiceData, ResizeExecutionData, ResizeOutcome, ResizePhase,
};
pub use orchestrator::{ResizeContext, ResizeOrchestrator};
pub use scaler::{ControllerScaler, ScaleOutcome};
