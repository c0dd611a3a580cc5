//! Terminal status and execution data handed back to the caller.
//!
//! The workflow layer attaches `ResizeExecutionData` to its execution
//! context so downstream steps (verification, UI) can read which revisions
//! moved and which containers are freshly created.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use slipstream_plan::RevisionTarget;
use slipstream_platform::ContainerInstanceResult;

/// Aggregate result of one resize execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandExecutionStatus {
    Success,
    Failure,
}

/// Phase of the resize state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizePhase {
    Validating,
    Planning,
    ScalingNew,
    WaitingSteadyState,
    ScalingOld,
    ReconcilingAutoscaler,
    ReconcilingTraffic,
    Succeeded,
    Failed,
}

/// Per-revision count movement, mirroring the plan for caller auditing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerServiceData {
    pub name: String,
    pub previous_count: u32,
    pub desired_count: u32,
}

impl From<&RevisionTarget> for ContainerServiceData {
    fn from(target: &RevisionTarget) -> Self {
        Self {
            name: target.name.clone(),
            previous_count: target.previous_count,
            desired_count: target.desired_count,
        }
    }
}

/// Everything the caller learns from a resize besides the status bit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeExecutionData {
    /// The new revision's movement (one entry in the common case).
    pub new_instance_data: Vec<ContainerServiceData>,
    /// Old-revision drains, in execution order.
    pub old_instance_data: Vec<ContainerServiceData>,
    /// Per-container results across all scale steps.
    pub container_infos: Vec<ContainerInstanceResult>,
    /// Traffic-weight distribution observed after scaling, when staged
    /// routing is enabled. Empty otherwise.
    pub traffic_weights: BTreeMap<String, u32>,
}

/// Terminal result of [`ResizeOrchestrator::execute`].
///
/// [`ResizeOrchestrator::execute`]: crate::orchestrator::ResizeOrchestrator::execute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeOutcome {
    pub status: CommandExecutionStatus,
    pub phase: ResizePhase,
    /// Human-readable reason when `status` is FAILURE.
    pub failure_reason: Option<String>,
    pub data: ResizeExecutionData,
}

impl ResizeOutcome {
    pub(crate) fn failed(reason: String, data: ResizeExecutionData) -> Self {
        Self {
            status: CommandExecutionStatus::Failure,
            phase: ResizePhase::Failed,
            failure_reason: Some(reason),
            data,
        }
    }

    pub(crate) fn succeeded(data: ResizeExecutionData) -> Self {
        Self {
            status: CommandExecutionStatus::Success,
            phase: ResizePhase::Succeeded,
            failure_reason: None,
            data,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == CommandExecutionStatus::Success
    }
}
