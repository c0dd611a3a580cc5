//! Resize plan assembly.

use serde::{Deserialize, Serialize};
use slipstream_platform::ActiveRevisions;
use tracing::debug;

use crate::error::PlanResult;
use crate::sequence::sequence_downsize;
use crate::spec::ResizeSpec;
use crate::target::desired_count;

/// Replica targets for one revision within a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionTarget {
    pub name: String,
    pub previous_count: u32,
    pub desired_count: u32,
}

/// The full plan for one resize: scale the new revision first, then drain
/// each old revision in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizePlan {
    pub new_revision: RevisionTarget,
    pub old_revisions: Vec<RevisionTarget>,
}

impl ResizePlan {
    /// Total desired instances across all plan entries. In the common
    /// (full-drain) path this equals the new revision's target.
    pub fn total_desired(&self) -> u32 {
        self.new_revision.desired_count
            + self
                .old_revisions
                .iter()
                .map(|t| t.desired_count)
                .sum::<u32>()
    }
}

/// Build the plan for a resize from the spec and current cluster state.
///
/// Pure and idempotent: the same spec and active map always produce the
/// same plan. Old-revision targets assume the new revision reaches its
/// full desired count; the executor re-sequences with the reached count
/// if the scale-up only partially succeeds.
pub fn build_plan(spec: &ResizeSpec, active: &ActiveRevisions) -> PlanResult<ResizePlan> {
    let active_total = if active.is_empty() {
        None
    } else {
        Some(active.total())
    };
    let desired = desired_count(spec, active_total)?;
    let previous = active.get(&spec.target_revision).unwrap_or(0);

    let new_revision = RevisionTarget {
        name: spec.target_revision.clone(),
        previous_count: previous,
        desired_count: desired,
    };
    let old_revisions = sequence_downsize(active, &spec.target_revision, desired, desired);

    debug!(
        service = %spec.service_name,
        revision = %new_revision.name,
        from = new_revision.previous_count,
        to = new_revision.desired_count,
        old_revisions = old_revisions.len(),
        "built resize plan"
    );

    Ok(ResizePlan {
        new_revision,
        old_revisions,
    })
}
