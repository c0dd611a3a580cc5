//! slipstream-plan — turns a scaling request into a concrete resize plan.
//!
//! Planning is pure: given a [`ResizeSpec`] and the currently active
//! revisions of a service, it produces a [`ResizePlan`] naming the new
//! revision's target and an ordered list of old-revision drain targets.
//! Re-planning with unchanged inputs yields an identical plan; execution
//! against a live platform is someone else's problem (`slipstream-rollout`).
//!
//! # Components
//!
//! - **`spec`** — `ResizeSpec`, the immutable per-run scaling request
//! - **`target`** — desired-count math (fixed / percentage / count)
//! - **`sequence`** — ordered old-revision downsize sequencing
//! - **`plan`** — `ResizePlan` assembly from the two above

pub mod error;
pub mod plan;
pub mod sequence;
pub mod spec;
pub mod target;

pub use error::{PlanError, PlanResult};
pub use plan::{build_plan, ResizePlan, RevisionTarget};
pub use sequence::sequence_downsize;
pub use spec::{InstanceUnit, ResizeSpec};
pub use target::desired_count;
