//! slipstream-autoscale — horizontal autoscaler management.
//!
//! Renders the autoscaler resource attached to the controller being
//! resized, either from an operator-supplied custom-metric YAML (runtime
//! identity fields overwritten, `metrics` preserved verbatim) or as a basic
//! `autoscaling/v1` CPU-utilization manifest, and reconciles it through the
//! platform capability.
//!
//! # Components
//!
//! - **`resource`** — `AutoscalerSpec`, `ScaleTarget`, rendering to a manifest
//! - **`manager`** — `AutoscalerManager` create-or-replace / delete

pub mod error;
pub mod manager;
pub mod resource;

pub use error::{AutoscaleError, AutoscaleResult};
pub use manager::AutoscalerManager;
pub use resource::{render, AutoscalerResource, AutoscalerSpec, CpuTarget, ScaleTarget};
