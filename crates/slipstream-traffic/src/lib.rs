//! slipstream-traffic — staged traffic weights and blue-green validation.
//!
//! For staged (canary-style) rollouts, traffic percentages are routed per
//! revision independently of replica counts. This crate surfaces the
//! current weight distribution for the orchestrator's decision logic and
//! validates blue-green service configuration before anything is scaled.
//! Weight *changes* are a separate, explicit operation layered on top of
//! replica scaling and are not performed here.
//!
//! # Components
//!
//! - **`weights`** — `TrafficWeightManager` current-state queries
//! - **`blue_green`** — service specs and pre-flight validation

pub mod blue_green;
pub mod error;
pub mod weights;

pub use blue_green::{validate_blue_green, BlueGreenConfig, ServiceSpecification, ServiceType};
pub use error::{TrafficError, TrafficResult, ValidationError};
pub use weights::TrafficWeightManager;
