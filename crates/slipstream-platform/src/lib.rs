//! slipstream-platform — the container platform capability.
//!
//! Slipstream never talks to Kubernetes or ECS directly. Everything the
//! resize engine needs from a container backend is expressed as the
//! [`ContainerPlatform`] trait: revision discovery, replica-count reads and
//! writes, autoscaler CRUD, and traffic-weight queries. One adapter per
//! backend implements the trait; the planner and orchestrator are written
//! once against it.
//!
//! # Components
//!
//! - **`provider`** — The `ContainerPlatform` trait and its error type
//! - **`types`** — Shared domain types (`ActiveRevisions`, container results)
//! - **`memory`** — In-memory fake platform for tests and dry runs

pub mod error;
pub mod memory;
pub mod provider;
pub mod types;

pub use error::{PlatformError, PlatformResult};
pub use memory::MemoryPlatform;
pub use provider::ContainerPlatform;
pub use types::{
    ActiveRevisions, AutoscalerHandle, ContainerInstanceResult, ContainerRunStatus,
    ContainerStatus,
};
