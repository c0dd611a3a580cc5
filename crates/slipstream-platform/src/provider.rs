//! The `ContainerPlatform` capability trait.
//!
//! One implementation per backend (Kubernetes controllers, ECS services).
//! Every call is a discrete, idempotent-retriable request keyed by revision
//! name; implementations must be safe for concurrent use across independent
//! resize executions.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::PlatformResult;
use crate::types::{ActiveRevisions, AutoscalerHandle, ContainerStatus};

/// Operations the resize engine requires from a container backend.
#[async_trait]
pub trait ContainerPlatform: Send + Sync {
    /// All currently active revisions for a logical service, oldest first,
    /// excluding revisions with zero running instances.
    async fn active_revisions(&self, service: &str) -> PlatformResult<ActiveRevisions>;

    /// Set the replica count of one revision. Returns once the request is
    /// accepted; readiness is observed separately via [`ready_containers`].
    ///
    /// [`ready_containers`]: ContainerPlatform::ready_containers
    async fn set_replica_count(&self, revision: &str, count: u32) -> PlatformResult<()>;

    /// Current replica count of a revision. `None` means the controller
    /// cannot be read (absent or state unavailable) — callers must treat
    /// that as an unsafe base for any scale-up computation.
    async fn replica_count(&self, revision: &str) -> PlatformResult<Option<u32>>;

    /// Containers currently belonging to a revision, in stable index order,
    /// with their readiness state.
    async fn ready_containers(&self, revision: &str) -> PlatformResult<Vec<ContainerStatus>>;

    /// Create or replace a horizontal autoscaler from a rendered manifest.
    async fn create_or_replace_autoscaler(
        &self,
        manifest_yaml: &str,
    ) -> PlatformResult<AutoscalerHandle>;

    /// Delete the autoscaler with the given name. Deleting an absent
    /// autoscaler is a no-op.
    async fn delete_autoscaler(&self, name: &str) -> PlatformResult<()>;

    /// Current traffic-weight distribution for a service, keyed by
    /// revision/service name. `None` means the routing object itself
    /// (e.g. an Istio virtual service) does not exist.
    async fn traffic_weights(
        &self,
        service: &str,
    ) -> PlatformResult<Option<BTreeMap<String, u32>>>;
}
