//! In-memory platform fake.
//!
//! Implements [`ContainerPlatform`] over a `tokio::sync::RwLock`-guarded
//! table of revisions. Used by unit and integration tests across the
//! workspace, and by dry-run tooling. Supports fault injection: revisions
//! whose replica count is unreadable, containers that never become ready,
//! and services with no routing object.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{PlatformError, PlatformResult};
use crate::provider::ContainerPlatform;
use crate::types::{ActiveRevisions, AutoscalerHandle, ContainerStatus};

#[derive(Debug, Clone)]
struct Revision {
    service: String,
    name: String,
    count: u32,
}

#[derive(Debug, Default)]
struct Inner {
    /// Revisions in discovery order (oldest first per service).
    revisions: Vec<Revision>,
    /// Stored autoscaler manifests keyed by metadata.name.
    autoscalers: HashMap<String, String>,
    /// Traffic-weight tables keyed by service name.
    routes: HashMap<String, BTreeMap<String, u32>>,
    /// Revisions whose replica count reads as unreadable.
    unreadable: HashSet<String>,
    /// Revision → readiness ceiling: containers at index >= ceiling never
    /// report ready. Simulates a stalled scale-up.
    stalled: HashMap<String, u32>,
    /// Revisions whose scale requests are rejected by the platform.
    rejecting: HashSet<String>,
}

/// An in-memory [`ContainerPlatform`].
///
/// `Clone` + `Send` + `Sync` (backed by `Arc`), so one instance can be
/// shared between a test and the orchestrator under test.
#[derive(Debug, Clone, Default)]
pub struct MemoryPlatform {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a revision with an initial active count.
    pub async fn seed_revision(&self, service: &str, name: &str, count: u32) {
        let mut inner = self.inner.write().await;
        inner.revisions.push(Revision {
            service: service.to_string(),
            name: name.to_string(),
            count,
        });
    }

    /// Make a revision's replica count unreadable.
    pub async fn mark_unreadable(&self, name: &str) {
        self.inner.write().await.unreadable.insert(name.to_string());
    }

    /// Containers of `name` at index >= `ceiling` never become ready.
    pub async fn stall_above(&self, name: &str, ceiling: u32) {
        self.inner
            .write()
            .await
            .stalled
            .insert(name.to_string(), ceiling);
    }

    /// Make the platform reject scale requests for a revision.
    pub async fn reject_scaling(&self, name: &str) {
        self.inner.write().await.rejecting.insert(name.to_string());
    }

    /// Install a traffic-weight table for a service.
    pub async fn set_traffic_weights(&self, service: &str, weights: BTreeMap<String, u32>) {
        self.inner
            .write()
            .await
            .routes
            .insert(service.to_string(), weights);
    }

    /// Stored autoscaler manifest, for assertions.
    pub async fn autoscaler_manifest(&self, name: &str) -> Option<String> {
        self.inner.read().await.autoscalers.get(name).cloned()
    }

    /// Current replica count of a revision, ignoring unreadability.
    pub async fn raw_count(&self, name: &str) -> Option<u32> {
        let inner = self.inner.read().await;
        inner
            .revisions
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.count)
    }
}

#[async_trait]
impl ContainerPlatform for MemoryPlatform {
    async fn active_revisions(&self, service: &str) -> PlatformResult<ActiveRevisions> {
        let inner = self.inner.read().await;
        Ok(inner
            .revisions
            .iter()
            .filter(|r| r.service == service && r.count > 0)
            .map(|r| (r.name.clone(), r.count))
            .collect())
    }

    async fn set_replica_count(&self, revision: &str, count: u32) -> PlatformResult<()> {
        let mut inner = self.inner.write().await;
        if inner.rejecting.contains(revision) {
            return Err(PlatformError::Provider(anyhow::anyhow!(
                "scale request for {revision} rejected"
            )));
        }
        let rev = inner
            .revisions
            .iter_mut()
            .find(|r| r.name == revision)
            .ok_or_else(|| PlatformError::RevisionNotFound(revision.to_string()))?;
        debug!(revision, from = rev.count, to = count, "set replica count");
        rev.count = count;
        Ok(())
    }

    async fn replica_count(&self, revision: &str) -> PlatformResult<Option<u32>> {
        let inner = self.inner.read().await;
        if inner.unreadable.contains(revision) {
            return Ok(None);
        }
        Ok(inner
            .revisions
            .iter()
            .find(|r| r.name == revision)
            .map(|r| r.count))
    }

    async fn ready_containers(&self, revision: &str) -> PlatformResult<Vec<ContainerStatus>> {
        let inner = self.inner.read().await;
        let rev = inner
            .revisions
            .iter()
            .find(|r| r.name == revision)
            .ok_or_else(|| PlatformError::RevisionNotFound(revision.to_string()))?;
        let ready_ceiling = inner.stalled.get(revision).copied().unwrap_or(rev.count);
        Ok((0..rev.count)
            .map(|i| ContainerStatus {
                host_id: format!("node-{}", i % 3),
                container_id: format!("{revision}-{i}"),
                ready: i < ready_ceiling,
            })
            .collect())
    }

    async fn create_or_replace_autoscaler(
        &self,
        manifest_yaml: &str,
    ) -> PlatformResult<AutoscalerHandle> {
        let doc: serde_yaml::Value = serde_yaml::from_str(manifest_yaml)
            .map_err(|e| PlatformError::InvalidManifest(e.to_string()))?;
        let str_at = |path: &[&str]| -> Option<String> {
            let mut node = &doc;
            for key in path {
                node = node.get(key)?;
            }
            node.as_str().map(str::to_string)
        };
        let name = str_at(&["metadata", "name"])
            .ok_or_else(|| PlatformError::InvalidManifest("metadata.name missing".into()))?;
        let handle = AutoscalerHandle {
            namespace: str_at(&["metadata", "namespace"]).unwrap_or_else(|| "default".into()),
            api_version: str_at(&["apiVersion"]).unwrap_or_else(|| "autoscaling/v1".into()),
            name: name.clone(),
        };
        self.inner
            .write()
            .await
            .autoscalers
            .insert(name, manifest_yaml.to_string());
        Ok(handle)
    }

    async fn delete_autoscaler(&self, name: &str) -> PlatformResult<()> {
        self.inner.write().await.autoscalers.remove(name);
        Ok(())
    }

    async fn traffic_weights(
        &self,
        service: &str,
    ) -> PlatformResult<Option<BTreeMap<String, u32>>> {
        Ok(self.inner.read().await.routes.get(service).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn active_revisions_skip_drained() {
        let platform = MemoryPlatform::new();
        platform.seed_revision("web", "web-0", 2).await;
        platform.seed_revision("web", "web-1", 0).await;
        platform.seed_revision("api", "api-0", 1).await;

        let active = platform.active_revisions("web").await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active.get("web-0"), Some(2));
    }

    #[tokio::test]
    async fn unreadable_revision_reads_none() {
        let platform = MemoryPlatform::new();
        platform.seed_revision("web", "web-0", 2).await;
        platform.mark_unreadable("web-0").await;

        assert_eq!(platform.replica_count("web-0").await.unwrap(), None);
        assert_eq!(platform.raw_count("web-0").await, Some(2));
    }

    #[tokio::test]
    async fn stalled_containers_never_ready() {
        let platform = MemoryPlatform::new();
        platform.seed_revision("web", "web-0", 1).await;
        platform.stall_above("web-0", 1).await;
        platform.set_replica_count("web-0", 3).await.unwrap();

        let containers = platform.ready_containers("web-0").await.unwrap();
        assert_eq!(containers.len(), 3);
        assert_eq!(containers.iter().filter(|c| c.ready).count(), 1);
    }

    #[tokio::test]
    async fn autoscaler_round_trip() {
        let platform = MemoryPlatform::new();
        let manifest = "apiVersion: autoscaling/v1\nkind: HorizontalPodAutoscaler\nmetadata:\n  name: web-hpa\n  namespace: prod\n";
        let handle = platform.create_or_replace_autoscaler(manifest).await.unwrap();
        assert_eq!(handle.name, "web-hpa");
        assert_eq!(handle.namespace, "prod");

        platform.delete_autoscaler("web-hpa").await.unwrap();
        assert!(platform.autoscaler_manifest("web-hpa").await.is_none());
    }
}
