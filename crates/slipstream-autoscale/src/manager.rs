//! Autoscaler reconciliation against the platform.

use std::sync::Arc;

use tracing::info;

use slipstream_platform::{AutoscalerHandle, ContainerPlatform};

use crate::error::AutoscaleResult;
use crate::resource::{render, AutoscalerSpec, ScaleTarget};

/// Creates, replaces, and deletes the horizontal autoscaler attached to a
/// controller.
pub struct AutoscalerManager<P> {
    platform: Arc<P>,
}

impl<P: ContainerPlatform> AutoscalerManager<P> {
    pub fn new(platform: Arc<P>) -> Self {
        Self { platform }
    }

    /// Render the manifest for `target` and create-or-replace it.
    pub async fn create_or_replace(
        &self,
        target: &ScaleTarget,
        spec: &AutoscalerSpec,
    ) -> AutoscaleResult<AutoscalerHandle> {
        let resource = render(target, spec)?;
        let yaml = resource.to_yaml()?;
        let handle = self.platform.create_or_replace_autoscaler(&yaml).await?;
        info!(
            autoscaler = %handle.name,
            api_version = %handle.api_version,
            "created or replaced autoscaler"
        );
        Ok(handle)
    }

    /// Delete the autoscaler for a controller. Used on rollback runs:
    /// a revision being retired never keeps its autoscaler.
    pub async fn delete(&self, name: &str) -> AutoscaleResult<()> {
        self.platform.delete_autoscaler(name).await?;
        info!(autoscaler = %name, "deleted autoscaler");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::CpuTarget;
    use slipstream_platform::MemoryPlatform;
    use std::collections::BTreeMap;

    fn target(name: &str) -> ScaleTarget {
        ScaleTarget {
            name: name.into(),
            kind: "ReplicationController".into(),
            api_version: "v1".into(),
            namespace: "default".into(),
            labels: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn create_then_delete() {
        let platform = Arc::new(MemoryPlatform::new());
        let manager = AutoscalerManager::new(platform.clone());

        let handle = manager
            .create_or_replace(
                &target("web-4"),
                &AutoscalerSpec::Cpu(CpuTarget {
                    min_instances: 1,
                    max_instances: 4,
                    target_cpu_utilization_percentage: 80,
                }),
            )
            .await
            .unwrap();
        assert_eq!(handle.name, "web-4");

        let stored = platform.autoscaler_manifest("web-4").await.unwrap();
        assert!(stored.contains("maxReplicas: 4"));

        manager.delete("web-4").await.unwrap();
        assert!(platform.autoscaler_manifest("web-4").await.is_none());
    }
}
