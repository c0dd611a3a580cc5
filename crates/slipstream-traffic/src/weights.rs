//! Current traffic-weight state for staged rollouts.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use slipstream_platform::ContainerPlatform;

use crate::error::{TrafficError, TrafficResult};

/// Surfaces per-revision traffic percentages during a staged rollout.
///
/// When staged routing is disabled this manager is a no-op: traffic is
/// controlled solely by replica presence, and [`weights`] returns an empty
/// map without touching the platform.
///
/// [`weights`]: TrafficWeightManager::weights
pub struct TrafficWeightManager<P> {
    platform: Arc<P>,
    staged_routing_enabled: bool,
}

impl<P: ContainerPlatform> TrafficWeightManager<P> {
    pub fn new(platform: Arc<P>, staged_routing_enabled: bool) -> Self {
        Self {
            platform,
            staged_routing_enabled,
        }
    }

    /// Current weight distribution keyed by revision/service name.
    ///
    /// Absence of an entry for a name means 0%. Absence of the routing
    /// object itself is a configuration error, surfaced as
    /// [`TrafficError::RouteNotFound`].
    pub async fn weights(&self, service: &str) -> TrafficResult<BTreeMap<String, u32>> {
        if !self.staged_routing_enabled {
            return Ok(BTreeMap::new());
        }
        let weights = self
            .platform
            .traffic_weights(service)
            .await?
            .ok_or_else(|| TrafficError::RouteNotFound(service.to_string()))?;
        debug!(service, entries = weights.len(), "read traffic weights");
        Ok(weights)
    }

    /// Pre-flight check that the routing object for the active service
    /// exists before any scaling happens.
    pub async fn validate_route(&self, service: &str) -> TrafficResult<()> {
        if !self.staged_routing_enabled {
            return Ok(());
        }
        self.platform
            .traffic_weights(service)
            .await?
            .map(|_| ())
            .ok_or_else(|| TrafficError::RouteNotFound(service.to_string()))
    }

    /// Weight for one revision, defaulting absent entries to 0%.
    pub fn percent_for(weights: &BTreeMap<String, u32>, name: &str) -> u32 {
        weights.get(name).copied().unwrap_or(0)
    }
}
