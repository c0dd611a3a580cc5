//! Per-revision scaling with a steady-state wait.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use slipstream_plan::RevisionTarget;
use slipstream_platform::{
    ContainerInstanceResult, ContainerPlatform, ContainerRunStatus, ContainerStatus,
};

use crate::error::{RolloutError, RolloutResult};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// What one scale step observed by the time it stopped waiting.
#[derive(Debug, Clone)]
pub struct ScaleOutcome {
    pub revision: String,
    /// Per-container results; containers that never became ready carry
    /// FAILURE, freshly created ones are tagged `new_instance`.
    pub results: Vec<ContainerInstanceResult>,
    /// Containers observed ready when the wait ended.
    pub ready_count: u32,
    /// True when all `desired_count` containers reached ready in time.
    pub completed: bool,
}

/// Drives the platform to a revision's target count and polls until steady
/// state, timeout, or cancellation.
pub struct ControllerScaler<P> {
    platform: Arc<P>,
    poll_interval: Duration,
}

impl<P: ContainerPlatform> ControllerScaler<P> {
    pub fn new(platform: Arc<P>) -> Self {
        Self {
            platform,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Execute one plan entry: issue the resize, then hold for steady state.
    ///
    /// A timeout or cancellation is a per-revision failure reported through
    /// [`ScaleOutcome`], not an `Err`: applied scaling stays applied, and
    /// the caller decides what the aggregate status becomes. `Err` is
    /// reserved for states where proceeding would be unsafe — an unreadable
    /// current count before a scale-up, or the platform rejecting the
    /// request outright.
    pub async fn scale(
        &self,
        target: &RevisionTarget,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> RolloutResult<ScaleOutcome> {
        match self.resize(target).await? {
            Some(outcome) => Ok(outcome),
            None => self.await_steady_state(target, timeout, cancel).await,
        }
    }

    /// Issue the resize request for one plan entry.
    ///
    /// Returns `Some` with the immediate outcome when the revision already
    /// sits at its target and no steady-state wait is needed; `None` means
    /// the request was accepted and [`await_steady_state`] should follow.
    ///
    /// [`await_steady_state`]: ControllerScaler::await_steady_state
    pub async fn resize(&self, target: &RevisionTarget) -> RolloutResult<Option<ScaleOutcome>> {
        let scaling_up = target.desired_count > target.previous_count;

        if scaling_up {
            // An unreadable base state blocks any safe target computation.
            let current = self.platform.replica_count(&target.name).await?;
            if current.is_none() {
                return Err(RolloutError::UnreadableState(target.name.clone()));
            }
        }

        if target.previous_count == target.desired_count {
            info!(
                revision = %target.name,
                count = target.previous_count,
                "revision stays at current instance count"
            );
            let containers = self.platform.ready_containers(&target.name).await?;
            return Ok(Some(self.outcome_from(target, &containers)));
        }

        info!(
            revision = %target.name,
            from = target.previous_count,
            to = target.desired_count,
            "resizing revision"
        );
        self.platform
            .set_replica_count(&target.name, target.desired_count)
            .await?;
        Ok(None)
    }

    /// Poll the revision until steady state, timeout, or cancellation.
    pub async fn await_steady_state(
        &self,
        target: &RevisionTarget,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> RolloutResult<ScaleOutcome> {
        let deadline = Instant::now() + timeout;
        let mut containers;
        loop {
            containers = self.platform.ready_containers(&target.name).await?;
            let ready = containers.iter().filter(|c| c.ready).count() as u32;
            if containers.len() as u32 == target.desired_count && ready == target.desired_count {
                debug!(revision = %target.name, ready, "revision reached steady state");
                break;
            }
            if Instant::now() >= deadline {
                warn!(
                    revision = %target.name,
                    ready,
                    desired = target.desired_count,
                    "timed out waiting for steady state"
                );
                break;
            }
            tokio::select! {
                _ = cancel.cancelled() => {
                    warn!(revision = %target.name, "steady-state wait cancelled");
                    break;
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        Ok(self.outcome_from(target, &containers))
    }

    /// Fold the last observed container set into per-container results.
    fn outcome_from(&self, target: &RevisionTarget, containers: &[ContainerStatus]) -> ScaleOutcome {
        let mut results: Vec<ContainerInstanceResult> = containers
            .iter()
            .enumerate()
            .map(|(index, c)| ContainerInstanceResult {
                host_id: c.host_id.clone(),
                container_id: c.container_id.clone(),
                status: if c.ready {
                    ContainerRunStatus::Success
                } else {
                    ContainerRunStatus::Failure
                },
                new_instance: index as u32 >= target.previous_count,
            })
            .collect();

        // Containers the platform never materialized count as failures too.
        for index in containers.len() as u32..target.desired_count {
            results.push(ContainerInstanceResult {
                host_id: String::new(),
                container_id: format!("{}-{}", target.name, index),
                status: ContainerRunStatus::Failure,
                new_instance: index >= target.previous_count,
            });
        }

        let ready_count = containers.iter().filter(|c| c.ready).count() as u32;
        ScaleOutcome {
            revision: target.name.clone(),
            completed: containers.len() as u32 == target.desired_count
                && ready_count >= target.desired_count,
            ready_count,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slipstream_platform::MemoryPlatform;

    fn target(name: &str, previous: u32, desired: u32) -> RevisionTarget {
        RevisionTarget {
            name: name.into(),
            previous_count: previous,
            desired_count: desired,
        }
    }

    fn scaler(platform: &Arc<MemoryPlatform>) -> ControllerScaler<MemoryPlatform> {
        ControllerScaler::new(platform.clone()).with_poll_interval(Duration::from_millis(50))
    }

    #[tokio::test]
    async fn scale_up_tags_new_instances() {
        let platform = Arc::new(MemoryPlatform::new());
        platform.seed_revision("web", "web-1", 1).await;

        let outcome = scaler(&platform)
            .scale(
                &target("web-1", 1, 3),
                Duration::from_secs(5),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(outcome.completed);
        assert_eq!(outcome.results.len(), 3);
        assert!(!outcome.results[0].new_instance);
        assert!(outcome.results[1].new_instance);
        assert!(outcome.results[2].new_instance);
        assert!(outcome
            .results
            .iter()
            .all(|r| r.status == ContainerRunStatus::Success));
    }

    #[tokio::test]
    async fn unreadable_count_blocks_scale_up() {
        let platform = Arc::new(MemoryPlatform::new());
        platform.seed_revision("web", "web-1", 1).await;
        platform.mark_unreadable("web-1").await;

        let err = scaler(&platform)
            .scale(
                &target("web-1", 1, 2),
                Duration::from_secs(5),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RolloutError::UnreadableState(_)));
        // No mutation was attempted.
        assert_eq!(platform.raw_count("web-1").await, Some(1));
    }

    #[tokio::test]
    async fn unreadable_count_does_not_block_drain() {
        let platform = Arc::new(MemoryPlatform::new());
        platform.seed_revision("web", "web-0", 2).await;
        platform.mark_unreadable("web-0").await;

        let outcome = scaler(&platform)
            .scale(
                &target("web-0", 2, 0),
                Duration::from_secs(5),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert!(outcome.completed);
        assert_eq!(platform.raw_count("web-0").await, Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_reports_per_container_failures() {
        let platform = Arc::new(MemoryPlatform::new());
        platform.seed_revision("web", "web-1", 1).await;
        platform.stall_above("web-1", 1).await;

        let outcome = scaler(&platform)
            .scale(
                &target("web-1", 1, 3),
                Duration::from_secs(10),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(!outcome.completed);
        assert_eq!(outcome.ready_count, 1);
        assert_eq!(outcome.results.len(), 3);
        assert_eq!(outcome.results[0].status, ContainerRunStatus::Success);
        assert_eq!(outcome.results[1].status, ContainerRunStatus::Failure);
        assert_eq!(outcome.results[2].status, ContainerRunStatus::Failure);
        // Applied scaling stays applied.
        assert_eq!(platform.raw_count("web-1").await, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_aborts_the_wait() {
        let platform = Arc::new(MemoryPlatform::new());
        platform.seed_revision("web", "web-1", 0).await;
        platform.stall_above("web-1", 0).await;

        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = scaler(&platform)
            .scale(&target("web-1", 0, 2), Duration::from_secs(600), &cancel)
            .await
            .unwrap();
        assert!(!outcome.completed);
        assert_eq!(outcome.ready_count, 0);
    }

    #[tokio::test]
    async fn unchanged_count_short_circuits() {
        let platform = Arc::new(MemoryPlatform::new());
        platform.seed_revision("web", "web-1", 2).await;

        let outcome = scaler(&platform)
            .scale(
                &target("web-1", 2, 2),
                Duration::from_secs(5),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert!(outcome.completed);
        assert_eq!(outcome.results.len(), 2);
        assert!(outcome.results.iter().all(|r| !r.new_instance));
    }
}
