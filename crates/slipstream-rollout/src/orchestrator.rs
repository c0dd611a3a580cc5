//! The resize phase machine.
//!
//! One `execute` call is one resize: validation, planning, scale-up of the
//! new revision, best-effort drain of old revisions, then autoscaler and
//! traffic reconciliation. Validation and planning fail fast, before any
//! mutation; scaling failures are fail-soft per step but fail-closed for
//! the aggregate status. Nothing is ever auto-reverted — recovery is a
//! follow-up run with `rollback = true` and the inverse plan.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use slipstream_autoscale::{AutoscalerManager, AutoscalerSpec, ScaleTarget};
use slipstream_plan::{build_plan, sequence_downsize, ResizePlan, ResizeSpec, RevisionTarget};
use slipstream_platform::ContainerPlatform;
use slipstream_traffic::{
    validate_blue_green, BlueGreenConfig, ServiceType, TrafficWeightManager,
};

use crate::error::RolloutResult;
use crate::execution::{
    CommandExecutionStatus, ContainerServiceData, ResizeExecutionData, ResizeOutcome, ResizePhase,
};
use crate::scaler::ControllerScaler;

/// Cluster/account context the caller resolved for this execution.
#[derive(Debug, Clone, Default)]
pub struct ResizeContext {
    pub namespace: String,
    /// Controller kind for autoscaler scale-target refs.
    pub controller_kind: String,
    pub controller_api_version: String,
    pub labels: BTreeMap<String, String>,
    /// Blue-green rollout mode is flagged for this service.
    pub blue_green_enabled: bool,
    /// Single-service type configured outside blue-green mode.
    pub service_type: Option<ServiceType>,
    pub blue_green: Option<BlueGreenConfig>,
    /// Autoscaler definition, when `spec.use_autoscaler` is set.
    pub autoscaler: Option<AutoscalerSpec>,
}

/// Composes planning, scaling, and reconciliation into one resize run.
pub struct ResizeOrchestrator<P> {
    platform: Arc<P>,
    scaler: ControllerScaler<P>,
}

impl<P: ContainerPlatform> ResizeOrchestrator<P> {
    pub fn new(platform: Arc<P>) -> Self {
        let scaler = ControllerScaler::new(platform.clone());
        Self { platform, scaler }
    }

    pub fn with_scaler(mut self, scaler: ControllerScaler<P>) -> Self {
        self.scaler = scaler;
        self
    }

    /// Run one resize to its terminal state.
    ///
    /// Never panics and never returns `Err`: every failure mode is folded
    /// into the outcome's status and reason, with whatever execution data
    /// had accumulated by then.
    pub async fn execute(
        &self,
        spec: &ResizeSpec,
        ctx: &ResizeContext,
        cancel: &CancellationToken,
    ) -> ResizeOutcome {
        match self.run(spec, ctx, cancel).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(service = %spec.service_name, %err, "resize failed");
                ResizeOutcome::failed(err.to_string(), ResizeExecutionData::default())
            }
        }
    }

    async fn run(
        &self,
        spec: &ResizeSpec,
        ctx: &ResizeContext,
        cancel: &CancellationToken,
    ) -> RolloutResult<ResizeOutcome> {
        let traffic = TrafficWeightManager::new(self.platform.clone(), spec.use_staged_traffic);

        // ── Validating ─────────────────────────────────────────────
        self.enter(ResizePhase::Validating, spec);
        if ctx.blue_green_enabled {
            validate_blue_green(ctx.service_type, ctx.blue_green.as_ref())?;
        }
        // Staged routing must already have a route entry for this service;
        // scaling against a missing virtual service is a config error.
        traffic.validate_route(&spec.service_name).await?;

        // ── Planning ───────────────────────────────────────────────
        self.enter(ResizePhase::Planning, spec);
        let active = self.platform.active_revisions(&spec.service_name).await?;
        let plan = build_plan(spec, &active)?;
        let timeout = Duration::from_secs(spec.step_timeout_secs);

        let mut data = ResizeExecutionData {
            new_instance_data: vec![ContainerServiceData::from(&plan.new_revision)],
            ..Default::default()
        };

        // ── ScalingNew + WaitingSteadyState ────────────────────────
        self.enter(ResizePhase::ScalingNew, spec);
        let new_outcome = match self.scaler.resize(&plan.new_revision).await? {
            Some(outcome) => outcome,
            None => {
                self.enter(ResizePhase::WaitingSteadyState, spec);
                self.scaler
                    .await_steady_state(&plan.new_revision, timeout, cancel)
                    .await?
            }
        };
        data.container_infos.extend(new_outcome.results.clone());
        let mut step_failed = !new_outcome.completed;

        // A scale-up that reached nothing leaves nothing safe to drain.
        let scaled_up = plan.new_revision.desired_count > plan.new_revision.previous_count;
        if scaled_up && !new_outcome.completed && new_outcome.ready_count == 0 {
            return Ok(ResizeOutcome::failed(
                format!(
                    "revision [{}] reached no ready instances within {}s",
                    plan.new_revision.name, spec.step_timeout_secs
                ),
                data,
            ));
        }

        // ── ScalingOld ─────────────────────────────────────────────
        self.enter(ResizePhase::ScalingOld, spec);
        let old_targets = self.old_targets(&plan, new_outcome.ready_count, &active, spec);
        for target in &old_targets {
            data.old_instance_data.push(ContainerServiceData::from(target));
            match self.scaler.scale(target, timeout, cancel).await {
                Ok(outcome) => {
                    if !outcome.completed {
                        step_failed = true;
                    }
                    data.container_infos.extend(outcome.results);
                }
                // Best-effort drain: record and keep going.
                Err(err) => {
                    warn!(revision = %target.name, %err, "old revision drain failed");
                    step_failed = true;
                }
            }
        }

        // ── ReconcilingAutoscaler ──────────────────────────────────
        // From here on scaling has been applied; a reconciliation error
        // fails the run but keeps the accumulated execution data so the
        // caller can audit what moved and plan the inverse run.
        if spec.use_autoscaler {
            self.enter(ResizePhase::ReconcilingAutoscaler, spec);
            if let Err(err) = self.reconcile_autoscaler(spec, ctx, &plan).await {
                warn!(service = %spec.service_name, %err, "autoscaler reconciliation failed");
                return Ok(ResizeOutcome::failed(err.to_string(), data));
            }
        }

        // ── ReconcilingTraffic ─────────────────────────────────────
        if spec.use_staged_traffic {
            self.enter(ResizePhase::ReconcilingTraffic, spec);
            match traffic.weights(&spec.service_name).await {
                Ok(weights) => data.traffic_weights = weights,
                Err(err) => {
                    warn!(service = %spec.service_name, %err, "traffic reconciliation failed");
                    return Ok(ResizeOutcome::failed(err.to_string(), data));
                }
            }
        }

        if step_failed {
            Ok(ResizeOutcome::failed(
                format!(
                    "one or more scale steps for [{}] did not reach steady state",
                    spec.service_name
                ),
                data,
            ))
        } else {
            info!(
                service = %spec.service_name,
                revision = %plan.new_revision.name,
                instances = plan.new_revision.desired_count,
                "resize succeeded"
            );
            Ok(ResizeOutcome::succeeded(data))
        }
    }

    /// Old-revision targets for this run. When the new revision only
    /// partially reached its target, re-sequence so the oldest revision
    /// holds the shortfall instead of draining blind.
    fn old_targets(
        &self,
        plan: &ResizePlan,
        new_ready: u32,
        active: &slipstream_platform::ActiveRevisions,
        spec: &ResizeSpec,
    ) -> Vec<RevisionTarget> {
        if new_ready >= plan.new_revision.desired_count {
            plan.old_revisions.clone()
        } else {
            warn!(
                service = %spec.service_name,
                reached = new_ready,
                desired = plan.new_revision.desired_count,
                "partial scale-up; old revisions will retain the shortfall"
            );
            sequence_downsize(
                active,
                &plan.new_revision.name,
                new_ready,
                plan.new_revision.desired_count,
            )
        }
    }

    /// Create or replace the autoscaler on a forward run; on rollback,
    /// remove it from every revision being retired.
    async fn reconcile_autoscaler(
        &self,
        spec: &ResizeSpec,
        ctx: &ResizeContext,
        plan: &ResizePlan,
    ) -> RolloutResult<()> {
        let manager = AutoscalerManager::new(self.platform.clone());
        if spec.rollback {
            for target in &plan.old_revisions {
                manager.delete(&target.name).await?;
            }
            return Ok(());
        }
        if let Some(autoscaler) = &ctx.autoscaler {
            let target = ScaleTarget {
                name: plan.new_revision.name.clone(),
                kind: ctx.controller_kind.clone(),
                api_version: ctx.controller_api_version.clone(),
                namespace: ctx.namespace.clone(),
                labels: ctx.labels.clone(),
            };
            manager.create_or_replace(&target, autoscaler).await?;
        }
        Ok(())
    }

    fn enter(&self, phase: ResizePhase, spec: &ResizeSpec) {
        info!(
            service = %spec.service_name,
            revision = %spec.target_revision,
            ?phase,
            "resize phase"
        );
    }
}
