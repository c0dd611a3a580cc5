//! The resize request.
//!
//! A `ResizeSpec` is constructed fresh per execution from the caller's
//! stored configuration and is immutable within a single resize run. The
//! calling workflow layer persists these as TOML/JSON; everything here
//! derives serde.

use serde::{Deserialize, Serialize};

/// How `instance_count` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceUnit {
    /// Absolute replica count.
    Count,
    /// Percentage of the structural maximum (0-100).
    Percentage,
}

/// One scaling request for one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeSpec {
    /// Logical service the resize applies to.
    pub service_name: String,
    /// Name of the revision being scaled up.
    pub target_revision: String,
    /// Interpretation of `instance_count`.
    pub unit_type: InstanceUnit,
    /// Requested count or percentage, per `unit_type`.
    pub instance_count: u32,
    /// When true (and `fixed_instances` > 0), `fixed_instances` is the
    /// authoritative target and percentage math is ignored.
    #[serde(default)]
    pub use_fixed_instances: bool,
    /// Absolute replica target used when `use_fixed_instances` is set.
    #[serde(default)]
    pub fixed_instances: u32,
    /// Structural ceiling for percentage/count computation. 0 means
    /// "infer from currently active capacity".
    #[serde(default)]
    pub max_instances: u32,
    /// Reconcile a horizontal autoscaler after scaling.
    #[serde(default)]
    pub use_autoscaler: bool,
    /// This run restores prior counts after a failed resize. Autoscalers
    /// are deleted rather than recreated on rollback runs.
    #[serde(default)]
    pub rollback: bool,
    /// Staged (Istio-style) traffic routing is in effect for this service.
    #[serde(default)]
    pub use_staged_traffic: bool,
    /// Per-revision steady-state wait budget, in seconds.
    pub step_timeout_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_toml_with_defaults() {
        let spec: ResizeSpec = toml::from_str(
            r#"
            service_name = "web"
            target_revision = "web-4"
            unit_type = "percentage"
            instance_count = 50
            max_instances = 8
            step_timeout_secs = 600
            "#,
        )
        .unwrap();

        assert_eq!(spec.unit_type, InstanceUnit::Percentage);
        assert!(!spec.use_fixed_instances);
        assert!(!spec.rollback);
        assert_eq!(spec.max_instances, 8);
    }

    #[test]
    fn json_round_trip() {
        let spec = ResizeSpec {
            service_name: "web".into(),
            target_revision: "web-4".into(),
            unit_type: InstanceUnit::Count,
            instance_count: 3,
            use_fixed_instances: true,
            fixed_instances: 3,
            max_instances: 5,
            use_autoscaler: true,
            rollback: false,
            use_staged_traffic: false,
            step_timeout_secs: 600,
        };
        let json = serde_json::to_string(&spec).unwrap();
        let back: ResizeSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }
}
