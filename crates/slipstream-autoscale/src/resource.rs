//! Autoscaler manifest rendering.
//!
//! Two sources produce a manifest: an operator-supplied custom-metric YAML
//! (opaque to us except for identity fields), or the basic CPU fields from
//! the service configuration. Non-blank custom YAML always wins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{AutoscaleError, AutoscaleResult};

/// The controller an autoscaler points at, plus the identity the rendered
/// resource must carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleTarget {
    /// Controller/revision name. Also names the autoscaler itself.
    pub name: String,
    /// Controller kind (e.g. `ReplicationController`, `Deployment`).
    pub kind: String,
    /// API version of the controller, for scaleTargetRef.
    pub api_version: String,
    pub namespace: String,
    pub labels: BTreeMap<String, String>,
}

/// Basic CPU-utilization autoscaling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuTarget {
    pub min_instances: u32,
    pub max_instances: u32,
    pub target_cpu_utilization_percentage: u32,
}

/// What kind of autoscaler to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoscalerSpec {
    /// Operator-supplied manifest; `metrics` passes through verbatim.
    CustomYaml(String),
    /// Basic `autoscaling/v1` CPU autoscaler.
    Cpu(CpuTarget),
}

impl AutoscalerSpec {
    /// Resolve the mutually-exclusive configuration fields: a non-blank
    /// custom YAML wins over the basic CPU fields.
    pub fn from_parts(custom_yaml: Option<&str>, cpu: Option<CpuTarget>) -> Option<Self> {
        match custom_yaml {
            Some(yaml) if !yaml.trim().is_empty() => Some(Self::CustomYaml(yaml.to_string())),
            _ => cpu.map(Self::Cpu),
        }
    }
}

/// A rendered autoscaler resource, ready to hand to the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoscalerResource {
    pub name: String,
    pub api_version: String,
    manifest: Value,
}

impl AutoscalerResource {
    pub fn manifest(&self) -> &Value {
        &self.manifest
    }

    pub fn to_yaml(&self) -> AutoscaleResult<String> {
        serde_yaml::to_string(&self.manifest).map_err(|e| AutoscaleError::InvalidYaml(e.to_string()))
    }
}

/// Render the autoscaler manifest for a scale target.
pub fn render(target: &ScaleTarget, spec: &AutoscalerSpec) -> AutoscaleResult<AutoscalerResource> {
    if target.name.trim().is_empty() || target.kind.trim().is_empty() {
        return Err(AutoscaleError::InvalidRequest(
            "autoscaler scale target requires a non-empty name and kind".into(),
        ));
    }
    match spec {
        AutoscalerSpec::CustomYaml(yaml) => render_custom(target, yaml),
        AutoscalerSpec::Cpu(cpu) => render_cpu(target, cpu),
    }
}

/// Parse the operator's YAML and overwrite its identity fields with the
/// runtime-supplied values. The `metrics` block (and anything else in
/// `spec` we don't know about) is preserved untouched; the apiVersion is
/// whatever the YAML declares, typically a custom-metrics API group.
fn render_custom(target: &ScaleTarget, yaml: &str) -> AutoscaleResult<AutoscalerResource> {
    let mut doc: Value =
        serde_yaml::from_str(yaml).map_err(|e| AutoscaleError::InvalidYaml(e.to_string()))?;
    if !doc.is_mapping() {
        return Err(AutoscaleError::InvalidYaml(
            "autoscaler YAML must be a mapping".into(),
        ));
    }

    let api_version = doc
        .get("apiVersion")
        .and_then(Value::as_str)
        .unwrap_or("autoscaling/v1")
        .to_string();

    set_path(&mut doc, &["metadata", "name"], Value::from(target.name.as_str()));
    set_path(
        &mut doc,
        &["metadata", "namespace"],
        Value::from(target.namespace.as_str()),
    );
    set_path(&mut doc, &["metadata", "labels"], labels_value(&target.labels));
    // Stale bookkeeping from a copied manifest must not block replace.
    remove_path(&mut doc, &["metadata", "resourceVersion"]);

    set_path(
        &mut doc,
        &["spec", "scaleTargetRef", "name"],
        Value::from(target.name.as_str()),
    );
    set_path(
        &mut doc,
        &["spec", "scaleTargetRef", "kind"],
        Value::from(target.kind.as_str()),
    );
    set_path(
        &mut doc,
        &["spec", "scaleTargetRef", "apiVersion"],
        Value::from(target.api_version.as_str()),
    );

    Ok(AutoscalerResource {
        name: target.name.clone(),
        api_version,
        manifest: doc,
    })
}

/// Build a basic `autoscaling/v1` CPU-utilization manifest.
fn render_cpu(target: &ScaleTarget, cpu: &CpuTarget) -> AutoscaleResult<AutoscalerResource> {
    let mut doc = Value::Mapping(Mapping::new());
    set_path(&mut doc, &["apiVersion"], Value::from("autoscaling/v1"));
    set_path(&mut doc, &["kind"], Value::from("HorizontalPodAutoscaler"));
    set_path(&mut doc, &["metadata", "name"], Value::from(target.name.as_str()));
    set_path(
        &mut doc,
        &["metadata", "namespace"],
        Value::from(target.namespace.as_str()),
    );
    set_path(&mut doc, &["metadata", "labels"], labels_value(&target.labels));
    set_path(
        &mut doc,
        &["spec", "scaleTargetRef", "name"],
        Value::from(target.name.as_str()),
    );
    set_path(
        &mut doc,
        &["spec", "scaleTargetRef", "kind"],
        Value::from(target.kind.as_str()),
    );
    set_path(
        &mut doc,
        &["spec", "scaleTargetRef", "apiVersion"],
        Value::from(target.api_version.as_str()),
    );
    set_path(&mut doc, &["spec", "minReplicas"], Value::from(cpu.min_instances));
    set_path(&mut doc, &["spec", "maxReplicas"], Value::from(cpu.max_instances));
    set_path(
        &mut doc,
        &["spec", "targetCPUUtilizationPercentage"],
        Value::from(cpu.target_cpu_utilization_percentage),
    );

    Ok(AutoscalerResource {
        name: target.name.clone(),
        api_version: "autoscaling/v1".into(),
        manifest: doc,
    })
}

fn labels_value(labels: &BTreeMap<String, String>) -> Value {
    let mut map = Mapping::new();
    for (k, v) in labels {
        map.insert(Value::from(k.as_str()), Value::from(v.as_str()));
    }
    Value::Mapping(map)
}

/// Set a nested key, creating intermediate mappings as needed. Non-mapping
/// intermediates are replaced; the caller has already validated the root.
fn set_path(doc: &mut Value, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut node = doc;
    for key in parents {
        let Value::Mapping(map) = node else { return };
        let entry = map
            .entry(Value::from(*key))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if !entry.is_mapping() {
            *entry = Value::Mapping(Mapping::new());
        }
        node = entry;
    }
    if let Value::Mapping(map) = node {
        map.insert(Value::from(*last), value);
    }
}

fn remove_path(doc: &mut Value, path: &[&str]) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut node = doc;
    for key in parents {
        match node.get_mut(*key) {
            Some(next) => node = next,
            None => return,
        }
    }
    if let Value::Mapping(map) = node {
        map.remove(Value::from(*last));
    }
}
