//! Shared domain types for the platform capability.
//!
//! These are the types that cross the seam between the resize engine and a
//! platform adapter. They are serializable so the calling workflow layer can
//! attach them to execution records.

use serde::{Deserialize, Serialize};

// ── Revisions ──────────────────────────────────────────────────────

/// The currently active revisions of one logical service, keyed by
/// controller/revision name and insertion-ordered oldest first.
///
/// Ordering is semantically significant: downsizing retires revisions in
/// exactly this order. A plain `HashMap` would lose it, so this is a
/// Vec-backed ordered map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRevisions {
    entries: Vec<(String, u32)>,
}

impl ActiveRevisions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update a revision's active count, preserving first-insert
    /// position on update.
    pub fn insert(&mut self, name: impl Into<String>, count: u32) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, c)) => *c = count,
            None => self.entries.push((name, count)),
        }
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| *c)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), *c))
    }

    /// Total active instance count across all revisions.
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, u32)> for ActiveRevisions {
    fn from_iter<T: IntoIterator<Item = (String, u32)>>(iter: T) -> Self {
        let mut out = Self::new();
        for (name, count) in iter {
            out.insert(name, count);
        }
        out
    }
}

// ── Containers ─────────────────────────────────────────────────────

/// A single container as reported by the platform during a readiness poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerStatus {
    /// Node/host the container is placed on.
    pub host_id: String,
    /// Platform-assigned container identifier.
    pub container_id: String,
    /// Whether the container reports Ready/Running.
    pub ready: bool,
}

/// Outcome of a scale operation for one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContainerRunStatus {
    Success,
    Failure,
}

/// Per-container result of a scale step, handed back to the caller as
/// execution data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInstanceResult {
    pub host_id: String,
    pub container_id: String,
    pub status: ContainerRunStatus,
    /// True for containers created by this step (index at or past the
    /// previous count). Downstream verification only health-checks these.
    pub new_instance: bool,
}

// ── Autoscalers ────────────────────────────────────────────────────

/// Identity of an autoscaler resource as stored by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoscalerHandle {
    pub name: String,
    pub namespace: String,
    pub api_version: String,
}
