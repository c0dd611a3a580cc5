//! Ordered downsize sequencing for old revisions.

use slipstream_platform::ActiveRevisions;

use crate::plan::RevisionTarget;

/// Sequence the old-revision drain for one resize.
///
/// Walks `active` in discovery order (oldest first) and emits one drain
/// target per revision, never interleaved. "Resize new first" is the
/// contract here, not an accident of call order: the new revision is
/// assumed to have reached `new_reached` of its `cap` target before any of
/// these entries is executed.
///
/// Every old revision drains fully to 0, with one exception: when the new
/// revision fell short of `cap` (partial scale-up), the oldest revision
/// keeps the shortfall — never more than it already had — so total serving
/// capacity is preserved without ever exceeding `cap`.
///
/// Revisions with no active instances are omitted (no-op), as is the new
/// revision itself if it appears in `active`.
pub fn sequence_downsize(
    active: &ActiveRevisions,
    new_revision: &str,
    new_reached: u32,
    cap: u32,
) -> Vec<RevisionTarget> {
    let mut shortfall = cap.saturating_sub(new_reached);
    let mut targets = Vec::new();

    for (name, previous) in active.iter() {
        if name == new_revision || previous == 0 {
            continue;
        }
        let keep = shortfall.min(previous);
        shortfall -= keep;
        targets.push(RevisionTarget {
            name: name.to_string(),
            previous_count: previous,
            desired_count: keep,
        });
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(entries: &[(&str, u32)]) -> ActiveRevisions {
        entries
            .iter()
            .map(|(n, c)| (n.to_string(), *c))
            .collect()
    }

    #[test]
    fn full_drain_in_discovery_order() {
        let plan = sequence_downsize(&active(&[("web-0", 1), ("web-1", 2)]), "web-2", 3, 3);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].name, "web-0");
        assert_eq!(plan[0].desired_count, 0);
        assert_eq!(plan[1].name, "web-1");
        assert_eq!(plan[1].desired_count, 0);
    }

    #[test]
    fn zero_count_revisions_are_omitted() {
        let plan = sequence_downsize(&active(&[("web-0", 0), ("web-1", 2)]), "web-2", 2, 2);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].name, "web-1");
    }

    #[test]
    fn new_revision_is_not_drained() {
        let plan = sequence_downsize(&active(&[("web-0", 1), ("web-1", 1)]), "web-1", 2, 2);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].name, "web-0");
    }

    #[test]
    fn shortfall_is_kept_on_oldest_only() {
        // New revision reached 1 of 3: oldest keeps 2, next drains fully.
        let plan = sequence_downsize(&active(&[("web-0", 4), ("web-1", 2)]), "web-2", 1, 3);
        assert_eq!(plan[0].desired_count, 2);
        assert_eq!(plan[1].desired_count, 0);
    }

    #[test]
    fn shortfall_never_exceeds_previous_count() {
        // Oldest had 1, shortfall is 3: it keeps its 1, the next keeps 2.
        let plan = sequence_downsize(&active(&[("web-0", 1), ("web-1", 5)]), "web-2", 0, 3);
        assert_eq!(plan[0].desired_count, 1);
        assert_eq!(plan[1].desired_count, 2);
    }

    #[test]
    fn sequencing_is_idempotent() {
        let revisions = active(&[("web-0", 1), ("web-1", 2)]);
        let first = sequence_downsize(&revisions, "web-2", 3, 3);
        let second = sequence_downsize(&revisions, "web-2", 3, 3);
        assert_eq!(first, second);
    }
}
