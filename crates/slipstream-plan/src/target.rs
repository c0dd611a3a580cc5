//! Desired-count math for the new revision.

use crate::error::{PlanError, PlanResult};
use crate::spec::{InstanceUnit, ResizeSpec};

/// Compute the desired replica count for the revision being scaled up.
///
/// `active_total` is the sum of currently active instances across all
/// revisions of the service, when it could be read. It serves two roles:
/// the fallback ceiling when `max_instances` is unset, and the physical
/// capacity that caps a fixed-instance request.
///
/// Rules, in order:
/// - `use_fixed_instances` with a non-zero `fixed_instances`: the fixed
///   value wins, capped only by physically available capacity.
///   `fixed_instances == 0` means the fixed target was never actually
///   configured and the unit computation applies instead.
/// - `Percentage`: `ceil(instance_count/100 * ceiling)`, never 0 when both
///   inputs are positive. No inferable ceiling is an error, not a zero.
/// - `Count`: `instance_count`, capped at the ceiling when one exists.
pub fn desired_count(spec: &ResizeSpec, active_total: Option<u32>) -> PlanResult<u32> {
    let ceiling = effective_ceiling(spec, active_total);

    if spec.use_fixed_instances && spec.fixed_instances > 0 {
        // max_instances is a soft planning ceiling here: fixed wins unless
        // it exceeds what the platform can actually hold.
        let capacity = ceiling.max(active_total.unwrap_or(0));
        return Ok(if capacity > 0 {
            spec.fixed_instances.min(capacity)
        } else {
            spec.fixed_instances
        });
    }

    match spec.unit_type {
        InstanceUnit::Percentage => {
            if ceiling == 0 {
                return Err(PlanError::InvalidRequest(format!(
                    "cannot compute a percentage target for [{}]: max_instances is not set \
                     and there is no active capacity to infer a ceiling from",
                    spec.target_revision
                )));
            }
            if spec.instance_count == 0 {
                return Ok(0);
            }
            let raw = (f64::from(spec.instance_count) / 100.0 * f64::from(ceiling)).ceil();
            Ok((raw as u32).max(1))
        }
        // An absolute count is capped only by an explicitly supplied
        // max_instances, never by the inferred active-capacity ceiling.
        InstanceUnit::Count => Ok(if spec.max_instances > 0 {
            spec.instance_count.min(spec.max_instances)
        } else {
            spec.instance_count
        }),
    }
}

/// The structural ceiling: `max_instances` when set, otherwise the total
/// currently active count.
fn effective_ceiling(spec: &ResizeSpec, active_total: Option<u32>) -> u32 {
    if spec.max_instances > 0 {
        spec.max_instances
    } else {
        active_total.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(unit: InstanceUnit, count: u32, max: u32) -> ResizeSpec {
        ResizeSpec {
            service_name: "web".into(),
            target_revision: "web-1".into(),
            unit_type: unit,
            instance_count: count,
            use_fixed_instances: false,
            fixed_instances: 0,
            max_instances: max,
            use_autoscaler: false,
            rollback: false,
            use_staged_traffic: false,
            step_timeout_secs: 600,
        }
    }

    fn fixed_spec(fixed: u32, max: u32) -> ResizeSpec {
        ResizeSpec {
            use_fixed_instances: true,
            fixed_instances: fixed,
            ..spec(InstanceUnit::Count, 0, max)
        }
    }

    #[test]
    fn percentage_of_max() {
        assert_eq!(
            desired_count(&spec(InstanceUnit::Percentage, 100, 5), None).unwrap(),
            5
        );
        assert_eq!(
            desired_count(&spec(InstanceUnit::Percentage, 50, 5), None).unwrap(),
            3
        );
    }

    #[test]
    fn percentage_never_rounds_to_zero() {
        assert_eq!(
            desired_count(&spec(InstanceUnit::Percentage, 20, 5), None).unwrap(),
            1
        );
        assert_eq!(
            desired_count(&spec(InstanceUnit::Percentage, 1, 5), None).unwrap(),
            1
        );
    }

    #[test]
    fn percentage_zero_stays_zero() {
        assert_eq!(
            desired_count(&spec(InstanceUnit::Percentage, 0, 5), None).unwrap(),
            0
        );
    }

    #[test]
    fn percentage_without_ceiling_is_an_error() {
        let err = desired_count(&spec(InstanceUnit::Percentage, 50, 0), None).unwrap_err();
        assert!(matches!(err, PlanError::InvalidRequest(_)));
    }

    #[test]
    fn percentage_falls_back_to_active_capacity() {
        assert_eq!(
            desired_count(&spec(InstanceUnit::Percentage, 100, 0), Some(4)).unwrap(),
            4
        );
    }

    #[test]
    fn count_capped_at_max() {
        assert_eq!(desired_count(&spec(InstanceUnit::Count, 7, 5), None).unwrap(), 5);
        assert_eq!(desired_count(&spec(InstanceUnit::Count, 2, 5), None).unwrap(), 2);
    }

    #[test]
    fn count_not_capped_by_inferred_capacity() {
        assert_eq!(desired_count(&spec(InstanceUnit::Count, 7, 0), None).unwrap(), 7);
        assert_eq!(
            desired_count(&spec(InstanceUnit::Count, 2, 0), Some(1)).unwrap(),
            2
        );
    }

    #[test]
    fn fixed_wins_under_capacity() {
        // fixed=3 with capacity 5: not reduced below 3.
        assert_eq!(desired_count(&fixed_spec(3, 5), None).unwrap(), 3);
        assert_eq!(desired_count(&fixed_spec(3, 0), Some(5)).unwrap(), 3);
    }

    #[test]
    fn fixed_capped_at_available_capacity() {
        assert_eq!(desired_count(&fixed_spec(5, 0), Some(3)).unwrap(), 3);
        assert_eq!(desired_count(&fixed_spec(5, 3), None).unwrap(), 3);
    }

    #[test]
    fn fixed_uncapped_when_no_capacity_known() {
        assert_eq!(desired_count(&fixed_spec(4, 0), None).unwrap(), 4);
    }

    #[test]
    fn zero_fixed_falls_through_to_unit_math() {
        // Flag set but fixed_instances never configured: the count path
        // applies (fresh-install shape: fixed=0, max=3, count=3 → 3).
        let s = ResizeSpec {
            use_fixed_instances: true,
            fixed_instances: 0,
            ..spec(InstanceUnit::Count, 3, 3)
        };
        assert_eq!(desired_count(&s, None).unwrap(), 3);
    }
}
