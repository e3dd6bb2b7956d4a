//! Stable Selection Keys
//!
//! Deterministic tie-breakers for "nearest" and "best score" selections.
//!
//! ## Problem
//! Floating-point ties between candidates (equidistant players, equal catch
//! scores) must not depend on iteration order.
//!
//! ## Solution
//! Compare with `total_cmp`, then fall back to the entity id (smaller wins).
//! Ids are immutable for the life of a match, so the ordering is stable.

use std::cmp::Ordering;

use crate::engine::types::EntityId;

/// Ascending by value, ties broken by smaller id.
#[inline]
pub fn compare_asc_stable(a_value: f32, a_id: EntityId, b_value: f32, b_id: EntityId) -> Ordering {
    match a_value.total_cmp(&b_value) {
        Ordering::Equal => a_id.cmp(&b_id),
        other => other,
    }
}

/// Descending by value, ties broken by smaller id.
#[inline]
pub fn compare_desc_stable(a_value: f32, a_id: EntityId, b_value: f32, b_id: EntityId) -> Ordering {
    match b_value.total_cmp(&a_value) {
        Ordering::Equal => a_id.cmp(&b_id),
        other => other,
    }
}

/// Smallest value wins; equal values go to the smaller id.
pub fn min_by_value<I>(candidates: I) -> Option<(EntityId, f32)>
where
    I: IntoIterator<Item = (EntityId, f32)>,
{
    candidates
        .into_iter()
        .min_by(|a, b| compare_asc_stable(a.1, a.0, b.1, b.0))
}

/// Largest value wins; equal values go to the smaller id.
pub fn max_by_value<I>(candidates: I) -> Option<(EntityId, f32)>
where
    I: IntoIterator<Item = (EntityId, f32)>,
{
    candidates
        .into_iter()
        .min_by(|a, b| compare_desc_stable(a.1, a.0, b.1, b.0))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_tie_goes_to_smaller_id() {
        let picked = min_by_value([(EntityId(9), 4.0), (EntityId(3), 4.0), (EntityId(5), 9.0)]);
        assert_eq!(picked, Some((EntityId(3), 4.0)));
    }

    #[test]
    fn test_max_tie_goes_to_smaller_id() {
        let picked = max_by_value([(EntityId(9), 7.0), (EntityId(4), 7.0), (EntityId(1), 2.0)]);
        assert_eq!(picked, Some((EntityId(4), 7.0)));
    }

    #[test]
    fn test_order_independent() {
        let a = [(EntityId(2), 1.0), (EntityId(1), 1.0), (EntityId(0), 3.0)];
        let mut b = a;
        b.reverse();
        assert_eq!(min_by_value(a), min_by_value(b));
        assert_eq!(max_by_value(a), max_by_value(b));
    }

    #[test]
    fn test_empty() {
        assert_eq!(min_by_value(Vec::new()), None);
    }
}
