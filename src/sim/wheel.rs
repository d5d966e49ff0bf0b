//! Wheel geometry
//!
//! Builds the visual slot list from the available inventory and maps a final
//! rotation back to the winning slot. Both directions must agree exactly, or the
//! slice under the pointer and the prize handed out would disagree on stage.

use serde::{Deserialize, Serialize};

use super::inventory::Prize;
use crate::consts::{MAX_WHEEL_SLOTS, MIN_WHEEL_SLOTS, POINTER_ANGLE_DEG, VIBRANT_COLORS};
use crate::normalize_deg;

/// One wedge of the wheel. Several slots may point at the same prize when the
/// available set is padded out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelSlot {
    /// Synthetic per-slot id, unique within one build of the wheel
    pub wheel_id: String,
    pub prize_id: String,
    pub name: String,
    pub image: String,
    pub color: String,
}

/// Build the ordered slot list from the prizes still in stock.
///
/// The available set repeats until the wheel has at least [`MIN_WHEEL_SLOTS`]
/// entries, then truncates to [`MAX_WHEEL_SLOTS`]. Colors come from the fixed
/// palette, cycling by slot index. An empty inventory yields an empty wheel.
pub fn build_slots(available: &[&Prize]) -> Vec<WheelSlot> {
    if available.is_empty() {
        return Vec::new();
    }

    let mut list: Vec<&Prize> = available.to_vec();
    while list.len() < MIN_WHEEL_SLOTS {
        list.extend_from_slice(available);
    }
    list.truncate(MAX_WHEEL_SLOTS);

    list.iter()
        .enumerate()
        .map(|(i, p)| WheelSlot {
            wheel_id: format!("w-{}-{}", i, p.id),
            prize_id: p.id.clone(),
            name: p.name.clone(),
            image: p.image.clone(),
            color: VIBRANT_COLORS[i % VIBRANT_COLORS.len()].to_string(),
        })
        .collect()
}

/// Angular width of one slice in degrees
#[inline]
pub fn slice_width(slot_count: usize) -> f32 {
    360.0 / slot_count as f32
}

/// Map a final rotation to the winning slot index.
///
/// The pointer sits at the fixed 270° position; the angle under it is
/// `270 - rotation`, normalized into [0, 360), then floor-divided by the slice
/// width. Rotations landing exactly on a slice boundary floor into the following
/// slice - tests rely on that tie-break, keep it.
pub fn resolve_winner(final_rotation: f32, slot_count: usize) -> usize {
    debug_assert!(slot_count > 0);
    let pointer_angle = normalize_deg(POINTER_ANGLE_DEG - final_rotation % 360.0);
    let index = (pointer_angle / slice_width(slot_count)).floor() as usize;
    // Guard against pointer_angle == 360.0 - eps rounding up to the slot count
    index.min(slot_count - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::inventory::Prize;
    use proptest::prelude::*;

    fn prizes(counts: &[u32]) -> Vec<Prize> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &c)| Prize::new(format!("p{i}"), format!("Prize {i}"), c))
            .collect()
    }

    #[test]
    fn test_empty_inventory_empty_wheel() {
        assert!(build_slots(&[]).is_empty());
    }

    #[test]
    fn test_padding_repeats_available_set() {
        let ps = prizes(&[1, 2]);
        let refs: Vec<&Prize> = ps.iter().collect();
        let slots = build_slots(&refs);

        assert_eq!(slots.len(), 8);
        for (i, slot) in slots.iter().enumerate() {
            assert_eq!(slot.prize_id, format!("p{}", i % 2));
        }
    }

    #[test]
    fn test_truncates_to_max_slots() {
        let ps = prizes(&[1; 20]);
        let refs: Vec<&Prize> = ps.iter().collect();
        assert_eq!(build_slots(&refs).len(), 16);
    }

    #[test]
    fn test_no_padding_between_min_and_max() {
        let ps = prizes(&[1; 11]);
        let refs: Vec<&Prize> = ps.iter().collect();
        assert_eq!(build_slots(&refs).len(), 11);
    }

    #[test]
    fn test_colors_cycle_by_slot_index() {
        let ps = prizes(&[1, 1, 1]);
        let refs: Vec<&Prize> = ps.iter().collect();
        let slots = build_slots(&refs);
        for (i, slot) in slots.iter().enumerate() {
            assert_eq!(slot.color, VIBRANT_COLORS[i % 16]);
        }
    }

    #[test]
    fn test_wheel_ids_unique() {
        let ps = prizes(&[1]);
        let refs: Vec<&Prize> = ps.iter().collect();
        let slots = build_slots(&refs);
        let mut ids: Vec<&str> = slots.iter().map(|s| s.wheel_id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), slots.len());
    }

    #[test]
    fn test_resolve_zero_rotation() {
        // Pointer angle is 270; with 8 slots of 45° each, 270/45 = slice 6
        assert_eq!(resolve_winner(0.0, 8), 6);
    }

    #[test]
    fn test_resolve_boundary_goes_to_following_slice() {
        // rotation 270 puts the pointer exactly on the 0/1 boundary of slice 0
        assert_eq!(resolve_winner(270.0, 8), 0);
        // one slice earlier lands the boundary of slice 1
        assert_eq!(resolve_winner(225.0, 8), 1);
    }

    #[test]
    fn test_resolve_full_turns_are_identity() {
        for turns in 0..5 {
            let rot = 123.0 + turns as f32 * 360.0;
            assert_eq!(resolve_winner(rot, 8), resolve_winner(123.0, 8));
        }
    }

    proptest! {
        #[test]
        fn prop_resolver_in_range(rotation in -100_000.0f32..100_000.0, slots in 1usize..=16) {
            let idx = resolve_winner(rotation, slots);
            prop_assert!(idx < slots);
        }

        #[test]
        fn prop_resolver_idempotent(rotation in -100_000.0f32..100_000.0, slots in 1usize..=16) {
            prop_assert_eq!(resolve_winner(rotation, slots), resolve_winner(rotation, slots));
        }

        #[test]
        fn prop_resolver_matches_floor_formula(rotation in 0.0f32..36_000.0, slots in 1usize..=16) {
            let pointer = ((270.0 - rotation % 360.0) % 360.0 + 360.0) % 360.0;
            let expected = ((pointer / (360.0 / slots as f32)).floor() as usize).min(slots - 1);
            prop_assert_eq!(resolve_winner(rotation, slots), expected);
        }
    }
}
