//! Conflict detection and resolution between the two shift sources

use std::collections::BTreeSet;

use ahash::AHashSet;
use rostermerge_core::{Shift, ShiftId, SlotMap, TimeAxis};

/// The outcome of reconciling the two per-slot shift maps
#[derive(Debug, Default)]
pub struct Resolution {
    /// Conflict-free shifts, per member and slot
    pub valid: SlotMap,
    /// Every shift, from either source, that disagreed on at least one slot
    pub conflicts: Vec<Shift>,
}

/// Merge the grid-origin and tabular-origin slot maps.
///
/// For each member and each axis slot: if both sources occupy the slot and
/// disagree on `(job, background)`, both shifts are flagged; on agreement
/// the grid's record is kept (arbitrary, the two are equal); a slot claimed
/// by only one source keeps that record. A shift flagged at any slot is
/// then removed from every slot it occupies: partial disagreement
/// invalidates the whole shift on both sides, favoring manual review over
/// silent partial merges.
pub fn resolve_conflicts(grid: &SlotMap, tabular: &SlotMap, axis: &TimeAxis) -> Resolution {
    let members: BTreeSet<&str> = grid.members().chain(tabular.members()).collect();

    let mut valid = SlotMap::new();
    let mut conflicting: AHashSet<ShiftId> = AHashSet::new();

    for member in members {
        for (_, slot) in axis.slots() {
            let g = grid.slot_shift(member, slot);
            let r = tabular.slot_shift(member, slot);
            match (g, r) {
                (Some(g), Some(r)) if !g.same_appearance(r) => {
                    conflicting.insert(g.id());
                    conflicting.insert(r.id());
                }
                (Some(g), _) => {
                    valid.insert_at(g.clone(), slot);
                }
                (None, Some(r)) => {
                    valid.insert_at(r.clone(), slot);
                }
                (None, None) => {}
            }
        }
    }

    // Whole-shift invalidation: a shift flagged at one slot is excluded
    // from all of its slots.
    valid.remove_ids(&conflicting);

    let conflicts: Vec<Shift> = grid
        .iter_shifts()
        .chain(tabular.iter_shifts())
        .filter(|shift| conflicting.contains(&shift.id()))
        .cloned()
        .collect();

    Resolution { valid, conflicts }
}
