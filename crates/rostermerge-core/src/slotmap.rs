//! Per-member, per-slot shift registration.
//!
//! Both parsers populate a [`SlotMap`] and the conflict resolver consumes
//! two of them. Slots store [`ShiftId`]s with a separate id-to-shift table,
//! so a multi-slot shift occupies several slots under one identity and
//! conflict marking can invalidate every slot of a shift by id, without any
//! reliance on reference identity.

use std::collections::BTreeMap;

use ahash::AHashMap;
use chrono::NaiveTime;

use crate::shift::{Shift, ShiftId};

/// Slot assignments for one member: time-slot label to shift id
pub type MemberSlots = BTreeMap<NaiveTime, ShiftId>;

/// The intermediate addressing structure of the reconciliation pipeline
#[derive(Debug, Clone, Default)]
pub struct SlotMap {
    shifts: AHashMap<ShiftId, Shift>,
    members: BTreeMap<String, MemberSlots>,
}

impl SlotMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the map holds no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of distinct shifts registered
    pub fn shift_count(&self) -> usize {
        self.shifts.len()
    }

    /// Register `shift` at every slot label in `slots`, returning its id.
    ///
    /// All slots of one insert share the same id; re-inserting an
    /// identical shift merges onto the existing table entry.
    pub fn insert(&mut self, shift: Shift, slots: &[NaiveTime]) -> ShiftId {
        let id = shift.id();
        let member_slots = self.members.entry(shift.member_date_id.clone()).or_default();
        for &slot in slots {
            member_slots.insert(slot, id.clone());
        }
        self.shifts.entry(id.clone()).or_insert(shift);
        id
    }

    /// Register `shift` at a single slot label
    pub fn insert_at(&mut self, shift: Shift, slot: NaiveTime) -> ShiftId {
        self.insert(shift, &[slot])
    }

    /// Look up a shift by id
    pub fn shift(&self, id: &ShiftId) -> Option<&Shift> {
        self.shifts.get(id)
    }

    /// The shift occupying `slot` for `member`, if any
    pub fn slot_shift(&self, member: &str, slot: NaiveTime) -> Option<&Shift> {
        let id = self.members.get(member)?.get(&slot)?;
        self.shifts.get(id)
    }

    /// Member ids present in the map, in sorted order
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// Check whether `member` has any slot assignments
    pub fn contains_member(&self, member: &str) -> bool {
        self.members.contains_key(member)
    }

    /// The slot assignments of one member
    pub fn member_slots(&self, member: &str) -> Option<&MemberSlots> {
        self.members.get(member)
    }

    /// Iterate every registered shift, in member/slot order, visiting each
    /// distinct shift once
    pub fn iter_shifts(&self) -> impl Iterator<Item = &Shift> + '_ {
        let mut seen = ahash::AHashSet::new();
        self.members
            .values()
            .flat_map(|slots| slots.values())
            .filter(move |id| seen.insert((*id).clone()))
            .filter_map(|id| self.shifts.get(id))
    }

    /// Remove every slot assignment whose shift id is in `ids`, dropping
    /// the shifts from the table and pruning members left with no slots.
    ///
    /// This is the whole-shift invalidation step of conflict resolution: a
    /// shift flagged at any slot disappears from all of its slots.
    pub fn remove_ids(&mut self, ids: &ahash::AHashSet<ShiftId>) {
        for slots in self.members.values_mut() {
            slots.retain(|_, id| !ids.contains(id));
        }
        self.members.retain(|_, slots| !slots.is_empty());
        self.shifts.retain(|id, _| !ids.contains(id));
    }
}
