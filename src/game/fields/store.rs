//! Typed storage for an entity's fixed and dynamic fields
//!
//! Fixed fields are raw u32 words reinterpreted by the accessor. Every setter
//! compares against the stored value and only marks the slot dirty when it
//! actually changes, so an unchanged field never produces wire bytes.

use bytemuck::Pod;
use tracing::error;

use super::dirty::DirtyTracker;
use super::dynamic::{self, DynamicArray, DynamicFields};
use super::error::FieldError;
use super::layout::{self, UpdateFieldFlags};
use crate::game::guid::ObjectGuid;
use crate::game::object_type::TypeId;

#[derive(Debug, Clone)]
pub struct FieldStore {
    guid: ObjectGuid,
    type_id: TypeId,
    values: Vec<u32>,
    tracker: DirtyTracker,
    dynamic: DynamicFields,
    notify_flags: UpdateFieldFlags,
}

impl FieldStore {
    /// Allocate storage sized by the kind's layout
    pub fn new(guid: ObjectGuid, type_id: TypeId) -> Self {
        Self::with_counts(
            guid,
            type_id,
            layout::values_count(type_id),
            layout::dynamic_values_count(type_id),
        )
    }

    pub fn with_counts(guid: ObjectGuid, type_id: TypeId, values_count: u16, dynamic_count: u16) -> Self {
        Self {
            guid,
            type_id,
            values: vec![0; values_count as usize],
            tracker: DirtyTracker::new(values_count as usize),
            dynamic: DynamicFields::new(dynamic_count as usize),
            notify_flags: UpdateFieldFlags::empty(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn values_count(&self) -> u16 {
        self.values.len() as u16
    }

    pub fn dynamic_values_count(&self) -> u16 {
        self.dynamic.count() as u16
    }

    fn check(&self, index: u16, width: u16) -> Result<(), FieldError> {
        if index as usize + width as usize > self.values.len() {
            return Err(FieldError::IndexOutOfBounds {
                index,
                width,
                count: self.values_count(),
            });
        }
        Ok(())
    }

    fn report(&self, err: FieldError) {
        error!("Entity {}: {}", self.guid, err);
    }

    fn checked(&self, index: u16, width: u16) -> bool {
        match self.check(index, width) {
            Ok(()) => true,
            Err(e) => {
                self.report(e);
                false
            }
        }
    }

    // ========================================================================
    // Getters
    // ========================================================================

    pub fn get_u32(&self, index: u16) -> u32 {
        if !self.checked(index, 1) {
            return 0;
        }
        self.values[index as usize]
    }

    pub fn get_i32(&self, index: u16) -> i32 {
        self.get_u32(index) as i32
    }

    pub fn get_f32(&self, index: u16) -> f32 {
        f32::from_bits(self.get_u32(index))
    }

    /// Low word first
    pub fn get_u64(&self, index: u16) -> u64 {
        if !self.checked(index, 2) {
            return 0;
        }
        let low = self.values[index as usize] as u64;
        let high = self.values[index as usize + 1] as u64;
        (high << 32) | low
    }

    pub fn get_guid(&self, index: u16) -> ObjectGuid {
        ObjectGuid::from_raw(self.get_u64(index))
    }

    pub fn get_u8(&self, index: u16, offset: u8) -> u8 {
        if offset > 3 {
            self.report(FieldError::ByteOffset { index, offset });
            return 0;
        }
        (self.get_u32(index) >> (offset as u32 * 8)) as u8
    }

    pub fn get_u16(&self, index: u16, offset: u8) -> u16 {
        if offset > 1 {
            self.report(FieldError::U16Offset { index, offset });
            return 0;
        }
        (self.get_u32(index) >> (offset as u32 * 16)) as u16
    }

    // ========================================================================
    // Setters
    // ========================================================================

    fn store(&mut self, index: u16, value: u32) -> bool {
        let slot = index as usize;
        if self.values[slot] == value {
            return false;
        }
        self.values[slot] = value;
        self.tracker.mark(slot);
        true
    }

    pub fn set_u32(&mut self, index: u16, value: u32) -> bool {
        if !self.checked(index, 1) {
            return false;
        }
        self.store(index, value)
    }

    pub fn set_i32(&mut self, index: u16, value: i32) -> bool {
        self.set_u32(index, value as u32)
    }

    pub fn set_f32(&mut self, index: u16, value: f32) -> bool {
        self.set_u32(index, value.to_bits())
    }

    /// Both halves are marked together when the value changes
    pub fn set_u64(&mut self, index: u16, value: u64) -> bool {
        if !self.checked(index, 2) {
            return false;
        }
        if self.get_u64(index) == value {
            return false;
        }
        let slot = index as usize;
        self.values[slot] = value as u32;
        self.values[slot + 1] = (value >> 32) as u32;
        self.tracker.mark(slot);
        self.tracker.mark(slot + 1);
        true
    }

    pub fn set_guid(&mut self, index: u16, guid: ObjectGuid) -> bool {
        self.set_u64(index, guid.raw())
    }

    pub fn set_u8(&mut self, index: u16, offset: u8, value: u8) -> bool {
        if offset > 3 {
            self.report(FieldError::ByteOffset { index, offset });
            return false;
        }
        if !self.checked(index, 1) {
            return false;
        }
        let shift = offset as u32 * 8;
        let old = self.values[index as usize];
        let new = (old & !(0xFFu32 << shift)) | ((value as u32) << shift);
        self.store(index, new)
    }

    pub fn set_u16(&mut self, index: u16, offset: u8, value: u16) -> bool {
        if offset > 1 {
            self.report(FieldError::U16Offset { index, offset });
            return false;
        }
        if !self.checked(index, 1) {
            return false;
        }
        let shift = offset as u32 * 16;
        let old = self.values[index as usize];
        let new = (old & !(0xFFFFu32 << shift)) | ((value as u32) << shift);
        self.store(index, new)
    }

    /// Set a GUID only when the slot is empty
    pub fn add_guid_value(&mut self, index: u16, guid: ObjectGuid) -> bool {
        if !guid.is_empty() && self.get_guid(index).is_empty() {
            return self.set_guid(index, guid);
        }
        false
    }

    /// Clear a GUID only when the slot holds exactly `guid`
    pub fn remove_guid_value(&mut self, index: u16, guid: ObjectGuid) -> bool {
        if !guid.is_empty() && self.get_guid(index) == guid {
            return self.set_guid(index, ObjectGuid::EMPTY);
        }
        false
    }

    /// Mark a slot for the next flush without changing it
    pub fn force_values_update_at_index(&mut self, index: u16) {
        if self.checked(index, 1) {
            self.tracker.mark(index as usize);
        }
    }

    // ========================================================================
    // Modifiers
    // ========================================================================

    /// Unsigned add/subtract, floored at zero
    pub fn apply_mod_u32_value(&mut self, index: u16, val: i32, apply: bool) -> bool {
        let cur = self.get_u32(index) as i64 + if apply { val as i64 } else { -(val as i64) };
        self.set_u32(index, cur.clamp(0, u32::MAX as i64) as u32)
    }

    pub fn apply_mod_i32_value(&mut self, index: u16, val: i32, apply: bool) -> bool {
        let cur = self.get_i32(index);
        let delta = if apply { val } else { val.wrapping_neg() };
        self.set_i32(index, cur.wrapping_add(delta))
    }

    pub fn apply_mod_signed_float_value(&mut self, index: u16, val: f32, apply: bool) -> bool {
        let cur = self.get_f32(index) + if apply { val } else { -val };
        self.set_f32(index, cur)
    }

    pub fn apply_mod_positive_float_value(&mut self, index: u16, val: f32, apply: bool) -> bool {
        let cur = self.get_f32(index) + if apply { val } else { -val };
        self.set_f32(index, cur.max(0.0))
    }

    /// Scale by `(100 + val)%`; -100% is treated as -99.99% so it can be undone
    pub fn apply_percent_mod_float_value(&mut self, index: u16, val: f32, apply: bool) -> bool {
        let val = if val == -100.0 { -99.99 } else { val };
        let factor = if apply {
            (100.0 + val) / 100.0
        } else {
            100.0 / (100.0 + val)
        };
        let cur = self.get_f32(index) * factor;
        self.set_f32(index, cur)
    }

    pub fn set_stat_float_value(&mut self, index: u16, value: f32) -> bool {
        self.set_f32(index, value.max(0.0))
    }

    pub fn set_stat_i32_value(&mut self, index: u16, value: i32) -> bool {
        self.set_u32(index, value.max(0) as u32)
    }

    // ========================================================================
    // Flags
    // ========================================================================

    pub fn has_flag(&self, index: u16, flag: u32) -> bool {
        self.get_u32(index) & flag != 0
    }

    pub fn set_flag(&mut self, index: u16, flag: u32) -> bool {
        let old = self.get_u32(index);
        self.set_u32(index, old | flag)
    }

    pub fn remove_flag(&mut self, index: u16, flag: u32) -> bool {
        let old = self.get_u32(index);
        self.set_u32(index, old & !flag)
    }

    pub fn toggle_flag(&mut self, index: u16, flag: u32) -> bool {
        if self.has_flag(index, flag) {
            self.remove_flag(index, flag)
        } else {
            self.set_flag(index, flag)
        }
    }

    pub fn apply_mod_flag(&mut self, index: u16, flag: u32, apply: bool) -> bool {
        if apply {
            self.set_flag(index, flag)
        } else {
            self.remove_flag(index, flag)
        }
    }

    pub fn has_byte_flag(&self, index: u16, offset: u8, flag: u8) -> bool {
        self.get_u8(index, offset) & flag != 0
    }

    pub fn set_byte_flag(&mut self, index: u16, offset: u8, flag: u8) -> bool {
        let old = self.get_u8(index, offset);
        self.set_u8(index, offset, old | flag)
    }

    pub fn remove_byte_flag(&mut self, index: u16, offset: u8, flag: u8) -> bool {
        let old = self.get_u8(index, offset);
        self.set_u8(index, offset, old & !flag)
    }

    pub fn toggle_byte_flag(&mut self, index: u16, offset: u8, flag: u8) -> bool {
        if self.has_byte_flag(index, offset, flag) {
            self.remove_byte_flag(index, offset, flag)
        } else {
            self.set_byte_flag(index, offset, flag)
        }
    }

    pub fn apply_mod_byte_flag(&mut self, index: u16, offset: u8, flag: u8, apply: bool) -> bool {
        if apply {
            self.set_byte_flag(index, offset, flag)
        } else {
            self.remove_byte_flag(index, offset, flag)
        }
    }

    pub fn has_flag64(&self, index: u16, flag: u64) -> bool {
        self.get_u64(index) & flag != 0
    }

    pub fn set_flag64(&mut self, index: u16, flag: u64) -> bool {
        let old = self.get_u64(index);
        self.set_u64(index, old | flag)
    }

    pub fn remove_flag64(&mut self, index: u16, flag: u64) -> bool {
        let old = self.get_u64(index);
        self.set_u64(index, old & !flag)
    }

    pub fn toggle_flag64(&mut self, index: u16, flag: u64) -> bool {
        if self.has_flag64(index, flag) {
            self.remove_flag64(index, flag)
        } else {
            self.set_flag64(index, flag)
        }
    }

    pub fn apply_mod_flag64(&mut self, index: u16, flag: u64, apply: bool) -> bool {
        if apply {
            self.set_flag64(index, flag)
        } else {
            self.remove_flag64(index, flag)
        }
    }

    // ========================================================================
    // Dynamic fields
    // ========================================================================

    fn dynamic_array(&self, index: u16) -> Option<&DynamicArray> {
        let array = self.dynamic.array(index);
        if array.is_none() {
            self.report(FieldError::DynamicIndexOutOfBounds {
                index,
                count: self.dynamic_values_count(),
            });
        }
        array
    }

    fn mutate_dynamic(&mut self, index: u16, f: impl FnOnce(&mut DynamicArray) -> bool) -> bool {
        let count = self.dynamic_values_count();
        if index >= count {
            self.report(FieldError::DynamicIndexOutOfBounds { index, count });
            return false;
        }
        let changed = self.dynamic.array_mut(index).map(f).unwrap_or(false);
        if changed {
            self.tracker.schedule();
        }
        changed
    }

    /// Dense copy of one array
    pub fn dynamic_values(&self, index: u16) -> Vec<u32> {
        self.dynamic_array(index)
            .map(DynamicArray::to_vec)
            .unwrap_or_default()
    }

    pub fn dynamic_value(&self, index: u16, offset: u16) -> u32 {
        self.dynamic_array(index).map(|a| a.get(offset)).unwrap_or(0)
    }

    pub fn add_dynamic_value(&mut self, index: u16, value: u32) -> bool {
        let mut full = false;
        let changed = self.mutate_dynamic(index, |a| {
            full = a.add(value).is_none();
            !full
        });
        if full {
            self.report(FieldError::DynamicArrayFull { index });
        }
        changed
    }

    pub fn set_dynamic_value(&mut self, index: u16, offset: u16, value: u32) -> bool {
        self.mutate_dynamic(index, |a| a.set(offset, value))
    }

    pub fn remove_dynamic_value(&mut self, index: u16, value: u32) -> bool {
        self.mutate_dynamic(index, |a| a.remove_value(value))
    }

    pub fn clear_dynamic_value(&mut self, index: u16) -> bool {
        self.mutate_dynamic(index, DynamicArray::clear)
    }

    pub fn dynamic_structured_value<T: Pod>(&self, index: u16, block: u16) -> Option<T> {
        self.dynamic_array(index)
            .map(|a| dynamic::get_structured(a, block))
    }

    pub fn dynamic_structured_values<T: Pod>(&self, index: u16) -> Vec<T> {
        self.dynamic_array(index)
            .map(dynamic::structured_values::<T>)
            .unwrap_or_default()
    }

    pub fn set_dynamic_structured_value<T: Pod>(&mut self, index: u16, block: u16, value: &T) -> bool {
        self.mutate_dynamic(index, |a| dynamic::set_structured(a, block, value))
    }

    pub fn add_dynamic_structured_value<T: Pod>(&mut self, index: u16, value: &T) -> bool {
        let mut full = false;
        let changed = self.mutate_dynamic(index, |a| {
            full = dynamic::add_structured(a, value).is_none();
            !full
        });
        if full {
            self.report(FieldError::DynamicArrayFull { index });
        }
        changed
    }

    // ========================================================================
    // Replication state
    // ========================================================================

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn is_slot_dirty(&self, slot: usize) -> bool {
        self.tracker.is_dirty(slot)
    }

    pub fn dirty_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.tracker.dirty_slots()
    }

    pub fn dynamic(&self) -> &DynamicFields {
        &self.dynamic
    }

    pub fn has_changes(&self) -> bool {
        self.tracker.any() || self.dynamic.has_changes()
    }

    pub fn is_scheduled(&self) -> bool {
        self.tracker.is_scheduled()
    }

    pub fn take_enqueue(&mut self) -> bool {
        self.tracker.take_enqueue()
    }

    /// Drop all change state after a flush
    pub fn clear_changes(&mut self) {
        self.tracker.clear();
        self.dynamic.clear_changes();
    }

    pub fn notify_flags(&self) -> UpdateFieldFlags {
        self.notify_flags
    }

    /// Force-send every field in `flags` groups regardless of dirtiness
    pub fn add_field_notify_flag(&mut self, flags: UpdateFieldFlags) {
        self.notify_flags |= flags;
    }

    pub fn remove_field_notify_flag(&mut self, flags: UpdateFieldFlags) {
        self.notify_flags &= !flags;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::fields::dynamic::{ArenaCooldown, ChangeKind};
    use crate::game::fields::layout::{dynamic as dyn_idx, unit};
    use crate::game::guid::HighGuid;

    fn small_store() -> FieldStore {
        FieldStore::with_counts(ObjectGuid::player(1), TypeId::Object, 4, 1)
    }

    #[test]
    fn test_dedup_law() {
        let mut store = small_store();
        assert!(store.set_u32(2, 7));
        store.clear_changes();
        assert!(!store.set_u32(2, 7));
        assert!(!store.is_slot_dirty(2));
        assert!(!store.has_changes());
    }

    #[test]
    fn test_guid_marks_both_halves() {
        let mut store = small_store();
        let guid = ObjectGuid::new(HighGuid::Unit, 55, 9);
        assert!(store.set_guid(0, guid));
        assert_eq!(store.get_guid(0), guid);
        assert!(store.is_slot_dirty(0));
        assert!(store.is_slot_dirty(1));
        assert!(!store.is_slot_dirty(2));

        store.clear_changes();
        assert!(!store.is_slot_dirty(0));
        assert!(!store.is_slot_dirty(1));
    }

    #[test]
    fn test_out_of_bounds_is_default_and_noop() {
        let mut store = small_store();
        assert_eq!(store.get_u32(4), 0);
        assert!(!store.set_u32(4, 1));
        // wide value straddling the end
        assert!(!store.set_u64(3, 1));
        assert_eq!(store.get_u64(3), 0);
        assert!(!store.has_changes());
    }

    #[test]
    fn test_byte_and_u16_parts() {
        let mut store = small_store();
        assert!(store.set_u8(1, 2, 0xAB));
        assert_eq!(store.get_u32(1), 0x00AB_0000);
        assert_eq!(store.get_u8(1, 2), 0xAB);
        assert!(store.set_u16(1, 0, 0x1234));
        assert_eq!(store.get_u16(1, 0), 0x1234);
        assert_eq!(store.get_u16(1, 1), 0x00AB);

        store.clear_changes();
        assert!(!store.set_u8(1, 4, 1));
        assert!(!store.set_u16(1, 2, 1));
        assert_eq!(store.get_u8(1, 9), 0);
        assert!(!store.has_changes());
    }

    #[test]
    fn test_flags() {
        let mut store = small_store();
        assert!(store.set_flag(2, 0x4));
        assert!(!store.set_flag(2, 0x4));
        assert!(store.has_flag(2, 0x4));
        assert!(store.toggle_flag(2, 0x4));
        assert!(!store.has_flag(2, 0x4));
        assert!(store.apply_mod_flag(2, 0x1, true));
        assert!(store.apply_mod_byte_flag(3, 1, 0x2, true));
        assert!(store.has_byte_flag(3, 1, 0x2));
        assert!(store.remove_byte_flag(3, 1, 0x2));
        assert!(store.toggle_byte_flag(3, 0, 0x8));
        assert_eq!(store.get_u8(3, 0), 0x8);
        assert!(store.toggle_byte_flag(3, 0, 0x8));
        assert_eq!(store.get_u8(3, 0), 0);
        assert!(store.set_flag64(0, 1 << 40));
        assert!(store.has_flag64(0, 1 << 40));
        assert!(store.is_slot_dirty(1));
        assert!(store.toggle_flag64(0, 1 << 40));
        assert!(!store.has_flag64(0, 1 << 40));
        assert!(store.apply_mod_flag64(0, 1 << 3, true));
        assert_eq!(store.get_u32(0), 1 << 3);
        assert!(store.apply_mod_flag64(0, 1 << 3, false));
        assert_eq!(store.get_u64(0), 0);
    }

    #[test]
    fn test_guid_add_remove() {
        let mut store = small_store();
        let a = ObjectGuid::player(5);
        let b = ObjectGuid::player(6);
        assert!(store.add_guid_value(0, a));
        assert!(!store.add_guid_value(0, b));
        assert!(!store.remove_guid_value(0, b));
        assert!(store.remove_guid_value(0, a));
        assert!(store.get_guid(0).is_empty());
    }

    #[test]
    fn test_apply_mods() {
        let mut store = FieldStore::new(ObjectGuid::new(HighGuid::Unit, 1, 1), TypeId::Unit);
        store.set_u32(unit::HEALTH, 10);
        store.apply_mod_u32_value(unit::HEALTH, 25, false);
        assert_eq!(store.get_u32(unit::HEALTH), 0);

        store.set_f32(unit::MOD_CAST_SPEED, 1.0);
        store.apply_percent_mod_float_value(unit::MOD_CAST_SPEED, -100.0, true);
        assert!(store.get_f32(unit::MOD_CAST_SPEED) > 0.0);
        store.apply_percent_mod_float_value(unit::MOD_CAST_SPEED, -100.0, false);
        assert!((store.get_f32(unit::MOD_CAST_SPEED) - 1.0).abs() < 1e-3);

        store.set_f32(unit::BOUNDINGRADIUS, 1.0);
        store.apply_mod_positive_float_value(unit::BOUNDINGRADIUS, 3.0, false);
        assert_eq!(store.get_f32(unit::BOUNDINGRADIUS), 0.0);

        store.set_stat_i32_value(unit::STAT, -4);
        assert_eq!(store.get_u32(unit::STAT), 0);
        store.set_stat_float_value(unit::BOUNDINGRADIUS, -2.5);
        assert_eq!(store.get_f32(unit::BOUNDINGRADIUS), 0.0);

        store.set_i32(unit::STAT, 3);
        store.apply_mod_i32_value(unit::STAT, 5, false);
        assert_eq!(store.get_i32(unit::STAT), -2);

        store.set_f32(unit::COMBATREACH, 1.5);
        store.apply_mod_signed_float_value(unit::COMBATREACH, 2.0, false);
        assert_eq!(store.get_f32(unit::COMBATREACH), -0.5);
    }

    #[test]
    fn test_force_update_marks_clean_slot() {
        let mut store = small_store();
        store.force_values_update_at_index(3);
        assert!(store.is_slot_dirty(3));
        assert!(store.take_enqueue());
        assert!(!store.take_enqueue());
    }

    #[test]
    fn test_dynamic_mutations_schedule() {
        let mut store = small_store();
        assert!(store.add_dynamic_value(0, 10));
        assert!(store.add_dynamic_value(0, 20));
        assert!(store.take_enqueue());
        store.clear_changes();

        assert!(store.set_dynamic_value(0, 1, 99));
        let array = store.dynamic().array(0).map(|a| a.change_kind());
        assert_eq!(array, Some(ChangeKind::ValueChanged));
        assert_eq!(store.dynamic_values(0), vec![10, 99]);
        assert!(store.is_scheduled());
        assert!(!store.set_dynamic_value(3, 0, 1));
    }

    #[test]
    fn test_dynamic_remove_and_clear() {
        let mut store = small_store();
        store.add_dynamic_value(0, 7);
        store.add_dynamic_value(0, 9);
        store.add_dynamic_value(0, 7);
        store.clear_changes();

        assert!(store.remove_dynamic_value(0, 7));
        assert_eq!(store.dynamic_value(0, 2), 0);
        assert_eq!(store.dynamic_value(0, 1), 9);
        assert!(store.is_scheduled());
        store.clear_changes();

        assert!(store.clear_dynamic_value(0));
        assert!(store.dynamic_values(0).is_empty());
        assert!(!store.clear_dynamic_value(0));
        assert_eq!(store.dynamic_value(5, 0), 0);
    }

    #[test]
    fn test_dynamic_add_rejected_when_full() {
        let mut store = small_store();
        assert!(store.set_dynamic_value(0, u16::MAX, 1));
        store.clear_changes();
        assert!(!store.add_dynamic_value(0, 2));
        assert!(!store.is_scheduled());
    }

    #[test]
    fn test_player_arena_cooldowns() {
        let mut store = FieldStore::new(ObjectGuid::player(3), TypeId::Player);
        let cd = ArenaCooldown {
            spell_id: 42,
            charges: 1,
            max_charges: 1,
            ..Default::default()
        };
        assert!(store.add_dynamic_structured_value(dyn_idx::player::ARENA_COOLDOWNS, &cd));
        assert_eq!(
            store.dynamic_structured_value::<ArenaCooldown>(dyn_idx::player::ARENA_COOLDOWNS, 0),
            Some(cd)
        );
        assert_eq!(
            store.dynamic_structured_values::<ArenaCooldown>(dyn_idx::player::ARENA_COOLDOWNS),
            vec![cd]
        );

        let updated = ArenaCooldown { charges: 0, ..cd };
        store.clear_changes();
        assert!(store.set_dynamic_structured_value(dyn_idx::player::ARENA_COOLDOWNS, 0, &updated));
        assert!(!store.set_dynamic_structured_value(dyn_idx::player::ARENA_COOLDOWNS, 0, &updated));
        assert_eq!(
            store.dynamic_structured_value::<ArenaCooldown>(dyn_idx::player::ARENA_COOLDOWNS, 0),
            Some(updated)
        );
    }

    #[test]
    fn test_notify_flags() {
        let mut store = small_store();
        store.add_field_notify_flag(UpdateFieldFlags::PARTY_MEMBER);
        assert!(store.notify_flags().contains(UpdateFieldFlags::PARTY_MEMBER));
        store.remove_field_notify_flag(UpdateFieldFlags::PARTY_MEMBER);
        assert!(store.notify_flags().is_empty());
    }
}
