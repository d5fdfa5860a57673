//! Sparse dynamic (array-valued) fields
//!
//! Each array maps a small offset to a u32 word. Missing offsets below the
//! highest key read as zero, so the wire length of an array is always
//! `max(key) + 1`.

use std::collections::BTreeMap;

use bitvec::prelude::*;
use bytemuck::Pod;

/// Offsets are u16, so an array never holds more words than this
pub const MAX_DYNAMIC_OFFSETS: usize = u16::MAX as usize + 1;

/// How an array changed since the last flush. Ordered so that a change can
/// only ever be raised inside one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ChangeKind {
    #[default]
    Unchanged,
    ValueChanged,
    ValueAndSizeChanged,
}

impl ChangeKind {
    fn raise(&mut self, to: ChangeKind) {
        if to > *self {
            *self = to;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DynamicArray {
    values: BTreeMap<u16, u32>,
    dirty: BitVec<u32, Lsb0>,
    change: ChangeKind,
}

impl DynamicArray {
    /// Wire length: highest offset plus one
    pub fn len(&self) -> usize {
        self.values
            .last_key_value()
            .map(|(k, _)| *k as usize + 1)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, offset: u16) -> u32 {
        self.values.get(&offset).copied().unwrap_or(0)
    }

    /// Dense view, missing offsets filled with zero
    pub fn to_vec(&self) -> Vec<u32> {
        let mut out = vec![0u32; self.len()];
        for (&k, &v) in &self.values {
            out[k as usize] = v;
        }
        out
    }

    pub fn change_kind(&self) -> ChangeKind {
        self.change
    }

    pub fn is_offset_dirty(&self, offset: u16) -> bool {
        self.dirty.get(offset as usize).map(|b| *b).unwrap_or(false)
    }

    pub fn dirty_offsets(&self) -> impl Iterator<Item = usize> + '_ {
        self.dirty.iter_ones()
    }

    fn mark(&mut self, offset: u16, kind: ChangeKind) {
        let offset = offset as usize;
        if self.dirty.len() <= offset {
            self.dirty.resize(offset + 1, false);
        }
        self.dirty.set(offset, true);
        self.change.raise(kind);
    }

    /// Append after the highest offset; `None` once offset 65535 is taken
    pub fn add(&mut self, value: u32) -> Option<u16> {
        let offset = u16::try_from(self.len()).ok()?;
        self.set(offset, value);
        Some(offset)
    }

    /// Returns true when the array changed
    pub fn set(&mut self, offset: u16, value: u32) -> bool {
        let grows = offset as usize >= self.len();
        if grows {
            self.values.insert(offset, value);
            self.mark(offset, ChangeKind::ValueAndSizeChanged);
            return true;
        }
        if self.get(offset) == value {
            return false;
        }
        self.values.insert(offset, value);
        self.mark(offset, ChangeKind::ValueChanged);
        true
    }

    /// Zero every entry equal to `value`. Entries are kept, not compacted.
    pub fn remove_value(&mut self, value: u32) -> bool {
        let matches: Vec<u16> = self
            .values
            .iter()
            .filter(|(_, v)| **v == value)
            .map(|(&k, _)| k)
            .collect();
        for &offset in &matches {
            self.values.insert(offset, 0);
            self.mark(offset, ChangeKind::ValueChanged);
        }
        !matches.is_empty()
    }

    pub fn clear(&mut self) -> bool {
        if self.values.is_empty() {
            return false;
        }
        self.values.clear();
        self.dirty.clear();
        self.change.raise(ChangeKind::ValueAndSizeChanged);
        true
    }

    pub fn clear_changes(&mut self) {
        self.dirty.clear();
        self.change = ChangeKind::Unchanged;
    }
}

/// All dynamic arrays of one entity
#[derive(Debug, Clone, Default)]
pub struct DynamicFields {
    arrays: Vec<DynamicArray>,
}

impl DynamicFields {
    pub fn new(count: usize) -> Self {
        Self {
            arrays: vec![DynamicArray::default(); count],
        }
    }

    pub fn count(&self) -> usize {
        self.arrays.len()
    }

    pub fn array(&self, index: u16) -> Option<&DynamicArray> {
        self.arrays.get(index as usize)
    }

    pub fn array_mut(&mut self, index: u16) -> Option<&mut DynamicArray> {
        self.arrays.get_mut(index as usize)
    }

    pub fn has_changes(&self) -> bool {
        self.arrays
            .iter()
            .any(|a| a.change != ChangeKind::Unchanged)
    }

    pub fn clear_changes(&mut self) {
        for array in &mut self.arrays {
            array.clear_changes();
        }
    }
}

// ============================================================================
// Structured values
// ============================================================================

/// Number of consecutive u32 offsets one `T` occupies
pub const fn words_of<T: Pod>() -> usize {
    std::mem::size_of::<T>() / 4
}

/// Pack a POD value into the array at `block * words_of::<T>()`.
/// Returns true when any word changed; blocks past the offset range are
/// rejected untouched.
pub fn set_structured<T: Pod>(array: &mut DynamicArray, block: u16, value: &T) -> bool {
    let bytes = bytemuck::bytes_of(value);
    let base = block as usize * words_of::<T>();
    if base + words_of::<T>() > MAX_DYNAMIC_OFFSETS {
        return false;
    }
    let mut changed = false;
    for (i, chunk) in bytes.chunks_exact(4).enumerate() {
        let word = u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        changed |= array.set((base + i) as u16, word);
    }
    changed
}

/// Append a POD value after the last complete block; `None` when the
/// block would not fit in the offset range
pub fn add_structured<T: Pod>(array: &mut DynamicArray, value: &T) -> Option<u16> {
    let words = words_of::<T>().max(1);
    let block = array.len().div_ceil(words);
    if (block + 1) * words > MAX_DYNAMIC_OFFSETS {
        return None;
    }
    let block = u16::try_from(block).ok()?;
    set_structured(array, block, value);
    Some(block)
}

pub fn get_structured<T: Pod>(array: &DynamicArray, block: u16) -> T {
    let words = words_of::<T>();
    let base = block as usize * words;
    let mut bytes = vec![0u8; std::mem::size_of::<T>()];
    for (i, chunk) in bytes.chunks_exact_mut(4).enumerate() {
        chunk.copy_from_slice(&array.get((base + i) as u16).to_ne_bytes());
    }
    bytemuck::pod_read_unaligned(&bytes)
}

pub fn structured_values<T: Pod>(array: &DynamicArray) -> Vec<T> {
    let words = words_of::<T>().max(1);
    let blocks = array.len() / words;
    (0..blocks as u16).map(|b| get_structured(array, b)).collect()
}

/// Arena cooldown entry carried by players
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ArenaCooldown {
    pub spell_id: u32,
    pub charges: u32,
    pub flags: u32,
    pub start_time: u32,
    pub end_time: u32,
    pub next_charge_time: u32,
    pub max_charges: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_existing_offset_is_value_changed() {
        let mut array = DynamicArray::default();
        array.set(0, 10);
        array.set(1, 20);
        array.clear_changes();

        assert!(array.set(1, 99));
        assert_eq!(array.change_kind(), ChangeKind::ValueChanged);
        assert!(array.is_offset_dirty(1));
        assert!(!array.is_offset_dirty(0));
    }

    #[test]
    fn test_add_to_non_empty_is_size_change() {
        let mut array = DynamicArray::default();
        array.add(5);
        array.clear_changes();

        assert_eq!(array.add(6), Some(1));
        assert_eq!(array.change_kind(), ChangeKind::ValueAndSizeChanged);
        // never downgrades inside a cycle
        array.set(0, 7);
        assert_eq!(array.change_kind(), ChangeKind::ValueAndSizeChanged);
    }

    #[test]
    fn test_same_value_is_noop() {
        let mut array = DynamicArray::default();
        array.set(0, 3);
        array.clear_changes();
        assert!(!array.set(0, 3));
        assert_eq!(array.change_kind(), ChangeKind::Unchanged);
    }

    #[test]
    fn test_sparse_gap_reads_zero() {
        let mut array = DynamicArray::default();
        array.set(3, 1);
        assert_eq!(array.len(), 4);
        assert_eq!(array.to_vec(), vec![0, 0, 0, 1]);
        assert_eq!(array.add(2), Some(4));
    }

    #[test]
    fn test_add_rejected_when_offsets_exhausted() {
        let mut array = DynamicArray::default();
        array.set(u16::MAX, 1);
        array.clear_changes();

        assert_eq!(array.add(2), None);
        assert_eq!(array.len(), MAX_DYNAMIC_OFFSETS);
        assert_eq!(array.get(0), 0);
        assert_eq!(array.change_kind(), ChangeKind::Unchanged);
        assert_eq!(add_structured(&mut array, &ArenaCooldown::default()), None);
    }

    #[test]
    fn test_remove_value_zeroes_matches() {
        let mut array = DynamicArray::default();
        array.add(4);
        array.add(8);
        array.add(4);
        array.clear_changes();

        assert!(array.remove_value(4));
        assert_eq!(array.to_vec(), vec![0, 8, 0]);
        assert_eq!(array.change_kind(), ChangeKind::ValueChanged);
        assert_eq!(array.dirty_offsets().collect::<Vec<_>>(), vec![0, 2]);
        assert!(!array.remove_value(42));
    }

    #[test]
    fn test_clear_only_when_non_empty() {
        let mut array = DynamicArray::default();
        assert!(!array.clear());
        assert_eq!(array.change_kind(), ChangeKind::Unchanged);

        array.add(1);
        array.clear_changes();
        assert!(array.clear());
        assert!(array.is_empty());
        assert_eq!(array.change_kind(), ChangeKind::ValueAndSizeChanged);
    }

    #[test]
    fn test_structured_values() {
        let mut array = DynamicArray::default();
        let first = ArenaCooldown {
            spell_id: 100,
            charges: 1,
            ..Default::default()
        };
        let second = ArenaCooldown {
            spell_id: 200,
            max_charges: 2,
            ..Default::default()
        };
        assert_eq!(words_of::<ArenaCooldown>(), 7);
        assert_eq!(add_structured(&mut array, &first), Some(0));
        assert_eq!(add_structured(&mut array, &second), Some(1));
        assert_eq!(array.len(), 14);
        assert_eq!(array.get(7), 200);
        assert_eq!(get_structured::<ArenaCooldown>(&array, 1), second);
        assert_eq!(structured_values::<ArenaCooldown>(&array), vec![first, second]);
    }
}
