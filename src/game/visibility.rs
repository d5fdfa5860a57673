//! Per-entity concealment and detection state
//!
//! Four leveled tables: server-side visibility (GM level, ghost flags),
//! invisibility and stealth, each paired with a matching detect table.

use bitflags::bitflags;
use smallvec::{smallvec, SmallVec};

/// A small enum usable as an index into [`FlaggedValues`]
pub trait FlagType: Copy {
    const COUNT: usize;
    fn index(self) -> usize;
}

/// Active-type bitmask plus one level per type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlaggedValues<T: FlagType> {
    flags: u64,
    values: SmallVec<[i32; 8]>,
    _marker: std::marker::PhantomData<T>,
}

impl<T: FlagType> Default for FlaggedValues<T> {
    fn default() -> Self {
        Self {
            flags: 0,
            values: smallvec![0; T::COUNT],
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: FlagType> FlaggedValues<T> {
    #[inline]
    pub fn flags(&self) -> u64 {
        self.flags
    }

    pub fn has_flag(&self, ty: T) -> bool {
        self.flags & (1 << ty.index()) != 0
    }

    pub fn add_flag(&mut self, ty: T) {
        self.flags |= 1 << ty.index();
    }

    pub fn del_flag(&mut self, ty: T) {
        self.flags &= !(1 << ty.index());
    }

    pub fn value(&self, ty: T) -> i32 {
        self.values[ty.index()]
    }

    pub fn set_value(&mut self, ty: T, value: i32) {
        self.values[ty.index()] = value;
    }

    pub fn add_value(&mut self, ty: T, value: i32) {
        self.values[ty.index()] += value;
    }

    /// Level by raw type index, zero when out of range
    pub fn value_at(&self, index: usize) -> i32 {
        self.values.get(index).copied().unwrap_or(0)
    }
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerSideVisibilityType {
    Gm = 0,
    Ghost = 1,
}

impl FlagType for ServerSideVisibilityType {
    const COUNT: usize = 2;
    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StealthType {
    General = 0,
    Trap = 1,
}

impl StealthType {
    pub const ALL: [StealthType; 2] = [StealthType::General, StealthType::Trap];
}

impl FlagType for StealthType {
    const COUNT: usize = 2;
    fn index(self) -> usize {
        self as usize
    }
}

/// Invisibility type index (0..39)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvisibilityType(pub u8);

impl InvisibilityType {
    pub const GENERAL: InvisibilityType = InvisibilityType(0);
    pub const TRAP: InvisibilityType = InvisibilityType(3);
    pub const TOTAL: usize = 39;
}

impl FlagType for InvisibilityType {
    const COUNT: usize = InvisibilityType::TOTAL;
    fn index(self) -> usize {
        self.0 as usize
    }
}

bitflags! {
    /// Values stored under [`ServerSideVisibilityType::Ghost`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GhostVisibility: i32 {
        const ALIVE = 0x1;
        const GHOST = 0x2;
    }
}

/// GM visibility levels
pub mod gm_level {
    pub const NONE: i32 = 0;
    pub const GAME_MASTER: i32 = 2;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityState {
    pub server_side: FlaggedValues<ServerSideVisibilityType>,
    pub server_side_detect: FlaggedValues<ServerSideVisibilityType>,
    pub invisibility: FlaggedValues<InvisibilityType>,
    pub invisibility_detect: FlaggedValues<InvisibilityType>,
    pub stealth: FlaggedValues<StealthType>,
    pub stealth_detect: FlaggedValues<StealthType>,
}

impl VisibilityState {
    /// Default state of a living, visible world entity
    pub fn new() -> Self {
        let mut state = Self::default();
        state
            .server_side
            .set_value(ServerSideVisibilityType::Ghost, GhostVisibility::ALIVE.bits());
        state
            .server_side_detect
            .set_value(ServerSideVisibilityType::Ghost, GhostVisibility::ALIVE.bits());
        state
    }

    pub fn gm_level(&self) -> i32 {
        self.server_side.value(ServerSideVisibilityType::Gm)
    }

    pub fn gm_detect(&self) -> i32 {
        self.server_side_detect.value(ServerSideVisibilityType::Gm)
    }

    pub fn ghost_flags(&self) -> GhostVisibility {
        GhostVisibility::from_bits_truncate(self.server_side.value(ServerSideVisibilityType::Ghost))
    }

    pub fn ghost_detect(&self) -> GhostVisibility {
        GhostVisibility::from_bits_truncate(
            self.server_side_detect.value(ServerSideVisibilityType::Ghost),
        )
    }

    /// Enter or leave the ghost state
    pub fn set_ghost(&mut self, ghost: bool) {
        let flags = if ghost {
            GhostVisibility::GHOST
        } else {
            GhostVisibility::ALIVE
        };
        self.server_side
            .set_value(ServerSideVisibilityType::Ghost, flags.bits());
        self.server_side_detect
            .set_value(ServerSideVisibilityType::Ghost, flags.bits());
    }

    pub fn set_stealth(&mut self, ty: StealthType, level: i32) {
        self.stealth.add_flag(ty);
        self.stealth.set_value(ty, level);
    }

    pub fn set_invisibility(&mut self, ty: InvisibilityType, level: i32) {
        self.invisibility.add_flag(ty);
        self.invisibility.set_value(ty, level);
    }

    pub fn set_invisibility_detect(&mut self, ty: InvisibilityType, level: i32) {
        self.invisibility_detect.add_flag(ty);
        self.invisibility_detect.set_value(ty, level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flagged_values() {
        let mut values = FlaggedValues::<StealthType>::default();
        assert_eq!(values.flags(), 0);
        values.add_flag(StealthType::Trap);
        values.set_value(StealthType::Trap, 12);
        values.add_value(StealthType::Trap, 3);
        assert!(values.has_flag(StealthType::Trap));
        assert!(!values.has_flag(StealthType::General));
        assert_eq!(values.value(StealthType::Trap), 15);
        values.del_flag(StealthType::Trap);
        assert_eq!(values.flags(), 0);
        assert_eq!(values.value_at(99), 0);
    }

    #[test]
    fn test_invisibility_types_fit_mask() {
        let mut values = FlaggedValues::<InvisibilityType>::default();
        values.add_flag(InvisibilityType(38));
        assert_eq!(values.flags(), 1 << 38);
    }

    #[test]
    fn test_ghost_state() {
        let mut state = VisibilityState::new();
        assert_eq!(state.ghost_flags(), GhostVisibility::ALIVE);
        state.set_ghost(true);
        assert_eq!(state.ghost_flags(), GhostVisibility::GHOST);
        assert_eq!(state.ghost_detect(), GhostVisibility::GHOST);
        assert_eq!(state.gm_level(), gm_level::NONE);
    }
}
