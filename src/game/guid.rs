//! 64-bit entity identifiers
//!
//! Layout: `[high:16][entry:24][counter:24]` for world objects that carry a
//! template entry, `[high:16][counter:48]` for everything else.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind tag stored in the top 16 bits of a GUID
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighGuid {
    Player = 0x0000,
    Item = 0x4000,
    DynamicObject = 0xF100,
    Corpse = 0xF101,
    AreaTrigger = 0xF102,
    SceneObject = 0xF103,
    Conversation = 0xF104,
    GameObject = 0xF110,
    Transport = 0xF120,
    Unit = 0xF130,
    Pet = 0xF140,
    Vehicle = 0xF150,
    MoTransport = 0x1FC0,
}

impl HighGuid {
    pub fn from_raw(raw: u16) -> Option<Self> {
        Some(match raw {
            0x0000 => Self::Player,
            0x4000 => Self::Item,
            0xF100 => Self::DynamicObject,
            0xF101 => Self::Corpse,
            0xF102 => Self::AreaTrigger,
            0xF103 => Self::SceneObject,
            0xF104 => Self::Conversation,
            0xF110 => Self::GameObject,
            0xF120 => Self::Transport,
            0xF130 => Self::Unit,
            0xF140 => Self::Pet,
            0xF150 => Self::Vehicle,
            0x1FC0 => Self::MoTransport,
            _ => return None,
        })
    }

    /// Whether GUIDs of this kind embed a template entry
    pub fn has_entry(self) -> bool {
        matches!(
            self,
            Self::GameObject
                | Self::Transport
                | Self::Unit
                | Self::Pet
                | Self::Vehicle
                | Self::MoTransport
        )
    }
}

const ENTRY_MASK: u64 = 0x00FF_FFFF;
const COUNTER_MASK_WITH_ENTRY: u64 = 0x00FF_FFFF;
const COUNTER_MASK: u64 = 0x0000_FFFF_FFFF_FFFF;

/// Stable 64-bit entity identifier
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ObjectGuid(u64);

impl ObjectGuid {
    pub const EMPTY: ObjectGuid = ObjectGuid(0);

    pub fn new(high: HighGuid, entry: u32, counter: u64) -> Self {
        let high_bits = (high as u64) << 48;
        if high.has_entry() {
            Self(
                high_bits
                    | ((entry as u64 & ENTRY_MASK) << 24)
                    | (counter & COUNTER_MASK_WITH_ENTRY),
            )
        } else {
            Self(high_bits | (counter & COUNTER_MASK))
        }
    }

    pub fn player(counter: u64) -> Self {
        Self::new(HighGuid::Player, 0, counter)
    }

    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }

    #[inline]
    pub fn low_word(&self) -> u32 {
        self.0 as u32
    }

    #[inline]
    pub fn high_word(&self) -> u32 {
        (self.0 >> 32) as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn high(&self) -> Option<HighGuid> {
        HighGuid::from_raw((self.0 >> 48) as u16)
    }

    pub fn entry(&self) -> u32 {
        match self.high() {
            Some(high) if high.has_entry() => ((self.0 >> 24) & ENTRY_MASK) as u32,
            _ => 0,
        }
    }

    pub fn counter(&self) -> u64 {
        match self.high() {
            Some(high) if high.has_entry() => self.0 & COUNTER_MASK_WITH_ENTRY,
            _ => self.0 & COUNTER_MASK,
        }
    }

    pub fn is_player(&self) -> bool {
        !self.is_empty() && self.high() == Some(HighGuid::Player)
    }

    pub fn is_creature(&self) -> bool {
        self.high() == Some(HighGuid::Unit)
    }

    pub fn is_game_object(&self) -> bool {
        self.high() == Some(HighGuid::GameObject)
    }
}

impl fmt::Display for ObjectGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.high() {
            Some(high) if high.has_entry() => write!(
                f,
                "{:?}-{}-{} (0x{:016X})",
                high,
                self.entry(),
                self.counter(),
                self.0
            ),
            Some(high) => write!(f, "{:?}-{} (0x{:016X})", high, self.counter(), self.0),
            None => write!(f, "Unknown (0x{:016X})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creature_guid_layout() {
        let guid = ObjectGuid::new(HighGuid::Unit, 1234, 77);
        assert_eq!(guid.high(), Some(HighGuid::Unit));
        assert_eq!(guid.entry(), 1234);
        assert_eq!(guid.counter(), 77);
        assert!(guid.is_creature());
        assert!(!guid.is_player());
    }

    #[test]
    fn test_player_guid_layout() {
        let guid = ObjectGuid::player(42);
        assert!(guid.is_player());
        assert_eq!(guid.entry(), 0);
        assert_eq!(guid.counter(), 42);
        assert_eq!(guid.high_word(), 0);
        assert_eq!(guid.low_word(), 42);
    }

    #[test]
    fn test_empty_guid_is_not_player() {
        assert!(ObjectGuid::EMPTY.is_empty());
        assert!(!ObjectGuid::EMPTY.is_player());
    }

    #[test]
    fn test_words_round_trip() {
        let guid = ObjectGuid::new(HighGuid::GameObject, 9, 3);
        let rebuilt = ObjectGuid::from_raw(((guid.high_word() as u64) << 32) | guid.low_word() as u64);
        assert_eq!(rebuilt, guid);
    }
}
