//! Entity kinds and their membership masks

use bitflags::bitflags;

/// Entity kind, written on the wire as a single byte
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeId {
    Object = 0,
    Item = 1,
    Container = 2,
    Unit = 3,
    Player = 4,
    GameObject = 5,
    DynamicObject = 6,
    Corpse = 7,
    AreaTrigger = 8,
    SceneObject = 9,
    Conversation = 10,
}

bitflags! {
    /// Membership bitset derived from a [`TypeId`] for fast `is_type` tests
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeMask: u32 {
        const OBJECT         = 0x0001;
        const ITEM           = 0x0002;
        const CONTAINER      = 0x0004;
        const UNIT           = 0x0008;
        const PLAYER         = 0x0010;
        const GAMEOBJECT     = 0x0020;
        const DYNAMICOBJECT  = 0x0040;
        const CORPSE         = 0x0080;
        const AREATRIGGER    = 0x0100;
        const SCENEOBJECT    = 0x0200;
        const CONVERSATION   = 0x0400;
        const SEER           = Self::PLAYER.bits() | Self::UNIT.bits() | Self::DYNAMICOBJECT.bits();
    }
}

impl TypeId {
    /// The full membership mask of this kind (includes its ancestors)
    pub fn mask(self) -> TypeMask {
        match self {
            TypeId::Object => TypeMask::OBJECT,
            TypeId::Item => TypeMask::OBJECT | TypeMask::ITEM,
            TypeId::Container => TypeMask::OBJECT | TypeMask::ITEM | TypeMask::CONTAINER,
            TypeId::Unit => TypeMask::OBJECT | TypeMask::UNIT,
            TypeId::Player => TypeMask::OBJECT | TypeMask::UNIT | TypeMask::PLAYER,
            TypeId::GameObject => TypeMask::OBJECT | TypeMask::GAMEOBJECT,
            TypeId::DynamicObject => TypeMask::OBJECT | TypeMask::DYNAMICOBJECT,
            TypeId::Corpse => TypeMask::OBJECT | TypeMask::CORPSE,
            TypeId::AreaTrigger => TypeMask::OBJECT | TypeMask::AREATRIGGER,
            TypeId::SceneObject => TypeMask::OBJECT | TypeMask::SCENEOBJECT,
            TypeId::Conversation => TypeMask::OBJECT | TypeMask::CONVERSATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_mask_includes_unit() {
        let mask = TypeId::Player.mask();
        assert!(mask.contains(TypeMask::UNIT));
        assert!(mask.contains(TypeMask::OBJECT));
        assert!(!mask.contains(TypeMask::ITEM));
    }

    #[test]
    fn test_container_mask_includes_item() {
        let mask = TypeId::Container.mask();
        assert!(mask.contains(TypeMask::ITEM | TypeMask::CONTAINER));
        assert!(!TypeId::Item.mask().contains(TypeMask::CONTAINER));
    }

    #[test]
    fn test_seer_mask() {
        assert!(TypeId::Unit.mask().intersects(TypeMask::SEER));
        assert!(!TypeId::GameObject.mask().intersects(TypeMask::SEER));
    }
}
