//! Per-observer field visibility
//!
//! Resolves which field groups of an entity an observer may receive. A slot
//! is replicated only when its group flags intersect the observer's
//! composite visible flag.

use crate::game::detection::{charmer_or_owner_player_or_self, is_in_same_raid_with, EntityLookup};
use crate::game::entity::{unit_dynamic_flags, Entity};
use crate::game::fields::layout::{dynamic_field_flags, field_flags};
use crate::game::fields::UpdateFieldFlags;
use crate::game::object_type::TypeId;

/// Flag tables and visible flag for one (entity, observer) pair
#[derive(Debug, Clone, Copy)]
pub struct FieldVisibility {
    pub fields: &'static [UpdateFieldFlags],
    pub dynamic: &'static [UpdateFieldFlags],
    pub visible: UpdateFieldFlags,
}

impl FieldVisibility {
    pub fn includes(&self, slot: usize) -> bool {
        self.fields
            .get(slot)
            .is_some_and(|flags| flags.intersects(self.visible))
    }
}

pub fn resolve(target: &Entity, observer: &Entity, lookup: &dyn EntityLookup) -> FieldVisibility {
    let type_id = target.type_id();
    let observer_guid = observer.guid();
    let mut visible = UpdateFieldFlags::PUBLIC;

    if target.guid() == observer_guid {
        visible |= UpdateFieldFlags::PRIVATE;
    }

    let owned = target.owner_guid() == observer_guid;
    match type_id {
        TypeId::Item | TypeId::Container => {
            if owned {
                visible |= UpdateFieldFlags::OWNER | UpdateFieldFlags::ITEM_OWNER;
            }
        }
        TypeId::Unit | TypeId::Player => {
            if owned {
                visible |= UpdateFieldFlags::OWNER;
            }

            if target.has_dynamic_flag(unit_dynamic_flags::SPECIAL_INFO)
                && target.has_aura_with_caster_empathy(observer_guid)
            {
                visible |= UpdateFieldFlags::SPECIAL_INFO;
            }

            if let Some(player) = charmer_or_owner_player_or_self(target, lookup) {
                if observer.is_player() && is_in_same_raid_with(player, observer) {
                    visible |= UpdateFieldFlags::PARTY_MEMBER;
                }
            }
        }
        TypeId::GameObject | TypeId::DynamicObject | TypeId::Corpse | TypeId::Conversation => {
            if owned {
                visible |= UpdateFieldFlags::OWNER;
            }
        }
        TypeId::Object | TypeId::AreaTrigger | TypeId::SceneObject => {}
    }

    FieldVisibility {
        fields: field_flags(type_id),
        dynamic: dynamic_field_flags(type_id),
        visible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::{EntityData, GroupInfo};
    use crate::game::fields::layout::{item, player, unit};
    use crate::game::guid::{HighGuid, ObjectGuid};
    use hashbrown::HashMap;

    fn player_entity(counter: u64) -> Entity {
        Entity::create(ObjectGuid::player(counter), EntityData::Player(Box::default()))
    }

    #[test]
    fn test_public_only_for_strangers() {
        let world: HashMap<ObjectGuid, Entity> = HashMap::new();
        let target = player_entity(1);
        let observer = player_entity(2);
        let vis = resolve(&target, &observer, &world);
        assert_eq!(vis.visible, UpdateFieldFlags::PUBLIC);
        assert!(vis.includes(unit::HEALTH as usize));
        assert!(!vis.includes(player::INV_SLOT_HEAD as usize));
    }

    #[test]
    fn test_self_gets_private() {
        let world: HashMap<ObjectGuid, Entity> = HashMap::new();
        let me = player_entity(1);
        let vis = resolve(&me, &me, &world);
        assert!(vis.visible.contains(UpdateFieldFlags::PRIVATE));
        assert!(vis.includes(player::INV_SLOT_HEAD as usize));
        assert!(vis.includes(player::COINAGE as usize));
    }

    #[test]
    fn test_item_owner() {
        let world: HashMap<ObjectGuid, Entity> = HashMap::new();
        let owner = player_entity(1);
        let mut bag = Entity::create(ObjectGuid::new(HighGuid::Item, 0, 7), EntityData::Item);
        bag.fields_mut().set_guid(item::OWNER, owner.guid());

        let vis = resolve(&bag, &owner, &world);
        assert!(vis
            .visible
            .contains(UpdateFieldFlags::OWNER | UpdateFieldFlags::ITEM_OWNER));

        let stranger = player_entity(2);
        let vis = resolve(&bag, &stranger, &world);
        assert_eq!(vis.visible, UpdateFieldFlags::PUBLIC);
        assert!(!vis.includes(item::STACK_COUNT as usize));
    }

    #[test]
    fn test_party_member_via_controller() {
        let mut world: HashMap<ObjectGuid, Entity> = HashMap::new();
        let mut leader = player_entity(1);
        let mut friend = player_entity(2);
        if let Some(p) = leader.player_mut() {
            p.group = Some(GroupInfo { id: 3, subgroup: 0 });
        }
        if let Some(p) = friend.player_mut() {
            p.group = Some(GroupInfo { id: 3, subgroup: 4 });
        }

        let mut pet = Entity::create(ObjectGuid::new(HighGuid::Pet, 1, 1), EntityData::Unit(Box::default()));
        pet.fields_mut().set_guid(unit::SUMMONEDBY, leader.guid());
        world.insert(leader.guid(), leader);

        let vis = resolve(&pet, &friend, &world);
        assert!(vis.visible.contains(UpdateFieldFlags::PARTY_MEMBER));
        assert!(!vis.visible.contains(UpdateFieldFlags::OWNER));

        let loner = player_entity(5);
        assert!(!resolve(&pet, &loner, &world)
            .visible
            .contains(UpdateFieldFlags::PARTY_MEMBER));
    }

    #[test]
    fn test_party_member_when_charmed_by_creature() {
        let mut world: HashMap<ObjectGuid, Entity> = HashMap::new();
        let mut charmed = player_entity(1);
        let mut friend = player_entity(2);
        if let Some(p) = charmed.player_mut() {
            p.group = Some(GroupInfo { id: 3, subgroup: 0 });
        }
        if let Some(p) = friend.player_mut() {
            p.group = Some(GroupInfo { id: 3, subgroup: 1 });
        }

        let charmer = Entity::create(ObjectGuid::new(HighGuid::Unit, 9, 4), EntityData::Unit(Box::default()));
        charmed.fields_mut().set_guid(unit::CHARMEDBY, charmer.guid());
        world.insert(charmer.guid(), charmer);

        let vis = resolve(&charmed, &friend, &world);
        assert!(vis.visible.contains(UpdateFieldFlags::PARTY_MEMBER));
    }

    #[test]
    fn test_special_info_needs_flag_and_empathy() {
        let world: HashMap<ObjectGuid, Entity> = HashMap::new();
        let observer = player_entity(1);
        let mut beast = Entity::create(ObjectGuid::new(HighGuid::Unit, 9, 1), EntityData::Unit(Box::default()));
        if let Some(u) = beast.unit_mut() {
            u.auras.empathy_casters.push(observer.guid());
        }
        assert!(!resolve(&beast, &observer, &world)
            .visible
            .contains(UpdateFieldFlags::SPECIAL_INFO));

        beast
            .fields_mut()
            .set_flag(crate::game::fields::layout::object::DYNAMIC_FLAGS, unit_dynamic_flags::SPECIAL_INFO);
        assert!(resolve(&beast, &observer, &world)
            .visible
            .contains(UpdateFieldFlags::SPECIAL_INFO));
    }
}
