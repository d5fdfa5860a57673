//! Static field layouts per entity kind
//!
//! Every kind has a fixed slot layout (object header first, then the kind's
//! own fields) and a parallel table of [`UpdateFieldFlags`] describing which
//! observers may ever receive each slot. Dynamic (array) fields have their own
//! smaller tables.

use bitflags::bitflags;

use crate::game::object_type::TypeId;

bitflags! {
    /// Field visibility groups
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct UpdateFieldFlags: u32 {
        const PUBLIC           = 0x001;
        const PRIVATE          = 0x002;
        const OWNER            = 0x004;
        const ITEM_OWNER       = 0x008;
        const SPECIAL_INFO     = 0x010;
        const PARTY_MEMBER     = 0x020;
        const UNIT_ALL         = 0x040;
        const VIEWER_DEPENDENT = 0x080;
        const URGENT           = 0x100;
        const URGENT_SELF_ONLY = 0x200;
    }
}

// ============================================================================
// Slot indices
// ============================================================================

pub mod object {
    pub const GUID: u16 = 0; // 2 words
    pub const DATA: u16 = 2; // 2 words
    pub const TYPE: u16 = 4;
    pub const ENTRY: u16 = 5;
    pub const DYNAMIC_FLAGS: u16 = 6;
    pub const SCALE_X: u16 = 7;
    pub const END: u16 = 8;
}

pub mod item {
    use super::object;

    pub const OWNER: u16 = object::END; // 2 words
    pub const CONTAINED: u16 = object::END + 2; // 2 words
    pub const CREATOR: u16 = object::END + 4; // 2 words
    pub const GIFTCREATOR: u16 = object::END + 6; // 2 words
    pub const STACK_COUNT: u16 = object::END + 8;
    pub const DURATION: u16 = object::END + 9;
    pub const SPELL_CHARGES: u16 = object::END + 10; // 5 words
    pub const FLAGS: u16 = object::END + 15;
    pub const ENCHANTMENT: u16 = object::END + 16; // 3 words
    pub const PROPERTY_SEED: u16 = object::END + 19;
    pub const RANDOM_PROPERTIES_ID: u16 = object::END + 20;
    pub const DURABILITY: u16 = object::END + 21;
    pub const MAXDURABILITY: u16 = object::END + 22;
    pub const CREATE_PLAYED_TIME: u16 = object::END + 23;
    pub const MODIFIERS_MASK: u16 = object::END + 24;
    pub const CONTEXT: u16 = object::END + 25;
    pub const END: u16 = object::END + 26;
}

pub mod container {
    use super::item;

    pub const MAX_SLOTS: u16 = 16;
    pub const SLOT_1: u16 = item::END; // 2 words per slot
    pub const NUM_SLOTS: u16 = item::END + MAX_SLOTS * 2;
    pub const END: u16 = NUM_SLOTS + 1;
}

pub mod unit {
    use super::object;

    pub const CHARM: u16 = object::END; // 2 words
    pub const SUMMON: u16 = object::END + 2; // 2 words
    pub const CRITTER: u16 = object::END + 4; // 2 words
    pub const CHARMEDBY: u16 = object::END + 6; // 2 words
    pub const SUMMONEDBY: u16 = object::END + 8; // 2 words
    pub const CREATEDBY: u16 = object::END + 10; // 2 words
    pub const DEMON_CREATOR: u16 = object::END + 12; // 2 words
    pub const TARGET: u16 = object::END + 14; // 2 words
    pub const BYTES_0: u16 = object::END + 16;
    pub const HEALTH: u16 = object::END + 17;
    pub const POWER: u16 = object::END + 18;
    pub const MAXHEALTH: u16 = object::END + 19;
    pub const MAXPOWER: u16 = object::END + 20;
    pub const LEVEL: u16 = object::END + 21;
    pub const EFFECTIVE_LEVEL: u16 = object::END + 22;
    pub const FACTIONTEMPLATE: u16 = object::END + 23;
    pub const VIRTUAL_ITEM: u16 = object::END + 24; // 3 words
    pub const FLAGS: u16 = object::END + 27;
    pub const FLAGS_2: u16 = object::END + 28;
    pub const AURASTATE: u16 = object::END + 29;
    pub const BASEATTACKTIME: u16 = object::END + 30; // 2 words
    pub const RANGEDATTACKTIME: u16 = object::END + 32;
    pub const BOUNDINGRADIUS: u16 = object::END + 33;
    pub const COMBATREACH: u16 = object::END + 34;
    pub const DISPLAYID: u16 = object::END + 35;
    pub const NATIVEDISPLAYID: u16 = object::END + 36;
    pub const MOUNTDISPLAYID: u16 = object::END + 37;
    pub const MINDAMAGE: u16 = object::END + 38;
    pub const MAXDAMAGE: u16 = object::END + 39;
    pub const BYTES_1: u16 = object::END + 40;
    pub const PETNUMBER: u16 = object::END + 41;
    pub const PET_NAME_TIMESTAMP: u16 = object::END + 42;
    pub const PETEXPERIENCE: u16 = object::END + 43;
    pub const PETNEXTLEVELEXP: u16 = object::END + 44;
    pub const MOD_CAST_SPEED: u16 = object::END + 45;
    pub const CREATED_BY_SPELL: u16 = object::END + 46;
    pub const NPC_FLAGS: u16 = object::END + 47; // 2 words
    pub const EMOTESTATE: u16 = object::END + 49;
    pub const STAT: u16 = object::END + 50; // 5 words
    pub const RESISTANCES: u16 = object::END + 55; // 7 words
    pub const BASE_MANA: u16 = object::END + 62;
    pub const BYTES_2: u16 = object::END + 63;
    pub const ATTACK_POWER: u16 = object::END + 64;
    pub const HOVERHEIGHT: u16 = object::END + 65;
    pub const END: u16 = object::END + 66;
}

pub mod player {
    use super::unit;

    pub const QUEST_LOG_SIZE: u16 = 5;
    pub const VISIBLE_ITEM_SLOTS: u16 = 19;
    pub const INVENTORY_SLOTS: u16 = 23;

    pub const DUEL_ARBITER: u16 = unit::END; // 2 words
    pub const FLAGS: u16 = unit::END + 2;
    pub const GUILD_RANK_ID: u16 = unit::END + 3;
    pub const GUILD_DELETE_DATE: u16 = unit::END + 4;
    pub const GUILD_LEVEL: u16 = unit::END + 5;
    pub const BYTES: u16 = unit::END + 6;
    pub const BYTES_2: u16 = unit::END + 7;
    pub const BYTES_3: u16 = unit::END + 8;
    pub const DUEL_TEAM: u16 = unit::END + 9;
    pub const GUILD_TIMESTAMP: u16 = unit::END + 10;
    pub const QUEST_LOG: u16 = unit::END + 11; // 4 words per entry
    pub const VISIBLE_ITEM: u16 = QUEST_LOG + QUEST_LOG_SIZE * 4; // 2 words per slot
    pub const CHOSEN_TITLE: u16 = VISIBLE_ITEM + VISIBLE_ITEM_SLOTS * 2;
    pub const FAKE_INEBRIATION: u16 = CHOSEN_TITLE + 1;
    pub const CURRENT_SPEC_ID: u16 = CHOSEN_TITLE + 2;
    pub const TAXI_MOUNT_ANIM_KIT: u16 = CHOSEN_TITLE + 3;
    pub const AVG_ITEM_LEVEL: u16 = CHOSEN_TITLE + 4; // 4 words
    pub const HONOR_LEVEL: u16 = CHOSEN_TITLE + 8;
    pub const INV_SLOT_HEAD: u16 = CHOSEN_TITLE + 9; // 2 words per slot
    pub const FARSIGHT: u16 = INV_SLOT_HEAD + INVENTORY_SLOTS * 2; // 2 words
    pub const XP: u16 = FARSIGHT + 2;
    pub const NEXT_LEVEL_XP: u16 = FARSIGHT + 3;
    pub const SKILL_LINEIDX: u16 = FARSIGHT + 4; // 16 words
    pub const CHARACTER_POINTS: u16 = FARSIGHT + 20;
    pub const TRACK_CREATURES: u16 = FARSIGHT + 21;
    pub const TRACK_RESOURCES: u16 = FARSIGHT + 22;
    pub const COINAGE: u16 = FARSIGHT + 23; // 2 words
    pub const END: u16 = FARSIGHT + 25;
}

pub mod gameobject {
    use super::object;

    pub const CREATED_BY: u16 = object::END; // 2 words
    pub const DISPLAYID: u16 = object::END + 2;
    pub const FLAGS: u16 = object::END + 3;
    pub const PARENTROTATION: u16 = object::END + 4; // 4 words
    pub const FACTION: u16 = object::END + 8;
    pub const LEVEL: u16 = object::END + 9;
    pub const BYTES_1: u16 = object::END + 10;
    pub const SPELL_VISUAL_ID: u16 = object::END + 11;
    pub const STATE_SPELL_VISUAL_ID: u16 = object::END + 12;
    pub const STATE_ANIM_ID: u16 = object::END + 13;
    pub const STATE_ANIM_KIT_ID: u16 = object::END + 14;
    pub const STATE_WORLD_EFFECT_ID: u16 = object::END + 15; // 4 words
    pub const END: u16 = object::END + 19;
}

pub mod dynamicobject {
    use super::object;

    pub const CASTER: u16 = object::END; // 2 words
    pub const TYPE: u16 = object::END + 2;
    pub const SPELL_X_SPELL_VISUAL_ID: u16 = object::END + 3;
    pub const SPELLID: u16 = object::END + 4;
    pub const RADIUS: u16 = object::END + 5;
    pub const CASTTIME: u16 = object::END + 6;
    pub const END: u16 = object::END + 7;
}

pub mod corpse {
    use super::object;

    pub const OWNER: u16 = object::END; // 2 words
    pub const PARTY: u16 = object::END + 2; // 2 words
    pub const GUILD: u16 = object::END + 4; // 2 words
    pub const DISPLAY_ID: u16 = object::END + 6;
    pub const ITEM: u16 = object::END + 7; // 19 words
    pub const BYTES_1: u16 = object::END + 26;
    pub const BYTES_2: u16 = object::END + 27;
    pub const FLAGS: u16 = object::END + 28;
    pub const DYNAMIC_FLAGS: u16 = object::END + 29;
    pub const FACTIONTEMPLATE: u16 = object::END + 30;
    pub const CUSTOM_DISPLAY_OPTION: u16 = object::END + 31;
    pub const END: u16 = object::END + 32;
}

pub mod areatrigger {
    use super::object;

    pub const OVERRIDE_SCALE_CURVE: u16 = object::END; // 7 words
    pub const EXTRA_SCALE_CURVE: u16 = object::END + 7; // 7 words
    pub const CASTER: u16 = object::END + 14; // 2 words
    pub const DURATION: u16 = object::END + 16;
    pub const TIME_TO_TARGET: u16 = object::END + 17;
    pub const TIME_TO_TARGET_SCALE: u16 = object::END + 18;
    pub const TIME_TO_TARGET_EXTRA_SCALE: u16 = object::END + 19;
    pub const SPELLID: u16 = object::END + 20;
    pub const SPELL_FOR_VISUALS: u16 = object::END + 21;
    pub const SPELL_X_SPELL_VISUAL_ID: u16 = object::END + 22;
    pub const BOUNDS_RADIUS_2D: u16 = object::END + 23;
    pub const DECAL_PROPERTIES_ID: u16 = object::END + 24;
    pub const CREATING_EFFECT_GUID: u16 = object::END + 25; // 2 words
    pub const END: u16 = object::END + 27;
}

pub mod sceneobject {
    use super::object;

    pub const SCRIPT_PACKAGE_ID: u16 = object::END;
    pub const RND_SEED_VAL: u16 = object::END + 1;
    pub const CREATEDBY: u16 = object::END + 2; // 2 words
    pub const SCENE_TYPE: u16 = object::END + 4;
    pub const END: u16 = object::END + 5;
}

pub mod conversation {
    use super::object;

    pub const LAST_LINE_END_TIME: u16 = object::END;
    pub const END: u16 = object::END + 1;
}

/// Dynamic (array) field indices
pub mod dynamic {
    pub mod item {
        pub const MODIFIERS: u16 = 0;
        pub const BONUSLIST_IDS: u16 = 1;
        pub const ARTIFACT_POWERS: u16 = 2;
        pub const GEMS: u16 = 3;
        pub const RELIC_TALENT_DATA: u16 = 4;
        pub const END: u16 = 5;
    }

    pub mod unit {
        pub const PASSIVE_SPELLS: u16 = 0;
        pub const WORLD_EFFECTS: u16 = 1;
        pub const CHANNEL_OBJECTS: u16 = 2;
        pub const END: u16 = 3;
    }

    pub mod player {
        use super::unit;

        pub const ARENA_COOLDOWNS: u16 = unit::END;
        pub const RESEARCH_SITES: u16 = unit::END + 1;
        pub const RESEARCH_SITE_PROGRESS: u16 = unit::END + 2;
        pub const DAILY_QUESTS: u16 = unit::END + 3;
        pub const HEIRLOOMS: u16 = unit::END + 4;
        pub const TOYS: u16 = unit::END + 5;
        pub const TRANSMOG: u16 = unit::END + 6;
        pub const SELF_RES_SPELLS: u16 = unit::END + 7;
        pub const END: u16 = unit::END + 8;
    }

    pub mod gameobject {
        pub const ENABLE_DOODAD_SETS: u16 = 0;
        pub const END: u16 = 1;
    }

    pub mod conversation {
        pub const ACTORS: u16 = 0;
        pub const LINES: u16 = 1;
        pub const END: u16 = 2;
    }
}

// ============================================================================
// Flag tables
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct FieldSpan {
    start: u16,
    len: u16,
    flags: UpdateFieldFlags,
}

const PUB: u32 = UpdateFieldFlags::PUBLIC.bits();
const PRIV: u32 = UpdateFieldFlags::PRIVATE.bits();
const OWN: u32 = UpdateFieldFlags::OWNER.bits();
const SPECIAL: u32 = UpdateFieldFlags::SPECIAL_INFO.bits();
const PARTY: u32 = UpdateFieldFlags::PARTY_MEMBER.bits();
const VIEWER: u32 = UpdateFieldFlags::VIEWER_DEPENDENT.bits();
const URGENT: u32 = UpdateFieldFlags::URGENT.bits();

const fn span(start: u16, len: u16, flags: u32) -> FieldSpan {
    FieldSpan {
        start,
        len,
        flags: UpdateFieldFlags::from_bits_retain(flags),
    }
}

const fn build_table<const N: usize>(groups: &[&[FieldSpan]]) -> [UpdateFieldFlags; N] {
    let mut table = [UpdateFieldFlags::empty(); N];
    let mut g = 0;
    while g < groups.len() {
        let spans = groups[g];
        let mut s = 0;
        while s < spans.len() {
            let sp = spans[s];
            let mut i = sp.start as usize;
            while i < (sp.start + sp.len) as usize {
                table[i] = sp.flags;
                i += 1;
            }
            s += 1;
        }
        g += 1;
    }
    table
}

const OBJECT_SPANS: &[FieldSpan] = &[
    span(object::GUID, 2, PUB),
    span(object::DATA, 2, PUB),
    span(object::TYPE, 1, PUB),
    span(object::ENTRY, 1, PUB),
    span(object::DYNAMIC_FLAGS, 1, PUB | VIEWER | URGENT),
    span(object::SCALE_X, 1, PUB),
];

const ITEM_SPANS: &[FieldSpan] = &[
    span(item::OWNER, 2, PUB),
    span(item::CONTAINED, 2, PUB),
    span(item::CREATOR, 2, PUB),
    span(item::GIFTCREATOR, 2, PUB),
    span(item::STACK_COUNT, 1, OWN),
    span(item::DURATION, 1, OWN),
    span(item::SPELL_CHARGES, 5, OWN),
    span(item::FLAGS, 1, PUB),
    span(item::ENCHANTMENT, 3, PUB),
    span(item::PROPERTY_SEED, 1, PUB),
    span(item::RANDOM_PROPERTIES_ID, 1, PUB),
    span(item::DURABILITY, 1, OWN),
    span(item::MAXDURABILITY, 1, OWN),
    span(item::CREATE_PLAYED_TIME, 1, PUB),
    span(item::MODIFIERS_MASK, 1, OWN),
    span(item::CONTEXT, 1, PUB),
];

const CONTAINER_SPANS: &[FieldSpan] = &[
    span(container::SLOT_1, container::MAX_SLOTS * 2, PUB),
    span(container::NUM_SLOTS, 1, PUB),
];

const UNIT_SPANS: &[FieldSpan] = &[
    span(unit::CHARM, 2, PUB),
    span(unit::SUMMON, 2, PUB),
    span(unit::CRITTER, 2, PRIV),
    span(unit::CHARMEDBY, 2, PUB),
    span(unit::SUMMONEDBY, 2, PUB),
    span(unit::CREATEDBY, 2, PUB),
    span(unit::DEMON_CREATOR, 2, PUB),
    span(unit::TARGET, 2, PUB),
    span(unit::BYTES_0, 1, PUB),
    span(unit::HEALTH, 1, PUB),
    span(unit::POWER, 1, PUB),
    span(unit::MAXHEALTH, 1, PUB),
    span(unit::MAXPOWER, 1, PUB),
    span(unit::LEVEL, 1, PUB),
    span(unit::EFFECTIVE_LEVEL, 1, PUB),
    span(unit::FACTIONTEMPLATE, 1, PUB),
    span(unit::VIRTUAL_ITEM, 3, PUB),
    span(unit::FLAGS, 1, PUB | URGENT),
    span(unit::FLAGS_2, 1, PUB | URGENT),
    span(unit::AURASTATE, 1, PUB),
    span(unit::BASEATTACKTIME, 2, PUB),
    span(unit::RANGEDATTACKTIME, 1, PRIV),
    span(unit::BOUNDINGRADIUS, 1, PUB),
    span(unit::COMBATREACH, 1, PUB),
    span(unit::DISPLAYID, 1, PUB | URGENT),
    span(unit::NATIVEDISPLAYID, 1, PUB | URGENT),
    span(unit::MOUNTDISPLAYID, 1, PUB | URGENT),
    span(unit::MINDAMAGE, 1, PRIV | OWN | SPECIAL),
    span(unit::MAXDAMAGE, 1, PRIV | OWN | SPECIAL),
    span(unit::BYTES_1, 1, PUB),
    span(unit::PETNUMBER, 1, PUB),
    span(unit::PET_NAME_TIMESTAMP, 1, PUB),
    span(unit::PETEXPERIENCE, 1, OWN),
    span(unit::PETNEXTLEVELEXP, 1, OWN),
    span(unit::MOD_CAST_SPEED, 1, PUB),
    span(unit::CREATED_BY_SPELL, 1, PUB),
    span(unit::NPC_FLAGS, 2, PUB | VIEWER),
    span(unit::EMOTESTATE, 1, PUB),
    span(unit::STAT, 5, PRIV | OWN),
    span(unit::RESISTANCES, 7, PRIV | OWN | SPECIAL),
    span(unit::BASE_MANA, 1, PUB),
    span(unit::BYTES_2, 1, PUB | URGENT),
    span(unit::ATTACK_POWER, 1, PRIV | OWN),
    span(unit::HOVERHEIGHT, 1, PUB),
];

const PLAYER_SPANS: &[FieldSpan] = &[
    span(player::DUEL_ARBITER, 2, PUB),
    span(player::FLAGS, 1, PUB),
    span(player::GUILD_RANK_ID, 1, PUB),
    span(player::GUILD_DELETE_DATE, 1, PUB),
    span(player::GUILD_LEVEL, 1, PUB),
    span(player::BYTES, 1, PUB),
    span(player::BYTES_2, 1, PUB),
    span(player::BYTES_3, 1, PUB),
    span(player::DUEL_TEAM, 1, PUB),
    span(player::GUILD_TIMESTAMP, 1, PUB),
    span(player::QUEST_LOG, player::QUEST_LOG_SIZE * 4, PARTY),
    span(player::VISIBLE_ITEM, player::VISIBLE_ITEM_SLOTS * 2, PUB),
    span(player::CHOSEN_TITLE, 1, PUB),
    span(player::FAKE_INEBRIATION, 1, PUB),
    span(player::CURRENT_SPEC_ID, 1, PUB),
    span(player::TAXI_MOUNT_ANIM_KIT, 1, PUB),
    span(player::AVG_ITEM_LEVEL, 4, PUB),
    span(player::HONOR_LEVEL, 1, PUB),
    span(player::INV_SLOT_HEAD, player::INVENTORY_SLOTS * 2, PRIV),
    span(player::FARSIGHT, 2, PRIV),
    span(player::XP, 1, PRIV),
    span(player::NEXT_LEVEL_XP, 1, PRIV),
    span(player::SKILL_LINEIDX, 16, PRIV),
    span(player::CHARACTER_POINTS, 1, PRIV),
    span(player::TRACK_CREATURES, 1, PRIV),
    span(player::TRACK_RESOURCES, 1, PRIV),
    span(player::COINAGE, 2, PRIV),
];

const GAMEOBJECT_SPANS: &[FieldSpan] = &[
    span(gameobject::CREATED_BY, 2, PUB),
    span(gameobject::DISPLAYID, 1, PUB | VIEWER | URGENT),
    span(gameobject::FLAGS, 1, PUB | URGENT),
    span(gameobject::PARENTROTATION, 4, PUB),
    span(gameobject::FACTION, 1, PUB),
    span(gameobject::LEVEL, 1, PUB),
    span(gameobject::BYTES_1, 1, PUB | URGENT),
    span(gameobject::SPELL_VISUAL_ID, 1, PUB | VIEWER | URGENT),
    span(gameobject::STATE_SPELL_VISUAL_ID, 1, PUB | VIEWER | URGENT),
    span(gameobject::STATE_ANIM_ID, 1, PUB | VIEWER | URGENT),
    span(gameobject::STATE_ANIM_KIT_ID, 1, PUB | VIEWER | URGENT),
    span(gameobject::STATE_WORLD_EFFECT_ID, 4, PUB | VIEWER | URGENT),
];

const DYNAMICOBJECT_SPANS: &[FieldSpan] = &[
    span(dynamicobject::CASTER, 2, PUB),
    span(dynamicobject::TYPE, 1, PUB | VIEWER),
    span(dynamicobject::SPELL_X_SPELL_VISUAL_ID, 1, PUB),
    span(dynamicobject::SPELLID, 1, PUB),
    span(dynamicobject::RADIUS, 1, PUB),
    span(dynamicobject::CASTTIME, 1, PUB),
];

const CORPSE_SPANS: &[FieldSpan] = &[
    span(corpse::OWNER, 2, PUB),
    span(corpse::PARTY, 2, PUB),
    span(corpse::GUILD, 2, PUB),
    span(corpse::DISPLAY_ID, 1, PUB),
    span(corpse::ITEM, 19, PUB),
    span(corpse::BYTES_1, 1, PUB),
    span(corpse::BYTES_2, 1, PUB),
    span(corpse::FLAGS, 1, PUB),
    span(corpse::DYNAMIC_FLAGS, 1, PUB | VIEWER),
    span(corpse::FACTIONTEMPLATE, 1, PUB),
    span(corpse::CUSTOM_DISPLAY_OPTION, 1, PUB),
];

const AREATRIGGER_SPANS: &[FieldSpan] = &[
    span(areatrigger::OVERRIDE_SCALE_CURVE, 7, PUB | URGENT),
    span(areatrigger::EXTRA_SCALE_CURVE, 7, PUB | URGENT),
    span(areatrigger::CASTER, 2, PUB),
    span(areatrigger::DURATION, 1, PUB),
    span(areatrigger::TIME_TO_TARGET, 1, PUB | URGENT),
    span(areatrigger::TIME_TO_TARGET_SCALE, 1, PUB | URGENT),
    span(areatrigger::TIME_TO_TARGET_EXTRA_SCALE, 1, PUB | URGENT),
    span(areatrigger::SPELLID, 1, PUB),
    span(areatrigger::SPELL_FOR_VISUALS, 1, PUB),
    span(areatrigger::SPELL_X_SPELL_VISUAL_ID, 1, PUB),
    span(areatrigger::BOUNDS_RADIUS_2D, 1, PUB | VIEWER | URGENT),
    span(areatrigger::DECAL_PROPERTIES_ID, 1, PUB),
    span(areatrigger::CREATING_EFFECT_GUID, 2, PUB),
];

const SCENEOBJECT_SPANS: &[FieldSpan] = &[
    span(sceneobject::SCRIPT_PACKAGE_ID, 1, PUB),
    span(sceneobject::RND_SEED_VAL, 1, PUB),
    span(sceneobject::CREATEDBY, 2, PUB),
    span(sceneobject::SCENE_TYPE, 1, PUB),
];

const CONVERSATION_SPANS: &[FieldSpan] = &[span(conversation::LAST_LINE_END_TIME, 1, PUB | VIEWER)];

pub static OBJECT_FIELD_FLAGS: [UpdateFieldFlags; object::END as usize] =
    build_table(&[OBJECT_SPANS]);
pub static ITEM_FIELD_FLAGS: [UpdateFieldFlags; item::END as usize] =
    build_table(&[OBJECT_SPANS, ITEM_SPANS]);
pub static CONTAINER_FIELD_FLAGS: [UpdateFieldFlags; container::END as usize] =
    build_table(&[OBJECT_SPANS, ITEM_SPANS, CONTAINER_SPANS]);
pub static UNIT_FIELD_FLAGS: [UpdateFieldFlags; unit::END as usize] =
    build_table(&[OBJECT_SPANS, UNIT_SPANS]);
pub static PLAYER_FIELD_FLAGS: [UpdateFieldFlags; player::END as usize] =
    build_table(&[OBJECT_SPANS, UNIT_SPANS, PLAYER_SPANS]);
pub static GAMEOBJECT_FIELD_FLAGS: [UpdateFieldFlags; gameobject::END as usize] =
    build_table(&[OBJECT_SPANS, GAMEOBJECT_SPANS]);
pub static DYNAMICOBJECT_FIELD_FLAGS: [UpdateFieldFlags; dynamicobject::END as usize] =
    build_table(&[OBJECT_SPANS, DYNAMICOBJECT_SPANS]);
pub static CORPSE_FIELD_FLAGS: [UpdateFieldFlags; corpse::END as usize] =
    build_table(&[OBJECT_SPANS, CORPSE_SPANS]);
pub static AREATRIGGER_FIELD_FLAGS: [UpdateFieldFlags; areatrigger::END as usize] =
    build_table(&[OBJECT_SPANS, AREATRIGGER_SPANS]);
pub static SCENEOBJECT_FIELD_FLAGS: [UpdateFieldFlags; sceneobject::END as usize] =
    build_table(&[OBJECT_SPANS, SCENEOBJECT_SPANS]);
pub static CONVERSATION_FIELD_FLAGS: [UpdateFieldFlags; conversation::END as usize] =
    build_table(&[OBJECT_SPANS, CONVERSATION_SPANS]);

const ITEM_DYNAMIC_SPANS: &[FieldSpan] = &[span(0, dynamic::item::END, OWN)];

const UNIT_DYNAMIC_SPANS: &[FieldSpan] = &[span(0, dynamic::unit::END, PUB | URGENT)];

const PLAYER_DYNAMIC_SPANS: &[FieldSpan] = &[
    span(dynamic::player::ARENA_COOLDOWNS, 1, PUB),
    span(
        dynamic::player::RESEARCH_SITES,
        dynamic::player::END - dynamic::player::RESEARCH_SITES,
        PRIV,
    ),
];

const GAMEOBJECT_DYNAMIC_SPANS: &[FieldSpan] = &[span(dynamic::gameobject::ENABLE_DOODAD_SETS, 1, PUB)];

const CONVERSATION_DYNAMIC_SPANS: &[FieldSpan] = &[
    span(dynamic::conversation::ACTORS, 1, PUB),
    span(dynamic::conversation::LINES, 1, OWN),
];

pub static ITEM_DYNAMIC_FIELD_FLAGS: [UpdateFieldFlags; dynamic::item::END as usize] =
    build_table(&[ITEM_DYNAMIC_SPANS]);
pub static UNIT_DYNAMIC_FIELD_FLAGS: [UpdateFieldFlags; dynamic::unit::END as usize] =
    build_table(&[UNIT_DYNAMIC_SPANS]);
pub static PLAYER_DYNAMIC_FIELD_FLAGS: [UpdateFieldFlags; dynamic::player::END as usize] =
    build_table(&[UNIT_DYNAMIC_SPANS, PLAYER_DYNAMIC_SPANS]);
pub static GAMEOBJECT_DYNAMIC_FIELD_FLAGS: [UpdateFieldFlags; dynamic::gameobject::END as usize] =
    build_table(&[GAMEOBJECT_DYNAMIC_SPANS]);
pub static CONVERSATION_DYNAMIC_FIELD_FLAGS: [UpdateFieldFlags;
    dynamic::conversation::END as usize] = build_table(&[CONVERSATION_DYNAMIC_SPANS]);

// ============================================================================
// Lookups
// ============================================================================

/// Fixed-slot count for an entity kind
pub fn values_count(type_id: TypeId) -> u16 {
    field_flags(type_id).len() as u16
}

/// Dynamic array count for an entity kind
pub fn dynamic_values_count(type_id: TypeId) -> u16 {
    dynamic_field_flags(type_id).len() as u16
}

/// Per-slot visibility groups for an entity kind
pub fn field_flags(type_id: TypeId) -> &'static [UpdateFieldFlags] {
    match type_id {
        TypeId::Object => &OBJECT_FIELD_FLAGS,
        TypeId::Item => &ITEM_FIELD_FLAGS,
        TypeId::Container => &CONTAINER_FIELD_FLAGS,
        TypeId::Unit => &UNIT_FIELD_FLAGS,
        TypeId::Player => &PLAYER_FIELD_FLAGS,
        TypeId::GameObject => &GAMEOBJECT_FIELD_FLAGS,
        TypeId::DynamicObject => &DYNAMICOBJECT_FIELD_FLAGS,
        TypeId::Corpse => &CORPSE_FIELD_FLAGS,
        TypeId::AreaTrigger => &AREATRIGGER_FIELD_FLAGS,
        TypeId::SceneObject => &SCENEOBJECT_FIELD_FLAGS,
        TypeId::Conversation => &CONVERSATION_FIELD_FLAGS,
    }
}

/// Per-array visibility groups for an entity kind (empty when it has none)
pub fn dynamic_field_flags(type_id: TypeId) -> &'static [UpdateFieldFlags] {
    match type_id {
        TypeId::Item | TypeId::Container => &ITEM_DYNAMIC_FIELD_FLAGS,
        TypeId::Unit => &UNIT_DYNAMIC_FIELD_FLAGS,
        TypeId::Player => &PLAYER_DYNAMIC_FIELD_FLAGS,
        TypeId::GameObject => &GAMEOBJECT_DYNAMIC_FIELD_FLAGS,
        TypeId::Conversation => &CONVERSATION_DYNAMIC_FIELD_FLAGS,
        TypeId::Object
        | TypeId::DynamicObject
        | TypeId::Corpse
        | TypeId::AreaTrigger
        | TypeId::SceneObject => &[],
    }
}
