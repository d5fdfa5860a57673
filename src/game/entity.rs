//! Replicated world entities
//!
//! Every entity is an [`EntityCore`] (identity, fields, position, phases,
//! visibility) plus closed, kind-specific [`EntityData`]. The kind is fixed at
//! construction: `EntityData` can be mutated in place but never swapped for
//! another variant, so `TypeId` and `TypeMask` always agree.

use rustc_hash::FxHashSet;
use tracing::error;

use crate::game::constants::visibility::{DEFAULT_COMBAT_REACH, DEFAULT_CREATURE_SIGHT_DISTANCE};
use crate::game::fields::layout::{self, object, unit};
use crate::game::fields::FieldStore;
use crate::game::guid::ObjectGuid;
use crate::game::map::MapError;
use crate::game::movement::{AnimKits, MoveSpline, MovementInfo, SpeedTable};
use crate::game::object_type::{TypeId, TypeMask};
use crate::game::phasing::PhaseSet;
use crate::game::visibility::VisibilityState;
use crate::util::position::{Position, Vec3};

/// Unit dynamic flag bits (OBJECT_DYNAMIC_FLAGS)
pub mod unit_dynamic_flags {
    /// Exposes the SPECIAL_INFO field group to every observer
    pub const SPECIAL_INFO: u32 = 0x10;
}

/// Optional movement sub-blocks announced in a create block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateObjectBits {
    pub no_birth_anim: bool,
    pub enable_portals: bool,
    pub play_hover_anim: bool,
    pub movement_update: bool,
    pub movement_transport: bool,
    pub stationary: bool,
    pub combat_victim: bool,
    pub server_time: bool,
    pub vehicle: bool,
    pub anim_kit: bool,
    pub rotation: bool,
    pub area_trigger: bool,
    pub game_object: bool,
    pub smooth_phasing: bool,
    pub this_is_you: bool,
    pub scene_object: bool,
    pub active_player: bool,
    pub conversation: bool,
}

impl CreateObjectBits {
    /// Sub-blocks every entity of this kind announces
    pub fn for_kind(data: &EntityData) -> Self {
        let mut bits = Self::default();
        match data {
            EntityData::Unit(_) | EntityData::Player(_) => bits.movement_update = true,
            EntityData::GameObject(go) => {
                bits.stationary = true;
                bits.rotation = true;
                bits.server_time = go.go_type.is_transport();
            }
            EntityData::DynamicObject | EntityData::Corpse => bits.stationary = true,
            EntityData::AreaTrigger(_) => {
                bits.stationary = true;
                bits.area_trigger = true;
            }
            EntityData::SceneObject => {
                bits.stationary = true;
                bits.scene_object = true;
            }
            EntityData::Conversation(_) => {
                bits.stationary = true;
                bits.conversation = true;
            }
            EntityData::Object | EntityData::Item | EntityData::Container => {}
        }
        bits
    }
}

// ============================================================================
// Kind data
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeathState {
    #[default]
    Alive,
    JustDied,
    Corpse,
    Dead,
}

/// Aura-derived state the replication core reads
#[derive(Debug, Clone, Default)]
pub struct UnitAuras {
    /// Casters of empathy auras on this unit
    pub empathy_casters: Vec<ObjectGuid>,
    /// Casters of stalked auras on this unit
    pub stalked_by: Vec<ObjectGuid>,
    /// Bit per stealth type this unit detects unconditionally
    pub detect_stealth_mask: u32,
    /// Sum of detect-range modifiers (creature seer)
    pub detect_range_mod: f32,
    /// Sum of detected-range modifiers (target)
    pub detected_range_mod: f32,
    pub phases: Vec<u32>,
    pub phase_groups: Vec<u32>,
}

#[derive(Debug, Clone)]
pub struct UnitData {
    pub speeds: SpeedTable,
    pub spline: Option<MoveSpline>,
    pub victim: Option<ObjectGuid>,
    /// Vehicle record when this unit is a vehicle
    pub vehicle_id: Option<u32>,
    /// Vehicle this unit is an accessory of
    pub vehicle_base: Option<ObjectGuid>,
    pub death_state: DeathState,
    /// Game-time seconds after which the corpse is hidden
    pub corpse_remove_time: u64,
    pub auras: UnitAuras,
    pub sight_distance: f32,
    pub combat_distance: f32,
    /// Entities this creature always sees
    pub always_see: Vec<ObjectGuid>,
}

impl Default for UnitData {
    fn default() -> Self {
        Self {
            speeds: SpeedTable::default(),
            spline: None,
            victim: None,
            vehicle_id: None,
            vehicle_base: None,
            death_state: DeathState::Alive,
            corpse_remove_time: 0,
            auras: UnitAuras::default(),
            sight_distance: DEFAULT_CREATURE_SIGHT_DISTANCE,
            combat_distance: 0.0,
            always_see: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Team {
    #[default]
    Alliance,
    Horde,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupInfo {
    pub id: u32,
    pub subgroup: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuelInfo {
    pub opponent: ObjectGuid,
    pub started: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerData {
    pub unit: UnitData,
    pub team: Team,
    pub group: Option<GroupInfo>,
    pub corpse: Option<ObjectGuid>,
    pub logging_out: bool,
    pub duel: Option<DuelInfo>,
    /// Entities this client currently has a create block for
    pub client_guids: FxHashSet<ObjectGuid>,
}

impl PlayerData {
    pub fn have_at_client(&self, guid: ObjectGuid) -> bool {
        self.client_guids.contains(&guid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameObjectType {
    #[default]
    Door,
    Button,
    Chest,
    Generic,
    Trap,
    SpellFocus,
    Transport,
    MoTransport,
    DuelArbiter,
    FlagStand,
    FlagDrop,
    DestructibleBuilding,
}

impl GameObjectType {
    pub fn is_transport(self) -> bool {
        matches!(self, GameObjectType::Transport | GameObjectType::MoTransport)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GameObjectData {
    pub go_type: GameObjectType,
    pub spawned: bool,
    /// Server-only spell focus objects are never shown
    pub server_only: bool,
    pub packed_rotation: i64,
    pub world_effect_id: u32,
    pub path_progress: u32,
    /// Transport stop frames (pause times)
    pub stop_frames: Vec<u32>,
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AreaTriggerFlags: u32 {
        const ABSOLUTE_ORIENTATION  = 0x001;
        const DYNAMIC_SHAPE         = 0x002;
        const ATTACHED              = 0x004;
        const FACE_MOVEMENT_DIR     = 0x008;
        const FOLLOWS_TERRAIN       = 0x010;
        const UNK1                  = 0x020;
        const TARGET_ROLL_PITCH_YAW = 0x040;
        const ANIM_ID               = 0x080;
        const UNK3                  = 0x100;
        const ANIM_KIT_ID           = 0x200;
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AreaTriggerShape {
    #[default]
    None,
    Sphere {
        radius: f32,
        radius_target: f32,
    },
    Box {
        extents: [f32; 3],
        extents_target: [f32; 3],
    },
    Polygon {
        vertices: Vec<(f32, f32)>,
        vertices_target: Vec<(f32, f32)>,
        height: f32,
        height_target: f32,
    },
    Cylinder {
        radius: f32,
        radius_target: f32,
        height: f32,
        height_target: f32,
        location_z_offset: f32,
        location_z_offset_target: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AreaTriggerSpline {
    pub time_to_target: u32,
    pub elapsed: u32,
    pub points: Vec<Vec3>,
}

#[derive(Debug, Clone, Default)]
pub struct AreaTriggerData {
    pub time_since_created: u32,
    pub roll_pitch_yaw: Vec3,
    pub target_roll_pitch_yaw: Vec3,
    pub flags: AreaTriggerFlags,
    pub scale_curve_id: u32,
    pub morph_curve_id: u32,
    pub facing_curve_id: u32,
    pub move_curve_id: u32,
    pub anim_id: i32,
    pub anim_kit_id: u32,
    pub shape: AreaTriggerShape,
    pub spline: Option<AreaTriggerSpline>,
}

#[derive(Debug, Clone, Default)]
pub struct ConversationData {
    pub creator: ObjectGuid,
    pub texture_kit_id: u32,
}

/// Kind-specific entity state
#[derive(Debug, Clone)]
pub enum EntityData {
    Object,
    Item,
    Container,
    Unit(Box<UnitData>),
    Player(Box<PlayerData>),
    GameObject(GameObjectData),
    DynamicObject,
    Corpse,
    AreaTrigger(Box<AreaTriggerData>),
    SceneObject,
    Conversation(ConversationData),
}

impl EntityData {
    pub fn type_id(&self) -> TypeId {
        match self {
            EntityData::Object => TypeId::Object,
            EntityData::Item => TypeId::Item,
            EntityData::Container => TypeId::Container,
            EntityData::Unit(_) => TypeId::Unit,
            EntityData::Player(_) => TypeId::Player,
            EntityData::GameObject(_) => TypeId::GameObject,
            EntityData::DynamicObject => TypeId::DynamicObject,
            EntityData::Corpse => TypeId::Corpse,
            EntityData::AreaTrigger(_) => TypeId::AreaTrigger,
            EntityData::SceneObject => TypeId::SceneObject,
            EntityData::Conversation(_) => TypeId::Conversation,
        }
    }
}

// ============================================================================
// Entity
// ============================================================================

/// State shared by every entity kind
#[derive(Debug, Clone)]
pub struct EntityCore {
    guid: ObjectGuid,
    type_id: TypeId,
    type_mask: TypeMask,
    pub fields: FieldStore,
    pub position: Position,
    pub movement: MovementInfo,
    pub map_id: u32,
    pub zone_id: u32,
    pub area_id: u32,
    pub phases: PhaseSet,
    pub visibility: VisibilityState,
    /// Active objects are visible from the maximum distance
    pub active: bool,
    pub visibility_override: Option<f32>,
    pub update_flags: CreateObjectBits,
    pub anim_kits: AnimKits,
    /// Overrides `position` in the stationary sub-block
    pub stationary: Option<Position>,
    in_world: bool,
    in_update_list: bool,
    registered_map: Option<u32>,
}

#[derive(Debug)]
pub struct Entity {
    pub core: EntityCore,
    data: EntityData,
}

impl Entity {
    /// Construct an entity; the header fields are written and the change
    /// state is left clean
    pub fn create(guid: ObjectGuid, data: EntityData) -> Self {
        let type_id = data.type_id();
        let mut fields = FieldStore::new(guid, type_id);
        fields.set_guid(object::GUID, guid);
        fields.set_u32(object::TYPE, type_id.mask().bits());
        fields.set_u32(object::ENTRY, guid.entry());
        fields.set_f32(object::SCALE_X, 1.0);

        if type_id.mask().contains(TypeMask::UNIT) {
            fields.set_u32(unit::LEVEL, 1);
            fields.set_u32(unit::HEALTH, 1);
            fields.set_u32(unit::MAXHEALTH, 1);
            fields.set_f32(unit::COMBATREACH, DEFAULT_COMBAT_REACH);
            fields.set_f32(unit::MOD_CAST_SPEED, 1.0);
            fields.set_f32(unit::HOVERHEIGHT, 1.0);
        }
        fields.clear_changes();

        Self {
            core: EntityCore {
                guid,
                type_id,
                type_mask: type_id.mask(),
                fields,
                position: Position::default(),
                movement: MovementInfo::default(),
                map_id: 0,
                zone_id: 0,
                area_id: 0,
                phases: PhaseSet::default(),
                visibility: VisibilityState::new(),
                active: false,
                visibility_override: None,
                update_flags: CreateObjectBits::for_kind(&data),
                anim_kits: AnimKits::default(),
                stationary: None,
                in_world: false,
                in_update_list: false,
                registered_map: None,
            },
            data,
        }
    }

    #[inline]
    pub fn guid(&self) -> ObjectGuid {
        self.core.guid
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.core.type_id
    }

    #[inline]
    pub fn type_mask(&self) -> TypeMask {
        self.core.type_mask
    }

    pub fn is_type(&self, mask: TypeMask) -> bool {
        self.core.type_mask.intersects(mask)
    }

    pub fn is_player(&self) -> bool {
        self.core.type_id == TypeId::Player
    }

    pub fn is_unit(&self) -> bool {
        self.is_type(TypeMask::UNIT)
    }

    /// Non-player unit
    pub fn is_creature(&self) -> bool {
        self.core.type_id == TypeId::Unit
    }

    pub fn is_game_object(&self) -> bool {
        self.core.type_id == TypeId::GameObject
    }

    pub fn fields(&self) -> &FieldStore {
        &self.core.fields
    }

    pub fn fields_mut(&mut self) -> &mut FieldStore {
        &mut self.core.fields
    }

    pub fn position(&self) -> &Position {
        &self.core.position
    }

    pub fn map_id(&self) -> u32 {
        self.core.map_id
    }

    pub fn zone_id(&self) -> u32 {
        self.core.zone_id
    }

    pub fn area_id(&self) -> u32 {
        self.core.area_id
    }

    pub fn phases(&self) -> &PhaseSet {
        &self.core.phases
    }

    pub fn visibility(&self) -> &VisibilityState {
        &self.core.visibility
    }

    pub fn in_world(&self) -> bool {
        self.core.in_world
    }

    pub fn in_update_list(&self) -> bool {
        self.core.in_update_list
    }

    pub fn registered_map(&self) -> Option<u32> {
        self.core.registered_map
    }

    pub(crate) fn set_in_world(&mut self, in_world: bool) {
        self.core.in_world = in_world;
    }

    pub(crate) fn set_in_update_list(&mut self, queued: bool) {
        self.core.in_update_list = queued;
    }

    pub(crate) fn set_registered_map(&mut self, map: Option<u32>) {
        self.core.registered_map = map;
    }

    // ========================================================================
    // Kind data
    // ========================================================================

    pub fn data(&self) -> &EntityData {
        &self.data
    }

    pub fn unit(&self) -> Option<&UnitData> {
        match &self.data {
            EntityData::Unit(u) => Some(&**u),
            EntityData::Player(p) => Some(&p.unit),
            _ => None,
        }
    }

    pub fn unit_mut(&mut self) -> Option<&mut UnitData> {
        match &mut self.data {
            EntityData::Unit(u) => Some(&mut **u),
            EntityData::Player(p) => Some(&mut p.unit),
            _ => None,
        }
    }

    pub fn player(&self) -> Option<&PlayerData> {
        match &self.data {
            EntityData::Player(p) => Some(&**p),
            _ => None,
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut PlayerData> {
        match &mut self.data {
            EntityData::Player(p) => Some(&mut **p),
            _ => None,
        }
    }

    pub fn game_object(&self) -> Option<&GameObjectData> {
        match &self.data {
            EntityData::GameObject(go) => Some(go),
            _ => None,
        }
    }

    pub fn game_object_mut(&mut self) -> Option<&mut GameObjectData> {
        match &mut self.data {
            EntityData::GameObject(go) => Some(go),
            _ => None,
        }
    }

    pub fn area_trigger(&self) -> Option<&AreaTriggerData> {
        match &self.data {
            EntityData::AreaTrigger(at) => Some(&**at),
            _ => None,
        }
    }

    pub fn conversation(&self) -> Option<&ConversationData> {
        match &self.data {
            EntityData::Conversation(c) => Some(c),
            _ => None,
        }
    }

    // ========================================================================
    // Relationships and derived state
    // ========================================================================

    /// Owner, summoner, creator or caster depending on kind
    pub fn owner_guid(&self) -> ObjectGuid {
        let fields = &self.core.fields;
        match self.core.type_id {
            TypeId::Item | TypeId::Container => fields.get_guid(layout::item::OWNER),
            TypeId::Unit | TypeId::Player => fields.get_guid(unit::SUMMONEDBY),
            TypeId::GameObject => fields.get_guid(layout::gameobject::CREATED_BY),
            TypeId::DynamicObject => fields.get_guid(layout::dynamicobject::CASTER),
            TypeId::Corpse => fields.get_guid(layout::corpse::OWNER),
            TypeId::AreaTrigger => fields.get_guid(layout::areatrigger::CASTER),
            TypeId::SceneObject => fields.get_guid(layout::sceneobject::CREATEDBY),
            TypeId::Conversation => self
                .conversation()
                .map(|c| c.creator)
                .unwrap_or(ObjectGuid::EMPTY),
            TypeId::Object => ObjectGuid::EMPTY,
        }
    }

    pub fn charmer_guid(&self) -> ObjectGuid {
        if self.is_unit() {
            self.core.fields.get_guid(unit::CHARMEDBY)
        } else {
            ObjectGuid::EMPTY
        }
    }

    /// Whoever controls this unit (charmer first, then owner)
    pub fn charmer_or_owner_guid(&self) -> ObjectGuid {
        let charmer = self.charmer_guid();
        if charmer.is_empty() {
            if self.is_unit() {
                self.owner_guid()
            } else {
                ObjectGuid::EMPTY
            }
        } else {
            charmer
        }
    }

    pub fn level(&self) -> u32 {
        match self.core.type_id {
            TypeId::Unit | TypeId::Player => self.core.fields.get_u32(unit::LEVEL),
            _ => 1,
        }
    }

    /// Zero for everything that is not a unit
    pub fn combat_reach(&self) -> f32 {
        if self.is_unit() {
            self.core.fields.get_f32(unit::COMBATREACH)
        } else {
            0.0
        }
    }

    pub fn health(&self) -> u32 {
        if self.is_unit() {
            self.core.fields.get_u32(unit::HEALTH)
        } else {
            0
        }
    }

    pub fn death_state(&self) -> DeathState {
        self.unit().map(|u| u.death_state).unwrap_or_default()
    }

    pub fn is_alive(&self) -> bool {
        self.death_state() == DeathState::Alive
    }

    pub fn is_dying(&self) -> bool {
        self.death_state() == DeathState::JustDied
    }

    pub fn is_dead(&self) -> bool {
        matches!(self.death_state(), DeathState::Dead | DeathState::Corpse)
    }

    /// Released spirit: dead but with health restored
    pub fn is_ghost(&self) -> bool {
        self.is_player() && self.is_dead() && self.health() > 0
    }

    pub fn has_dynamic_flag(&self, flag: u32) -> bool {
        self.core.fields.has_flag(object::DYNAMIC_FLAGS, flag)
    }

    pub fn has_aura_with_caster_empathy(&self, caster: ObjectGuid) -> bool {
        self.unit()
            .map(|u| u.auras.empathy_casters.contains(&caster))
            .unwrap_or(false)
    }

    pub fn is_stalked_by(&self, caster: ObjectGuid) -> bool {
        self.unit()
            .map(|u| u.auras.stalked_by.contains(&caster))
            .unwrap_or(false)
    }

    pub fn have_at_client(&self, guid: ObjectGuid) -> bool {
        self.player().map(|p| p.have_at_client(guid)).unwrap_or(false)
    }

    /// Teardown preconditions
    pub fn ensure_destroyable(&self) -> Result<(), MapError> {
        if self.core.in_world {
            return Err(MapError::StillInWorld(self.guid()));
        }
        if self.core.in_update_list {
            return Err(MapError::StillInUpdateList(self.guid()));
        }
        if let Some(map) = self.core.registered_map {
            return Err(MapError::StillRegistered {
                guid: self.guid(),
                map,
            });
        }
        Ok(())
    }
}

impl Drop for Entity {
    fn drop(&mut self) {
        let state = self.ensure_destroyable();
        if let Err(e) = &state {
            error!("Entity {} destroyed in invalid state: {}", self.guid(), e);
        }
        if !std::thread::panicking() {
            debug_assert!(state.is_ok(), "entity {} destroyed in invalid state", self.guid());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::guid::HighGuid;

    #[test]
    fn test_create_writes_header() {
        let guid = ObjectGuid::new(HighGuid::Unit, 3000, 12);
        let entity = Entity::create(guid, EntityData::Unit(Box::default()));
        let fields = entity.fields();
        assert_eq!(fields.get_guid(object::GUID), guid);
        assert_eq!(fields.get_u32(object::TYPE), (TypeMask::OBJECT | TypeMask::UNIT).bits());
        assert_eq!(fields.get_u32(object::ENTRY), 3000);
        assert_eq!(fields.get_f32(object::SCALE_X), 1.0);
        assert_eq!(entity.combat_reach(), DEFAULT_COMBAT_REACH);
        assert!(!fields.has_changes());
        assert!(!fields.is_scheduled());
    }

    #[test]
    fn test_type_mask_follows_kind() {
        let player = Entity::create(ObjectGuid::player(1), EntityData::Player(Box::default()));
        assert_eq!(player.type_id(), TypeId::Player);
        assert!(player.is_unit());
        assert!(!player.is_creature());
        assert!(player.unit().is_some());

        let bag = Entity::create(ObjectGuid::new(HighGuid::Item, 0, 2), EntityData::Container);
        assert!(bag.is_type(TypeMask::ITEM));
        assert!(bag.unit().is_none());
        assert_eq!(bag.fields().values_count(), layout::container::END);
    }

    #[test]
    fn test_owner_per_kind() {
        let owner = ObjectGuid::player(9);
        let mut item = Entity::create(ObjectGuid::new(HighGuid::Item, 0, 1), EntityData::Item);
        item.fields_mut().set_guid(layout::item::OWNER, owner);
        assert_eq!(item.owner_guid(), owner);

        let mut pet = Entity::create(ObjectGuid::new(HighGuid::Pet, 5, 1), EntityData::Unit(Box::default()));
        pet.fields_mut().set_guid(unit::SUMMONEDBY, owner);
        assert_eq!(pet.owner_guid(), owner);
        assert_eq!(pet.charmer_or_owner_guid(), owner);

        let charmer = ObjectGuid::player(10);
        pet.fields_mut().set_guid(unit::CHARMEDBY, charmer);
        assert_eq!(pet.charmer_or_owner_guid(), charmer);

        let conversation = Entity::create(
            ObjectGuid::new(HighGuid::Conversation, 0, 1),
            EntityData::Conversation(ConversationData {
                creator: owner,
                texture_kit_id: 0,
            }),
        );
        assert_eq!(conversation.owner_guid(), owner);
    }

    #[test]
    fn test_ghost_state() {
        let mut player = Entity::create(ObjectGuid::player(1), EntityData::Player(Box::default()));
        assert!(!player.is_ghost());
        if let Some(unit) = player.unit_mut() {
            unit.death_state = DeathState::Dead;
        }
        assert!(player.is_dead());
        assert!(player.is_ghost());
        player.fields_mut().set_u32(unit::HEALTH, 0);
        assert!(!player.is_ghost());
    }

    #[test]
    fn test_create_bits_per_kind() {
        let go = EntityData::GameObject(GameObjectData {
            go_type: GameObjectType::MoTransport,
            ..Default::default()
        });
        let bits = CreateObjectBits::for_kind(&go);
        assert!(bits.stationary && bits.rotation && bits.server_time);
        assert!(!bits.movement_update);
        assert!(CreateObjectBits::for_kind(&EntityData::Unit(Box::default())).movement_update);
        assert_eq!(CreateObjectBits::for_kind(&EntityData::Item), CreateObjectBits::default());
    }

    #[test]
    fn test_destroy_checks() {
        let mut entity = Entity::create(ObjectGuid::player(1), EntityData::Player(Box::default()));
        assert!(entity.ensure_destroyable().is_ok());
        entity.set_in_world(true);
        assert!(matches!(entity.ensure_destroyable(), Err(MapError::StillInWorld(_))));
        entity.set_in_world(false);
        entity.set_registered_map(Some(1));
        assert!(matches!(entity.ensure_destroyable(), Err(MapError::StillRegistered { .. })));
        entity.set_registered_map(None);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "destroyed in invalid state")]
    fn test_drop_in_world_is_fatal_in_debug() {
        let mut entity = Entity::create(ObjectGuid::player(1), EntityData::Player(Box::default()));
        entity.set_in_world(true);
        drop(entity);
    }
}
