//! Perception chain: can an observer see or detect a target?
//!
//! Evaluated as an ordered short-circuit chain. Every ambiguous branch
//! resolves to "not visible" so state never leaks to an unauthorized observer.

use crate::game::constants::aggro::{BASE_RADIUS, DETECT_RANGE_LEVEL_MARGIN, MAX_LEVELS_UNDER, MIN_RADIUS};
use crate::game::constants::stealth::{
    ALERT_RANGE_BONUS, ALERT_RANGE_FACTOR, BASE_DETECTION, FRONTAL_ARC,
    MAX_PLAYER_STEALTH_DETECT_RANGE, POINTS_PER_LEVEL, RANGE_PER_POINT,
};
use crate::game::constants::visibility::{
    DEFAULT_VISIBILITY_DISTANCE, MAX_VISIBILITY_DISTANCE, SIGHT_RANGE_UNIT,
};
use crate::game::entity::{Entity, GameObjectType, Team};
use crate::game::fields::layout::player;
use crate::game::guid::ObjectGuid;
use crate::game::object_type::TypeId;
use crate::game::phasing::PhaseSet;
use crate::game::visibility::{GhostVisibility, InvisibilityType, StealthType};
use crate::util::position::Position;

// ============================================================================
// Collaborators
// ============================================================================

/// Read-only entity resolution by GUID
pub trait EntityLookup {
    fn entity(&self, guid: ObjectGuid) -> Option<&Entity>;
}

impl<S: std::hash::BuildHasher> EntityLookup for hashbrown::HashMap<ObjectGuid, Entity, S> {
    fn entity(&self, guid: ObjectGuid) -> Option<&Entity> {
        self.get(&guid)
    }
}

/// Line-of-sight oracle backed by map geometry
pub trait LineOfSight {
    fn is_in_line_of_sight(&self, map_id: u32, from: &Position, to: &Position, phases: &PhaseSet)
        -> bool;
}

/// Terrain without obstacles
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenTerrain;

impl LineOfSight for OpenTerrain {
    fn is_in_line_of_sight(&self, _: u32, _: &Position, _: &Position, _: &PhaseSet) -> bool {
        true
    }
}

/// Which grouped players see each other regardless of ghost state or stealth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupVisibility {
    SameGroup = 0,
    #[default]
    SameRaid = 1,
    SameTeam = 2,
    Nobody = 3,
}

impl GroupVisibility {
    pub fn from_config(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::SameGroup),
            1 => Some(Self::SameRaid),
            2 => Some(Self::SameTeam),
            3 => Some(Self::Nobody),
            _ => None,
        }
    }
}

/// Tunables of the perception chain
#[derive(Debug, Clone)]
pub struct DetectionSettings {
    /// Map visibility range for players
    pub visibility_distance: f32,
    pub group_visibility: GroupVisibility,
    pub creature_aggro_rate: f32,
    pub max_player_level: u32,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            visibility_distance: DEFAULT_VISIBILITY_DISTANCE,
            group_visibility: GroupVisibility::SameRaid,
            creature_aggro_rate: 1.0,
            max_player_level: 110,
        }
    }
}

/// Everything the chain reads besides the two entities
#[derive(Clone, Copy)]
pub struct DetectionContext<'a> {
    pub lookup: &'a dyn EntityLookup,
    pub line_of_sight: &'a dyn LineOfSight,
    pub settings: &'a DetectionSettings,
    /// Game-time seconds
    pub now: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionOptions {
    pub ignore_stealth: bool,
    pub distance_check: bool,
    pub check_alert: bool,
    pub line_of_sight: bool,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            ignore_stealth: false,
            distance_check: true,
            check_alert: false,
            line_of_sight: false,
        }
    }
}

// ============================================================================
// Chain
// ============================================================================

pub fn can_perceive(
    observer: &Entity,
    target: &Entity,
    opts: DetectionOptions,
    ctx: &DetectionContext<'_>,
) -> bool {
    if observer.guid() == target.guid() {
        return true;
    }

    if is_never_visible(target) || can_never_see(observer, target) {
        return false;
    }

    if is_always_visible_for(target, observer, ctx) || can_always_see(observer, target) {
        return true;
    }

    let mut corpse_visibility = false;
    if opts.distance_check {
        let sight = sight_range(observer, Some(target), ctx.settings);
        let mut corpse_check = false;

        if let Some(player) = observer.player() {
            let target_ghost = target.visibility().ghost_flags();
            let own_ghost = observer.visibility().ghost_flags();
            if observer.is_ghost() && !(target_ghost & own_ghost).contains(GhostVisibility::GHOST) {
                if let Some(corpse) = player.corpse.and_then(|g| ctx.lookup.entity(g)) {
                    corpse_check = true;
                    corpse_visibility = corpse.position().is_within_dist(observer.position(), sight)
                        && corpse.position().is_within_dist(target.position(), sight);
                }
            }

            // Vehicle accessories are hidden until the vehicle itself is
            if let Some(base) = target.unit().and_then(|u| u.vehicle_base) {
                if !player.have_at_client(base) {
                    return false;
                }
            }
        }

        let viewpoint = viewpoint_of(observer, ctx);
        if !corpse_check && !viewpoint.position().is_within_dist(target.position(), sight) {
            return false;
        }

        if opts.line_of_sight
            && !ctx.line_of_sight.is_in_line_of_sight(
                observer.map_id(),
                viewpoint.position(),
                target.position(),
                observer.phases(),
            )
        {
            return false;
        }
    }

    // GM gate
    let target_gm = target.visibility().gm_level();
    let observer_gm_detect = observer.visibility().gm_detect();
    if target_gm == 0 {
        if observer_gm_detect != 0 {
            return true;
        }
    } else {
        return observer_gm_detect >= target_gm;
    }

    // Ghost gate
    let ghost_match = target.visibility().ghost_flags() & observer.visibility().ghost_detect();
    if !corpse_visibility && ghost_match.is_empty() {
        return match (observer.player(), target.player()) {
            (Some(a), Some(b)) => {
                a.team == b.team && is_group_visible_for(observer, target, ctx.settings.group_visibility)
            }
            _ => false,
        };
    }

    if is_invisible_due_to_despawn(target, ctx.now) {
        return false;
    }

    can_detect(observer, target, opts, ctx)
}

fn is_never_visible(target: &Entity) -> bool {
    if !target.in_world() {
        return true;
    }
    if target.player().is_some_and(|p| p.logging_out) {
        return true;
    }
    if let Some(go) = target.game_object() {
        if go.server_only
            || target.fields().get_u32(crate::game::fields::layout::gameobject::DISPLAYID) == 0
        {
            return true;
        }
    }
    false
}

fn can_never_see(observer: &Entity, target: &Entity) -> bool {
    observer.map_id() != target.map_id() || !observer.phases().in_phase(target.phases())
}

fn is_always_visible_for(target: &Entity, seer: &Entity, ctx: &DetectionContext<'_>) -> bool {
    match target.type_id() {
        TypeId::Unit | TypeId::Player => {
            let controller = target.charmer_or_owner_guid();
            if !controller.is_empty() && controller == seer.guid() {
                return true;
            }
            if seer.is_player() {
                let owner = target.owner_guid();
                if let Some(owner) = ctx.lookup.entity(owner).filter(|o| o.is_player()) {
                    if is_group_visible_for(owner, seer, ctx.settings.group_visibility) {
                        return true;
                    }
                }
            }
            false
        }
        TypeId::GameObject => {
            let destructible = target.game_object().is_some_and(|go| {
                go.go_type.is_transport() || go.go_type == GameObjectType::DestructibleBuilding
            });
            if destructible {
                return true;
            }
            let owner = target.owner_guid();
            if owner.is_empty() {
                return false;
            }
            if owner == seer.guid() {
                return true;
            }
            seer.is_unit()
                && ctx
                    .lookup
                    .entity(owner)
                    .filter(|o| o.is_unit())
                    .is_some_and(|o| is_friendly_to(o, seer, ctx.lookup))
        }
        _ => false,
    }
}

fn can_always_see(observer: &Entity, target: &Entity) -> bool {
    if observer.is_creature() {
        return observer
            .unit()
            .is_some_and(|u| u.always_see.contains(&target.guid()));
    }
    if observer.is_player() {
        let farsight = observer.fields().get_guid(player::FARSIGHT);
        return !farsight.is_empty() && farsight == target.guid();
    }
    false
}

/// A player's far-sight object, falling back to the observer itself
fn viewpoint_of<'a>(observer: &'a Entity, ctx: &DetectionContext<'a>) -> &'a Entity {
    if observer.is_player() {
        let farsight = observer.fields().get_guid(player::FARSIGHT);
        if !farsight.is_empty() {
            if let Some(viewpoint) = ctx.lookup.entity(farsight) {
                return viewpoint;
            }
        }
    }
    observer
}

fn is_invisible_due_to_despawn(target: &Entity, now: u64) -> bool {
    if target.is_creature() {
        let Some(unit) = target.unit() else {
            return false;
        };
        let lingering = target.is_alive() || target.is_dying() || unit.corpse_remove_time > now;
        return !lingering;
    }
    if let Some(go) = target.game_object() {
        return !go.spawned;
    }
    false
}

// ============================================================================
// Detection
// ============================================================================

fn can_detect(
    observer: &Entity,
    target: &Entity,
    opts: DetectionOptions,
    ctx: &DetectionContext<'_>,
) -> bool {
    // Controlled units see through their controller
    let mut seer = observer;
    if observer.is_unit() {
        let controller = observer.charmer_or_owner_guid();
        if let Some(entity) = ctx.lookup.entity(controller) {
            seer = entity;
        }
    }

    if is_always_detectable_for(target, seer, ctx) {
        return true;
    }

    if !opts.ignore_stealth && !can_detect_invisibility_of(seer, target) {
        return false;
    }

    if !opts.ignore_stealth && !can_detect_stealth_of(seer, target, opts.check_alert, ctx) {
        return false;
    }

    true
}

fn is_always_detectable_for(target: &Entity, seer: &Entity, ctx: &DetectionContext<'_>) -> bool {
    if !target.is_unit() {
        return false;
    }
    if target.is_stalked_by(seer.guid()) {
        return true;
    }
    if let Some(duel) = target.player().and_then(|p| p.duel) {
        if duel.started && duel.opponent == seer.guid() {
            return false;
        }
    }
    if let Some(owner) = charmer_or_owner_player_or_self(target, ctx.lookup) {
        if seer.is_player() && is_group_visible_for(owner, seer, ctx.settings.group_visibility) {
            return true;
        }
    }
    false
}

pub fn can_detect_invisibility_of(seer: &Entity, target: &Entity) -> bool {
    let target_flags = target.visibility().invisibility.flags();
    let mask = target_flags & seer.visibility().invisibility_detect.flags();
    if mask != target_flags {
        return false;
    }

    (0..InvisibilityType::TOTAL)
        .filter(|i| mask & (1u64 << i) != 0)
        .all(|i| {
            seer.visibility().invisibility_detect.value_at(i) >= target.visibility().invisibility.value_at(i)
        })
}

pub fn can_detect_stealth_of(
    seer: &Entity,
    target: &Entity,
    check_alert: bool,
    ctx: &DetectionContext<'_>,
) -> bool {
    if target.visibility().stealth.flags() == 0 {
        return true;
    }

    let distance = seer.position().exact_dist(target.position());
    let combat_reach = seer.combat_reach();
    if distance < combat_reach {
        return true;
    }

    if !seer.position().has_in_arc(FRONTAL_ARC, target.position()) {
        return false;
    }

    for ty in StealthType::ALL {
        if !target.visibility().stealth.has_flag(ty) {
            continue;
        }

        if seer
            .unit()
            .is_some_and(|u| u.auras.detect_stealth_mask & (1 << ty as u32) != 0)
        {
            return true;
        }

        let mut range = stealth_detect_range(seer, target, ty, ctx);
        if check_alert {
            range += range * ALERT_RANGE_FACTOR + ALERT_RANGE_BONUS;
            if seer.is_creature() && target.is_unit() {
                let combat_distance = seer.unit().map(|u| u.combat_distance).unwrap_or(0.0);
                if aggro_distance(seer, target, ctx.settings) + combat_distance > range {
                    return false;
                }
            }
        }

        if distance > range {
            return false;
        }
    }

    true
}

/// Distance at which `seer` spots `target` stealthed with `ty`
pub fn stealth_detect_range(
    seer: &Entity,
    target: &Entity,
    ty: StealthType,
    ctx: &DetectionContext<'_>,
) -> f32 {
    let mut detection = BASE_DETECTION + (seer.level() as i32 - 1) * POINTS_PER_LEVEL;
    detection += seer.visibility().stealth_detect.value(ty);

    // Traps hide better the higher their owner
    if target.is_game_object() {
        if let Some(owner) = ctx.lookup.entity(target.owner_guid()).filter(|o| o.is_unit()) {
            detection -= (owner.level() as i32 - 1) * POINTS_PER_LEVEL;
        }
    }

    detection -= target.visibility().stealth.value(ty);

    let range = detection as f32 * RANGE_PER_POINT + seer.combat_reach();
    if seer.is_creature() {
        range.min(MAX_PLAYER_STEALTH_DETECT_RANGE)
    } else {
        range
    }
}

// ============================================================================
// Ranges and groups
// ============================================================================

/// How far `observer` sees, optionally for a specific target
pub fn sight_range(observer: &Entity, target: Option<&Entity>, settings: &DetectionSettings) -> f32 {
    match observer.type_id() {
        TypeId::Player => {
            if let Some(target) = target.filter(|t| !t.is_player()) {
                if let Some(distance) = target.core.visibility_override {
                    return distance;
                }
                if target.core.active {
                    return MAX_VISIBILITY_DISTANCE;
                }
            }
            settings.visibility_distance
        }
        TypeId::Unit => observer
            .unit()
            .map(|u| u.sight_distance)
            .unwrap_or(SIGHT_RANGE_UNIT),
        TypeId::DynamicObject if observer.core.active => settings.visibility_distance,
        _ => 0.0,
    }
}

/// Radius at which a creature notices `target`
pub fn aggro_distance(creature: &Entity, target: &Entity, settings: &DetectionSettings) -> f32 {
    let rate = settings.creature_aggro_rate;
    if rate == 0.0 {
        return 0.0;
    }

    let creature_level = creature.level();
    let level_diff = (target.level() as i32 - creature_level as i32).max(MAX_LEVELS_UNDER);
    let mut distance = BASE_RADIUS - level_diff as f32;

    if creature_level + DETECT_RANGE_LEVEL_MARGIN <= settings.max_player_level {
        distance += creature.unit().map(|u| u.auras.detect_range_mod).unwrap_or(0.0);
        distance += target.unit().map(|u| u.auras.detected_range_mod).unwrap_or(0.0);
    }

    distance.max(MIN_RADIUS) * rate
}

/// The player controlling `unit` (charmer, then owner), or `unit` itself
/// when it is a player
pub fn charmer_or_owner_player_or_self<'a>(
    unit: &'a Entity,
    lookup: &'a dyn EntityLookup,
) -> Option<&'a Entity> {
    let controller = unit.charmer_or_owner_guid();
    if !controller.is_empty() {
        if let Some(player) = lookup.entity(controller).filter(|e| e.is_player()) {
            return Some(player);
        }
    }
    unit.is_player().then_some(unit)
}

/// Friendliness between the controlling players: same team. Entities
/// without one are never friendly.
pub fn is_friendly_to(a: &Entity, b: &Entity, lookup: &dyn EntityLookup) -> bool {
    if a.guid() == b.guid() {
        return true;
    }
    match (team_of(a, lookup), team_of(b, lookup)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

fn team_of(entity: &Entity, lookup: &dyn EntityLookup) -> Option<Team> {
    charmer_or_owner_player_or_self(entity, lookup)
        .and_then(Entity::player)
        .map(|p| p.team)
}

/// Same group object; the same player counts
pub fn is_in_same_raid_with(a: &Entity, b: &Entity) -> bool {
    if a.guid() == b.guid() {
        return true;
    }
    match (a.player().and_then(|p| p.group), b.player().and_then(|p| p.group)) {
        (Some(ga), Some(gb)) => ga.id == gb.id,
        _ => false,
    }
}

pub fn is_in_same_group_with(a: &Entity, b: &Entity) -> bool {
    if a.guid() == b.guid() {
        return true;
    }
    match (a.player().and_then(|p| p.group), b.player().and_then(|p| p.group)) {
        (Some(ga), Some(gb)) => ga.id == gb.id && ga.subgroup == gb.subgroup,
        _ => false,
    }
}

pub fn is_group_visible_for(player: &Entity, other: &Entity, rule: GroupVisibility) -> bool {
    match rule {
        GroupVisibility::SameGroup => is_in_same_group_with(player, other),
        GroupVisibility::SameRaid => is_in_same_raid_with(player, other),
        GroupVisibility::SameTeam => match (player.player(), other.player()) {
            (Some(a), Some(b)) => a.team == b.team,
            _ => false,
        },
        GroupVisibility::Nobody => false,
    }
}
