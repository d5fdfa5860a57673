//! Map partition
//!
//! Owns the entities of one map, the update list of entities with pending
//! field changes, and each player's client view. A tick flushes dirty
//! entities to the players that see them, then re-evaluates every player's
//! view and emits creates and out-of-range notices for the transitions.
//!
//! One partition is ticked by one thread; partitions never share entities.

use std::sync::Arc;

use hashbrown::HashMap;
use rustc_hash::FxHashMap;
use tracing::{debug, error, warn};

use crate::game::detection::{can_perceive, DetectionContext, DetectionOptions, DetectionSettings, LineOfSight, OpenTerrain};
use crate::game::entity::Entity;
use crate::game::guid::ObjectGuid;
use crate::game::phasing::{self, ConditionEvaluator, PhaseCatalog};
use crate::metrics::ReplicationMetrics;
use crate::net::byte_buffer::ByteBuffer;
use crate::net::codec::{build_create_block, build_values_block, CodecContext, CodecError, UpdateType};
use crate::net::phase_shift::build_phase_shift_for;
use crate::net::update_data::UpdateData;

/// Registry and lifecycle errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MapError {
    #[error("Entity {0} is still in world")]
    StillInWorld(ObjectGuid),
    #[error("Entity {0} is still queued for replication")]
    StillInUpdateList(ObjectGuid),
    #[error("Entity {guid} is still registered with map {map}")]
    StillRegistered { guid: ObjectGuid, map: u32 },
    #[error("Entity {guid} is already registered with map {map}")]
    AlreadyRegistered { guid: ObjectGuid, map: u32 },
    #[error("Entity {0} not found")]
    NotFound(ObjectGuid),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Spatial collaborator: which entities are close enough to matter
pub trait InterestProvider {
    /// Entities near `center`, excluding `center` itself
    fn nearby(&self, map: &Map, center: &Entity) -> Vec<ObjectGuid>;
}

/// Treats every entity on the map as nearby
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeMap;

impl InterestProvider for WholeMap {
    fn nearby(&self, map: &Map, center: &Entity) -> Vec<ObjectGuid> {
        let guid = center.guid();
        map.entities().map(Entity::guid).filter(|g| *g != guid).collect()
    }
}

/// Blocks produced by flushing one entity
#[derive(Debug, Default)]
pub struct FlushOutput {
    pub creates: Vec<(ObjectGuid, ByteBuffer)>,
    pub updates: Vec<(ObjectGuid, ByteBuffer)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketKind {
    Update,
    PhaseShift,
}

/// Serialized packet for one player's session
#[derive(Debug, Clone)]
pub struct OutgoingPacket {
    pub observer: ObjectGuid,
    pub kind: PacketKind,
    pub payload: Vec<u8>,
}

pub struct Map {
    id: u32,
    entities: HashMap<ObjectGuid, Entity>,
    update_list: Vec<ObjectGuid>,
    /// Removed entities each player still has to be told about
    pending_destroys: FxHashMap<ObjectGuid, Vec<ObjectGuid>>,
    pending_phase_shifts: Vec<ObjectGuid>,
    settings: DetectionSettings,
    line_of_sight: Box<dyn LineOfSight + Send + Sync>,
    check_line_of_sight: bool,
    metrics: Option<Arc<ReplicationMetrics>>,
    /// Game-time seconds, for despawn timers
    game_time: u64,
    server_time: u32,
}

impl Map {
    pub fn new(id: u32, settings: DetectionSettings) -> Self {
        Self {
            id,
            entities: HashMap::new(),
            update_list: Vec::new(),
            pending_destroys: FxHashMap::default(),
            pending_phase_shifts: Vec::new(),
            settings,
            line_of_sight: Box::new(OpenTerrain),
            check_line_of_sight: false,
            metrics: None,
            game_time: 0,
            server_time: 0,
        }
    }

    /// Visibility checks consult `oracle` once it is installed
    pub fn with_line_of_sight(mut self, oracle: impl LineOfSight + Send + Sync + 'static) -> Self {
        self.line_of_sight = Box::new(oracle);
        self.check_line_of_sight = true;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<ReplicationMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity(&self, guid: ObjectGuid) -> Option<&Entity> {
        self.entities.get(&guid)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn update_list(&self) -> &[ObjectGuid] {
        &self.update_list
    }

    /// `now_ms` is game-time milliseconds; despawn timers run in seconds
    pub fn set_clock(&mut self, now_ms: u64, server_time: u32) {
        self.game_time = now_ms / 1000;
        self.server_time = server_time;
    }

    fn detection_context(&self) -> DetectionContext<'_> {
        DetectionContext {
            lookup: &self.entities,
            line_of_sight: &*self.line_of_sight,
            settings: &self.settings,
            now: self.game_time,
        }
    }

    fn detection_options(&self) -> DetectionOptions {
        DetectionOptions {
            line_of_sight: self.check_line_of_sight,
            ..Default::default()
        }
    }

    fn codec_context(&self) -> CodecContext<'_> {
        CodecContext {
            lookup: &self.entities,
            server_time: self.server_time,
        }
    }

    // ========================================================================
    // Registry
    // ========================================================================

    pub fn add_to_map(&mut self, mut entity: Entity) -> Result<(), MapError> {
        let guid = entity.guid();
        if let Some(map) = entity.registered_map() {
            return Err(MapError::AlreadyRegistered { guid, map });
        }
        if self.entities.contains_key(&guid) {
            return Err(MapError::AlreadyRegistered { guid, map: self.id });
        }

        entity.core.map_id = self.id;
        entity.set_registered_map(Some(self.id));
        entity.set_in_world(true);
        Self::schedule(&mut self.update_list, &mut entity);
        self.entities.insert(guid, entity);
        debug!("Entity {} added to map {}", guid, self.id);
        Ok(())
    }

    /// Take an entity out of the simulation. Players that had it get a
    /// destroy notice on the next tick.
    pub fn remove_from_map(&mut self, guid: ObjectGuid) -> Result<Entity, MapError> {
        let mut entity = self.entities.remove(&guid).ok_or(MapError::NotFound(guid))?;
        self.update_list.retain(|g| *g != guid);

        entity.fields_mut().clear_changes();
        entity.set_in_update_list(false);
        entity.set_in_world(false);
        entity.set_registered_map(None);
        if let Some(player) = entity.player_mut() {
            player.client_guids.clear();
        }

        for other in self.entities.values_mut() {
            let observer = other.guid();
            if let Some(player) = other.player_mut() {
                if player.client_guids.remove(&guid) {
                    self.pending_destroys.entry(observer).or_default().push(guid);
                }
            }
        }
        self.pending_destroys.remove(&guid);
        self.pending_phase_shifts.retain(|g| *g != guid);

        entity.ensure_destroyable()?;
        debug!("Entity {} removed from map {}", guid, self.id);
        Ok(entity)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Queue an entity once per flush cycle
    fn schedule(update_list: &mut Vec<ObjectGuid>, entity: &mut Entity) {
        if entity.fields_mut().take_enqueue() && !entity.in_update_list() {
            entity.set_in_update_list(true);
            update_list.push(entity.guid());
        }
    }

    /// Run `f` against an entity and queue it if any field changed
    pub fn modify<R>(&mut self, guid: ObjectGuid, f: impl FnOnce(&mut Entity) -> R) -> Result<R, MapError> {
        let entity = self.entities.get_mut(&guid).ok_or(MapError::NotFound(guid))?;
        let result = f(entity);
        Self::schedule(&mut self.update_list, entity);
        Ok(result)
    }

    /// Force `slot` into the next values update without a value change
    pub fn mark_dirty(&mut self, guid: ObjectGuid, slot: u16) -> Result<(), MapError> {
        self.modify(guid, |e| e.fields_mut().force_values_update_at_index(slot))
    }

    /// Rebuild an entity's phases. Players get a phase shift notice on the
    /// next tick when anything changed.
    pub fn refresh_phases(
        &mut self,
        guid: ObjectGuid,
        catalog: &PhaseCatalog,
        conditions: &dyn ConditionEvaluator,
    ) -> Result<bool, MapError> {
        let changed = self.modify(guid, |e| phasing::refresh_phases(e, catalog, conditions))?;
        if changed && self.entities.get(&guid).is_some_and(Entity::is_player) {
            self.pending_phase_shifts.push(guid);
        }
        Ok(changed)
    }

    // ========================================================================
    // Replication
    // ========================================================================

    /// Encode `guid` for each observer: a values block for players that
    /// already have it, a create block for players that now perceive it.
    /// Clears the entity's change state.
    pub fn flush(&mut self, guid: ObjectGuid, observers: &[ObjectGuid]) -> Result<FlushOutput, MapError> {
        let target = self.entities.get(&guid).ok_or(MapError::NotFound(guid))?;
        let detection = self.detection_context();
        let opts = self.detection_options();
        let codec = self.codec_context();
        let mut out = FlushOutput::default();

        for &observer_guid in observers {
            let Some(observer) = self.entities.get(&observer_guid) else {
                continue;
            };
            let Some(player) = observer.player() else {
                continue;
            };

            if player.have_at_client(guid) {
                out.updates
                    .push((observer_guid, build_values_block(target, observer, &codec)));
            } else if can_perceive(observer, target, opts, &detection) {
                out.creates
                    .push((observer_guid, build_create_block(target, observer, &codec)?));
            }
        }

        for (observer, _) in &out.creates {
            if let Some(player) = self.entities.get_mut(observer).and_then(Entity::player_mut) {
                player.client_guids.insert(guid);
            }
        }
        if let Some(target) = self.entities.get_mut(&guid) {
            target.fields_mut().clear_changes();
            target.set_in_update_list(false);
        }
        self.update_list.retain(|g| *g != guid);

        Ok(out)
    }

    /// Flush every queued entity to the players around it
    pub fn send_object_updates(
        &mut self,
        interest: &dyn InterestProvider,
        packets: &mut FxHashMap<ObjectGuid, UpdateData>,
    ) {
        let queued = std::mem::take(&mut self.update_list);
        let mut retry = Vec::new();

        for guid in queued {
            let Some(target) = self.entities.get(&guid) else {
                continue;
            };
            let mut observers: Vec<ObjectGuid> = interest
                .nearby(self, target)
                .into_iter()
                .filter(|g| self.entities.get(g).is_some_and(Entity::is_player))
                .collect();
            if target.is_player() {
                observers.push(guid);
            }

            match self.flush(guid, &observers) {
                Ok(out) => {
                    for (observer, block) in out.creates {
                        self.record_block(UpdateType::CreateObject, &block);
                        self.packet_for(packets, observer).add_block(block);
                    }
                    for (observer, block) in out.updates {
                        self.record_block(UpdateType::Values, &block);
                        self.packet_for(packets, observer).add_block(block);
                    }
                }
                Err(e) => {
                    warn!("Skipping entity {} this tick: {}", guid, e);
                    if let Some(metrics) = &self.metrics {
                        metrics.record_skipped_entity();
                    }
                    retry.push(guid);
                }
            }
        }

        self.update_list.extend(retry);
    }

    /// Re-evaluate which entities `observer` perceives and queue creates and
    /// out-of-range notices for the differences
    pub fn update_visibility_of(
        &mut self,
        observer_guid: ObjectGuid,
        interest: &dyn InterestProvider,
        data: &mut UpdateData,
    ) -> Result<(), MapError> {
        let observer = self.entities.get(&observer_guid).ok_or(MapError::NotFound(observer_guid))?;
        let Some(player) = observer.player() else {
            return Ok(());
        };

        let mut candidates = interest.nearby(self, observer);
        candidates.push(observer_guid);
        candidates.extend(player.client_guids.iter().copied());
        candidates.sort_unstable();
        candidates.dedup();

        let detection = self.detection_context();
        let opts = self.detection_options();
        let codec = self.codec_context();
        let mut entered = Vec::new();
        let mut left = Vec::new();

        for target_guid in candidates {
            let Some(target) = self.entities.get(&target_guid) else {
                continue;
            };
            let visible = can_perceive(observer, target, opts, &detection);
            let known = player.have_at_client(target_guid);

            if visible && !known {
                match build_create_block(target, observer, &codec) {
                    Ok(block) => {
                        self.record_block(UpdateType::CreateObject, &block);
                        data.add_block(block);
                        entered.push(target_guid);
                    }
                    Err(e) => {
                        warn!("Skipping create of {} for {}: {}", target_guid, observer_guid, e);
                        if let Some(metrics) = &self.metrics {
                            metrics.record_skipped_entity();
                        }
                    }
                }
            } else if !visible && known {
                data.add_out_of_range(target_guid);
                left.push(target_guid);
            }
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_visibility_transitions(entered.len() as u64, left.len() as u64);
        }

        if let Some(player) = self.entities.get_mut(&observer_guid).and_then(Entity::player_mut) {
            player.client_guids.extend(entered);
            for guid in left {
                player.client_guids.remove(&guid);
            }
        }
        Ok(())
    }

    /// One replication pass: flush dirty entities, refresh every player's
    /// view, then serialize the per-player packets. `now_ms` is game-time
    /// milliseconds.
    pub fn tick(&mut self, interest: &dyn InterestProvider, now_ms: u64, server_time: u32) -> Vec<OutgoingPacket> {
        self.set_clock(now_ms, server_time);
        let mut packets: FxHashMap<ObjectGuid, UpdateData> = FxHashMap::default();

        for (observer, destroyed) in std::mem::take(&mut self.pending_destroys) {
            let data = self.packet_for(&mut packets, observer);
            for guid in destroyed {
                data.add_destroy(guid);
            }
        }

        self.send_object_updates(interest, &mut packets);

        let mut players: Vec<ObjectGuid> = self
            .entities
            .values()
            .filter(|e| e.is_player())
            .map(Entity::guid)
            .collect();
        players.sort_unstable();

        for observer in players {
            let mut data = packets
                .remove(&observer)
                .unwrap_or_else(|| UpdateData::new(self.id as u16));
            if let Err(e) = self.update_visibility_of(observer, interest, &mut data) {
                error!("Visibility update failed for {}: {}", observer, e);
            }
            packets.insert(observer, data);
        }

        let mut out = Vec::new();
        for guid in std::mem::take(&mut self.pending_phase_shifts) {
            if let Some(player) = self.entities.get(&guid) {
                if let Some(metrics) = &self.metrics {
                    metrics.record_phase_shift();
                }
                out.push(OutgoingPacket {
                    observer: guid,
                    kind: PacketKind::PhaseShift,
                    payload: build_phase_shift_for(player).into_bytes(),
                });
            }
        }

        let mut observers: Vec<ObjectGuid> = packets.keys().copied().collect();
        observers.sort_unstable();
        for observer in observers {
            let Some(data) = packets.remove(&observer) else {
                continue;
            };
            if !data.has_data() {
                continue;
            }
            let payload = data.build_packet();
            if let Some(metrics) = &self.metrics {
                metrics.record_removals(data.destroyed().len() as u64, data.out_of_range().len() as u64);
                metrics.record_packet(payload.len());
            }
            out.push(OutgoingPacket {
                observer,
                kind: PacketKind::Update,
                payload,
            });
        }

        debug!(
            "Map {} tick: {} packets, {} entities queued",
            self.id,
            out.len(),
            self.update_list.len()
        );
        out
    }

    fn packet_for<'a>(
        &self,
        packets: &'a mut FxHashMap<ObjectGuid, UpdateData>,
        observer: ObjectGuid,
    ) -> &'a mut UpdateData {
        let map_id = self.id as u16;
        packets.entry(observer).or_insert_with(|| UpdateData::new(map_id))
    }

    fn record_block(&self, update_type: UpdateType, block: &ByteBuffer) {
        if let Some(metrics) = &self.metrics {
            metrics.record_block(update_type, block.len());
        }
    }
}

impl Drop for Map {
    fn drop(&mut self) {
        for entity in self.entities.values_mut() {
            entity.fields_mut().clear_changes();
            entity.set_in_update_list(false);
            entity.set_in_world(false);
            entity.set_registered_map(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::{DeathState, EntityData};
    use crate::game::fields::layout::unit;
    use crate::util::position::Position;
    use crate::game::guid::HighGuid;
    use crate::game::phasing::{AllConditionsMet, PhaseSet};
    use crate::game::visibility::InvisibilityType;
    use crate::net::codec::UpdateType;

    fn player(counter: u64) -> Entity {
        Entity::create(ObjectGuid::player(counter), EntityData::Player(Box::default()))
    }

    fn creature(counter: u64) -> Entity {
        Entity::create(
            ObjectGuid::new(HighGuid::Unit, 100, counter),
            EntityData::Unit(Box::default()),
        )
    }

    fn map_with(entities: Vec<Entity>) -> Map {
        let mut map = Map::new(1, DetectionSettings::default());
        for entity in entities {
            assert!(map.add_to_map(entity).is_ok());
        }
        map
    }

    fn update_for(packets: &[OutgoingPacket], observer: ObjectGuid) -> Option<&OutgoingPacket> {
        packets
            .iter()
            .find(|p| p.observer == observer && p.kind == PacketKind::Update)
    }

    fn block_count(packet: &OutgoingPacket) -> u32 {
        u32::from_le_bytes([packet.payload[0], packet.payload[1], packet.payload[2], packet.payload[3]])
    }

    #[test]
    fn test_double_registration_rejected() {
        let mut map = map_with(vec![player(1)]);
        let err = map.add_to_map(player(1));
        assert_eq!(
            err,
            Err(MapError::AlreadyRegistered {
                guid: ObjectGuid::player(1),
                map: 1
            })
        );
    }

    #[test]
    fn test_remove_unknown() {
        let mut map = map_with(vec![]);
        assert!(matches!(
            map.remove_from_map(ObjectGuid::player(9)),
            Err(MapError::NotFound(_))
        ));
    }

    #[test]
    fn test_removed_entity_is_destroyable() {
        let mut map = map_with(vec![creature(1)]);
        let guid = ObjectGuid::new(HighGuid::Unit, 100, 1);
        assert!(map.mark_dirty(guid, unit::HEALTH).is_ok());
        let entity = map.remove_from_map(guid);
        assert!(entity.is_ok_and(|e| e.ensure_destroyable().is_ok() && !e.in_world()));
        assert!(map.update_list().is_empty());
    }

    #[test]
    fn test_enqueue_once_per_cycle() {
        let guid = ObjectGuid::new(HighGuid::Unit, 100, 1);
        let mut map = map_with(vec![creature(1)]);
        assert!(map.update_list().is_empty());

        let _ = map.modify(guid, |e| e.fields_mut().set_u32(unit::HEALTH, 40));
        let _ = map.modify(guid, |e| e.fields_mut().set_u32(unit::POWER, 10));
        assert_eq!(map.update_list(), &[guid]);
        assert!(map.entity(guid).is_some_and(Entity::in_update_list));
    }

    #[test]
    fn test_unchanged_value_not_scheduled() {
        let guid = ObjectGuid::new(HighGuid::Unit, 100, 1);
        let mut map = map_with(vec![creature(1)]);
        let _ = map.modify(guid, |e| e.fields_mut().set_u32(unit::LEVEL, 1));
        assert!(map.update_list().is_empty());
    }

    #[test]
    fn test_first_tick_creates_everyone() {
        let mut map = map_with(vec![player(1), player(2), creature(3)]);
        let packets = map.tick(&WholeMap, 0, 0);

        for observer in [ObjectGuid::player(1), ObjectGuid::player(2)] {
            let packet = update_for(&packets, observer);
            assert!(packet.is_some_and(|p| block_count(p) == 3));
        }
        assert!(map
            .entity(ObjectGuid::player(1))
            .is_some_and(|p| p.have_at_client(ObjectGuid::player(2))));
    }

    #[test]
    fn test_flush_idempotent() {
        let mut map = map_with(vec![player(1), creature(3)]);
        map.tick(&WholeMap, 0, 0);
        assert!(map.tick(&WholeMap, 100, 100).is_empty());

        let guid = ObjectGuid::new(HighGuid::Unit, 100, 3);
        let _ = map.modify(guid, |e| e.fields_mut().set_u32(unit::HEALTH, 7));
        let packets = map.tick(&WholeMap, 200, 200);
        let packet = update_for(&packets, ObjectGuid::player(1));
        assert!(packet.is_some_and(|p| block_count(p) == 1));
        // data starts after count, map, flag byte and size
        assert!(packet.is_some_and(|p| p.payload[11] == UpdateType::Values as u8));

        assert!(map.tick(&WholeMap, 300, 300).is_empty());
    }

    #[test]
    fn test_flush_returns_values_for_known_observers() {
        let mut map = map_with(vec![player(1), creature(3)]);
        map.tick(&WholeMap, 0, 0);
        let guid = ObjectGuid::new(HighGuid::Unit, 100, 3);

        let out = map.flush(guid, &[ObjectGuid::player(1)]);
        assert!(out.is_ok_and(|o| o.creates.is_empty() && o.updates.len() == 1));
        assert!(map.entity(guid).is_some_and(|e| !e.fields().has_changes()));
    }

    #[test]
    fn test_invisible_creature_never_created() {
        let mut hidden = creature(3);
        hidden.core.visibility.set_invisibility(InvisibilityType(2), 100);
        let mut map = map_with(vec![player(1), hidden]);

        let packets = map.tick(&WholeMap, 0, 0);
        let packet = update_for(&packets, ObjectGuid::player(1));
        assert!(packet.is_some_and(|p| block_count(p) == 1));
        assert!(map
            .entity(ObjectGuid::player(1))
            .is_some_and(|p| !p.have_at_client(ObjectGuid::new(HighGuid::Unit, 100, 3))));
    }

    #[test]
    fn test_phase_change_sends_out_of_range() {
        let mut map = map_with(vec![player(1), player(2)]);
        map.tick(&WholeMap, 0, 0);

        let _ = map.modify(ObjectGuid::player(2), |e| e.core.phases = PhaseSet::with_phases([500]));
        let packets = map.tick(&WholeMap, 100, 100);
        let packet = update_for(&packets, ObjectGuid::player(1));
        // no blocks, removal flag set, zero destroys, one out-of-range guid
        assert!(packet.is_some_and(|p| block_count(p) == 0 && p.payload[6] == 0x80));
        assert!(map
            .entity(ObjectGuid::player(1))
            .is_some_and(|p| !p.have_at_client(ObjectGuid::player(2))));
    }

    #[test]
    fn test_removal_sends_destroy() {
        let mut map = map_with(vec![player(1), creature(3)]);
        map.tick(&WholeMap, 0, 0);
        let guid = ObjectGuid::new(HighGuid::Unit, 100, 3);
        assert!(map.remove_from_map(guid).is_ok());

        let packets = map.tick(&WholeMap, 100, 100);
        let packet = update_for(&packets, ObjectGuid::player(1));
        assert!(packet.is_some_and(|p| &p.payload[7..9] == &1u16.to_le_bytes()));
    }

    #[test]
    fn test_corpse_despawns_on_game_clock() {
        let guid = ObjectGuid::new(HighGuid::Unit, 100, 3);
        let mut corpse = creature(3);
        if let Some(unit) = corpse.unit_mut() {
            unit.death_state = DeathState::Corpse;
            unit.corpse_remove_time = 5;
        }
        let mut map = map_with(vec![player(1), corpse]);

        let packets = map.tick(&WholeMap, 1000, 1000);
        let packet = update_for(&packets, ObjectGuid::player(1));
        assert!(packet.is_some_and(|p| block_count(p) == 2));
        assert!(map.tick(&WholeMap, 4000, 4000).is_empty());

        let packets = map.tick(&WholeMap, 6000, 6000);
        let packet = update_for(&packets, ObjectGuid::player(1));
        assert!(packet.is_some_and(|p| block_count(p) == 0 && p.payload[6] == 0x80));
        assert!(map
            .entity(ObjectGuid::player(1))
            .is_some_and(|p| !p.have_at_client(guid)));
    }

    struct Wall;

    impl LineOfSight for Wall {
        fn is_in_line_of_sight(&self, _: u32, _: &Position, _: &Position, _: &PhaseSet) -> bool {
            false
        }
    }

    #[test]
    fn test_line_of_sight_oracle_hides_targets() {
        let mut map = Map::new(1, DetectionSettings::default()).with_line_of_sight(Wall);
        for entity in [player(1), player(2), creature(3)] {
            assert!(map.add_to_map(entity).is_ok());
        }

        let packets = map.tick(&WholeMap, 0, 0);
        let packet = update_for(&packets, ObjectGuid::player(1));
        assert!(packet.is_some_and(|p| block_count(p) == 1));
        assert!(map
            .entity(ObjectGuid::player(1))
            .is_some_and(|p| !p.have_at_client(ObjectGuid::player(2))));
    }

    #[test]
    fn test_codec_error_skips_entity() {
        let mut broken = creature(3);
        broken.core.update_flags.rotation = true;
        let mut map = map_with(vec![player(1), broken]);

        let packets = map.tick(&WholeMap, 0, 0);
        let packet = update_for(&packets, ObjectGuid::player(1));
        assert!(packet.is_some_and(|p| block_count(p) == 1));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_refresh_phases_queues_notice() {
        let catalog = PhaseCatalog::from_json_str(r#"{ "area_phases": { "12": [ { "id": 300 } ] } }"#)
            .expect("catalog parses");
        let mut map = map_with(vec![player(1)]);
        let _ = map.modify(ObjectGuid::player(1), |e| e.core.area_id = 12);

        let changed = map.refresh_phases(ObjectGuid::player(1), &catalog, &AllConditionsMet);
        assert_eq!(changed, Ok(true));
        let packets = map.tick(&WholeMap, 0, 0);
        assert!(packets
            .iter()
            .any(|p| p.observer == ObjectGuid::player(1) && p.kind == PacketKind::PhaseShift));
    }
}
