//! Phase membership and terrain swaps
//!
//! Phases are server-side visibility partitions. An entity's set is rebuilt
//! from the catalog (area and zone phase definitions, phase groups, terrain
//! swaps) whenever it moves between areas or gains/loses phase auras.

use std::collections::BTreeSet;
use std::path::Path;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::game::constants::phase::DEFAULT_PHASE;
use crate::game::entity::Entity;

/// Guard against cycles in the area parent chain
const MAX_AREA_DEPTH: usize = 16;

/// Errors raised while loading a phase catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read phase catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid phase catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Decides whether an entity currently satisfies a condition id
pub trait ConditionEvaluator {
    fn meets(&self, entity: &Entity, condition: u32) -> bool;

    fn meets_all(&self, entity: &Entity, conditions: &[u32]) -> bool {
        conditions.iter().all(|&c| self.meets(entity, c))
    }
}

/// Evaluator that accepts every condition
#[derive(Debug, Clone, Copy, Default)]
pub struct AllConditionsMet;

impl ConditionEvaluator for AllConditionsMet {
    fn meets(&self, _entity: &Entity, _condition: u32) -> bool {
        true
    }
}

/// A phase (or terrain swap) id gated by conditions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseInfo {
    pub id: u32,
    #[serde(default)]
    pub conditions: Vec<u32>,
}

/// Static phase data, usually loaded from JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhaseCatalog {
    /// Area or zone id → phases applied inside it
    #[serde(default)]
    pub area_phases: HashMap<u32, Vec<PhaseInfo>>,
    /// Phase id → terrain swaps it enables
    #[serde(default)]
    pub phase_terrain_swaps: HashMap<u32, Vec<PhaseInfo>>,
    /// Map id → terrain swaps always considered on that map
    #[serde(default)]
    pub default_terrain_swaps: HashMap<u32, Vec<PhaseInfo>>,
    /// Terrain swap id → world map areas it replaces
    #[serde(default)]
    pub terrain_world_maps: HashMap<u32, Vec<u32>>,
    /// Phase group id → member phases
    #[serde(default)]
    pub phase_groups: HashMap<u32, Vec<u32>>,
    /// Swap map id → parent map id
    #[serde(default)]
    pub map_parents: HashMap<u32, u32>,
    /// Area id → parent area or zone id
    #[serde(default)]
    pub area_parents: HashMap<u32, u32>,
}

impl PhaseCatalog {
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn phases_for_area(&self, area: u32) -> &[PhaseInfo] {
        self.area_phases.get(&area).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn phases_for_group(&self, group: u32) -> &[u32] {
        self.phase_groups.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn terrain_swaps_for_phase(&self, phase: u32) -> &[PhaseInfo] {
        self.phase_terrain_swaps
            .get(&phase)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn default_terrain_swaps(&self, map: u32) -> &[PhaseInfo] {
        self.default_terrain_swaps
            .get(&map)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn world_maps_for_terrain(&self, swap: u32) -> &[u32] {
        self.terrain_world_maps
            .get(&swap)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn parent_map(&self, map: u32) -> Option<u32> {
        self.map_parents.get(&map).copied()
    }

    /// Whether `area` is `target` or nested inside it
    pub fn is_in_area(&self, area: u32, target: u32) -> bool {
        let mut current = area;
        for _ in 0..MAX_AREA_DEPTH {
            if current == target {
                return true;
            }
            match self.area_parents.get(&current) {
                Some(&parent) if parent != current => current = parent,
                _ => return false,
            }
        }
        false
    }
}

// ============================================================================
// PhaseSet
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseSet {
    phases: BTreeSet<u32>,
    terrain_swaps: BTreeSet<u32>,
    world_map_area_swaps: BTreeSet<u32>,
}

impl PhaseSet {
    pub fn with_phases(phases: impl IntoIterator<Item = u32>) -> Self {
        Self {
            phases: phases.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn phases(&self) -> &BTreeSet<u32> {
        &self.phases
    }

    pub fn terrain_swaps(&self) -> &BTreeSet<u32> {
        &self.terrain_swaps
    }

    pub fn world_map_area_swaps(&self) -> &BTreeSet<u32> {
        &self.world_map_area_swaps
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn has_phase(&self, phase: u32) -> bool {
        self.phases.contains(&phase)
    }

    /// Phase 169 is the fallback: an empty set matches it
    pub fn in_phase(&self, other: &PhaseSet) -> bool {
        if self.phases.is_empty() && other.phases.is_empty() {
            return true;
        }
        if self.phases.is_empty() && other.has_phase(DEFAULT_PHASE) {
            return true;
        }
        if other.phases.is_empty() && self.has_phase(DEFAULT_PHASE) {
            return true;
        }
        !self.phases.is_disjoint(&other.phases)
    }
}

// ============================================================================
// Refresh
// ============================================================================

struct PhaseBuilder<'a> {
    entity: &'a Entity,
    catalog: &'a PhaseCatalog,
    conditions: &'a dyn ConditionEvaluator,
    phases: BTreeSet<u32>,
}

impl PhaseBuilder<'_> {
    /// Phases granted by the current area with passing conditions stick
    fn remove(&mut self, phase: u32) {
        let area_keeps = self
            .catalog
            .phases_for_area(self.entity.area_id())
            .iter()
            .any(|p| p.id == phase && self.conditions.meets_all(self.entity, &p.conditions));
        if !area_keeps {
            self.phases.remove(&phase);
        }
    }

    fn apply(&mut self, phase: u32, apply: bool) {
        if phase == 0 {
            return;
        }
        if apply {
            self.phases.insert(phase);
        } else {
            self.remove(phase);
        }
    }

    fn finish(self) -> PhaseSet {
        let map_id = self.entity.map_id();
        let mut terrain_swaps = BTreeSet::new();
        for &phase in &self.phases {
            for swap in self.catalog.terrain_swaps_for_phase(phase) {
                if self.catalog.parent_map(swap.id) != Some(map_id) {
                    continue;
                }
                if self.conditions.meets_all(self.entity, &swap.conditions) {
                    terrain_swaps.insert(swap.id);
                }
            }
        }
        for swap in self.catalog.default_terrain_swaps(map_id) {
            if self.conditions.meets_all(self.entity, &swap.conditions) {
                terrain_swaps.insert(swap.id);
            }
        }

        // only clients render world maps
        let mut world_map_area_swaps = BTreeSet::new();
        if self.entity.is_player() {
            for &swap in &terrain_swaps {
                world_map_area_swaps.extend(self.catalog.world_maps_for_terrain(swap));
            }
        }

        PhaseSet {
            phases: self.phases,
            terrain_swaps,
            world_map_area_swaps,
        }
    }
}

/// Rebuild an entity's phases from its area, zone and auras.
/// Returns true when anything changed.
pub fn refresh_phases(
    entity: &mut Entity,
    catalog: &PhaseCatalog,
    conditions: &dyn ConditionEvaluator,
) -> bool {
    let mut builder = PhaseBuilder {
        entity,
        catalog,
        conditions,
        phases: entity.phases().phases.clone(),
    };

    let area = entity.area_id();
    for (&area_id, infos) in &catalog.area_phases {
        if catalog.is_in_area(area, area_id) {
            continue;
        }
        for info in infos {
            builder.apply(info.id, false);
        }
    }

    for scope in [entity.zone_id(), area] {
        for info in catalog.phases_for_area(scope) {
            let apply = conditions.meets_all(entity, &info.conditions);
            builder.apply(info.id, apply);
        }
    }

    if let Some(unit) = entity.unit() {
        for &phase in &unit.auras.phases {
            builder.apply(phase, true);
        }
        for &group in &unit.auras.phase_groups {
            for &phase in catalog.phases_for_group(group) {
                builder.apply(phase, true);
            }
        }
    }

    let rebuilt = builder.finish();
    let changed = rebuilt != *entity.phases();
    if changed {
        debug!(
            "Entity {} phases now {:?} (terrain {:?})",
            entity.guid(),
            rebuilt.phases,
            rebuilt.terrain_swaps
        );
        entity.core.phases = rebuilt;
    }
    changed
}

/// Add or remove a single phase (e.g. when a phase aura is applied or
/// removed) and rebuild the derived swaps. Returns true when it changed.
pub fn set_in_phase(
    entity: &mut Entity,
    phase: u32,
    apply: bool,
    catalog: &PhaseCatalog,
    conditions: &dyn ConditionEvaluator,
) -> bool {
    let mut builder = PhaseBuilder {
        entity,
        catalog,
        conditions,
        phases: entity.phases().phases.clone(),
    };
    builder.apply(phase, apply);
    if builder.phases == entity.phases().phases {
        return false;
    }
    let rebuilt = builder.finish();
    entity.core.phases = rebuilt;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::{Entity, EntityData, PlayerData, UnitData};
    use crate::game::guid::{HighGuid, ObjectGuid};

    struct PassOnly(Vec<u32>);

    impl ConditionEvaluator for PassOnly {
        fn meets(&self, _entity: &Entity, condition: u32) -> bool {
            self.0.contains(&condition)
        }
    }

    fn catalog() -> PhaseCatalog {
        PhaseCatalog::from_json_str(
            r#"{
                "area_phases": {
                    "10": [{ "id": 500 }, { "id": 501, "conditions": [7] }],
                    "20": [{ "id": 600 }]
                },
                "phase_terrain_swaps": { "500": [{ "id": 900 }] },
                "default_terrain_swaps": { "1": [{ "id": 950, "conditions": [7] }] },
                "terrain_world_maps": { "900": [33] },
                "phase_groups": { "4": [700, 701] },
                "map_parents": { "900": 1 },
                "area_parents": { "11": 10 }
            }"#,
        )
        .expect("catalog parses")
    }

    fn player_in(zone: u32, area: u32) -> Entity {
        let mut entity = Entity::create(
            ObjectGuid::player(1),
            EntityData::Player(Box::new(PlayerData::default())),
        );
        entity.core.map_id = 1;
        entity.core.zone_id = zone;
        entity.core.area_id = area;
        entity
    }

    #[test]
    fn test_fallback_phase() {
        let empty = PhaseSet::default();
        let fallback = PhaseSet::with_phases([DEFAULT_PHASE]);
        let other = PhaseSet::with_phases([5]);
        assert!(empty.in_phase(&empty));
        assert!(empty.in_phase(&fallback));
        assert!(fallback.in_phase(&empty));
        assert!(!empty.in_phase(&other));
        assert!(!other.in_phase(&PhaseSet::with_phases([6])));
        assert!(other.in_phase(&PhaseSet::with_phases([5, 6])));
    }

    #[test]
    fn test_area_phases_and_swaps() {
        let catalog = catalog();
        let mut player = player_in(10, 11);
        assert!(refresh_phases(&mut player, &catalog, &PassOnly(vec![])));
        assert_eq!(player.phases().phases().iter().copied().collect::<Vec<_>>(), vec![500]);
        assert!(player.phases().terrain_swaps().contains(&900));
        assert!(player.phases().world_map_area_swaps().contains(&33));

        // second refresh is stable
        assert!(!refresh_phases(&mut player, &catalog, &PassOnly(vec![])));

        // conditions now pass: conditional area phase and default swap appear
        assert!(refresh_phases(&mut player, &catalog, &PassOnly(vec![7])));
        assert!(player.phases().has_phase(501));
        assert!(player.phases().terrain_swaps().contains(&950));
    }

    #[test]
    fn test_leaving_area_drops_its_phases() {
        let catalog = catalog();
        let mut player = player_in(10, 10);
        refresh_phases(&mut player, &catalog, &AllConditionsMet);
        assert!(player.phases().has_phase(500));

        player.core.zone_id = 20;
        player.core.area_id = 20;
        assert!(refresh_phases(&mut player, &catalog, &AllConditionsMet));
        assert!(!player.phases().has_phase(500));
        assert!(!player.phases().has_phase(501));
        assert!(player.phases().has_phase(600));
        assert!(!player.phases().terrain_swaps().contains(&900));
        assert!(player.phases().terrain_swaps().contains(&950));
    }

    #[test]
    fn test_aura_phases() {
        let catalog = catalog();
        let mut unit = UnitData::default();
        unit.auras.phases.push(42);
        unit.auras.phase_groups.push(4);
        let mut creature = Entity::create(
            ObjectGuid::new(HighGuid::Unit, 1, 1),
            EntityData::Unit(Box::new(unit)),
        );
        creature.core.map_id = 1;
        assert!(refresh_phases(&mut creature, &catalog, &AllConditionsMet));
        let phases: Vec<u32> = creature.phases().phases().iter().copied().collect();
        assert_eq!(phases, vec![42, 700, 701]);
        // creatures carry no world map swaps
        assert!(creature.phases().world_map_area_swaps().is_empty());
    }

    #[test]
    fn test_set_in_phase_respects_area() {
        let catalog = catalog();
        let mut player = player_in(10, 10);
        refresh_phases(&mut player, &catalog, &AllConditionsMet);
        // the current area grants 500, removal is refused
        assert!(!set_in_phase(&mut player, 500, false, &catalog, &AllConditionsMet));
        assert!(set_in_phase(&mut player, 77, true, &catalog, &AllConditionsMet));
        assert!(set_in_phase(&mut player, 77, false, &catalog, &AllConditionsMet));
    }

    #[test]
    fn test_is_in_area_chain() {
        let catalog = catalog();
        assert!(catalog.is_in_area(11, 10));
        assert!(catalog.is_in_area(10, 10));
        assert!(!catalog.is_in_area(10, 11));
    }

    #[test]
    fn test_bad_catalog() {
        assert!(matches!(
            PhaseCatalog::from_json_str("{ not json"),
            Err(CatalogError::Parse(_))
        ));
    }
}
