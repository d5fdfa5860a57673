//! Spatial hash grid for interest queries
//!
//! Divides a map into square cells and buckets entity GUIDs by position.
//! Radius queries only walk the cells the radius can touch.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::game::entity::Entity;
use crate::game::guid::ObjectGuid;
use crate::game::map::{InterestProvider, Map};
use crate::util::position::Position;

/// Default cell size in yards; matches the default visibility distance
pub const GRID_CELL_SIZE: f32 = 90.0;

/// Initial capacity for grid cells (number of expected non-empty cells)
const GRID_INITIAL_CAPACITY: usize = 256;

/// Grid cell key - (x, y) cell coordinates
pub type CellKey = (i32, i32);

#[derive(Debug, Clone, Copy)]
struct GridEntry {
    guid: ObjectGuid,
    position: Position,
}

/// Interest grid rebuilt from a map snapshot each tick
#[derive(Debug, Clone)]
pub struct VisibilityGrid {
    inv_cell_size: f32,
    /// Query radius in yards
    radius: f32,
    cells: HashMap<CellKey, SmallVec<[GridEntry; 8]>>,
}

impl VisibilityGrid {
    pub fn new(cell_size: f32, radius: f32) -> Self {
        Self {
            inv_cell_size: 1.0 / cell_size.max(1.0),
            radius,
            cells: HashMap::with_capacity(GRID_INITIAL_CAPACITY),
        }
    }

    /// Grid holding every entity on `map`
    pub fn from_map(map: &Map, radius: f32) -> Self {
        let mut grid = Self::new(GRID_CELL_SIZE, radius);
        for entity in map.entities() {
            grid.insert(entity.guid(), *entity.position());
        }
        grid
    }

    #[inline]
    fn cell_of(&self, position: &Position) -> CellKey {
        (
            (position.x * self.inv_cell_size).floor() as i32,
            (position.y * self.inv_cell_size).floor() as i32,
        )
    }

    pub fn insert(&mut self, guid: ObjectGuid, position: Position) {
        let key = self.cell_of(&position);
        self.cells
            .entry(key)
            .or_default()
            .push(GridEntry { guid, position });
    }

    pub fn clear(&mut self) {
        for cell in self.cells.values_mut() {
            cell.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(|c| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// GUIDs within `radius` (2D) of `center`
    pub fn query_radius(&self, center: &Position, radius: f32) -> Vec<ObjectGuid> {
        let (cx, cy) = self.cell_of(center);
        let reach = (radius * self.inv_cell_size).ceil() as i32;
        let radius_sq = radius * radius;
        let mut found = Vec::new();

        for dx in -reach..=reach {
            for dy in -reach..=reach {
                let Some(cell) = self.cells.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for entry in cell {
                    let ddx = entry.position.x - center.x;
                    let ddy = entry.position.y - center.y;
                    if ddx * ddx + ddy * ddy <= radius_sq {
                        found.push(entry.guid);
                    }
                }
            }
        }
        found
    }
}

impl InterestProvider for VisibilityGrid {
    fn nearby(&self, _map: &Map, center: &Entity) -> Vec<ObjectGuid> {
        let guid = center.guid();
        let mut found = self.query_radius(center.position(), self.radius);
        found.retain(|g| *g != guid);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_radius() {
        let mut grid = VisibilityGrid::new(10.0, 50.0);
        grid.insert(ObjectGuid::player(1), Position::new(0.0, 0.0, 0.0, 0.0));
        grid.insert(ObjectGuid::player(2), Position::new(25.0, 0.0, 0.0, 0.0));
        grid.insert(ObjectGuid::player(3), Position::new(-60.0, 0.0, 0.0, 0.0));
        assert_eq!(grid.len(), 3);

        let mut near = grid.query_radius(&Position::new(0.0, 0.0, 0.0, 0.0), 30.0);
        near.sort();
        assert_eq!(near, vec![ObjectGuid::player(1), ObjectGuid::player(2)]);
    }

    #[test]
    fn test_negative_cells() {
        let mut grid = VisibilityGrid::new(10.0, 50.0);
        grid.insert(ObjectGuid::player(1), Position::new(-5.0, -5.0, 0.0, 0.0));
        let near = grid.query_radius(&Position::new(3.0, 3.0, 0.0, 0.0), 12.0);
        assert_eq!(near, vec![ObjectGuid::player(1)]);
    }

    #[test]
    fn test_clear() {
        let mut grid = VisibilityGrid::new(10.0, 50.0);
        grid.insert(ObjectGuid::player(1), Position::default());
        grid.clear();
        assert!(grid.is_empty());
    }
}
