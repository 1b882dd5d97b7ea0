//! Procedural dungeon generation (drunken walk)

use rand::seq::IteratorRandom;
use rand::Rng;

use crate::core::types::{Direction, Position};
use crate::spatial::map::Map;
use crate::spatial::tile::TileType;

/// Share of interior cells carved into floor
const FLOOR_COVERAGE_PERCENT: usize = 40;

/// Iteration budget as a multiple of the floor target
const MAX_ITERATIONS_FACTOR: usize = 10;

/// Carve a connected cave out of solid rock
///
/// A single walker starts at the centre and stumbles in random orthogonal
/// directions, clamped inside a one-tile wall border. One walk always gives
/// a connected floor region.
pub fn generate_dungeon<R: Rng>(name: &str, width: usize, height: usize, rng: &mut R) -> Map {
    let mut map = Map::new(name, width, height);
    if width < 3 || height < 3 {
        return map;
    }

    let interior = (width - 2) * (height - 2);
    let target_floors = interior * FLOOR_COVERAGE_PERCENT / 100;
    let max_iterations = target_floors * MAX_ITERATIONS_FACTOR;

    let mut cursor = Position::new(width as i32 / 2, height as i32 / 2);
    let mut floors = 0;
    let mut iterations = 0;

    while floors < target_floors && iterations < max_iterations {
        if map.tile_type(cursor) == Some(TileType::Wall) {
            map.set_tile_type(cursor, TileType::Floor);
            floors += 1;
        }

        let direction = Direction::CARDINALS[rng.gen_range(0..4)];
        let next = cursor + direction;
        cursor = Position::new(
            next.x.clamp(1, width as i32 - 2),
            next.y.clamp(1, height as i32 - 2),
        );
        iterations += 1;
    }

    tracing::debug!(width, height, floors, iterations, "Generated dungeon");
    map
}

/// A random walkable, unoccupied tile
pub fn random_free_tile<R: Rng>(map: &Map, rng: &mut R) -> Option<Position> {
    map.walkable_positions()
        .filter(|pos| !map.is_occupied(*pos))
        .choose(rng)
}
