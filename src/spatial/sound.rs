//! Sound field: how clearly a noise reaches each tile
//!
//! A search from the source over orthogonal steps counts the walls each
//! path enters. No wall: `Clear`. One wall: `Muffled`. A second wall stops
//! the path. Candidates are expanded least-obstructed first, then shortest,
//! so every tile keeps the clearest path that reaches it.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::core::types::Position;
use crate::spatial::grid::Grid;
use crate::spatial::map::Map;

/// Walls a sound can pass through
const MAX_WALLS_CROSSED: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SoundState {
    #[default]
    None,
    Clear,
    Muffled,
}

impl Map {
    /// Rebuild the sound field for a noise at `source`
    ///
    /// Paths stop expanding once they are `radius` steps long.
    pub fn update_sound(&mut self, source: Position, radius: u32) {
        self.sound.fill(SoundState::None);
        if !self.in_bounds(source) {
            return;
        }

        let mut settled: Grid<bool> = Grid::new(self.width(), self.height());
        // (walls crossed, path length, x, y)
        let mut frontier = BinaryHeap::new();
        frontier.push(Reverse((0u8, 0u32, source.x, source.y)));

        while let Some(Reverse((walls, length, x, y))) = frontier.pop() {
            let pos = Position::new(x, y);
            if settled.get(pos).copied().unwrap_or(true) {
                continue;
            }
            settled.set(pos, true);

            let state = if walls == 0 {
                SoundState::Clear
            } else {
                SoundState::Muffled
            };
            self.sound.set(pos, state);

            if length >= radius {
                continue;
            }

            for next in pos.cardinal_neighbors() {
                if settled.get(next).copied().unwrap_or(true) {
                    continue;
                }
                let crossed = walls + u8::from(self.is_wall(next));
                if crossed > MAX_WALLS_CROSSED {
                    continue;
                }
                frontier.push(Reverse((crossed, length + 1, next.x, next.y)));
            }
        }

        tracing::debug!(source = %source, radius, "Sound field updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states(map: &Map) -> Vec<SoundState> {
        (0..map.width() as i32)
            .map(|x| map.sound_at(Position::new(x, 0)))
            .collect()
    }

    #[test]
    fn test_one_wall_muffles_two_walls_silence() {
        let mut map = Map::from_rows("row", &["..#.##."]);
        map.update_sound(Position::new(0, 0), 20);

        assert_eq!(
            states(&map),
            vec![
                SoundState::Clear,
                SoundState::Clear,
                SoundState::Muffled,
                SoundState::Muffled,
                SoundState::None,
                SoundState::None,
                SoundState::None,
            ]
        );
    }

    #[test]
    fn test_radius_stops_expansion() {
        let mut map = Map::from_rows("row", &[".........."]);
        map.update_sound(Position::new(0, 0), 3);

        assert_eq!(map.sound_at(Position::new(3, 0)), SoundState::Clear);
        assert_eq!(map.sound_at(Position::new(4, 0)), SoundState::None);
    }

    #[test]
    fn test_prefers_clear_detour_over_wall() {
        let mut map = Map::from_rows("detour", &[".#.", "..."]);
        map.update_sound(Position::new(0, 0), 10);

        // Through the wall is shorter, around it is clear
        assert_eq!(map.sound_at(Position::new(1, 0)), SoundState::Muffled);
        assert_eq!(map.sound_at(Position::new(2, 0)), SoundState::Clear);
    }

    #[test]
    fn test_reset_between_updates() {
        let mut map = Map::from_rows("row", &[".........."]);
        map.update_sound(Position::new(0, 0), 2);
        map.update_sound(Position::new(9, 0), 2);

        assert_eq!(map.sound_at(Position::new(0, 0)), SoundState::None);
        assert_eq!(map.sound_at(Position::new(9, 0)), SoundState::Clear);
    }

    #[test]
    fn test_out_of_bounds_is_silent() {
        let map = Map::from_rows("row", &["..."]);
        assert_eq!(map.sound_at(Position::new(-1, 0)), SoundState::None);
    }
}
