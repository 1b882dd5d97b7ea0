//! Smell field: a decaying, diffusing trail left by the player
//!
//! Updated only when the player moves, so the field reads as "how fresh is
//! the trail since the player's last step". Scent-tracking creatures follow
//! its gradient.

use serde::{Deserialize, Serialize};

use crate::core::types::Position;
use crate::spatial::map::Map;

/// Value written at the source tile
pub const SMELL_MAX: u8 = 255;

/// Decay and spread tuning for the smell field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScentSettings {
    /// Subtracted from every cell on each update
    pub decay: u8,
    /// Subtracted when smell spreads one tile
    pub diffusion_loss: u8,
}

impl Default for ScentSettings {
    fn default() -> Self {
        Self {
            decay: 4,
            diffusion_loss: 24,
        }
    }
}

impl Map {
    /// Lower every cell by the decay amount, stopping at zero
    pub fn decay_smell(&mut self) {
        let decay = self.scent.decay;
        self.smell.for_each_mut(|value| *value = value.saturating_sub(decay));
    }

    /// Decay, stamp the source at full strength, then spread one tile
    ///
    /// Spreading reads from a snapshot taken before decay, so the result
    /// does not depend on iteration order.
    pub fn update_smell(&mut self, source: Position) {
        let snapshot = self.smell.clone();

        self.decay_smell();
        if self.in_bounds(source) && !self.is_wall(source) {
            self.smell.set(source, SMELL_MAX);
        }

        let loss = self.scent.diffusion_loss;
        for pos in snapshot.positions() {
            if self.is_wall(pos) {
                continue;
            }

            let strongest = pos
                .cardinal_neighbors()
                .iter()
                .filter_map(|n| snapshot.get(*n).copied())
                .max()
                .unwrap_or(0);
            let spread = strongest.saturating_sub(loss);

            if let Some(value) = self.smell.get_mut(pos) {
                if spread > *value {
                    *value = spread;
                }
            }
        }

        tracing::debug!(source = %source, "Smell field updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_row() -> Map {
        Map::from_rows("row", &["........."])
    }

    #[test]
    fn test_source_reset_to_max() {
        let mut map = open_row();
        map.update_smell(Position::new(4, 0));
        assert_eq!(map.smell_at(Position::new(4, 0)), SMELL_MAX);

        map.update_smell(Position::new(4, 0));
        assert_eq!(map.smell_at(Position::new(4, 0)), SMELL_MAX);
    }

    #[test]
    fn test_spreads_from_previous_field() {
        let mut map = open_row();
        map.update_smell(Position::new(4, 0));
        // First pass spreads from an empty snapshot
        assert_eq!(map.smell_at(Position::new(3, 0)), 0);

        map.update_smell(Position::new(4, 0));
        let expected = SMELL_MAX - 24;
        assert_eq!(map.smell_at(Position::new(3, 0)), expected);
        assert_eq!(map.smell_at(Position::new(5, 0)), expected);
    }

    #[test]
    fn test_decay_reaches_zero_monotonically() {
        let mut map = open_row();
        map.update_smell(Position::new(4, 0));
        map.update_smell(Position::new(4, 0));

        let mut previous: Vec<u8> = map.smell.values().copied().collect();
        for _ in 0..100 {
            map.decay_smell();
            let current: Vec<u8> = map.smell.values().copied().collect();
            assert!(current.iter().zip(&previous).all(|(c, p)| c <= p));
            previous = current;
        }
        assert!(previous.iter().all(|v| *v == 0));
    }

    #[test]
    fn test_walls_block_and_hold_nothing() {
        let mut map = Map::from_rows("walled", &["..#.."]);
        for _ in 0..5 {
            map.update_smell(Position::new(0, 0));
        }

        assert!(map.is_smelly(Position::new(1, 0)));
        assert_eq!(map.smell_at(Position::new(2, 0)), 0);
        assert_eq!(map.smell_at(Position::new(3, 0)), 0);
    }

    #[test]
    fn test_wall_source_ignored() {
        let mut map = Map::from_rows("walled", &[".#."]);
        map.update_smell(Position::new(1, 0));
        assert_eq!(map.smell_at(Position::new(1, 0)), 0);
    }
}
