//! Field of view by perimeter ray casting
//!
//! Rays run from the centre of the origin tile to every tile on the square
//! perimeter at Chebyshev distance `radius`; it may leak a little around
//! single-tile corners. The origin is always visible, and a ray marks the
//! first wall it enters and nothing behind it.

use crate::core::types::Position;
use crate::spatial::map::Map;

/// Samples taken per tile of ray length
const RAY_STEPS_PER_TILE: f32 = 3.0;

impl Map {
    /// Recompute `visible` from `origin`; marks everything seen as `explored`
    pub fn compute_fov(&mut self, origin: Position, radius: u32) {
        self.tiles.for_each_mut(|tile| tile.visible = false);
        self.reveal(origin);

        if radius == 0 {
            return;
        }

        let r = radius as i32;
        for i in -r..=r {
            self.cast_ray(origin, origin.offset(i, -r));
            self.cast_ray(origin, origin.offset(i, r));
            self.cast_ray(origin, origin.offset(-r, i));
            self.cast_ray(origin, origin.offset(r, i));
        }
    }

    fn cast_ray(&mut self, origin: Position, target: Position) {
        let dx = (target.x - origin.x) as f32;
        let dy = (target.y - origin.y) as f32;
        let length = dx.abs().max(dy.abs());
        let steps = (length * RAY_STEPS_PER_TILE).ceil() as u32;
        if steps == 0 {
            return;
        }

        let step_x = dx / steps as f32;
        let step_y = dy / steps as f32;
        let mut fx = origin.x as f32 + 0.5;
        let mut fy = origin.y as f32 + 0.5;
        let mut last = origin;

        for _ in 0..steps {
            fx += step_x;
            fy += step_y;
            let pos = Position::new(fx.floor() as i32, fy.floor() as i32);
            if pos == last {
                continue;
            }
            last = pos;

            // Ray left the map
            let Some(tile_type) = self.tile_type(pos) else {
                break;
            };
            self.reveal(pos);
            if tile_type.is_wall() {
                break;
            }
        }
    }

    fn reveal(&mut self, pos: Position) {
        if let Some(tile) = self.tiles.get_mut(pos) {
            tile.visible = true;
            tile.explored = true;
        }
    }

    /// Number of currently visible tiles
    pub fn visible_count(&self) -> usize {
        self.tiles.values().filter(|t| t.visible).count()
    }
}
