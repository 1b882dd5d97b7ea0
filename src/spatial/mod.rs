//! Spatial & sensory map engine
//!
//! Tile grid, occupancy, field of view, smell and sound fields. Queried by
//! the AI controller and the player handler; mutated only through the
//! occupancy and field entry points on `Map`.

pub mod fov;
pub mod grid;
pub mod map;
pub mod scent;
pub mod sound;
pub mod tile;

pub use grid::Grid;
pub use map::{Exit, Map, TeleportLink};
pub use scent::{ScentSettings, SMELL_MAX};
pub use sound::SoundState;
pub use tile::{Tile, TileType};
