//! Static map descriptions: text maps and generated dungeons

pub mod generation;
pub mod loader;

pub use generation::{generate_dungeon, random_free_tile};
pub use loader::{load_map_file, load_map_str, MapLoadError};
