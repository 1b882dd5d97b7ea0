//! Load static maps from the text map format
//!
//! ```text
//! % comment
//! meta:name=Crossroads
//! meta:width=12
//! meta:height=3
//! exit:11,1=forest:0,1
//! teleport:1,1=9,1
//! layer:terrain
//! ############
//! #*.......*..
//! ############
//! ```
//!
//! Header lines come first; everything after `layer:terrain` is the grid,
//! one row per line, truncated or padded with void to `width`.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::core::types::Position;
use crate::spatial::map::{Exit, Map, TeleportLink};
use crate::spatial::tile::TileType;

pub const DEFAULT_MAP_WIDTH: usize = 54;
pub const DEFAULT_MAP_HEIGHT: usize = 16;

/// Errors that can occur when loading a map
#[derive(Debug, Error)]
pub enum MapLoadError {
    /// No `layer:terrain` line was found
    #[error("Missing layer:terrain section")]
    MissingTerrainLayer,
    /// Width or height is not a positive number
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
    /// Exit line could not be parsed or points off the map
    #[error("Invalid exit: {0}")]
    InvalidExit(String),
    /// Teleport line could not be parsed or points off the map
    #[error("Invalid teleport: {0}")]
    InvalidTeleport(String),
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load a map from text
pub fn load_map_str(content: &str) -> Result<Map, MapLoadError> {
    let mut meta: HashMap<String, String> = HashMap::new();
    let mut exit_lines = Vec::new();
    let mut teleport_lines = Vec::new();
    let mut lines = content.lines();
    let mut found_terrain = false;

    for line in lines.by_ref() {
        if line.starts_with('%') {
            continue;
        }
        if line.starts_with("layer:terrain") {
            found_terrain = true;
            break;
        }
        if let Some(rest) = line.strip_prefix("meta:") {
            // Malformed meta lines are skipped
            if let Some((key, value)) = rest.split_once('=') {
                meta.insert(key.trim().to_string(), value.trim().to_string());
            }
        } else if let Some(rest) = line.strip_prefix("exit:") {
            exit_lines.push(rest.to_string());
        } else if let Some(rest) = line.strip_prefix("teleport:") {
            teleport_lines.push(rest.to_string());
        }
    }

    if !found_terrain {
        return Err(MapLoadError::MissingTerrainLayer);
    }

    let width = parse_dimension(&meta, "width", DEFAULT_MAP_WIDTH)?;
    let height = parse_dimension(&meta, "height", DEFAULT_MAP_HEIGHT)?;
    let name = meta.get("name").cloned().unwrap_or_else(|| "Untitled".to_string());

    let mut map = Map::new(name, width, height);
    let mut rows = lines;
    for y in 0..height {
        let mut symbols = rows.next().unwrap_or("").chars();
        for x in 0..width {
            let tile_type = symbols.next().map(TileType::from_symbol).unwrap_or(TileType::Void);
            map.set_tile_type(Position::new(x as i32, y as i32), tile_type);
        }
    }

    for line in &exit_lines {
        let exit = parse_exit(line).ok_or_else(|| MapLoadError::InvalidExit(line.clone()))?;
        if !map.in_bounds(exit.position) {
            return Err(MapLoadError::InvalidExit(line.clone()));
        }
        map.add_exit(exit);
    }

    for line in &teleport_lines {
        let link = parse_teleport(line).ok_or_else(|| MapLoadError::InvalidTeleport(line.clone()))?;
        if !map.in_bounds(link.a) || !map.in_bounds(link.b) {
            return Err(MapLoadError::InvalidTeleport(line.clone()));
        }
        map.add_teleport(link);
    }

    tracing::info!(
        name = %map.name,
        width,
        height,
        exits = map.exits().len(),
        teleports = map.teleports().len(),
        "Loaded map"
    );
    Ok(map)
}

/// Load a map file from disk
pub fn load_map_file(path: &Path) -> Result<Map, MapLoadError> {
    let content = std::fs::read_to_string(path)?;
    load_map_str(&content)
}

fn parse_dimension(
    meta: &HashMap<String, String>,
    key: &str,
    default: usize,
) -> Result<usize, MapLoadError> {
    match meta.get(key) {
        None => Ok(default),
        Some(raw) => match raw.parse::<usize>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(MapLoadError::InvalidDimension(format!("{}={}", key, raw))),
        },
    }
}

/// `x,y`
fn parse_position(text: &str) -> Option<Position> {
    let (x, y) = text.trim().split_once(',')?;
    Some(Position::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// `x,y=map_name:dx,dy`
fn parse_exit(text: &str) -> Option<Exit> {
    let (from, to) = text.split_once('=')?;
    let (destination_map, destination) = to.split_once(':')?;
    let destination_map = destination_map.trim();
    if destination_map.is_empty() {
        return None;
    }
    Some(Exit {
        position: parse_position(from)?,
        destination_map: destination_map.to_string(),
        destination: parse_position(destination)?,
    })
}

/// `x1,y1=x2,y2`
fn parse_teleport(text: &str) -> Option<TeleportLink> {
    let (a, b) = text.split_once('=')?;
    Some(TeleportLink {
        a: parse_position(a)?,
        b: parse_position(b)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CROSSROADS: &str = "\
% A short test map
meta:name=Crossroads
meta:width=12
meta:height=3
exit:11,1=forest:0,1
teleport:1,1=9,1
layer:terrain
############
#*.......*..
############
";

    #[test]
    fn test_load_metadata_and_grid() {
        let map = load_map_str(CROSSROADS).unwrap();
        assert_eq!(map.name, "Crossroads");
        assert_eq!(map.width(), 12);
        assert_eq!(map.height(), 3);
        assert_eq!(map.tile_type(Position::new(0, 0)), Some(TileType::Wall));
        assert_eq!(map.tile_type(Position::new(1, 1)), Some(TileType::Teleport));
        assert_eq!(map.tile_type(Position::new(5, 1)), Some(TileType::Floor));
    }

    #[test]
    fn test_load_exits_and_teleports() {
        let map = load_map_str(CROSSROADS).unwrap();
        let exit = map.exit_at(Position::new(11, 1)).unwrap();
        assert_eq!(exit.destination_map, "forest");
        assert_eq!(exit.destination, Position::new(0, 1));
        assert_eq!(map.teleport_partner(Position::new(1, 1)), Some(Position::new(9, 1)));
    }

    #[test]
    fn test_missing_terrain_layer() {
        let result = load_map_str("meta:width=3\nmeta:height=1\n...\n");
        assert!(matches!(result, Err(MapLoadError::MissingTerrainLayer)));
    }

    #[test]
    fn test_short_grid_padded_with_void() {
        let map = load_map_str("meta:width=4\nmeta:height=2\nlayer:terrain\n..\n").unwrap();
        assert_eq!(map.tile_type(Position::new(1, 0)), Some(TileType::Floor));
        assert_eq!(map.tile_type(Position::new(3, 0)), Some(TileType::Void));
        assert_eq!(map.tile_type(Position::new(0, 1)), Some(TileType::Void));
    }

    #[test]
    fn test_default_dimensions() {
        let map = load_map_str("layer:terrain\n").unwrap();
        assert_eq!(map.width(), DEFAULT_MAP_WIDTH);
        assert_eq!(map.height(), DEFAULT_MAP_HEIGHT);
    }

    #[test]
    fn test_bad_dimension_rejected() {
        let result = load_map_str("meta:width=wide\nlayer:terrain\n");
        assert!(matches!(result, Err(MapLoadError::InvalidDimension(_))));
    }

    #[test]
    fn test_exit_off_map_rejected() {
        let text = "meta:width=3\nmeta:height=1\nexit:5,0=elsewhere:0,0\nlayer:terrain\n...\n";
        assert!(matches!(load_map_str(text), Err(MapLoadError::InvalidExit(_))));
    }
}
