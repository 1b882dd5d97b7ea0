//! Tile types and their properties

use serde::{Deserialize, Serialize};

/// Terrain of a single map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TileType {
    #[default]
    Wall,
    Floor,
    Water,
    Bridge,
    Door,
    Void,
    Zone,
    StairsUp,
    StairsDown,
    Teleport,
}

impl TileType {
    /// Floor-like tiles an actor can stand on
    pub fn is_walkable(&self) -> bool {
        matches!(
            self,
            TileType::Floor
                | TileType::Bridge
                | TileType::Door
                | TileType::Zone
                | TileType::StairsUp
                | TileType::StairsDown
                | TileType::Teleport
        )
    }

    /// Walls stop sight rays, hold no smell and muffle sound
    pub fn is_wall(&self) -> bool {
        matches!(self, TileType::Wall)
    }

    /// Parse a map file symbol; unknown symbols become `Void`
    pub fn from_symbol(symbol: char) -> Self {
        match symbol {
            '#' => TileType::Wall,
            '.' => TileType::Floor,
            '~' => TileType::Water,
            '=' => TileType::Bridge,
            '+' => TileType::Door,
            'z' => TileType::Zone,
            '<' => TileType::StairsUp,
            '>' => TileType::StairsDown,
            '*' => TileType::Teleport,
            _ => TileType::Void,
        }
    }

    /// Map file symbol for this tile type
    pub fn symbol(&self) -> char {
        match self {
            TileType::Wall => '#',
            TileType::Floor => '.',
            TileType::Water => '~',
            TileType::Bridge => '=',
            TileType::Door => '+',
            TileType::Void => ' ',
            TileType::Zone => 'z',
            TileType::StairsUp => '<',
            TileType::StairsDown => '>',
            TileType::Teleport => '*',
        }
    }
}

/// A single cell of the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
    pub tile_type: TileType,
    /// Inside the current field of view; rebuilt on every FOV pass
    pub visible: bool,
    /// Seen at least once; never reset
    pub explored: bool,
    /// Some actor stands here (which one is not recorded)
    pub occupied: bool,
}

impl Tile {
    pub fn new(tile_type: TileType) -> Self {
        Self {
            tile_type,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walkability() {
        assert!(TileType::Floor.is_walkable());
        assert!(TileType::Bridge.is_walkable());
        assert!(TileType::Teleport.is_walkable());
        assert!(!TileType::Wall.is_walkable());
        assert!(!TileType::Water.is_walkable());
        assert!(!TileType::Void.is_walkable());
    }

    #[test]
    fn test_symbols_survive_parse() {
        for symbol in ['#', '.', '~', '=', '+', ' ', 'z', '<', '>', '*'] {
            assert_eq!(TileType::from_symbol(symbol).symbol(), symbol);
        }
    }

    #[test]
    fn test_unknown_symbol_is_void() {
        assert_eq!(TileType::from_symbol('?'), TileType::Void);
    }
}
