//! The tile map with occupancy and sensory fields
//!
//! The map owns tile state, the smell field and the sound field. Actors are
//! positioned on it by coordinate only; the `occupied` flag is the one link
//! between the two and is only changed through `set_occupied`/`relocate`.

use serde::{Deserialize, Serialize};

use crate::core::types::Position;
use crate::spatial::grid::Grid;
use crate::spatial::scent::ScentSettings;
use crate::spatial::sound::SoundState;
use crate::spatial::tile::{Tile, TileType};

/// A named exit to another map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    pub position: Position,
    pub destination_map: String,
    pub destination: Position,
}

/// Two teleport tiles linked to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeleportLink {
    pub a: Position,
    pub b: Position,
}

/// Fixed-size tile grid plus smell and sound fields
#[derive(Debug, Clone)]
pub struct Map {
    pub name: String,
    pub(super) tiles: Grid<Tile>,
    pub(super) smell: Grid<u8>,
    pub(super) sound: Grid<SoundState>,
    pub(super) scent: ScentSettings,
    exits: Vec<Exit>,
    teleports: Vec<TeleportLink>,
}

impl Map {
    /// Create a map filled with walls
    pub fn new(name: impl Into<String>, width: usize, height: usize) -> Self {
        Self {
            name: name.into(),
            tiles: Grid::new(width, height),
            smell: Grid::new(width, height),
            sound: Grid::new(width, height),
            scent: ScentSettings::default(),
            exits: Vec::new(),
            teleports: Vec::new(),
        }
    }

    /// Build a map from rows of tile symbols
    ///
    /// Width is the longest row; shorter rows are padded with `Void`.
    pub fn from_rows(name: impl Into<String>, rows: &[&str]) -> Self {
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut map = Self::new(name, width, rows.len());

        for (y, row) in rows.iter().enumerate() {
            let mut symbols = row.chars();
            for x in 0..width {
                let tile_type = symbols.next().map(TileType::from_symbol).unwrap_or(TileType::Void);
                map.set_tile_type(Position::new(x as i32, y as i32), tile_type);
            }
        }

        map
    }

    pub fn width(&self) -> usize {
        self.tiles.width
    }

    pub fn height(&self) -> usize {
        self.tiles.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        self.tiles.in_bounds(pos)
    }

    /// Read-only tile access for renderers
    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        self.tiles.get(pos)
    }

    pub fn tile_type(&self, pos: Position) -> Option<TileType> {
        self.tiles.get(pos).map(|t| t.tile_type)
    }

    pub fn set_tile_type(&mut self, pos: Position, tile_type: TileType) {
        if let Some(tile) = self.tiles.get_mut(pos) {
            tile.tile_type = tile_type;
        }
        if tile_type.is_wall() {
            self.smell.set(pos, 0);
        }
    }

    pub fn is_wall(&self, pos: Position) -> bool {
        self.tile_type(pos).is_some_and(|t| t.is_wall())
    }

    /// False off the map and for tiles that are not floor-like
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.tile_type(pos).is_some_and(|t| t.is_walkable())
    }

    // === OCCUPANCY ===

    /// Out-of-bounds positions count as occupied
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.tiles.get(pos).map_or(true, |t| t.occupied)
    }

    pub fn set_occupied(&mut self, pos: Position, occupied: bool) {
        if let Some(tile) = self.tiles.get_mut(pos) {
            tile.occupied = occupied;
        }
    }

    /// Walkable and nobody standing there
    pub fn is_free(&self, pos: Position) -> bool {
        self.is_walkable(pos) && !self.is_occupied(pos)
    }

    /// Move an occupancy claim from one tile to another in a single call
    pub fn relocate(&mut self, from: Position, to: Position) {
        self.set_occupied(from, false);
        self.set_occupied(to, true);
    }

    /// Every tile currently claimed by an actor
    pub fn occupied_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.tiles
            .positions()
            .filter(move |pos| self.tiles.get(*pos).is_some_and(|t| t.occupied))
    }

    // === SENSORY FIELDS ===

    pub fn smell_at(&self, pos: Position) -> u8 {
        self.smell.get(pos).copied().unwrap_or(0)
    }

    /// Set a smell value directly; walls never hold smell
    pub fn set_smell(&mut self, pos: Position, value: u8) {
        if !self.is_wall(pos) {
            self.smell.set(pos, value);
        }
    }

    pub fn is_smelly(&self, pos: Position) -> bool {
        self.smell_at(pos) > 0
    }

    pub fn sound_at(&self, pos: Position) -> SoundState {
        self.sound.get(pos).copied().unwrap_or_default()
    }

    pub fn scent_settings(&self) -> ScentSettings {
        self.scent
    }

    pub fn set_scent_settings(&mut self, settings: ScentSettings) {
        self.scent = settings;
    }

    // === STATIC METADATA ===

    pub fn exits(&self) -> &[Exit] {
        &self.exits
    }

    pub fn add_exit(&mut self, exit: Exit) {
        self.exits.push(exit);
    }

    pub fn exit_at(&self, pos: Position) -> Option<&Exit> {
        self.exits.iter().find(|exit| exit.position == pos)
    }

    pub fn teleports(&self) -> &[TeleportLink] {
        &self.teleports
    }

    pub fn add_teleport(&mut self, link: TeleportLink) {
        self.teleports.push(link);
    }

    /// The other end of a teleport pair standing at `pos`
    pub fn teleport_partner(&self, pos: Position) -> Option<Position> {
        self.teleports.iter().find_map(|link| {
            if link.a == pos {
                Some(link.b)
            } else if link.b == pos {
                Some(link.a)
            } else {
                None
            }
        })
    }

    /// Walkable tiles in row-major order
    pub fn walkable_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.tiles.positions().filter(move |pos| self.is_walkable(*pos))
    }
}
