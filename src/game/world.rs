//! # World Module
//!
//! Tile and map representation. A map is a fixed-size grid of tiles owned
//! exclusively by the current session and replaced wholesale on descent.

use crate::game::Position;
use serde::{Deserialize, Serialize};

/// A single map tile.
///
/// `blocked` and `blocks_sight` are fixed once generation finishes;
/// `explored` flips to true the first time the tile enters a visible set
/// and never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub blocked: bool,
    pub blocks_sight: bool,
    pub explored: bool,
}

impl Tile {
    /// Creates a tile; a blocked tile also blocks sight by default.
    pub fn new(blocked: bool) -> Self {
        Self {
            blocked,
            blocks_sight: blocked,
            explored: false,
        }
    }

    /// A solid wall tile.
    pub fn wall() -> Self {
        Self::new(true)
    }

    /// A passable floor tile.
    pub fn floor() -> Self {
        Self::new(false)
    }
}

/// Fixed-size 2D grid of tiles, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Map {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
}

impl Map {
    /// Creates a map filled with wall tiles.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::wall(); (width * height) as usize],
        }
    }

    /// Whether the position lies inside the map bounds.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn index(&self, pos: Position) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    /// The tile at a position, or None when out of bounds.
    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        if self.in_bounds(pos) {
            Some(&self.tiles[self.index(pos)])
        } else {
            None
        }
    }

    /// Mutable access to the tile at a position.
    pub fn tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if self.in_bounds(pos) {
            let idx = self.index(pos);
            Some(&mut self.tiles[idx])
        } else {
            None
        }
    }

    /// Whether the terrain at a position blocks movement.
    ///
    /// Out-of-bounds positions count as blocked.
    pub fn blocks_movement(&self, pos: Position) -> bool {
        self.tile(pos).map(|t| t.blocked).unwrap_or(true)
    }

    /// Whether the terrain at a position blocks line of sight.
    pub fn blocks_sight(&self, pos: Position) -> bool {
        self.tile(pos).map(|t| t.blocks_sight).unwrap_or(true)
    }

    /// Carves a position into open floor, preserving its explored flag.
    pub fn carve(&mut self, pos: Position) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.blocked = false;
            tile.blocks_sight = false;
        }
    }
}
