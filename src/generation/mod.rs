//! # Generation Module
//!
//! Procedural dungeon generation: room placement with overlap rejection,
//! L-shaped corridors, and depth-scaled population tables.

pub mod dungeon;
pub mod spawn;

use crate::game::world::Map;
use crate::game::{Entity, EntityId, Position};
use crate::{config, BarrowResult};
use rand::rngs::StdRng;

/// An axis-aligned room footprint, used only while generating.
///
/// # Examples
///
/// ```
/// use barrow::Rect;
///
/// let a = Rect::new(0, 0, 10, 10);
/// let b = Rect::new(5, 5, 10, 10);
/// let c = Rect::new(11, 11, 4, 4);
/// assert!(a.intersects(&b));
/// assert!(!a.intersects(&c));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    /// Creates a rectangle from a top-left corner and a size.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    /// The center point of the rectangle.
    pub fn center(&self) -> Position {
        Position::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// Whether this rectangle overlaps another, shared edges included.
    ///
    /// Edge contact counts as an overlap so adjacent rooms never merge into
    /// one open cavity.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }
}

/// Tunable knobs for the dungeon generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationConfig {
    pub map_width: i32,
    pub map_height: i32,
    pub max_rooms: u32,
    pub room_min_size: i32,
    pub room_max_size: i32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            map_width: config::MAP_WIDTH,
            map_height: config::MAP_HEIGHT,
            max_rooms: config::MAX_ROOMS,
            room_min_size: config::ROOM_MIN_SIZE,
            room_max_size: config::ROOM_MAX_SIZE,
        }
    }
}

/// Everything a generator hands back for one level.
#[derive(Debug, Clone)]
pub struct GeneratedLevel {
    pub map: Map,
    /// Monsters, items, and the stairs marker; the player is never included.
    pub entities: Vec<Entity>,
    /// Accepted room footprints in placement order.
    pub rooms: Vec<Rect>,
    /// Center of the first accepted room.
    pub player_start: Position,
    /// Id of the stairs entity within `entities`.
    pub stairs_id: EntityId,
}

/// Level generation seam: depth and an injected rng stream in, a populated
/// level out.
pub trait Generator {
    fn generate(&self, depth: u32, rng: &mut StdRng) -> BarrowResult<GeneratedLevel>;
}

/// Looks up a depth-scaled value: `table` pairs `(value, minimum_depth)` in
/// ascending depth order, and the deepest satisfied entry wins. Defaults to
/// zero above every entry.
pub fn depth_scaled(table: &[(u32, u32)], depth: u32) -> u32 {
    for &(value, minimum_depth) in table.iter().rev() {
        if depth >= minimum_depth {
            return value;
        }
    }
    0
}
