//! # Dungeon Generator
//!
//! Room-and-corridor layout: a fixed budget of placement attempts, whole
//! candidates rejected on any overlap, and each accepted room linked to its
//! predecessor by an L-shaped corridor. Connectivity falls out of the
//! chain — every room reaches the first one through the rooms placed
//! between them.

use crate::game::world::Map;
use crate::game::{Entity, Position};
use crate::generation::{spawn, GeneratedLevel, GenerationConfig, Generator, Rect};
use crate::{BarrowError, BarrowResult};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

/// Primary level generator.
#[derive(Debug, Clone, Default)]
pub struct DungeonGenerator {
    pub config: GenerationConfig,
}

impl DungeonGenerator {
    /// Creates a generator with the standard map dimensions and room budget.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GenerationConfig) -> Self {
        Self { config }
    }
}

impl Generator for DungeonGenerator {
    fn generate(&self, depth: u32, rng: &mut StdRng) -> BarrowResult<GeneratedLevel> {
        let cfg = &self.config;
        let mut map = Map::new(cfg.map_width, cfg.map_height);
        let mut monsters: Vec<Entity> = Vec::new();
        let mut items: Vec<Entity> = Vec::new();
        let mut rooms: Vec<Rect> = Vec::new();

        for _ in 0..cfg.max_rooms {
            let width = rng.gen_range(cfg.room_min_size..=cfg.room_max_size);
            let height = rng.gen_range(cfg.room_min_size..=cfg.room_max_size);
            let x = rng.gen_range(0..=cfg.map_width - width - 1);
            let y = rng.gen_range(0..=cfg.map_height - height - 1);
            let room = Rect::new(x, y, width, height);

            // The whole attempt is discarded on overlap, not retried.
            if rooms.iter().any(|other| room.intersects(other)) {
                continue;
            }

            carve_room(&mut map, &room);
            populate_room(&map, &mut monsters, &mut items, &room, depth, rng);

            let center = room.center();
            if let Some(previous) = rooms.last() {
                // Link to the predecessor with an L-corridor; the bend order
                // is a coin flip.
                let prev_center = previous.center();
                if rng.gen_range(0..=1) == 1 {
                    carve_h_tunnel(&mut map, prev_center.x, center.x, prev_center.y);
                    carve_v_tunnel(&mut map, prev_center.y, center.y, center.x);
                } else {
                    carve_v_tunnel(&mut map, prev_center.y, center.y, prev_center.x);
                    carve_h_tunnel(&mut map, prev_center.x, center.x, center.y);
                }
            }
            rooms.push(room);
        }

        let Some(last_room) = rooms.last() else {
            return Err(BarrowError::GenerationFailed(
                "no rooms could be placed".to_string(),
            ));
        };
        debug!(
            "depth {}: {} rooms, {} monsters, {} items",
            depth,
            rooms.len(),
            monsters.len(),
            items.len()
        );

        let stairs = spawn::stairs(last_room.center());
        let stairs_id = stairs.id;
        let player_start = rooms[0].center();

        // Items first so actors and the stairs draw above them.
        let mut entities = items;
        entities.extend(monsters);
        entities.push(stairs);

        Ok(GeneratedLevel {
            map,
            entities,
            rooms,
            player_start,
            stairs_id,
        })
    }
}

/// Opens the room interior, leaving a one-tile wall on every side.
fn carve_room(map: &mut Map, room: &Rect) {
    for x in (room.x1 + 1)..room.x2 {
        for y in (room.y1 + 1)..room.y2 {
            map.carve(Position::new(x, y));
        }
    }
}

fn carve_h_tunnel(map: &mut Map, x1: i32, x2: i32, y: i32) {
    for x in x1.min(x2)..=x1.max(x2) {
        map.carve(Position::new(x, y));
    }
}

fn carve_v_tunnel(map: &mut Map, y1: i32, y2: i32, x: i32) {
    for y in y1.min(y2)..=y1.max(y2) {
        map.carve(Position::new(x, y));
    }
}

/// Rolls depth-scaled monster and item counts for a room and scatters them
/// on unoccupied interior tiles. A spot already holding a blocking entity or
/// blocked terrain forfeits that roll.
fn populate_room(
    map: &Map,
    monsters: &mut Vec<Entity>,
    items: &mut Vec<Entity>,
    room: &Rect,
    depth: u32,
    rng: &mut StdRng,
) {
    let monster_count = rng.gen_range(0..=spawn::monster_cap(depth));
    for _ in 0..monster_count {
        let pos = random_interior(room, rng);
        if !spawn_blocked(map, monsters, pos) {
            monsters.push(spawn::random_monster(depth, pos, rng));
        }
    }

    let item_count = rng.gen_range(0..=spawn::item_cap(depth));
    for _ in 0..item_count {
        let pos = random_interior(room, rng);
        if !spawn_blocked(map, monsters, pos) {
            items.push(spawn::random_item(depth, pos, rng));
        }
    }
}

fn random_interior(room: &Rect, rng: &mut StdRng) -> Position {
    let x = rng.gen_range(room.x1 + 1..=room.x2 - 1);
    let y = rng.gen_range(room.y1 + 1..=room.y2 - 1);
    Position::new(x, y)
}

fn spawn_blocked(map: &Map, placed: &[Entity], pos: Position) -> bool {
    map.blocks_movement(pos) || placed.iter().any(|e| e.blocks && e.pos == pos)
}
