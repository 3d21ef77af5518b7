//! # Visibility Module
//!
//! Field-of-view computation: a position is visible when it lies within the
//! sight radius and a straight ray from the observer reaches it before any
//! sight-blocking tile. Walls are lit — the ray may terminate *on* a blocker
//! and still count it as seen.
//!
//! The same test serves two masters: the renderer's visible set (computed
//! from the player) and monster awareness (computed from each monster's own
//! position, never by reusing the player's set).

use crate::game::world::Map;
use crate::game::Position;
use std::collections::HashSet;

/// Computes the set of positions visible from `origin` within `radius`.
///
/// Deterministic for a given map and origin. The origin itself is always
/// included.
pub fn compute_visible(map: &Map, origin: Position, radius: i32) -> HashSet<Position> {
    let mut visible = HashSet::new();
    visible.insert(origin);

    for y in (origin.y - radius)..=(origin.y + radius) {
        for x in (origin.x - radius)..=(origin.x + radius) {
            let pos = Position::new(x, y);
            if !map.in_bounds(pos) || !within_radius(origin, pos, radius) {
                continue;
            }
            if line_clear(map, origin, pos) {
                visible.insert(pos);
            }
        }
    }

    visible
}

/// Whether an observer at `from` can see `to` within `radius`.
pub fn can_see(map: &Map, from: Position, to: Position, radius: i32) -> bool {
    within_radius(from, to, radius) && line_clear(map, from, to)
}

fn within_radius(origin: Position, pos: Position, radius: i32) -> bool {
    let dx = pos.x - origin.x;
    let dy = pos.y - origin.y;
    dx * dx + dy * dy <= radius * radius
}

/// Walks the Bresenham line from `from` to `to` and reports whether every
/// intermediate tile is transparent. Endpoints are never tested, so a wall
/// at `to` is reachable by sight.
fn line_clear(map: &Map, from: Position, to: Position) -> bool {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let mut x = from.x;
    let mut y = from.y;

    loop {
        if x == to.x && y == to.y {
            return true;
        }
        if (x != from.x || y != from.y) && map.blocks_sight(Position::new(x, y)) {
            return false;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_map(width: i32, height: i32) -> Map {
        let mut map = Map::new(width, height);
        for y in 0..height {
            for x in 0..width {
                map.carve(Position::new(x, y));
            }
        }
        map
    }

    #[test]
    fn test_open_floor_is_fully_visible_in_radius() {
        let map = open_map(21, 21);
        let origin = Position::new(10, 10);
        let visible = compute_visible(&map, origin, 5);

        assert!(visible.contains(&origin));
        assert!(visible.contains(&Position::new(15, 10)));
        assert!(visible.contains(&Position::new(13, 14)));
        // Corner of the bounding square is outside the circular radius.
        assert!(!visible.contains(&Position::new(15, 15)));
    }

    #[test]
    fn test_blocker_occludes_tiles_behind_it() {
        let mut map = open_map(21, 21);
        let origin = Position::new(10, 10);
        map.tile_mut(Position::new(13, 10)).unwrap().blocks_sight = true;

        let visible = compute_visible(&map, origin, 8);

        // The blocker itself is lit, the tiles behind it are not.
        assert!(visible.contains(&Position::new(13, 10)));
        assert!(!visible.contains(&Position::new(14, 10)));
        assert!(!visible.contains(&Position::new(16, 10)));
    }

    #[test]
    fn test_can_see_is_computed_from_the_observer() {
        let mut map = open_map(21, 21);
        map.tile_mut(Position::new(5, 5)).unwrap().blocks_sight = true;

        let a = Position::new(3, 5);
        let b = Position::new(8, 5);
        assert!(!can_see(&map, a, b, 10));
        assert!(can_see(&map, a, Position::new(5, 5), 10));
    }

    #[test]
    fn test_radius_limits_sight() {
        let map = open_map(40, 5);
        let origin = Position::new(2, 2);
        assert!(can_see(&map, origin, Position::new(12, 2), 10));
        assert!(!can_see(&map, origin, Position::new(13, 2), 10));
    }

    #[test]
    fn test_determinism() {
        let mut map = open_map(21, 21);
        map.tile_mut(Position::new(12, 9)).unwrap().blocks_sight = true;
        map.tile_mut(Position::new(7, 13)).unwrap().blocks_sight = true;

        let origin = Position::new(10, 10);
        let first = compute_visible(&map, origin, 10);
        let second = compute_visible(&map, origin, 10);
        assert_eq!(first, second);
    }
}
