//! # AI Module
//!
//! Per-entity decision procedure, run once per elapsed cooldown by the
//! scheduler. Behaviors are data ([`AiBehavior`]), not objects: a decision
//! reads the current variant, acts, and writes back whatever the entity
//! should be next turn.

use crate::config;
use crate::game::entities::AiBehavior;
use crate::game::state::Session;
use crate::game::{combat, visibility};
use crate::game::{Color, EntityId, Position};
use rand::rngs::StdRng;
use rand::Rng;

/// Executes one decision for an AI-capable entity.
pub fn take_turn(session: &mut Session, id: EntityId, rng: &mut StdRng) {
    let Some(behavior) = session.entity(id).and_then(|e| e.ai.clone()) else {
        return;
    };
    match behavior {
        AiBehavior::Basic => basic_turn(session, id),
        AiBehavior::Confused {
            previous,
            turns_remaining,
        } => confused_turn(session, id, previous, turns_remaining, rng),
    }
}

/// Chase-and-attack: close in while the player is in sight, swing when
/// adjacent.
///
/// Sight is evaluated from the monster's own position with the same test
/// the player's visible set uses, so awareness is symmetric by construction.
fn basic_turn(session: &mut Session, id: EntityId) {
    let Some(monster) = session.entity(id) else {
        return;
    };
    let Some(player) = session.player() else {
        return;
    };

    let monster_pos = monster.pos;
    let player_pos = player.pos;
    let distance = monster.distance_to(player);
    let player_alive = player.is_alive();
    let player_id = session.player_id;

    if !visibility::can_see(&session.map, monster_pos, player_pos, config::FOV_RADIUS) {
        return;
    }

    if distance >= 2.0 {
        move_towards(session, id, player_pos);
    } else if player_alive {
        combat::attack(session, id, player_id);
    }
}

/// Steps one tile toward the target: the vector to the target is normalized
/// and each component rounded to the grid, yielding one of the eight
/// directions. Blocking is left to the generic move check.
fn move_towards(session: &mut Session, id: EntityId, target: Position) {
    let Some(entity) = session.entity(id) else {
        return;
    };
    let dx = (target.x - entity.pos.x) as f64;
    let dy = (target.y - entity.pos.y) as f64;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance == 0.0 {
        return;
    }

    let step_x = (dx / distance).round() as i32;
    let step_y = (dy / distance).round() as i32;
    session.move_entity(id, step_x, step_y);
}

/// Random stumble while the counter runs, then restore the owned previous
/// behavior. The restoring decision does nothing else, so a monster confused
/// for N turns stumbles exactly N times.
fn confused_turn(
    session: &mut Session,
    id: EntityId,
    previous: Box<AiBehavior>,
    turns_remaining: u32,
    rng: &mut StdRng,
) {
    if turns_remaining > 0 {
        let dx = rng.gen_range(-1..=1);
        let dy = rng.gen_range(-1..=1);
        session.move_entity(id, dx, dy);
        if let Some(entity) = session.entity_mut(id) {
            entity.ai = Some(AiBehavior::Confused {
                previous,
                turns_remaining: turns_remaining - 1,
            });
        }
    } else {
        let name = session
            .entity(id)
            .map(|e| e.name.clone())
            .unwrap_or_default();
        if let Some(entity) = session.entity_mut(id) {
            entity.ai = Some(*previous);
        }
        session
            .messages
            .add(format!("The {} is no longer confused!", name), Color::RED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::test_support::{add_monster, arena_session};
    use crate::utils;

    #[test]
    fn test_basic_ai_closes_distance() {
        let mut session = arena_session();
        let monster_id = add_monster(&mut session, Position::new(2, 5));
        let mut rng = utils::create_rng(1);

        take_turn(&mut session, monster_id, &mut rng);
        let pos = session.entity(monster_id).unwrap().pos;
        assert_eq!(pos, Position::new(3, 5));
        assert_eq!(
            session.entity(monster_id).unwrap().wait,
            config::DEFAULT_SPEED
        );
    }

    #[test]
    fn test_basic_ai_attacks_when_adjacent() {
        let mut session = arena_session();
        let monster_id = add_monster(&mut session, Position::new(6, 5));
        let mut rng = utils::create_rng(1);

        let hp_before = session.player().unwrap().fighter.unwrap().hp;
        take_turn(&mut session, monster_id, &mut rng);
        let hp_after = session.player().unwrap().fighter.unwrap().hp;

        // Monster power 4 vs. player defense 1.
        assert_eq!(hp_before - hp_after, 3);
        assert_eq!(
            session.entity(monster_id).unwrap().pos,
            Position::new(6, 5),
            "adjacent monster attacks instead of moving"
        );
    }

    #[test]
    fn test_basic_ai_ignores_unseen_player() {
        let mut session = arena_session();
        let monster_id = add_monster(&mut session, Position::new(2, 5));
        // Wall off the corridor between monster and player.
        for y in 1..11 {
            session
                .map
                .tile_mut(Position::new(4, y))
                .unwrap()
                .blocks_sight = true;
        }
        let mut rng = utils::create_rng(1);

        take_turn(&mut session, monster_id, &mut rng);
        assert_eq!(session.entity(monster_id).unwrap().pos, Position::new(2, 5));
    }

    #[test]
    fn test_move_towards_diagonal_rounding() {
        let mut session = arena_session();
        let monster_id = add_monster(&mut session, Position::new(2, 2));

        move_towards(&mut session, monster_id, Position::new(5, 5));
        assert_eq!(session.entity(monster_id).unwrap().pos, Position::new(3, 3));
    }

    #[test]
    fn test_confusion_counts_down_then_reverts() {
        let mut session = arena_session();
        let monster_id = add_monster(&mut session, Position::new(2, 2));
        session.entity_mut(monster_id).unwrap().ai = Some(AiBehavior::Confused {
            previous: Box::new(AiBehavior::Basic),
            turns_remaining: 10,
        });
        let mut rng = utils::create_rng(99);

        // Exactly ten stumbling decisions.
        for turn in 0..10 {
            take_turn(&mut session, monster_id, &mut rng);
            match &session.entity(monster_id).unwrap().ai {
                Some(AiBehavior::Confused { turns_remaining, .. }) => {
                    assert_eq!(*turns_remaining, 10 - turn - 1)
                }
                _ => panic!("reverted too early on decision {}", turn),
            }
        }

        // The eleventh decision restores the stored behavior.
        take_turn(&mut session, monster_id, &mut rng);
        assert_eq!(
            session.entity(monster_id).unwrap().ai,
            Some(AiBehavior::Basic)
        );
        let last = session.messages.lines().last().unwrap();
        assert!(last.0.contains("no longer confused"));
    }

    #[test]
    fn test_confused_stumble_spends_cooldown() {
        let mut session = arena_session();
        let monster_id = add_monster(&mut session, Position::new(2, 2));
        session.entity_mut(monster_id).unwrap().ai = Some(AiBehavior::Confused {
            previous: Box::new(AiBehavior::Basic),
            turns_remaining: 3,
        });
        let mut rng = utils::create_rng(5);

        take_turn(&mut session, monster_id, &mut rng);
        assert_eq!(
            session.entity(monster_id).unwrap().wait,
            config::DEFAULT_SPEED
        );
    }
}
