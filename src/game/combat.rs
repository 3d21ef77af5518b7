//! # Combat Module
//!
//! Damage application and death resolution. The formula is deliberately
//! blunt: `power - defense`, where a non-positive result is a reported
//! no-effect attack. Item effects bypass the formula and call
//! [`apply_damage`] directly.

use crate::game::entities::DeathKind;
use crate::game::state::{RunState, Session};
use crate::game::{Color, EntityId};
use crate::utils;
use log::info;

/// Resolves one melee attack between two fighters.
///
/// Sets the attacker's cooldown to its attack cadence whether or not the
/// blow lands.
pub fn attack(session: &mut Session, attacker_id: EntityId, defender_id: EntityId) {
    let Some(attacker) = session.entity(attacker_id) else {
        return;
    };
    let Some(defender) = session.entity(defender_id) else {
        return;
    };
    let (Some(attacker_fighter), Some(defender_fighter)) =
        (attacker.fighter.as_ref(), defender.fighter.as_ref())
    else {
        return;
    };

    let damage = attacker_fighter.power - defender_fighter.defense;
    let cooldown = attacker_fighter.attack_cooldown;
    let attacker_name = utils::capitalize(&attacker.name);
    let defender_name = defender.name.clone();

    if let Some(entity) = session.entity_mut(attacker_id) {
        entity.wait = cooldown;
    }

    if damage > 0 {
        session.messages.add(
            format!(
                "{} attacks {} for {} hit points.",
                attacker_name, defender_name, damage
            ),
            Color::WHITE,
        );
        apply_damage(session, defender_id, damage);
    } else {
        session.messages.add(
            format!(
                "{} attacks {} but it has no effect!",
                attacker_name, defender_name
            ),
            Color::WHITE,
        );
    }
}

/// Subtracts hit points from a fighter, resolving death when they run out.
///
/// This is the defense-bypassing entry used by lightning and fireball; a
/// non-positive amount changes nothing. Entities without a fighter (corpses
/// included) ignore the call, which is what makes death effects one-shot.
pub fn apply_damage(session: &mut Session, target_id: EntityId, amount: i32) {
    let mut died = false;
    if let Some(fighter) = session
        .entity_mut(target_id)
        .and_then(|e| e.fighter.as_mut())
    {
        if amount > 0 {
            fighter.hp -= amount;
        }
        died = fighter.hp <= 0;
    }
    if died {
        resolve_death(session, target_id);
    }
}

/// Invokes the dying entity's death handler exactly once.
fn resolve_death(session: &mut Session, target_id: EntityId) {
    let Some(kind) = session
        .entity(target_id)
        .and_then(|e| e.fighter.as_ref())
        .map(|f| f.on_death)
    else {
        return;
    };

    match kind {
        DeathKind::Player => {
            session.messages.add("You died!", Color::RED);
            session.run_state = RunState::Dead;
            if let Some(entity) = session.entity_mut(target_id) {
                entity.glyph = '%';
                entity.color = Color::DARK_RED;
            }
            info!("player died at depth {}", session.depth);
        }
        DeathKind::Monster => {
            let Some((name, xp)) = session
                .entity(target_id)
                .and_then(|e| e.fighter.as_ref().map(|f| (e.name.clone(), f.xp)))
            else {
                return;
            };
            session.messages.add(
                format!("The {} is dead! You gain {} experience.", name, xp),
                Color::ORANGE,
            );

            // Strip capabilities and leave an inert corpse in place.
            if let Some(entity) = session.entity_mut(target_id) {
                entity.glyph = '%';
                entity.color = Color::DARK_RED;
                entity.blocks = false;
                entity.fighter = None;
                entity.ai = None;
                entity.name = format!("remains of {}", name);
            }
            if target_id != session.player_id {
                if let Some(fighter) = session.player_fighter_mut() {
                    fighter.xp += xp;
                }
            }
            session.send_to_back(target_id);
        }
        DeathKind::None => {}
    }
}
