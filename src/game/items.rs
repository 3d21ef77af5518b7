//! # Item Effects Module
//!
//! Interpreter for consumable item effects. Every effect either runs to
//! completion or refuses; a refusal (no valid target, cancelled targeting,
//! healing at full health) is reported through the message log and leaves
//! the item where it was. Whatever the targeting collaborator returns is
//! re-validated here, so the core never trusts an out-of-range or unseen
//! selection.

use crate::game::entities::{AiBehavior, ItemKind};
use crate::game::state::Session;
use crate::game::{combat, Color, EntityId};
use crate::input::Targeting;

/// Result of interpreting an item effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseOutcome {
    /// The effect ran; the caller removes the item from inventory.
    Consumed,
    /// The effect refused; the item stays in inventory.
    Refused,
}

/// Executes a single item effect against the session.
pub fn apply_effect(
    session: &mut Session,
    kind: ItemKind,
    targeting: &mut dyn Targeting,
) -> UseOutcome {
    match kind {
        ItemKind::Heal { amount } => cast_heal(session, amount),
        ItemKind::Lightning { damage, range } => cast_lightning(session, damage, range),
        ItemKind::Confuse { range, turns } => cast_confuse(session, range, turns, targeting),
        ItemKind::Fireball { damage, radius } => cast_fireball(session, damage, radius, targeting),
    }
}

/// The nearest fighter other than the player within `max_range` of the
/// player and inside the player's current visible set.
pub fn closest_monster(session: &Session, max_range: i32) -> Option<EntityId> {
    let player = session.player()?;
    let mut closest = None;
    let mut closest_dist = max_range as f64 + 1.0;

    for entity in session.entities() {
        if entity.id == session.player_id()
            || entity.fighter.is_none()
            || !session.is_visible(entity.pos)
        {
            continue;
        }
        let dist = player.distance_to(entity);
        if dist < closest_dist {
            closest_dist = dist;
            closest = Some(entity.id);
        }
    }
    closest
}

fn cast_heal(session: &mut Session, amount: i32) -> UseOutcome {
    let Some(fighter) = session.player().and_then(|p| p.fighter) else {
        return UseOutcome::Refused;
    };
    if fighter.hp == fighter.max_hp {
        session
            .messages
            .add("You are already at full health.", Color::RED);
        return UseOutcome::Refused;
    }

    session
        .messages
        .add("Your wounds start to feel better!", Color::LIGHT_VIOLET);
    if let Some(fighter) = session.player_fighter_mut() {
        fighter.heal(amount);
    }
    UseOutcome::Consumed
}

fn cast_lightning(session: &mut Session, damage: i32, range: i32) -> UseOutcome {
    let Some(target_id) = closest_monster(session, range) else {
        session
            .messages
            .add("No enemy is close enough to strike.", Color::RED);
        return UseOutcome::Refused;
    };

    let name = session
        .entity(target_id)
        .map(|e| e.name.clone())
        .unwrap_or_default();
    session.messages.add(
        format!(
            "A lightning bolt strikes the {} with a loud thunder! The damage is {} hit points.",
            name, damage
        ),
        Color::LIGHT_BLUE,
    );
    combat::apply_damage(session, target_id, damage);
    UseOutcome::Consumed
}

fn cast_confuse(
    session: &mut Session,
    range: i32,
    turns: u32,
    targeting: &mut dyn Targeting,
) -> UseOutcome {
    session.messages.add(
        "Select an enemy to confuse, or cancel.",
        Color::LIGHT_CYAN,
    );
    let Some(target_id) = targeting.select_entity(session, range) else {
        return UseOutcome::Refused;
    };

    // Re-validate the collaborator's pick: a visible, living, AI-driven
    // monster within range.
    let valid = match (session.player(), session.entity(target_id)) {
        (Some(player), Some(target)) => {
            target.id != session.player_id()
                && target.fighter.is_some()
                && target.ai.is_some()
                && session.is_visible(target.pos)
                && player.distance_to(target) <= range as f64
        }
        _ => false,
    };
    if !valid {
        return UseOutcome::Refused;
    }

    let name = session
        .entity(target_id)
        .map(|e| e.name.clone())
        .unwrap_or_default();
    if let Some(entity) = session.entity_mut(target_id) {
        let Some(previous) = entity.ai.take() else {
            return UseOutcome::Refused;
        };
        entity.ai = Some(AiBehavior::Confused {
            previous: Box::new(previous),
            turns_remaining: turns,
        });
    }
    session.messages.add(
        format!(
            "The eyes of the {} look vacant as it starts to stumble around!",
            name
        ),
        Color::LIGHT_GREEN,
    );
    UseOutcome::Consumed
}

fn cast_fireball(
    session: &mut Session,
    damage: i32,
    radius: i32,
    targeting: &mut dyn Targeting,
) -> UseOutcome {
    session.messages.add(
        "Select a target tile for the fireball, or cancel.",
        Color::LIGHT_CYAN,
    );
    let Some(target) = targeting.select_tile(session, None) else {
        return UseOutcome::Refused;
    };
    // The throw is bounded by sight: an unseen tile is no target.
    if !session.is_visible(target) {
        return UseOutcome::Refused;
    }

    session.messages.add(
        format!(
            "The fireball explodes, burning everything within {} tiles!",
            radius
        ),
        Color::ORANGE,
    );

    // Everything with a fighter in the blast, the player included.
    let victims: Vec<(EntityId, String)> = session
        .entities()
        .iter()
        .filter(|e| e.fighter.is_some() && e.distance(target) <= radius as f64)
        .map(|e| (e.id, e.name.clone()))
        .collect();

    for (victim_id, name) in victims {
        session.messages.add(
            format!("The {} gets burned for {} hit points.", name, damage),
            Color::ORANGE,
        );
        combat::apply_damage(session, victim_id, damage);
    }
    UseOutcome::Consumed
}
