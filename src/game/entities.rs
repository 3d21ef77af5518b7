//! # Entity Module
//!
//! The generic actor record and its optional capabilities. A single
//! [`Entity`] struct covers the player, monsters, items on the floor, the
//! stairs marker, and corpses; what a given entity can do is determined by
//! which capability fields are populated, not by a type hierarchy.

use crate::config;
use crate::game::{new_entity_id, Color, EntityId, Position};
use serde::{Deserialize, Serialize};

/// Death-handling behavior attached to a fighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathKind {
    /// Flip the session to Dead and turn the player glyph into remains.
    Player,
    /// Convert the entity into an inert corpse and credit its experience.
    Monster,
    /// No handler; hit points may go negative without further effect.
    None,
}

/// Combat capability: stats, cadence, and what happens at zero hit points.
///
/// On monsters `xp` is the reward they yield; on the player it accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    pub hp: i32,
    pub max_hp: i32,
    pub defense: i32,
    pub power: i32,
    pub xp: i32,
    pub attack_cooldown: i32,
    pub on_death: DeathKind,
}

impl Fighter {
    /// Creates a fighter at full health with the default attack cadence.
    pub fn new(hp: i32, defense: i32, power: i32, xp: i32, on_death: DeathKind) -> Self {
        Self {
            hp,
            max_hp: hp,
            defense,
            power,
            xp,
            attack_cooldown: config::DEFAULT_ATTACK_COOLDOWN,
            on_death,
        }
    }

    /// Restores hit points without exceeding the maximum.
    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }
}

/// AI capability, modeled as a state machine.
///
/// `Confused` owns the prior behavior and restores it once its counter is
/// exhausted; nesting confusions simply stacks the boxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AiBehavior {
    /// Chase the player on sight, attack when adjacent.
    Basic,
    /// Stumble randomly for a while, then revert to the previous behavior.
    Confused {
        previous: Box<AiBehavior>,
        turns_remaining: u32,
    },
}

/// Consumable effect carried by an item entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Heal { amount: i32 },
    Lightning { damage: i32, range: i32 },
    Confuse { range: i32, turns: u32 },
    Fireball { damage: i32, radius: i32 },
}

/// A generic actor on the map: player, monster, item, stairs, or corpse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub pos: Position,
    pub glyph: char,
    pub name: String,
    pub color: Color,
    pub blocks: bool,
    /// Rendered once its tile is explored, even outside current sight.
    pub always_visible: bool,
    /// Ticks between actions; lower is faster.
    pub speed: i32,
    /// Ticks left before the next action.
    pub wait: i32,
    pub fighter: Option<Fighter>,
    pub ai: Option<AiBehavior>,
    pub item: Option<ItemKind>,
}

impl Entity {
    /// Creates a non-blocking, capability-free entity at the given position.
    pub fn new(pos: Position, glyph: char, name: &str, color: Color) -> Self {
        Self {
            id: new_entity_id(),
            pos,
            glyph,
            name: name.to_string(),
            color,
            blocks: false,
            always_visible: false,
            speed: config::DEFAULT_SPEED,
            wait: 0,
            fighter: None,
            ai: None,
            item: None,
        }
    }

    /// Creates the player entity with its starting stats.
    pub fn player(pos: Position) -> Self {
        Self::new(pos, '@', "player", Color::WHITE)
            .blocking()
            .with_speed(config::PLAYER_SPEED)
            .with_fighter(Fighter::new(
                config::PLAYER_HP,
                config::PLAYER_DEFENSE,
                config::PLAYER_POWER,
                0,
                DeathKind::Player,
            ))
    }

    pub fn blocking(mut self) -> Self {
        self.blocks = true;
        self
    }

    pub fn always_visible(mut self) -> Self {
        self.always_visible = true;
        self
    }

    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_fighter(mut self, fighter: Fighter) -> Self {
        self.fighter = Some(fighter);
        self
    }

    pub fn with_ai(mut self, ai: AiBehavior) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn with_item(mut self, item: ItemKind) -> Self {
        self.item = Some(item);
        self
    }

    /// Euclidean distance to another entity.
    pub fn distance_to(&self, other: &Entity) -> f64 {
        self.pos.distance_to(other.pos)
    }

    /// Euclidean distance to a position.
    pub fn distance(&self, pos: Position) -> f64 {
        self.pos.distance_to(pos)
    }

    /// Whether this entity has a fighter with hit points remaining.
    pub fn is_alive(&self) -> bool {
        self.fighter.map(|f| f.hp > 0).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heal_caps_at_max() {
        let mut fighter = Fighter::new(30, 0, 4, 35, DeathKind::Monster);
        fighter.hp = 5;
        fighter.heal(10);
        assert_eq!(fighter.hp, 15);

        fighter.heal(1000);
        assert_eq!(fighter.hp, 30);
    }

    #[test]
    fn test_player_constructor() {
        let player = Entity::player(Position::new(3, 4));
        assert_eq!(player.pos, Position::new(3, 4));
        assert!(player.blocks);
        assert_eq!(player.speed, crate::config::PLAYER_SPEED);
        assert!(player.is_alive());

        let fighter = player.fighter.unwrap();
        assert_eq!(fighter.hp, fighter.max_hp);
        assert_eq!(fighter.on_death, DeathKind::Player);
        assert_eq!(fighter.xp, 0);
    }

    #[test]
    fn test_builder_capabilities() {
        let entity = Entity::new(Position::new(0, 0), '!', "potion", Color::VIOLET)
            .with_item(ItemKind::Heal { amount: 40 })
            .always_visible();
        assert!(entity.item.is_some());
        assert!(entity.always_visible);
        assert!(!entity.blocks);
        assert!(!entity.is_alive());
    }

    #[test]
    fn test_confused_wraps_previous() {
        let confused = AiBehavior::Confused {
            previous: Box::new(AiBehavior::Basic),
            turns_remaining: 10,
        };
        match confused {
            AiBehavior::Confused { previous, .. } => assert_eq!(*previous, AiBehavior::Basic),
            _ => panic!("expected confused variant"),
        }
    }

    #[test]
    fn test_entity_distance() {
        let a = Entity::new(Position::new(0, 0), '?', "a", Color::WHITE);
        let b = Entity::new(Position::new(3, 4), '?', "b", Color::WHITE);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(a.distance(Position::new(0, 2)), 2.0);
    }
}
