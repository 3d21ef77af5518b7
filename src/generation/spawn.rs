//! # Spawn Tables
//!
//! Species and item definitions plus the depth-scaled chance tables that
//! decide what the generator places in each room. Rarity shifts with depth:
//! the heavier species and the stronger scrolls only enter the tables past
//! their depth thresholds.

use crate::config;
use crate::game::entities::{AiBehavior, DeathKind, Entity, Fighter, ItemKind};
use crate::game::{Color, Position};
use crate::generation::depth_scaled;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;

/// Maximum monsters the generator may roll for one room.
pub fn monster_cap(depth: u32) -> u32 {
    depth_scaled(&[(2, 1), (3, 4), (5, 6)], depth)
}

/// Maximum items the generator may roll for one room.
pub fn item_cap(depth: u32) -> u32 {
    depth_scaled(&[(1, 1), (2, 4)], depth)
}

/// Picks a species by weighted chance for the given depth.
pub fn random_monster(depth: u32, pos: Position, rng: &mut StdRng) -> Entity {
    let weights = [80, depth_scaled(&[(15, 3), (30, 5), (60, 7)], depth)];
    let Ok(table) = WeightedIndex::new(weights) else {
        return goblin(pos);
    };
    match table.sample(rng) {
        0 => goblin(pos),
        _ => ogre(pos),
    }
}

/// Picks an item by weighted chance for the given depth.
pub fn random_item(depth: u32, pos: Position, rng: &mut StdRng) -> Entity {
    let weights = [
        35,
        depth_scaled(&[(25, 4)], depth),
        depth_scaled(&[(25, 6)], depth),
        depth_scaled(&[(10, 2)], depth),
    ];
    let Ok(table) = WeightedIndex::new(weights) else {
        return healing_potion(pos);
    };
    match table.sample(rng) {
        0 => healing_potion(pos),
        1 => lightning_scroll(pos),
        2 => fireball_scroll(pos),
        _ => confusion_scroll(pos),
    }
}

pub fn goblin(pos: Position) -> Entity {
    Entity::new(pos, 'g', "goblin", Color::DESATURATED_GREEN)
        .blocking()
        .with_fighter(Fighter::new(20, 0, 4, 35, DeathKind::Monster))
        .with_ai(AiBehavior::Basic)
}

pub fn ogre(pos: Position) -> Entity {
    Entity::new(pos, 'O', "ogre", Color::DARKER_GREEN)
        .blocking()
        .with_fighter(Fighter::new(30, 2, 8, 100, DeathKind::Monster))
        .with_ai(AiBehavior::Basic)
}

pub fn healing_potion(pos: Position) -> Entity {
    Entity::new(pos, '!', "healing potion", Color::VIOLET)
        .always_visible()
        .with_item(ItemKind::Heal {
            amount: config::HEAL_AMOUNT,
        })
}

pub fn lightning_scroll(pos: Position) -> Entity {
    Entity::new(pos, '#', "scroll of lightning bolt", Color::YELLOW)
        .always_visible()
        .with_item(ItemKind::Lightning {
            damage: config::LIGHTNING_DAMAGE,
            range: config::LIGHTNING_RANGE,
        })
}

pub fn fireball_scroll(pos: Position) -> Entity {
    Entity::new(pos, '#', "scroll of fireball", Color::LIGHT_ORANGE)
        .always_visible()
        .with_item(ItemKind::Fireball {
            damage: config::FIREBALL_DAMAGE,
            radius: config::FIREBALL_RADIUS,
        })
}

pub fn confusion_scroll(pos: Position) -> Entity {
    Entity::new(pos, '#', "scroll of confusion", Color::LIGHT_YELLOW)
        .always_visible()
        .with_item(ItemKind::Confuse {
            range: config::CONFUSE_RANGE,
            turns: config::CONFUSE_TURNS,
        })
}

/// The descent marker. Capability-free and rendered once discovered.
pub fn stairs(pos: Position) -> Entity {
    Entity::new(pos, '<', "stairs", Color::WHITE).always_visible()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils;

    #[test]
    fn test_caps_scale_with_depth() {
        assert_eq!(monster_cap(1), 2);
        assert_eq!(monster_cap(4), 3);
        assert_eq!(monster_cap(6), 5);
        assert_eq!(item_cap(1), 1);
        assert_eq!(item_cap(4), 2);
    }

    #[test]
    fn test_shallow_depths_spawn_only_the_weak_species() {
        let mut rng = utils::create_rng(11);
        for _ in 0..100 {
            let monster = random_monster(1, Position::new(0, 0), &mut rng);
            assert_eq!(monster.name, "goblin");
        }
    }

    #[test]
    fn test_deep_depths_can_spawn_ogres() {
        let mut rng = utils::create_rng(11);
        let mut saw_ogre = false;
        for _ in 0..200 {
            if random_monster(7, Position::new(0, 0), &mut rng).name == "ogre" {
                saw_ogre = true;
                break;
            }
        }
        assert!(saw_ogre, "depth 7 weights make ogres common");
    }

    #[test]
    fn test_depth_one_items_are_potions_only() {
        let mut rng = utils::create_rng(3);
        for _ in 0..100 {
            let item = random_item(1, Position::new(0, 0), &mut rng);
            assert_eq!(item.name, "healing potion");
        }
    }

    #[test]
    fn test_monsters_block_and_fight() {
        let goblin = goblin(Position::new(1, 1));
        assert!(goblin.blocks);
        assert!(goblin.fighter.is_some());
        assert!(goblin.ai.is_some());
        assert!(goblin.item.is_none());

        let ogre = ogre(Position::new(1, 1));
        let fighter = ogre.fighter.unwrap();
        assert_eq!(fighter.on_death, DeathKind::Monster);
        assert_eq!((fighter.hp, fighter.defense, fighter.power), (30, 2, 8));
    }

    #[test]
    fn test_items_never_block() {
        for item in [
            healing_potion(Position::new(0, 0)),
            lightning_scroll(Position::new(0, 0)),
            fireball_scroll(Position::new(0, 0)),
            confusion_scroll(Position::new(0, 0)),
        ] {
            assert!(!item.blocks);
            assert!(item.always_visible);
            assert!(item.item.is_some());
            assert!(item.fighter.is_none());
        }
    }

    #[test]
    fn test_stairs_are_inert() {
        let stairs = stairs(Position::new(4, 4));
        assert!(stairs.always_visible);
        assert!(!stairs.blocks);
        assert!(stairs.fighter.is_none() && stairs.ai.is_none() && stairs.item.is_none());
    }
}
