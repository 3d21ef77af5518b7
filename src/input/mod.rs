//! # Input Module
//!
//! The boundary to the input collaborator. The core never polls devices; it
//! receives discrete [`Command`] values through [`Session::advance`] and
//! asks a [`Targeting`] implementation for target descriptors when an item
//! effect needs one.
//!
//! [`Session::advance`]: crate::Session::advance

use crate::game::state::Session;
use crate::game::{Direction, EntityId, Position};

/// A discrete action request from the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Step or attack in a direction.
    Move(Direction),
    /// Pick up the item underfoot.
    PickUp,
    /// Use the item in an inventory slot.
    UseItem(usize),
    /// Drop the item in an inventory slot at the player's feet.
    DropItem(usize),
    /// Take the stairs the player is standing on.
    Descend,
}

/// Supplies target descriptors for directed item effects.
///
/// Implementations are free to block on real input or answer from a script;
/// the core only sees the returned descriptor. `None` always means the
/// selection was cancelled, which the effect interpreter treats as a
/// refusal, never an error. Whatever is returned is re-validated by the
/// core, so implementations need not enforce range or visibility.
pub trait Targeting {
    /// A tile selection, optionally limited to `max_range` from the player.
    fn select_tile(&mut self, session: &Session, max_range: Option<i32>) -> Option<Position>;

    /// An entity selection within `max_range` of the player.
    fn select_entity(&mut self, session: &Session, max_range: i32) -> Option<EntityId>;
}

/// The trivial collaborator: every selection is cancelled.
///
/// Useful for headless runs and for exercising refusal paths in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct CancelTargeting;

impl Targeting for CancelTargeting {
    fn select_tile(&mut self, _session: &Session, _max_range: Option<i32>) -> Option<Position> {
        None
    }

    fn select_entity(&mut self, _session: &Session, _max_range: i32) -> Option<EntityId> {
        None
    }
}
