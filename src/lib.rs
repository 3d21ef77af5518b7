//! # Barrow
//!
//! Simulation core for a turn-based dungeon crawler.
//!
//! The crate owns the hard parts of the game: procedural level generation,
//! a speed-weighted turn scheduler, line-of-sight and exploration tracking,
//! combat, monster AI, consumable item effects with directed targeting, and
//! character progression. Everything presentational is deliberately outside:
//! rendering, raw input polling, and menu flow talk to the core through
//! read-only views, the [`input::Command`] enum, and the [`input::Targeting`]
//! trait.
//!
//! ## Architecture Overview
//!
//! - **Session**: central state struct coordinating map, entities, inventory,
//!   message log, and the scheduler loop
//! - **Generation**: room-and-corridor dungeon generator with depth-scaled
//!   population tables
//! - **Visibility**: deterministic ray-tested field of view shared by the
//!   renderer gate and monster awareness
//! - **Persistence**: the whole session serializes to a JSON snapshot and
//!   restores from it, recomputing transient visibility

pub mod game;
pub mod generation;
pub mod input;
pub mod utils;

pub use game::entities::{AiBehavior, DeathKind, Entity, Fighter, ItemKind};
pub use game::progression::StatBoost;
pub use game::state::{MessageLog, RunState, Session};
pub use game::world::{Map, Tile};
pub use game::{new_entity_id, Color, Direction, EntityId, Position};
pub use generation::dungeon::DungeonGenerator;
pub use generation::{GeneratedLevel, GenerationConfig, Generator, Rect};
pub use input::{CancelTargeting, Command, Targeting};

/// Core error type for the barrow engine.
#[derive(thiserror::Error, Debug)]
pub enum BarrowError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Session state is invalid
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Level generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the barrow codebase.
pub type BarrowResult<T> = Result<T, BarrowError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Map width in tiles
    pub const MAP_WIDTH: i32 = 80;

    /// Map height in tiles
    pub const MAP_HEIGHT: i32 = 43;

    /// Smallest room side, walls included
    pub const ROOM_MIN_SIZE: i32 = 6;

    /// Largest room side, walls included
    pub const ROOM_MAX_SIZE: i32 = 10;

    /// Room placement attempts per level
    pub const MAX_ROOMS: u32 = 30;

    /// Sight radius, shared by the player and monsters
    pub const FOV_RADIUS: i32 = 10;

    /// Ticks between player moves
    pub const PLAYER_SPEED: i32 = 2;

    /// Ticks between monster moves
    pub const DEFAULT_SPEED: i32 = 8;

    /// Ticks between attacks for any fighter
    pub const DEFAULT_ATTACK_COOLDOWN: i32 = 20;

    /// Hit points restored by a healing potion
    pub const HEAL_AMOUNT: i32 = 40;

    /// Flat damage dealt by a lightning scroll
    pub const LIGHTNING_DAMAGE: i32 = 40;

    /// Maximum strike distance for a lightning scroll
    pub const LIGHTNING_RANGE: i32 = 5;

    /// Decisions a confused monster spends stumbling
    pub const CONFUSE_TURNS: u32 = 10;

    /// Maximum targeting distance for a confusion scroll
    pub const CONFUSE_RANGE: i32 = 8;

    /// Flat damage dealt by a fireball scroll
    pub const FIREBALL_DAMAGE: i32 = 25;

    /// Blast radius of a fireball scroll
    pub const FIREBALL_RADIUS: i32 = 3;

    /// Base experience required for the first level-up
    pub const LEVEL_UP_BASE: i32 = 200;

    /// Additional experience required per level gained
    pub const LEVEL_UP_FACTOR: i32 = 150;

    /// Inventory slot limit
    pub const INVENTORY_CAPACITY: usize = 26;

    /// Recent lines kept in the message log ring
    pub const MESSAGE_LOG_CAPACITY: usize = 50;

    /// Player starting hit points
    pub const PLAYER_HP: i32 = 100;

    /// Player starting defense
    pub const PLAYER_DEFENSE: i32 = 1;

    /// Player starting attack power
    pub const PLAYER_POWER: i32 = 4;
}
