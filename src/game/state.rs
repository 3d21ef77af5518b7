//! # Session State Module
//!
//! Central coordination point for a running game: the current map, the
//! ordered entity list, inventory, message log, and the turn scheduler that
//! threads player and monster actions through combat, AI, items, and
//! progression.
//!
//! The entity list order is the draw order (last entry renders on top);
//! corpses are pushed to the front so live actors draw above them.

use crate::config;
use crate::game::entities::{Entity, Fighter};
use crate::game::world::Map;
use crate::game::{ai, combat, items, progression, visibility};
use crate::game::{Color, EntityId, Position};
use crate::generation::dungeon::DungeonGenerator;
use crate::generation::Generator;
use crate::input::{Command, Targeting};
use crate::{BarrowError, BarrowResult};
use log::info;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Coarse session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Playing,
    Dead,
}

/// Bounded ring of recent message lines with their display colors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageLog {
    lines: VecDeque<(String, Color)>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line, dropping the oldest once the ring is full.
    pub fn add(&mut self, text: impl Into<String>, color: Color) {
        if self.lines.len() >= config::MESSAGE_LOG_CAPACITY {
            self.lines.pop_front();
        }
        self.lines.push_back((text.into(), color));
    }

    /// Recent lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &(String, Color)> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The complete state of one game session.
///
/// Constructed by [`Session::new`], advanced one tick at a time by
/// [`Session::advance`], and serializable as a snapshot via
/// [`Session::save_to_json`] / [`Session::load_from_json`]. The visible set
/// is transient: it is recomputed from the explored-flag-bearing map rather
/// than persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub(crate) map: Map,
    pub(crate) entities: Vec<Entity>,
    pub(crate) player_id: EntityId,
    pub(crate) stairs_id: EntityId,
    pub(crate) depth: u32,
    pub(crate) inventory: Vec<Entity>,
    pub(crate) messages: MessageLog,
    pub(crate) run_state: RunState,
    pub(crate) player_level: u32,
    pub(crate) level_up_pending: bool,
    #[serde(skip)]
    pub(crate) visible: HashSet<Position>,
    #[serde(skip)]
    pub(crate) fov_dirty: bool,
}

impl Session {
    /// Starts a fresh session at depth 1.
    pub fn new(rng: &mut StdRng) -> BarrowResult<Self> {
        let player = Entity::player(Position::new(0, 0));
        let player_id = player.id;

        let mut session = Session {
            map: Map::new(config::MAP_WIDTH, config::MAP_HEIGHT),
            entities: vec![player],
            player_id,
            stairs_id: player_id,
            depth: 1,
            inventory: Vec::new(),
            messages: MessageLog::new(),
            run_state: RunState::Playing,
            player_level: 1,
            level_up_pending: false,
            visible: HashSet::new(),
            fov_dirty: true,
        };
        session.rebuild_level(rng)?;
        session.messages.add(
            "Welcome, stranger! Prepare to perish in the depths of the barrow.",
            Color::RED,
        );
        Ok(session)
    }

    /// Generates a new level for the current depth, carrying the player over.
    fn rebuild_level(&mut self, rng: &mut StdRng) -> BarrowResult<()> {
        let generated = DungeonGenerator::new().generate(self.depth, rng)?;

        let player_index = self
            .index_of(self.player_id)
            .ok_or_else(|| BarrowError::InvalidState("session has no player entity".to_string()))?;
        let mut player = self.entities.swap_remove(player_index);
        player.pos = generated.player_start;

        self.map = generated.map;
        self.stairs_id = generated.stairs_id;
        self.entities = Vec::with_capacity(generated.entities.len() + 1);
        self.entities.push(player);
        self.entities.extend(generated.entities);
        self.visible.clear();
        self.fov_dirty = true;
        Ok(())
    }

    // --- entity lookup ---------------------------------------------------

    pub(crate) fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }

    /// The entity with the given id, if it is in the live set.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// The player entity. Present for the whole session, corpse included.
    pub fn player(&self) -> Option<&Entity> {
        self.entity(self.player_id)
    }

    pub(crate) fn player_mut(&mut self) -> Option<&mut Entity> {
        let id = self.player_id;
        self.entity_mut(id)
    }

    pub(crate) fn player_fighter_mut(&mut self) -> Option<&mut Fighter> {
        self.player_mut().and_then(|e| e.fighter.as_mut())
    }

    /// Moves an entity to the front of the list so it draws beneath others.
    pub(crate) fn send_to_back(&mut self, id: EntityId) {
        if let Some(index) = self.index_of(id) {
            let entity = self.entities.remove(index);
            self.entities.insert(0, entity);
        }
    }

    // --- read-only views for the rendering collaborator ------------------

    pub fn map(&self) -> &Map {
        &self.map
    }

    /// Entities in draw order (last on top).
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn inventory(&self) -> &[Entity] {
        &self.inventory
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn player_id(&self) -> EntityId {
        self.player_id
    }

    pub fn stairs_id(&self) -> EntityId {
        self.stairs_id
    }

    pub fn player_level(&self) -> u32 {
        self.player_level
    }

    /// Whether a level-up stat choice is blocking the scheduler.
    pub fn level_up_pending(&self) -> bool {
        self.level_up_pending
    }

    /// Tiles currently visible from the player's position.
    pub fn visible(&self) -> &HashSet<Position> {
        &self.visible
    }

    pub fn is_visible(&self, pos: Position) -> bool {
        self.visible.contains(&pos)
    }

    /// Whether the renderer should draw an entity: in sight, or marked
    /// always-visible on an explored tile.
    pub fn entity_visible(&self, entity: &Entity) -> bool {
        self.is_visible(entity.pos)
            || (entity.always_visible
                && self.map.tile(entity.pos).map(|t| t.explored).unwrap_or(false))
    }

    // --- movement and blocking -------------------------------------------

    /// Whether a position is closed to movement by terrain or a blocking
    /// entity.
    pub fn is_blocked(&self, pos: Position) -> bool {
        if self.map.blocks_movement(pos) {
            return true;
        }
        self.entities.iter().any(|e| e.blocks && e.pos == pos)
    }

    /// Attempts to step an entity by the given deltas.
    ///
    /// A blocked or off-map destination leaves the position unchanged, but
    /// the move cooldown is spent either way so repeated illegal attempts
    /// gain nothing.
    pub(crate) fn move_entity(&mut self, id: EntityId, dx: i32, dy: i32) {
        let Some(entity) = self.entity(id) else {
            return;
        };
        let destination = entity.pos.offset(dx, dy);
        let speed = entity.speed;
        let open = self.map.in_bounds(destination) && !self.is_blocked(destination);

        if let Some(entity) = self.entity_mut(id) {
            if open {
                entity.pos = destination;
            }
            entity.wait = speed;
        }
    }

    // --- scheduler --------------------------------------------------------

    /// Advances the simulation by one tick.
    ///
    /// One tick is: refresh visibility if the player moved, gate on a
    /// pending level-up choice, resolve the player's single action if its
    /// cooldown allows (otherwise the cooldown counts down), then let every
    /// other AI entity whose own cooldown has elapsed take one decision.
    /// Each actor's cadence is independent; nobody waits for anybody else.
    pub fn advance(
        &mut self,
        command: Option<Command>,
        targeting: &mut dyn Targeting,
        rng: &mut StdRng,
    ) -> BarrowResult<()> {
        if self.fov_dirty {
            self.refresh_visibility();
        }

        progression::check_level_up(self);
        if self.level_up_pending {
            return Ok(());
        }

        // Player phase.
        if self.run_state == RunState::Playing {
            let ready = self.player().map(|p| p.wait <= 0).unwrap_or(false);
            if !ready {
                if let Some(player) = self.player_mut() {
                    player.wait -= 1;
                }
            } else if let Some(command) = command {
                self.execute_command(command, targeting, rng)?;
            }
        }

        if self.fov_dirty {
            self.refresh_visibility();
        }
        progression::check_level_up(self);

        // Monster phase: one decision per AI entity whose cooldown elapsed.
        if self.run_state == RunState::Playing {
            let actors: Vec<EntityId> = self
                .entities
                .iter()
                .filter(|e| e.ai.is_some() && e.id != self.player_id)
                .map(|e| e.id)
                .collect();

            for id in actors {
                if self.run_state != RunState::Playing {
                    break;
                }
                let ready = match self.entity_mut(id) {
                    Some(entity) if entity.ai.is_some() => {
                        if entity.wait > 0 {
                            entity.wait -= 1;
                            false
                        } else {
                            true
                        }
                    }
                    _ => false,
                };
                if ready {
                    ai::take_turn(self, id, rng);
                }
            }
        }

        Ok(())
    }

    fn execute_command(
        &mut self,
        command: Command,
        targeting: &mut dyn Targeting,
        rng: &mut StdRng,
    ) -> BarrowResult<()> {
        match command {
            Command::Move(direction) => {
                let delta = direction.to_delta();
                self.player_move_or_attack(delta.x, delta.y);
            }
            Command::PickUp => self.pick_up(),
            Command::UseItem(slot) => self.use_item(slot, targeting),
            Command::DropItem(slot) => self.drop_item(slot),
            Command::Descend => self.descend(rng)?,
        }
        Ok(())
    }

    /// Attacks the fighter one step away in the given direction, or steps
    /// there when the way is clear.
    fn player_move_or_attack(&mut self, dx: i32, dy: i32) {
        let Some(player) = self.player() else {
            return;
        };
        let destination = player.pos.offset(dx, dy);
        let player_id = self.player_id;

        let target = self
            .entities
            .iter()
            .find(|e| e.id != player_id && e.fighter.is_some() && e.pos == destination)
            .map(|e| e.id);

        match target {
            Some(target_id) => combat::attack(self, player_id, target_id),
            None => {
                self.move_entity(player_id, dx, dy);
                self.fov_dirty = true;
            }
        }
    }

    // --- inventory --------------------------------------------------------

    /// Picks up the first item entity under the player, if any.
    fn pick_up(&mut self) {
        let Some(pos) = self.player().map(|p| p.pos) else {
            return;
        };
        let Some(index) = self
            .entities
            .iter()
            .position(|e| e.item.is_some() && e.pos == pos)
        else {
            return;
        };

        if self.inventory.len() >= config::INVENTORY_CAPACITY {
            let name = self.entities[index].name.clone();
            self.messages.add(
                format!("Your inventory is full, cannot pick up {}.", name),
                Color::RED,
            );
        } else {
            let entity = self.entities.remove(index);
            self.messages
                .add(format!("You picked up a {}!", entity.name), Color::GREEN);
            self.inventory.push(entity);
        }
    }

    /// Uses the item in an inventory slot.
    ///
    /// The effect interpreter reports consumed vs. refused; only a consumed
    /// item leaves the inventory, so cancelled targeting keeps the scroll.
    pub fn use_item(&mut self, slot: usize, targeting: &mut dyn Targeting) {
        let Some(entity) = self.inventory.get(slot) else {
            return;
        };
        match entity.item {
            None => {
                let name = entity.name.clone();
                self.messages
                    .add(format!("The {} cannot be used.", name), Color::WHITE);
            }
            Some(kind) => {
                if items::apply_effect(self, kind, targeting) == items::UseOutcome::Consumed {
                    self.inventory.remove(slot);
                }
            }
        }
    }

    /// Drops an inventory item at the player's feet.
    fn drop_item(&mut self, slot: usize) {
        if slot >= self.inventory.len() {
            return;
        }
        let Some(pos) = self.player().map(|p| p.pos) else {
            return;
        };
        let mut entity = self.inventory.remove(slot);
        entity.pos = pos;
        self.messages
            .add(format!("You dropped a {}.", entity.name), Color::YELLOW);
        self.entities.push(entity);
    }

    // --- progression ------------------------------------------------------

    /// Resolves a pending level-up by applying the chosen stat boost.
    pub fn choose_boost(&mut self, boost: crate::StatBoost) -> BarrowResult<()> {
        progression::choose_boost(self, boost)
    }

    // --- level descent ----------------------------------------------------

    /// Descends the stairs under the player, resting on the way down.
    ///
    /// Standing anywhere else makes this a quiet no-op.
    fn descend(&mut self, rng: &mut StdRng) -> BarrowResult<()> {
        let on_stairs = match (self.player(), self.entity(self.stairs_id)) {
            (Some(player), Some(stairs)) => player.pos == stairs.pos,
            _ => false,
        };
        if !on_stairs {
            return Ok(());
        }

        self.messages.add(
            "You take a moment to rest and recover your strength.",
            Color::LIGHT_VIOLET,
        );
        if let Some(fighter) = self.player_fighter_mut() {
            let amount = fighter.max_hp / 2;
            fighter.heal(amount);
        }
        self.messages.add(
            "After a rare moment of peace, you descend deeper into the heart of the barrow...",
            Color::RED,
        );

        self.depth += 1;
        self.rebuild_level(rng)?;
        info!("descended to depth {}", self.depth);
        Ok(())
    }

    // --- visibility -------------------------------------------------------

    /// Recomputes the visible set from the player's position and marks every
    /// visible tile explored. Explored flags never revert.
    pub(crate) fn refresh_visibility(&mut self) {
        let Some(origin) = self.player().map(|p| p.pos) else {
            return;
        };
        self.visible = visibility::compute_visible(&self.map, origin, config::FOV_RADIUS);
        for pos in &self.visible {
            if let Some(tile) = self.map.tile_mut(*pos) {
                tile.explored = true;
            }
        }
        self.fov_dirty = false;
    }

    // --- persistence ------------------------------------------------------

    /// Serializes the session snapshot to JSON.
    pub fn save_to_json(&self) -> BarrowResult<String> {
        serde_json::to_string(self).map_err(BarrowError::from)
    }

    /// Restores a session from a JSON snapshot.
    ///
    /// Visibility is recomputed before the session is handed back; a
    /// snapshot whose player entity is missing is rejected so the caller can
    /// fall back to a new game.
    pub fn load_from_json(json: &str) -> BarrowResult<Self> {
        let mut session: Session = serde_json::from_str(json)?;
        if session.index_of(session.player_id).is_none() {
            return Err(BarrowError::InvalidState(
                "snapshot has no player entity".to_string(),
            ));
        }
        session.refresh_visibility();
        Ok(session)
    }
}
