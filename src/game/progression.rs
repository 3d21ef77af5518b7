//! # Progression Module
//!
//! Experience thresholds and level-up resolution. Reaching a threshold
//! flags a pending stat choice that blocks the scheduler until the player
//! picks a boost; leftover experience carries into the next level.

use crate::config;
use crate::game::state::{RunState, Session};
use crate::game::Color;
use crate::{BarrowError, BarrowResult};
use serde::{Deserialize, Serialize};

/// The three stat boosts offered on level-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatBoost {
    /// +20 maximum hit points, and +20 current hit points with them.
    Constitution,
    /// +1 attack power.
    Strength,
    /// +1 defense.
    Agility,
}

/// Experience required to leave the given level.
///
/// # Examples
///
/// ```
/// use barrow::game::progression::xp_to_next;
///
/// assert_eq!(xp_to_next(1), 200);
/// assert_eq!(xp_to_next(2), 350);
/// ```
pub fn xp_to_next(level: u32) -> i32 {
    config::LEVEL_UP_BASE + level.saturating_sub(1) as i32 * config::LEVEL_UP_FACTOR
}

/// Checks the player's experience against the threshold and, when reached,
/// banks the level and flags the pending stat choice.
///
/// The threshold is subtracted from the accumulated total rather than
/// resetting it, so overshoot carries over. Idempotent while a choice is
/// already pending.
pub fn check_level_up(session: &mut Session) {
    if session.run_state != RunState::Playing || session.level_up_pending {
        return;
    }
    let Some(xp) = session.player().and_then(|p| p.fighter).map(|f| f.xp) else {
        return;
    };

    let required = xp_to_next(session.player_level);
    if xp >= required {
        session.player_level += 1;
        if let Some(fighter) = session.player_fighter_mut() {
            fighter.xp -= required;
        }
        let level = session.player_level;
        session.messages.add(
            format!(
                "Your battle skills grow stronger! You reached level {}!",
                level
            ),
            Color::YELLOW,
        );
        session.level_up_pending = true;
    }
}

/// Applies the chosen boost and releases the scheduler.
pub fn choose_boost(session: &mut Session, boost: StatBoost) -> BarrowResult<()> {
    if !session.level_up_pending {
        return Err(BarrowError::InvalidAction(
            "no level-up choice is pending".to_string(),
        ));
    }
    let Some(fighter) = session.player_fighter_mut() else {
        return Err(BarrowError::InvalidState(
            "player has no fighter".to_string(),
        ));
    };

    match boost {
        StatBoost::Constitution => {
            fighter.max_hp += 20;
            fighter.hp += 20;
        }
        StatBoost::Strength => fighter.power += 1,
        StatBoost::Agility => fighter.defense += 1,
    }
    session.level_up_pending = false;
    Ok(())
}
