//! End-to-end simulation runs over the public API, checking the invariants
//! that must hold at every tick regardless of seed.

use barrow::{
    config, utils, CancelTargeting, Command, Direction, RunState, Session,
};
use rand::rngs::StdRng;
use rand::Rng;

fn random_walk_command(session: &Session, rng: &mut StdRng) -> Option<Command> {
    let player = session.player()?;
    if let Some(stairs) = session.entity(session.stairs_id()) {
        if stairs.pos == player.pos {
            return Some(Command::Descend);
        }
    }
    if session
        .entities()
        .iter()
        .any(|e| e.item.is_some() && e.pos == player.pos)
    {
        return Some(Command::PickUp);
    }
    let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
    Some(Command::Move(direction))
}

fn check_invariants(session: &Session) {
    // Fighters never exceed their maximum hit points.
    for entity in session.entities() {
        if let Some(fighter) = entity.fighter {
            assert!(fighter.hp <= fighter.max_hp, "{} over-healed", entity.name);
        }
    }

    // A non-player entity at zero hit points would have died; only the dead
    // player keeps a drained fighter.
    for entity in session.entities() {
        if entity.id == session.player_id() {
            continue;
        }
        if let Some(fighter) = entity.fighter {
            assert!(fighter.hp > 0, "{} should be a corpse", entity.name);
        }
    }

    // Corpses are inert: no capabilities, no blocking.
    for entity in session.entities() {
        if entity.glyph == '%' {
            assert!(entity.fighter.is_none() || entity.id == session.player_id());
            assert!(entity.ai.is_none());
            assert!(!entity.blocks || entity.id == session.player_id());
        }
    }

    // The player stands on open terrain.
    let player = session.player().expect("player entity present");
    assert!(!session.map().blocks_movement(player.pos));

    // The message log ring never grows past its bound.
    assert!(session.messages().len() <= config::MESSAGE_LOG_CAPACITY);

    // A dead session means a drained player.
    if session.run_state() == RunState::Dead {
        let fighter = player.fighter.expect("dead player keeps its fighter");
        assert!(fighter.hp <= 0);
    }
}

#[test]
fn test_long_runs_keep_invariants() {
    for seed in [1, 17, 404, 90210] {
        let mut rng = utils::create_rng(seed);
        let mut session = Session::new(&mut rng).expect("new session");
        let mut targeting = CancelTargeting;

        for _ in 0..400 {
            if session.run_state() == RunState::Dead {
                break;
            }
            if session.level_up_pending() {
                session
                    .choose_boost(barrow::StatBoost::Constitution)
                    .expect("boost");
            }
            let command = random_walk_command(&session, &mut rng);
            session
                .advance(command, &mut targeting, &mut rng)
                .expect("advance");
            check_invariants(&session);
        }
    }
}

#[test]
fn test_session_starts_sane() {
    let mut rng = utils::create_rng(8);
    let session = Session::new(&mut rng).expect("new session");

    assert_eq!(session.depth(), 1);
    assert_eq!(session.player_level(), 1);
    assert_eq!(session.run_state(), RunState::Playing);
    assert!(session.inventory().is_empty());
    assert!(!session.messages().is_empty(), "welcome message present");
    assert!(session.entity(session.stairs_id()).is_some());
    check_invariants(&session);

    // The opening visible set exists before any tick runs.
    let mut session = session;
    let mut targeting = CancelTargeting;
    session.advance(None, &mut targeting, &mut rng).unwrap();
    assert!(!session.visible().is_empty());
    assert!(session.is_visible(session.player().unwrap().pos));
}

#[test]
fn test_player_cooldown_limits_travel() {
    let mut rng = utils::create_rng(21);
    let mut session = Session::new(&mut rng).expect("new session");
    let mut targeting = CancelTargeting;

    let mut moves = 0;
    for _ in 0..30 {
        let before = session.player().unwrap().pos;
        session
            .advance(Some(Command::Move(Direction::East)), &mut targeting, &mut rng)
            .unwrap();
        if session.player().unwrap().pos != before {
            moves += 1;
        }
    }
    // With speed 2, at most one move per three ticks.
    assert!(moves <= 10, "moved {} times in 30 ticks", moves);
}
