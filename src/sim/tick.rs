//! Fixed timestep simulation tick
//!
//! The session state machine: `NotStarted -> Running -> Ended(reason)`.
//! `Ended` is absorbing until the next `new_game`.

use serde::{Deserialize, Serialize};

use super::collision::resolve;
use super::formation::{FormationStep, advance_escalation_timer, move_enemies};
use super::projectiles::{advance_missiles, fire_player_missile, try_enemy_fire};
use super::state::{EndReason, GameEvent, GamePhase, GameSession};
use crate::consts::WINNING_SCORE;

/// Discrete input intents. Device mapping lives in `crate::input`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    MoveLeftStart,
    MoveLeftStop,
    MoveRightStart,
    MoveRightStop,
    MoveUpStart,
    MoveUpStop,
    MoveDownStart,
    MoveDownStop,
    Fire,
}

/// Apply one input intent. Ignored unless the game is running.
pub fn apply_intent(session: &mut GameSession, intent: Intent) {
    if !session.is_running() {
        return;
    }
    let ship = &mut session.ship;
    match intent {
        Intent::MoveLeftStart => ship.moving_left = true,
        Intent::MoveLeftStop => ship.moving_left = false,
        Intent::MoveRightStart => ship.moving_right = true,
        Intent::MoveRightStop => ship.moving_right = false,
        Intent::MoveUpStart => ship.moving_up = true,
        Intent::MoveUpStop => ship.moving_up = false,
        Intent::MoveDownStart => ship.moving_down = true,
        Intent::MoveDownStop => ship.moving_down = false,
        Intent::Fire => {
            fire_player_missile(session);
        }
    }
}

/// Reset everything and enter `Running`. Valid from any phase.
pub fn new_game(session: &mut GameSession) {
    session.reset();
    session.phase = GamePhase::Running;
    log::info!(
        "New game: {}s, {} lives, {} enemies",
        session.time_left,
        session.lives,
        session.enemies.len()
    );
}

/// Advance the game state by one fixed timestep
pub fn tick(session: &mut GameSession, dt: f32) {
    // Don't tick unless running
    if !session.is_running() {
        return;
    }

    session.time_ticks += 1;
    session.time_left -= dt;
    if session.time_left <= 0.0 {
        end_game(session, EndReason::Timeout);
        return;
    }

    let canvas = session.canvas;
    session.ship.step(&canvas, dt);

    if let Some(level) = advance_escalation_timer(&mut session.formation, dt) {
        session.events.push(GameEvent::Escalated { level });
    }

    let step = move_enemies(
        &mut session.formation,
        &mut session.enemies,
        canvas.width,
        dt,
    );
    if step == FormationStep::Cleared {
        end_game(session, EndReason::Victory);
        return;
    }

    advance_missiles(session, dt);
    try_enemy_fire(session);

    if let Some(reason) = resolve(session).end_reason() {
        end_game(session, reason);
    }
}

/// Enter `Ended(reason)` and record the result message. No-op unless running,
/// so a game ends exactly once.
pub fn end_game(session: &mut GameSession, reason: EndReason) {
    if !session.is_running() {
        return;
    }
    session.phase = GamePhase::Ended(reason);
    let message = result_message(reason, session.score);
    log::info!(
        "Game over ({:?}): {} | score {}, shots {}, {:.1}s left",
        reason,
        message,
        session.score,
        session.shots_fired,
        session.time_left.max(0.0)
    );
    session.message = Some(message);
    session.events.push(GameEvent::GameEnded(reason));
}

/// Result text shown when a game ends
pub fn result_message(reason: EndReason, score: u64) -> String {
    match reason {
        EndReason::Victory => "Champion!".to_string(),
        EndReason::Defeat => "You Lost!".to_string(),
        EndReason::Timeout if score < WINNING_SCORE => {
            format!("You can do better. Score: {}", score)
        }
        EndReason::Timeout => "Winner!".to_string(),
    }
}

/// Countdown as `m:ss`, whole seconds rounded down
pub fn format_time(time_left: f32) -> String {
    let total = time_left.max(0.0).floor() as u32;
    format!("{}:{:02}", total / 60, total % 60)
}
