//! Missile hit resolution
//!
//! Player missiles against the formation, enemy missiles against the ship.
//! Hits are applied to the session immediately: score, lives, removal.

use super::state::{EndReason, GameEvent, GameSession};

/// Terminal condition produced by a collision pass, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    None,
    Victory,
    Defeat,
}

impl CollisionOutcome {
    pub fn end_reason(self) -> Option<EndReason> {
        match self {
            CollisionOutcome::None => None,
            CollisionOutcome::Victory => Some(EndReason::Victory),
            CollisionOutcome::Defeat => Some(EndReason::Defeat),
        }
    }
}

/// Resolve player missiles against enemies. Each missile kills at most one
/// enemy; a missile and its target are both removed.
///
/// Both lists are walked from the back, so a missile spanning two rows takes
/// the lower one.
pub fn resolve_player_hits(session: &mut GameSession) -> CollisionOutcome {
    let mut i = session.player_missiles.len();
    while i > 0 {
        i -= 1;
        let missile = session.player_missiles[i].rect();
        let Some(j) = session
            .enemies
            .iter()
            .rposition(|e| missile.overlaps(&e.rect()))
        else {
            continue;
        };

        let enemy = session.enemies.remove(j);
        session.player_missiles.remove(i);
        session.score += enemy.points;
        session.events.push(GameEvent::EnemyShipHit {
            points: enemy.points,
        });
        log::debug!(
            "Enemy in row {} destroyed (+{}, score {})",
            enemy.row,
            enemy.points,
            session.score
        );
    }

    if session.enemies.is_empty() {
        CollisionOutcome::Victory
    } else {
        CollisionOutcome::None
    }
}

/// Resolve enemy missiles against the ship, newest missile first. One hit
/// costs a life, removes the missile and respawns the ship; other missiles
/// are tested again next tick against the respawned ship.
pub fn resolve_enemy_hits(session: &mut GameSession) -> CollisionOutcome {
    let ship = session.ship.rect();
    let Some(i) = session
        .enemy_missiles
        .iter()
        .rposition(|m| m.rect().overlaps(&ship))
    else {
        return CollisionOutcome::None;
    };

    session.enemy_missiles.remove(i);
    session.lives = session.lives.saturating_sub(1);
    session.ship.respawn(&session.canvas);
    session.events.push(GameEvent::PlayerShipHit {
        lives_left: session.lives,
    });
    log::debug!("Player hit, {} lives left", session.lives);

    if session.lives == 0 {
        CollisionOutcome::Defeat
    } else {
        CollisionOutcome::None
    }
}

/// Full collision pass. Victory takes precedence: once the formation is gone
/// the enemy side is not resolved.
pub fn resolve(session: &mut GameSession) -> CollisionOutcome {
    match resolve_player_hits(session) {
        CollisionOutcome::None => resolve_enemy_hits(session),
        outcome => outcome,
    }
}
