//! Missile spawning, movement and culling

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, GameSession, Missile, MissileOwner};
use crate::consts::*;

/// Fire from the player ship. Silently rejected when the live cap is reached
/// or the game is not running; returns whether a missile was spawned.
pub fn fire_player_missile(session: &mut GameSession) -> bool {
    if !session.is_running() || session.player_missiles.len() >= MAX_PLAYER_MISSILES {
        return false;
    }

    let size = session.canvas.missile_size();
    let ship = &session.ship;
    session.player_missiles.push(Missile {
        pos: Vec2::new(ship.pos.x + (ship.size.x - size.x) / 2.0, ship.pos.y - size.y),
        size,
        owner: MissileOwner::Player,
    });
    session.shots_fired += 1;
    session.events.push(GameEvent::PlayerShotFired);
    true
}

/// Fire from a random formation member. Held while any enemy missile is still
/// above the fire line; returns whether a missile was spawned.
pub fn fire_enemy_missile(session: &mut GameSession) -> bool {
    if session.enemies.is_empty() {
        return false;
    }

    let fire_line = session.canvas.enemy_fire_line();
    if session.enemy_missiles.iter().any(|m| m.pos.y < fire_line) {
        return false;
    }

    let index = session.rng.random_range(0..session.enemies.len());
    let enemy = &session.enemies[index];
    let size = session.canvas.missile_size();
    let missile = Missile {
        pos: Vec2::new(
            enemy.pos.x + (enemy.size.x - size.x) / 2.0,
            enemy.pos.y + enemy.size.y,
        ),
        size,
        owner: MissileOwner::Enemy,
    };
    session.enemy_missiles.push(missile);
    true
}

/// Per-tick enemy fire attempt, gated by an `ENEMY_FIRE_CHANCE` draw
pub fn try_enemy_fire(session: &mut GameSession) -> bool {
    if !session.rng.random_bool(ENEMY_FIRE_CHANCE) {
        return false;
    }
    fire_enemy_missile(session)
}

/// Move all missiles and drop the ones that left the playfield
pub fn advance_missiles(session: &mut GameSession, dt: f32) {
    let up = session.player_missile_speed * dt;
    session.player_missiles.retain_mut(|m| {
        m.pos.y -= up;
        m.rect().bottom() >= 0.0
    });

    let down = session.formation.enemy_missile_speed * dt;
    let height = session.canvas.height;
    session.enemy_missiles.retain_mut(|m| {
        m.pos.y += down;
        m.rect().top() <= height
    });
}
