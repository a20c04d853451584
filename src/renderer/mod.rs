//! Rendering
//!
//! The simulation publishes a `Snapshot` after every tick; a `RenderSink`
//! decides how (or whether) to draw it.

pub mod ascii;

pub use ascii::AsciiRenderer;

use serde::Serialize;

use crate::sim::{Enemy, GamePhase, GameSession, Missile, Ship};

/// Everything visible after a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub ship: Ship,
    pub enemies: Vec<Enemy>,
    pub player_missiles: Vec<Missile>,
    pub enemy_missiles: Vec<Missile>,
    pub score: u64,
    pub lives: u8,
    pub time_left: f32,
    pub phase: GamePhase,
}

impl From<&GameSession> for Snapshot {
    fn from(session: &GameSession) -> Self {
        Self {
            ship: session.ship.clone(),
            enemies: session.enemies.clone(),
            player_missiles: session.player_missiles.clone(),
            enemy_missiles: session.enemy_missiles.clone(),
            score: session.score,
            lives: session.lives,
            time_left: session.time_left.max(0.0),
            phase: session.phase,
        }
    }
}

/// Receives a snapshot each tick. Drawing is entirely up to the sink.
pub trait RenderSink {
    fn draw(&mut self, snapshot: &Snapshot);
}
