//! Spaceships - A time-limited space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (formation, missiles, collisions, game state)
//! - `game`: Fixed-timestep driver wiring the simulation to its collaborators
//! - `renderer`: Render sink and a text renderer
//! - `audio`: Audio sink with volume gating
//! - `highscores`: Per-player score ledger
//! - `input`: Key bindings to gameplay intents
//! - `settings`: Session configuration

pub mod audio;
pub mod error;
pub mod game;
pub mod highscores;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, StorageError};
pub use game::Game;
pub use highscores::{HighScores, ScoreStore};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (16 ms, about 60 Hz)
    pub const SIM_DT: f32 = 0.016;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest real-time frame fed to the accumulator
    pub const MAX_FRAME_SECS: f32 = 0.25;

    /// Enemy grid layout
    pub const ENEMY_ROWS: u32 = 4;
    pub const ENEMY_COLS: u32 = 5;
    pub const ENEMY_SPACING_H: f32 = 20.0;
    pub const ENEMY_SPACING_V: f32 = 20.0;
    /// Points per row step (bottom row is worth this, each row above adds it again)
    pub const ROW_POINTS_STEP: u64 = 5;

    /// Only the bottom 40% of the canvas is reachable by the player
    pub const PLAYABLE_AREA_FRACTION: f32 = 0.4;
    /// Gap between ship and canvas bottom at spawn
    pub const SHIP_SPAWN_MARGIN: f32 = 20.0;
    /// Closest the ship may get to the canvas bottom
    pub const SHIP_BOTTOM_MARGIN: f32 = 10.0;

    /// Live player missile cap
    pub const MAX_PLAYER_MISSILES: usize = 3;
    /// Enemy side holds fire until every live enemy missile is past this fraction of the height
    pub const ENEMY_FIRE_THRESHOLD: f32 = 0.75;
    /// Per-tick probability of an enemy fire attempt
    pub const ENEMY_FIRE_CHANCE: f64 = 0.01;

    /// Formation escalation
    pub const ESCALATION_PERIOD_SECS: f32 = 5.0;
    pub const ESCALATION_FACTOR: f32 = 1.2;
    pub const MAX_ESCALATIONS: u32 = 4;

    /// Timeout results at or above this score count as a win
    pub const WINNING_SCORE: u64 = 100;

    /// Default session values
    pub const DEFAULT_DURATION_SECS: f32 = 120.0;
    pub const DEFAULT_LIVES: u8 = 3;
    pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;
    pub const DEFAULT_CANVAS_HEIGHT: f32 = 600.0;
}

/// Current unix time in milliseconds (0 if the clock is before the epoch)
pub fn unix_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
