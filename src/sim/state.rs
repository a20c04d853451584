//! Game state and core simulation types
//!
//! `GameSession` owns everything a running game mutates. The component
//! functions in `formation`, `projectiles` and `collision` borrow it for the
//! length of a call and keep nothing between ticks.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::formation::build_grid;
use super::rect::Rect;
use crate::consts::*;
use crate::error::ConfigError;
use crate::settings::Settings;

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Every enemy destroyed
    Victory,
    /// Out of lives
    Defeat,
    /// Clock ran out
    Timeout,
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Constructed, waiting for a new-game request
    NotStarted,
    /// Ticks are processed
    Running,
    /// Absorbing until the next new game
    Ended(EndReason),
}

/// Gameplay events for collaborators (audio, HUD, logging).
/// Drained by the driver after each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerShotFired,
    EnemyShipHit { points: u64 },
    PlayerShipHit { lives_left: u8 },
    /// Formation sped up; `level` counts from 1
    Escalated { level: u32 },
    GameEnded(EndReason),
}

/// Playfield dimensions and the entity geometry derived from them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Player ship is square, 1/16 of the width
    pub fn ship_size(&self) -> Vec2 {
        Vec2::splat(self.width / 16.0)
    }

    /// Enemy ships are square, 1/20 of the width
    pub fn enemy_size(&self) -> Vec2 {
        Vec2::splat(self.width / 20.0)
    }

    /// Both missile variants share one size
    pub fn missile_size(&self) -> Vec2 {
        Vec2::new(self.width / 40.0, self.height / 10.0)
    }

    /// Highest y the ship may reach (top of the playable band)
    pub fn playable_top(&self) -> f32 {
        self.height * (1.0 - PLAYABLE_AREA_FRACTION)
    }

    /// Lowest y the ship may reach
    pub fn ship_max_y(&self) -> f32 {
        self.height - self.ship_size().y - SHIP_BOTTOM_MARGIN
    }

    /// Rightmost x the ship may reach
    pub fn ship_max_x(&self) -> f32 {
        self.width - self.ship_size().x
    }

    /// Horizontally centered, near the bottom
    pub fn ship_spawn(&self) -> Vec2 {
        let size = self.ship_size();
        Vec2::new(
            (self.width - size.x) / 2.0,
            self.height - size.y - SHIP_SPAWN_MARGIN,
        )
    }

    /// Enemy missiles above this line block further enemy fire
    pub fn enemy_fire_line(&self) -> f32 {
        self.height * ENEMY_FIRE_THRESHOLD
    }

    /// Total width of the enemy grid including trailing spacing
    pub fn grid_width(&self) -> f32 {
        ENEMY_COLS as f32 * (self.enemy_size().x + ENEMY_SPACING_H)
    }

    /// Whether the spawn point lies in the playable band and the grid fits
    pub fn fits_layout(&self) -> bool {
        let spawn = self.ship_spawn();
        spawn.y >= self.playable_top() && spawn.y <= self.ship_max_y() && self.grid_width() <= self.width
    }
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per second on each axis
    pub speed: f32,
    pub moving_left: bool,
    pub moving_right: bool,
    pub moving_up: bool,
    pub moving_down: bool,
}

impl Ship {
    /// A stationary ship at the spawn point
    pub fn spawn(canvas: &Canvas) -> Self {
        Self {
            pos: canvas.ship_spawn(),
            size: canvas.ship_size(),
            speed: canvas.width / 6.0,
            moving_left: false,
            moving_right: false,
            moving_up: false,
            moving_down: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Put the ship back at the spawn point. Movement intent is kept.
    pub fn respawn(&mut self, canvas: &Canvas) {
        self.pos = canvas.ship_spawn();
    }

    /// Move per the intent flags, clamped to the playable band
    pub fn step(&mut self, canvas: &Canvas, dt: f32) {
        let delta = self.speed * dt;
        let mut dir = Vec2::ZERO;
        if self.moving_left {
            dir.x -= 1.0;
        }
        if self.moving_right {
            dir.x += 1.0;
        }
        if self.moving_up {
            dir.y -= 1.0;
        }
        if self.moving_down {
            dir.y += 1.0;
        }

        let target = self.pos + dir * delta;
        self.pos.x = target.x.clamp(0.0, canvas.ship_max_x());
        self.pos.y = target.y.clamp(canvas.playable_top(), canvas.ship_max_y());
    }
}

/// A formation member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    /// 0 is the top row
    pub row: u32,
    pub points: u64,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Who fired a missile (and so which way it travels)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissileOwner {
    /// Travels up
    Player,
    /// Travels down
    Enemy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Missile {
    pub pos: Vec2,
    pub size: Vec2,
    pub owner: MissileOwner,
}

impl Missile {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Shared movement state of the enemy block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    /// +1 moving right, -1 moving left
    pub direction: f32,
    /// Horizontal speed in pixels per second
    pub speed: f32,
    /// Enemy missiles share the formation's escalation
    pub enemy_missile_speed: f32,
    /// Escalations applied this session (at most `MAX_ESCALATIONS`)
    pub acceleration_count: u32,
    /// Seconds of running time since the last escalation step
    pub escalation_timer: f32,
}

impl Formation {
    pub fn new(canvas: &Canvas) -> Self {
        Self {
            direction: 1.0,
            speed: canvas.width / 6.0,
            enemy_missile_speed: canvas.height / 3.0,
            acceleration_count: 0,
            escalation_timer: 0.0,
        }
    }
}

/// Complete state of one game session
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Validated configuration the session was built from
    pub settings: Settings,
    pub canvas: Canvas,
    /// Seed of the current RNG stream
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    /// Seconds remaining
    pub time_left: f32,
    pub shots_fired: u32,
    /// Ticks processed since the last new game
    pub time_ticks: u64,
    pub ship: Ship,
    pub enemies: Vec<Enemy>,
    pub player_missiles: Vec<Missile>,
    pub enemy_missiles: Vec<Missile>,
    pub formation: Formation,
    /// Pixels per second, constant for a session
    pub player_missile_speed: f32,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Result text, set when the game ends
    pub message: Option<String>,
}

impl GameSession {
    /// Create a session in `NotStarted`, rejecting invalid settings
    pub fn new(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;
        let canvas = settings.canvas();

        let mut session = Self {
            canvas,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::NotStarted,
            score: 0,
            lives: settings.starting_lives,
            time_left: settings.duration_secs,
            shots_fired: 0,
            time_ticks: 0,
            ship: Ship::spawn(&canvas),
            enemies: Vec::new(),
            player_missiles: Vec::new(),
            enemy_missiles: Vec::new(),
            formation: Formation::new(&canvas),
            player_missile_speed: canvas.height / 2.0,
            events: Vec::new(),
            message: None,
            settings,
        };
        session.reset();
        Ok(session)
    }

    /// Restore every session value to its starting state. Phase is untouched.
    pub fn reset(&mut self) {
        self.score = 0;
        self.lives = self.settings.starting_lives;
        self.time_left = self.settings.duration_secs;
        self.shots_fired = 0;
        self.time_ticks = 0;
        self.ship = Ship::spawn(&self.canvas);
        self.enemies = build_grid(&self.canvas);
        self.player_missiles.clear();
        self.enemy_missiles.clear();
        self.formation = Formation::new(&self.canvas);
        self.player_missile_speed = self.canvas.height / 2.0;
        self.events.clear();
        self.message = None;
    }

    /// Start a fresh RNG stream (used between games so runs differ)
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
