//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, audio or storage dependencies (collaborators read
//!   `GameSession::events` and snapshots instead)

pub mod collision;
pub mod formation;
pub mod projectiles;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{CollisionOutcome, resolve, resolve_enemy_hits, resolve_player_hits};
pub use formation::{FormationStep, build_grid, escalate, move_enemies};
pub use projectiles::{advance_missiles, fire_enemy_missile, fire_player_missile, try_enemy_fire};
pub use rect::Rect;
pub use state::{
    Canvas, EndReason, Enemy, Formation, GameEvent, GamePhase, GameSession, Missile,
    MissileOwner, Ship,
};
pub use tick::{Intent, apply_intent, end_game, format_time, new_game, result_message, tick};
