//! Error types for configuration and persistence

use thiserror::Error;

/// Rejected session configuration. Fatal to game start.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("game duration must be positive, got {0}s")]
    InvalidDuration(f32),

    #[error("starting lives must be at least 1")]
    NoLives,

    #[error("canvas size must be positive, got {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },

    #[error("canvas {width}x{height} is too small to fit the player ship in its playable band")]
    CanvasTooSmall { width: f32, height: f32 },

    #[error("fire key binding is empty")]
    EmptyFireKey,

    #[error("{name} volume must be within 0.0..=1.0, got {value}")]
    InvalidVolume { name: &'static str, value: f32 },
}

/// Errors reading or writing settings and score files.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
