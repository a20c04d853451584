//! Session settings
//!
//! Everything a new game is constructed from. Persisted as JSON next to the
//! score ledger.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, StorageError};
use crate::sim::Canvas;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Length of a game in seconds
    pub duration_secs: f32,
    /// Lives at game start
    pub starting_lives: u8,
    /// Key name that fires a missile (arrow keys are fixed)
    pub fire_key: String,

    // === Playfield ===
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    /// Identity scores are recorded under. No identity, no recorded score.
    pub player: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            starting_lives: DEFAULT_LIVES,
            fire_key: "Space".to_string(),

            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            player: None,
        }
    }
}

impl Settings {
    /// Settings with the game length given in whole minutes
    pub fn with_minutes(minutes: u32) -> Self {
        Self {
            duration_secs: minutes as f32 * 60.0,
            ..Self::default()
        }
    }

    /// Playfield geometry for these settings
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.canvas_width, self.canvas_height)
    }

    /// Reject settings a game cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(ConfigError::InvalidDuration(self.duration_secs));
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::NoLives);
        }

        let (width, height) = (self.canvas_width, self.canvas_height);
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(ConfigError::InvalidCanvas { width, height });
        }
        if !self.canvas().fits_layout() {
            return Err(ConfigError::CanvasTooSmall { width, height });
        }

        // A lone space is the space bar, anything else blank is unbound
        if self.fire_key != " " && self.fire_key.trim().is_empty() {
            return Err(ConfigError::EmptyFireKey);
        }

        for (name, value) in [("master", self.master_volume), ("sfx", self.sfx_volume)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidVolume { name, value });
            }
        }

        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        let json = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(StorageError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.validate(), Ok(()));
        assert_eq!(settings.duration_secs, 120.0);
        assert_eq!(settings.starting_lives, 3);
    }

    #[test]
    fn test_with_minutes() {
        assert_eq!(Settings::with_minutes(3).duration_secs, 180.0);
    }

    #[test]
    fn test_rejects_bad_duration() {
        for duration_secs in [0.0, -5.0, f32::NAN] {
            let settings = Settings {
                duration_secs,
                ..Default::default()
            };
            assert!(matches!(
                settings.validate(),
                Err(ConfigError::InvalidDuration(_))
            ));
        }
    }

    #[test]
    fn test_rejects_zero_lives() {
        let settings = Settings {
            starting_lives: 0,
            ..Default::default()
        };
        assert_eq!(settings.validate(), Err(ConfigError::NoLives));
    }

    #[test]
    fn test_rejects_bad_canvas() {
        let settings = Settings {
            canvas_width: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidCanvas { .. })
        ));

        let settings = Settings {
            canvas_width: 100.0,
            canvas_height: 40.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::CanvasTooSmall { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_fire_key_and_volume() {
        let settings = Settings {
            fire_key: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(settings.validate(), Err(ConfigError::EmptyFireKey));

        let settings = Settings {
            fire_key: " ".to_string(),
            ..Default::default()
        };
        assert_eq!(settings.validate(), Ok(()));

        let settings = Settings {
            sfx_volume: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidVolume { name: "sfx", .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = Settings {
            fire_key: "F".to_string(),
            player: Some("ada".to_string()),
            ..Settings::with_minutes(1)
        };
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_or_default_missing_and_partial() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert_eq!(Settings::load_or_default(&missing), Settings::default());

        let partial = dir.path().join("partial.json");
        std::fs::write(&partial, r#"{ "starting_lives": 5 }"#).unwrap();
        let loaded = Settings::load_or_default(&partial);
        assert_eq!(loaded.starting_lives, 5);
        assert_eq!(loaded.fire_key, "Space");

        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, "not json").unwrap();
        assert_eq!(Settings::load_or_default(&garbage), Settings::default());
    }
}
