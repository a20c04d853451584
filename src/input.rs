//! Keyboard mapping
//!
//! Turns raw key names (as reported by the platform, e.g. "ArrowLeft", " ",
//! "f") into simulation intents. The arrow keys are fixed; the fire key comes
//! from `Settings::fire_key`.

use crate::settings::Settings;
use crate::sim::Intent;

/// Key press or release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

/// Raw key name to intent mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    fire_key: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new("Space")
    }
}

impl KeyBindings {
    pub fn new(fire_key: &str) -> Self {
        let fire_key = if fire_key == " " { fire_key } else { fire_key.trim() };
        Self {
            fire_key: fire_key.to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.fire_key)
    }

    pub fn fire_key(&self) -> &str {
        &self.fire_key
    }

    /// Whether `key` is the configured fire key. Case-insensitive; the space
    /// bar matches both " " and "Space".
    pub fn is_fire_key(&self, key: &str) -> bool {
        let is_space = |k: &str| k == " " || k.eq_ignore_ascii_case("space");
        if is_space(&self.fire_key) {
            return is_space(key);
        }
        key.eq_ignore_ascii_case(&self.fire_key)
    }

    /// Map a key event to intents, movement first. Movement and fire are
    /// checked separately, so a fire key bound to an arrow does both.
    /// Firing happens on press only.
    pub fn map(&self, key: &str, action: KeyAction) -> Vec<Intent> {
        let mut intents = Vec::with_capacity(2);
        let movement = match (key, action) {
            ("ArrowLeft", KeyAction::Down) => Some(Intent::MoveLeftStart),
            ("ArrowLeft", KeyAction::Up) => Some(Intent::MoveLeftStop),
            ("ArrowRight", KeyAction::Down) => Some(Intent::MoveRightStart),
            ("ArrowRight", KeyAction::Up) => Some(Intent::MoveRightStop),
            ("ArrowUp", KeyAction::Down) => Some(Intent::MoveUpStart),
            ("ArrowUp", KeyAction::Up) => Some(Intent::MoveUpStop),
            ("ArrowDown", KeyAction::Down) => Some(Intent::MoveDownStart),
            ("ArrowDown", KeyAction::Up) => Some(Intent::MoveDownStop),
            _ => None,
        };
        intents.extend(movement);
        if action == KeyAction::Down && self.is_fire_key(key) {
            intents.push(Intent::Fire);
        }
        intents
    }
}
