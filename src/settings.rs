//! Game settings and tuning
//!
//! Loaded from an optional JSON file; every field has a default so partial
//! files are accepted.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Enemies spawned per room for this preset
    pub fn enemy_count(&self) -> usize {
        match self {
            Difficulty::Easy => ENEMY_COUNT / 2,
            Difficulty::Normal => ENEMY_COUNT,
            Difficulty::Hard => ENEMY_COUNT + ENEMY_COUNT / 2,
        }
    }

    /// Heart drop chance for this preset
    pub fn heart_drop_chance(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Normal => HEART_DROP_CHANCE,
            Difficulty::Hard => 0.15,
        }
    }
}

/// Game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty preset the numbers below were derived from
    pub difficulty: Difficulty,
    /// Enemies spawned in each generated room
    pub enemy_count: usize,
    /// Probability (0.0 - 1.0) that a dying enemy drops a heart
    pub heart_drop_chance: f32,
    /// Player walking speed in pixels per second
    pub player_speed: f32,
    /// Seconds the player is invulnerable after taking a hit
    pub invulnerable_duration: f32,
    /// Seconds the camera takes to shift into the next room
    pub shift_duration: f32,
    /// Seed for room generation
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            enemy_count: ENEMY_COUNT,
            heart_drop_chance: HEART_DROP_CHANCE,
            player_speed: PLAYER_SPEED,
            invulnerable_duration: INVULNERABLE_DURATION,
            shift_duration: SHIFT_DURATION,
            seed: 0,
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset (applies preset defaults)
    pub fn from_preset(preset: Difficulty) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a difficulty preset (updates difficulty-dependent settings)
    pub fn apply_preset(&mut self, preset: Difficulty) {
        self.difficulty = preset;
        self.enemy_count = preset.enemy_count();
        self.heart_drop_chance = preset.heart_drop_chance();
    }

    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json_string(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = self.to_json_string()?;
        fs::write(path, json).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=1.0).contains(&self.heart_drop_chance) {
            return Err(SettingsError::Invalid {
                field: "heart_drop_chance",
                reason: format!("{} is outside 0.0..=1.0", self.heart_drop_chance),
            });
        }
        if !self.player_speed.is_finite() || self.player_speed < 0.0 {
            return Err(SettingsError::Invalid {
                field: "player_speed",
                reason: format!("{} is not a non-negative speed", self.player_speed),
            });
        }
        if !self.shift_duration.is_finite() || self.shift_duration <= 0.0 {
            return Err(SettingsError::Invalid {
                field: "shift_duration",
                reason: format!("{} must be positive", self.shift_duration),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_changes_population() {
        let easy = Settings::from_preset(Difficulty::Easy);
        let hard = Settings::from_preset(Difficulty::Hard);
        assert!(easy.enemy_count < hard.enemy_count);
        assert!(easy.heart_drop_chance > hard.heart_drop_chance);
        assert_eq!(Settings::from_preset(Difficulty::Normal), Settings::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json_str(r#"{ "enemy_count": 3, "seed": 7 }"#).unwrap();
        assert_eq!(settings.enemy_count, 3);
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.player_speed, PLAYER_SPEED);
    }

    #[test]
    fn test_rejects_bad_drop_chance() {
        let err = Settings::from_json_str(r#"{ "heart_drop_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "heart_drop_chance",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Settings::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::parse("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("norm"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::parse("nightmare"), None);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("pot_dungeon_settings_{}.json", std::process::id()));
        let settings = Settings {
            seed: 42,
            ..Settings::from_preset(Difficulty::Hard)
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = Settings::load("/definitely/not/here/settings.json").unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }
}
