//! Game settings and balance
//!
//! Loaded from a JSON file next to the level data; any missing field keeps
//! its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, GameResult};

/// Weighted value table for ordinary targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardTable {
    /// Score values, one per bucket
    pub values: [u32; 4],
    /// Cumulative thresholds for the first three buckets
    pub thresholds: [f64; 3],
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            values: TARGET_VALUES,
            thresholds: TARGET_THRESHOLDS,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Targets ===
    /// Ordinary targets kept on the grid
    pub target_count: usize,
    /// Collected targets that end the run
    pub collect_threshold: u32,
    /// Value distribution for ordinary targets
    pub rewards: RewardTable,
    /// Rejection-sampling cap for spawn placement
    pub max_placement_attempts: u32,

    // === Movement ===
    /// Player speed in cells per second
    pub player_speed: f32,

    // === Transient target ===
    /// Per-tick spawn chance
    pub transient_spawn_chance: f64,
    /// Travel speed in cells per second
    pub transient_speed: f32,
    /// Bonus score on catch
    pub transient_bonus: u32,

    // === Runtime ===
    /// Display clock cadence (ms)
    pub clock_interval_ms: u64,
    /// Fixed RNG seed; `None` draws one from OS entropy
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_count: TARGET_COUNT,
            collect_threshold: COLLECT_THRESHOLD,
            rewards: RewardTable::default(),
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,

            player_speed: PLAYER_SPEED,

            transient_spawn_chance: TRANSIENT_SPAWN_CHANCE,
            transient_speed: TRANSIENT_SPEED,
            transient_bonus: TRANSIENT_BONUS,

            clock_interval_ms: CLOCK_INTERVAL_MS,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> GameResult<Self> {
        let settings: Settings = serde_json::from_str(json)
            .map_err(|e| GameError::InvalidSettings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
            },
            Err(e) => log::info!("No settings at {} ({}), using defaults", path.display(), e),
        }
        Self::default()
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> GameResult<()> {
        if self.target_count == 0 {
            return Err(GameError::InvalidSettings("target_count must be at least 1".into()));
        }
        if self.collect_threshold == 0 {
            return Err(GameError::InvalidSettings("collect_threshold must be at least 1".into()));
        }
        if !(self.player_speed > 0.0) || !(self.transient_speed > 0.0) {
            return Err(GameError::InvalidSettings("speeds must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.transient_spawn_chance) {
            return Err(GameError::InvalidSettings(
                "transient_spawn_chance must be within [0, 1]".into(),
            ));
        }
        let t = &self.rewards.thresholds;
        let ascending = t.windows(2).all(|w| w[0] <= w[1]);
        if !ascending || t[0] < 0.0 || t[2] > 1.0 {
            return Err(GameError::InvalidSettings(
                "reward thresholds must ascend within [0, 1]".into(),
            ));
        }
        if self.max_placement_attempts == 0 {
            return Err(GameError::InvalidSettings("max_placement_attempts must be at least 1".into()));
        }
        if self.clock_interval_ms == 0 {
            return Err(GameError::InvalidSettings("clock_interval_ms must be at least 1".into()));
        }
        Ok(())
    }

    /// Seed for this run
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.target_count, 3);
        assert_eq!(settings.collect_threshold, 30);
        assert_eq!(settings.rewards.values, [1, 2, 4, 8]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "target_count": 5, "seed": 7 }"#).unwrap();
        assert_eq!(settings.target_count, 5);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.collect_threshold, COLLECT_THRESHOLD);
        assert_eq!(settings.resolve_seed(), 7);
    }

    #[test]
    fn test_unseeded_runs_draw_fresh_seeds() {
        let settings = Settings::default();
        assert_eq!(settings.seed, None);
        assert_ne!(settings.resolve_seed(), settings.resolve_seed());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Settings::from_json(r#"{ "target_count": 0 }"#),
            Err(GameError::InvalidSettings(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "player_speed": -1.0 }"#),
            Err(GameError::InvalidSettings(_))
        ));
        assert!(matches!(
            Settings::from_json(
                r#"{ "rewards": { "values": [1, 2, 4, 8], "thresholds": [0.9, 0.5, 0.95] } }"#
            ),
            Err(GameError::InvalidSettings(_))
        ));
        assert!(Settings::from_json("not json").is_err());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = Settings::load("/nonexistent/tile-collector/settings.json");
        assert_eq!(settings, Settings::default());
    }
}
