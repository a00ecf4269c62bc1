//! Game tunables
//!
//! Loaded from JSON by the host; every field falls back to the arcade defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a [`GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// All tunable game parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Playfield ===
    pub field_width: f32,
    pub field_height: f32,

    // === Obstacles ===
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub max_enemies: usize,
    /// Recycled regular obstacles needed before a checkpoint spawns
    pub checkpoint_count: u32,
    /// Speed range in pixels/ms (`min_speed..max_speed`)
    pub min_speed: f32,
    pub max_speed: f32,
    pub regular_sprite_variants: u8,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    pub player_bottom_margin: f32,
    pub player_start_lane: usize,

    // === Fuel ===
    /// Fuel at game start and after every pickup
    pub fuel_replenish_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: GAME_WIDTH,
            field_height: GAME_HEIGHT,

            enemy_width: ENEMY_WIDTH,
            enemy_height: ENEMY_HEIGHT,
            max_enemies: MAX_ENEMIES,
            checkpoint_count: CHECKPOINT_COUNT,
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            regular_sprite_variants: REGULAR_SPRITE_VARIANTS,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_bottom_margin: PLAYER_BOTTOM_MARGIN,
            player_start_lane: PLAYER_START_LANE,

            fuel_replenish_ms: FUEL_REPLENISH_MS,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Number of lane slots across the field
    pub fn lane_count(&self) -> usize {
        (self.field_width / self.enemy_width) as usize
    }

    /// x-coordinate of a lane slot
    pub fn lane_x(&self, lane: usize) -> f32 {
        lane as f32 * self.enemy_width
    }

    /// Fixed y of the player's top edge
    pub fn player_y(&self) -> f32 {
        self.field_height - self.player_height - self.player_bottom_margin
    }

    /// Rightmost x the player may occupy
    pub fn player_max_x(&self) -> f32 {
        self.field_width - self.player_width
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        // NaN and infinities fail too
        let positive = |v: f32| v > 0.0 && v.is_finite();
        if !(positive(self.field_width) && positive(self.field_height)) {
            return invalid("field dimensions must be positive");
        }
        if !(positive(self.enemy_width) && positive(self.enemy_height)) {
            return invalid("obstacle dimensions must be positive");
        }
        if !(positive(self.player_width) && positive(self.player_height)) {
            return invalid("player dimensions must be positive");
        }
        if !(self.player_bottom_margin >= 0.0) {
            return invalid("player_bottom_margin must not be negative");
        }
        if (self.field_width % self.enemy_width) != 0.0 {
            return invalid("field width must be a whole number of lanes");
        }
        // Collision compares lane x, so both grids must coincide
        if self.player_width != self.enemy_width {
            return invalid("player width must equal lane width");
        }
        if self.player_y() < 0.0 {
            return invalid("player does not fit in the field");
        }
        if self.max_enemies >= self.lane_count() {
            return invalid("max_enemies must be less than the lane count");
        }
        if self.player_start_lane >= self.lane_count() {
            return invalid("player_start_lane is outside the field");
        }
        if self.checkpoint_count == 0 {
            return invalid("checkpoint_count must be at least 1");
        }
        if !(self.min_speed > 0.0 && self.min_speed < self.max_speed) {
            return invalid("speed range must be positive and non-empty");
        }
        if self.fuel_replenish_ms == 0 {
            return invalid("fuel_replenish_ms must be positive");
        }
        if self.regular_sprite_variants == 0 {
            return invalid("at least one regular sprite variant is required");
        }
        Ok(())
    }
}
