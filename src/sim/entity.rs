//! Player and obstacle entities

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// Lateral move command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Kills the player on overlap
    #[default]
    Regular,
    /// Refuels the player on overlap
    Checkpoint,
}

/// A descending obstacle occupying one lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub lane: usize,
    /// Top-left corner; y grows downward
    pub pos: Vec2,
    /// Pixels per millisecond, fixed at spawn
    pub speed: f32,
    /// Sprite variant picked at spawn (only meaningful for regular obstacles)
    pub sprite_variant: u8,
}

impl Obstacle {
    /// Move down by `speed * elapsed_ms`
    pub fn advance(&mut self, elapsed_ms: f32) {
        self.pos.y += self.speed * elapsed_ms;
    }

    pub fn is_checkpoint(&self) -> bool {
        self.kind == ObstacleKind::Checkpoint
    }
}

/// The player's vehicle, quantized to lanes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Rightmost allowed x
    max_x: f32,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pos: Vec2::new(
                config.player_start_lane as f32 * config.player_width,
                config.player_y(),
            ),
            width: config.player_width,
            height: config.player_height,
            max_x: config.player_max_x(),
        }
    }

    /// Shift one lane; moves past either boundary are ignored
    pub fn move_dir(&mut self, direction: Direction) {
        match direction {
            Direction::Left if self.pos.x > 0.0 => self.pos.x -= self.width,
            Direction::Right if self.pos.x < self.max_x => self.pos.x += self.width,
            _ => {}
        }
    }

    /// Lane index the player currently occupies
    pub fn lane(&self) -> usize {
        (self.pos.x / self.width).round() as usize
    }
}
