//! Fuel Dash - A lane-dodging arcade game
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (entities, lane spawner, collisions, clock)
//! - `engine`: Host-facing loop driver and clock sources
//! - `render`: Renderer/asset capabilities consumed by the core
//! - `input`: Direction event sources and the per-frame queue
//! - `config`: Data-driven game tunables

pub mod config;
pub mod engine;
pub mod input;
pub mod render;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use engine::{ClockSource, Engine, FrameStatus, ManualClock, SystemClock};
pub use input::{InputQueue, InputSource, NoInput, ScriptedInput};
pub use render::{
    AssetProvider, DefaultAssets, GameSummary, Hud, Renderer, SpriteHandle, TextRenderer, render_frame, render_game_over,
};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const GAME_WIDTH: f32 = 375.0;
    pub const GAME_HEIGHT: f32 = 650.0;

    /// Obstacle size; the width doubles as the lane width
    pub const ENEMY_WIDTH: f32 = 75.0;
    pub const ENEMY_HEIGHT: f32 = 156.0;
    /// Obstacles kept on the field at all times
    pub const MAX_ENEMIES: usize = 3;
    /// Recycled regular obstacles between checkpoint spawns
    pub const CHECKPOINT_COUNT: u32 = 5;

    /// Player size
    pub const PLAYER_WIDTH: f32 = 75.0;
    pub const PLAYER_HEIGHT: f32 = 100.0;
    /// Gap between the player's bottom edge and the field bottom
    pub const PLAYER_BOTTOM_MARGIN: f32 = 10.0;
    /// Lane the player starts in
    pub const PLAYER_START_LANE: usize = 2;

    /// Obstacle speed range (pixels per millisecond), upper bound exclusive
    pub const MIN_SPEED: f32 = 0.25;
    pub const MAX_SPEED: f32 = 0.75;

    /// Fuel granted at start and on every checkpoint pickup (10 seconds)
    pub const FUEL_REPLENISH_MS: u64 = 10_000;

    /// Interchangeable regular obstacle sprites
    pub const REGULAR_SPRITE_VARIANTS: u8 = 6;
}
