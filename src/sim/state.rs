//! Game state and core simulation types
//!
//! Everything the loop mutates lives here and is only touched by `tick`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::GameClock;
use super::entity::{Obstacle, Player};
use super::spawner::LaneSpawner;
use crate::config::{ConfigError, GameConfig};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Alive,
    /// Run ended; terminal
    Dead,
}

/// Why the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Overlapped a regular obstacle
    Crash,
    /// Fuel countdown hit zero
    OutOfFuel,
}

/// Notable things that happened during the last tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Obstacles fell off the bottom and were freed
    Recycled { regular: u32, checkpoints: u32 },
    /// New obstacles entered the field
    Spawned { count: usize },
    /// Player picked up a checkpoint; `flushed` counts every removed checkpoint
    CheckpointCollected { flushed: usize },
    Died(DeathCause),
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: GameConfig,
    pub phase: GamePhase,
    /// Set once the phase becomes Dead
    pub death_cause: Option<DeathCause>,
    pub player: Player,
    pub spawner: LaneSpawner,
    pub clock: GameClock,
    pub checkpoints_collected: u32,
    /// Frames simulated while alive
    pub frame_count: u64,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new game with the lanes already filled.
    ///
    /// Fails if `config` does not pass [`GameConfig::validate`].
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut state = Self {
            seed,
            player: Player::new(&config),
            spawner: LaneSpawner::new(&config),
            clock: GameClock::new(config.fuel_replenish_ms),
            config,
            phase: GamePhase::Alive,
            death_cause: None,
            checkpoints_collected: 0,
            frame_count: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };

        state.spawner.refill(&mut state.rng);
        log::info!(
            "New game: seed={}, lanes={}, obstacles={}",
            seed,
            state.spawner.lane_count(),
            state.spawner.live_count()
        );

        Ok(state)
    }

    pub fn is_alive(&self) -> bool {
        self.phase == GamePhase::Alive
    }

    pub fn score(&self) -> u64 {
        self.clock.score
    }

    pub fn fuel_remaining_ms(&self) -> u64 {
        self.clock.fuel_ms
    }

    pub fn deleted_obstacle_count(&self) -> u32 {
        self.spawner.deleted_obstacle_count()
    }

    /// Live obstacles in lane order
    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.spawner.obstacles()
    }

    pub fn obstacle_size(&self) -> Vec2 {
        Vec2::new(self.config.enemy_width, self.config.enemy_height)
    }

    /// Transition to the terminal phase (first cause wins)
    pub(crate) fn kill(&mut self, cause: DeathCause) {
        if !self.is_alive() {
            return;
        }
        self.phase = GamePhase::Dead;
        self.death_cause = Some(cause);
        self.events.push(GameEvent::Died(cause));
        log::info!(
            "Game over ({:?}): score={}, checkpoints={}, fuel={}ms",
            cause,
            self.clock.score,
            self.checkpoints_collected,
            self.clock.fuel_ms
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_is_populated() {
        let state = GameState::new(GameConfig::default(), 42).expect("default config");
        assert!(state.is_alive());
        assert_eq!(state.obstacles().count(), 3);
        assert_eq!(state.fuel_remaining_ms(), 10_000);
        assert_eq!(state.score(), 0);
        assert_eq!(state.deleted_obstacle_count(), 0);
    }

    #[test]
    fn test_kill_is_terminal() {
        let mut state = GameState::new(GameConfig::default(), 42).expect("default config");
        state.kill(DeathCause::OutOfFuel);
        state.kill(DeathCause::Crash);
        assert_eq!(state.phase, GamePhase::Dead);
        assert_eq!(state.death_cause, Some(DeathCause::OutOfFuel));
        assert_eq!(state.events, vec![GameEvent::Died(DeathCause::OutOfFuel)]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let configs = [
            GameConfig {
                min_speed: 0.5,
                max_speed: 0.5,
                ..Default::default()
            },
            GameConfig {
                regular_sprite_variants: 0,
                ..Default::default()
            },
            GameConfig {
                enemy_width: 0.0,
                ..Default::default()
            },
            GameConfig {
                max_enemies: 5,
                ..Default::default()
            },
        ];
        for config in configs {
            let result = GameState::new(config, 1);
            assert!(matches!(result, Err(ConfigError::Invalid(_))));
        }
    }
}
