//! Score and fuel timers
//!
//! Both are driven only by the elapsed time the loop samples each frame.
//! There is no independent timer, so a refuel can never be overtaken by a
//! stale expiry.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    /// Accumulated milliseconds survived
    pub score: u64,
    /// Milliseconds of fuel left
    pub fuel_ms: u64,
    /// Amount a checkpoint refuels to
    replenish_ms: u64,
}

impl GameClock {
    pub fn new(replenish_ms: u64) -> Self {
        Self {
            score: 0,
            fuel_ms: replenish_ms,
            replenish_ms,
        }
    }

    /// Add elapsed time to the score and burn the same amount of fuel
    pub fn advance(&mut self, elapsed_ms: u64) {
        self.score = self.score.saturating_add(elapsed_ms);
        self.fuel_ms = self.fuel_ms.saturating_sub(elapsed_ms);
    }

    /// Reset fuel to the full amount (does not stack)
    pub fn refuel(&mut self) {
        self.fuel_ms = self.replenish_ms;
    }

    pub fn fuel_expired(&self) -> bool {
        self.fuel_ms == 0
    }

    /// Remaining fuel in whole seconds, rounded up
    pub fn fuel_seconds(&self) -> u64 {
        self.fuel_ms.div_ceil(1000)
    }

    pub fn replenish_ms(&self) -> u64 {
        self.replenish_ms
    }
}
