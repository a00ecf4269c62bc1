//! Frame-driven simulation module
//!
//! All gameplay logic lives here:
//! - Variable timestep (real elapsed milliseconds per frame)
//! - Seeded RNG only
//! - Stable iteration order (by lane)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod entity;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::GameClock;
pub use collision::{CollisionOutcome, Rect, check_collisions, overlaps};
pub use entity::{Direction, Obstacle, ObstacleKind, Player};
pub use spawner::{LaneSpawner, Recycled};
pub use state::{DeathCause, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
