//! Player-vs-obstacle overlap tests
//!
//! Everything is axis-aligned: two entities touch when they share a lane and
//! their vertical spans intersect. Edges touching counts as overlap.

use glam::Vec2;

use super::entity::{Obstacle, ObstacleKind, Player};

/// Axis-aligned rectangle (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// Vertical spans intersect (inclusive)
    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.bottom() >= other.top() && self.top() <= other.bottom()
    }
}

/// What the player touched this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionOutcome {
    /// A regular obstacle overlaps the player
    pub hit_regular: bool,
    /// A checkpoint overlaps the player
    pub hit_checkpoint: bool,
}

impl CollisionOutcome {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Player's bounding box
pub fn player_rect(player: &Player) -> Rect {
    Rect::new(player.pos, Vec2::new(player.width, player.height))
}

/// Same lane and vertical spans intersect
pub fn overlaps(player: &Player, obstacle: &Obstacle, obstacle_size: Vec2) -> bool {
    obstacle.lane == player.lane()
        && Rect::new(obstacle.pos, obstacle_size).overlaps_vertically(&player_rect(player))
}

/// Check the player against every live obstacle
pub fn check_collisions<'a>(
    player: &Player,
    obstacles: impl IntoIterator<Item = &'a Obstacle>,
    obstacle_size: Vec2,
) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::none();
    for obstacle in obstacles {
        if !overlaps(player, obstacle, obstacle_size) {
            continue;
        }
        match obstacle.kind {
            ObstacleKind::Regular => outcome.hit_regular = true,
            ObstacleKind::Checkpoint => outcome.hit_checkpoint = true,
        }
    }
    outcome
}
