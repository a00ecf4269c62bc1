//! Per-frame simulation step
//!
//! Advances the game by the real elapsed time since the previous frame.
//! Order within a frame: moves, advance, recycle, refill, clock, pickups,
//! death checks.

use super::collision::{Rect, check_collisions, player_rect};
use super::entity::{Direction, ObstacleKind};
use super::state::{DeathCause, GameEvent, GameState};

/// How far ahead (ms) the autopilot looks when judging a lane unsafe
const AUTOPILOT_LOOKAHEAD_MS: f32 = 450.0;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Direction presses queued since the previous frame, in arrival order
    pub moves: Vec<Direction>,
    /// Idle/demo mode - autopilot steers the player
    pub idle_mode: bool,
}

/// Advance the game state by `elapsed_ms` of wall-clock time
pub fn tick(state: &mut GameState, input: &TickInput, elapsed_ms: u64) {
    // Death is terminal: stray input and time are discarded
    if !state.is_alive() {
        return;
    }

    state.events.clear();
    state.frame_count += 1;

    for &direction in &input.moves {
        state.player.move_dir(direction);
    }
    if input.idle_mode {
        if let Some(direction) = autopilot(state) {
            state.player.move_dir(direction);
        }
    }

    // Obstacles
    state.spawner.advance_all(elapsed_ms as f32);

    let recycled = state.spawner.recycle(state.config.field_height);
    if recycled.regular + recycled.checkpoints > 0 {
        state.events.push(GameEvent::Recycled {
            regular: recycled.regular,
            checkpoints: recycled.checkpoints,
        });
    }

    let spawned = state.spawner.refill(&mut state.rng);
    if spawned > 0 {
        state.events.push(GameEvent::Spawned { count: spawned });
    }

    // Timers
    state.clock.advance(elapsed_ms);

    // Pickups go first so a refuel in the same frame as expiry saves the run
    let outcome = check_collisions(&state.player, state.spawner.obstacles(), state.obstacle_size());
    if outcome.hit_checkpoint {
        collect_checkpoint(state);
    }

    if outcome.hit_regular {
        state.kill(DeathCause::Crash);
    } else if state.clock.fuel_expired() {
        state.kill(DeathCause::OutOfFuel);
    }
}

/// Refuel, count the pickup and clear every checkpoint off the field
fn collect_checkpoint(state: &mut GameState) {
    state.checkpoints_collected += 1;
    state.clock.refuel();
    let flushed = state.spawner.flush_checkpoints();
    state.events.push(GameEvent::CheckpointCollected { flushed });

    // Flushed lanes are refilled right away so the field stays at the cap
    let spawned = state.spawner.refill(&mut state.rng);
    if spawned > 0 {
        state.events.push(GameEvent::Spawned { count: spawned });
    }

    log::info!(
        "Checkpoint {} collected: fuel reset to {}ms",
        state.checkpoints_collected,
        state.clock.fuel_ms
    );
}

/// Pick at most one move for demo play.
///
/// Leaves a lane that is about to be hit, otherwise drifts toward the
/// nearest checkpoint as long as the next lane over is clear.
fn autopilot(state: &GameState) -> Option<Direction> {
    let player = &state.player;
    let lane = player.lane();
    let lane_count = state.spawner.lane_count();
    let danger_zone = player_rect(player);
    let size = state.obstacle_size();

    let threatened = |lane: usize| {
        state.spawner.obstacle_in_lane(lane).is_some_and(|o| {
            if o.kind != ObstacleKind::Regular {
                return false;
            }
            // Stretch the obstacle by how far it travels within the lookahead
            let reach = Rect::new(o.pos, size + glam::Vec2::new(0.0, o.speed * AUTOPILOT_LOOKAHEAD_MS));
            reach.overlaps_vertically(&danger_zone)
        })
    };
    let step = |direction: Direction| -> Option<usize> {
        match direction {
            Direction::Left => lane.checked_sub(1),
            Direction::Right => (lane + 1 < lane_count).then_some(lane + 1),
        }
    };

    let checkpoint_dir = state
        .spawner
        .obstacles()
        .filter(|o| o.kind == ObstacleKind::Checkpoint && o.lane != lane)
        .min_by_key(|o| o.lane.abs_diff(lane))
        .map(|o| if o.lane < lane { Direction::Left } else { Direction::Right });

    let safe = |direction: Direction| step(direction).is_some_and(|next| !threatened(next));

    if threatened(lane) {
        // Prefer dodging toward a checkpoint
        let mut options = [Direction::Left, Direction::Right];
        if checkpoint_dir == Some(Direction::Right) {
            options.reverse();
        }
        return options.into_iter().find(|&d| safe(d));
    }

    checkpoint_dir.filter(|&d| safe(d))
}
