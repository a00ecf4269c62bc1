//! Lane spawner
//!
//! Owns the lane table. Each slot holds at most one obstacle, so lane
//! uniqueness holds by construction. Every frame the loop advances the
//! table, recycles what fell off the bottom and refills up to the cap.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::entity::{Obstacle, ObstacleKind};
use crate::config::GameConfig;

/// What a recycling pass removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Recycled {
    pub regular: u32,
    pub checkpoints: u32,
}

/// Fixed lane slots plus the checkpoint cadence counter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneSpawner {
    lanes: Vec<Option<Obstacle>>,
    lane_width: f32,
    spawn_y: f32,
    max_obstacles: usize,
    checkpoint_count: u32,
    min_speed: f32,
    max_speed: f32,
    sprite_variants: u8,
    /// Regular obstacles recycled and not yet paid out as a checkpoint
    deleted_regular: u32,
    /// Total checkpoints emitted this run
    checkpoints_spawned: u32,
    next_id: u32,
}

impl LaneSpawner {
    /// `config` must already have passed [`GameConfig::validate`]
    pub(crate) fn new(config: &GameConfig) -> Self {
        Self {
            lanes: vec![None; config.lane_count()],
            lane_width: config.enemy_width,
            spawn_y: -config.enemy_height,
            max_obstacles: config.max_enemies,
            checkpoint_count: config.checkpoint_count,
            min_speed: config.min_speed,
            max_speed: config.max_speed,
            sprite_variants: config.regular_sprite_variants,
            deleted_regular: 0,
            checkpoints_spawned: 0,
            next_id: 1,
        }
    }

    /// Live obstacles in lane order
    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.lanes.iter().flatten()
    }

    pub fn obstacle_in_lane(&self, lane: usize) -> Option<&Obstacle> {
        self.lanes.get(lane).and_then(Option::as_ref)
    }

    pub fn live_count(&self) -> usize {
        self.lanes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Indices of unoccupied lanes
    pub fn free_lanes(&self) -> Vec<usize> {
        self.lanes
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(lane, _)| lane)
            .collect()
    }

    pub fn deleted_obstacle_count(&self) -> u32 {
        self.deleted_regular
    }

    pub fn checkpoints_spawned(&self) -> u32 {
        self.checkpoints_spawned
    }

    /// Move every live obstacle down by its own speed
    pub fn advance_all(&mut self, elapsed_ms: f32) {
        for obstacle in self.lanes.iter_mut().flatten() {
            obstacle.advance(elapsed_ms);
        }
    }

    /// Free every lane whose obstacle has fallen below `field_height`.
    ///
    /// Only regular obstacles count toward the next checkpoint; a checkpoint
    /// that scrolls away unconsumed is just lost.
    pub fn recycle(&mut self, field_height: f32) -> Recycled {
        let mut recycled = Recycled::default();
        for slot in &mut self.lanes {
            let off_screen = slot.as_ref().is_some_and(|o| o.pos.y > field_height);
            if !off_screen {
                continue;
            }
            if let Some(obstacle) = slot.take() {
                log::debug!("Recycled {:?} #{} from lane {}", obstacle.kind, obstacle.id, obstacle.lane);
                match obstacle.kind {
                    ObstacleKind::Regular => {
                        recycled.regular += 1;
                        self.deleted_regular += 1;
                    }
                    ObstacleKind::Checkpoint => recycled.checkpoints += 1,
                }
            }
        }
        recycled
    }

    /// Spawn into random free lanes until the cap is reached.
    ///
    /// Lanes are drawn uniformly from the free list, so a full (or
    /// over-capped) table is a no-op. Each checkpoint spends one cadence
    /// worth of recycled regulars; any surplus carries over. Returns the
    /// number spawned.
    pub fn refill<R: Rng>(&mut self, rng: &mut R) -> usize {
        let mut spawned = 0;
        while self.live_count() < self.max_obstacles {
            let free = self.free_lanes();
            let Some(&lane) = free.choose(rng) else {
                break;
            };

            let kind = if self.deleted_regular >= self.checkpoint_count {
                self.deleted_regular -= self.checkpoint_count;
                self.checkpoints_spawned += 1;
                ObstacleKind::Checkpoint
            } else {
                ObstacleKind::Regular
            };

            let speed = rng.random_range(self.min_speed..self.max_speed);
            let sprite_variant = match kind {
                ObstacleKind::Regular => rng.random_range(0..self.sprite_variants),
                ObstacleKind::Checkpoint => 0,
            };
            let spawn_y = self.spawn_y;
            let id = self.insert(lane, kind, spawn_y, speed, sprite_variant);
            log::debug!("Spawned {:?} #{} in lane {} at speed {:.3}", kind, id, lane, speed);
            spawned += 1;
        }
        spawned
    }

    /// Remove every live checkpoint, returning how many were removed
    pub fn flush_checkpoints(&mut self) -> usize {
        let mut removed = 0;
        for slot in &mut self.lanes {
            if slot.as_ref().is_some_and(Obstacle::is_checkpoint) {
                *slot = None;
                removed += 1;
            }
        }
        removed
    }

    /// Put an obstacle directly into a lane, replacing any occupant.
    ///
    /// Returns the new obstacle's id. Out-of-range lanes are ignored and
    /// return 0.
    pub fn place(&mut self, lane: usize, kind: ObstacleKind, y: f32, speed: f32) -> u32 {
        self.insert(lane, kind, y, speed, 0)
    }

    fn insert(&mut self, lane: usize, kind: ObstacleKind, y: f32, speed: f32, sprite_variant: u8) -> u32 {
        let Some(slot) = self.lanes.get_mut(lane) else {
            return 0;
        };
        let id = self.next_id;
        self.next_id += 1;
        *slot = Some(Obstacle {
            id,
            kind,
            lane,
            pos: Vec2::new(lane as f32 * self.lane_width, y),
            speed,
            sprite_variant,
        });
        id
    }

    /// Empty a lane
    pub fn clear_lane(&mut self, lane: usize) -> Option<Obstacle> {
        self.lanes.get_mut(lane).and_then(Option::take)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spawner() -> LaneSpawner {
        LaneSpawner::new(&GameConfig::default())
    }

    #[test]
    fn test_refill_reaches_cap() {
        let mut spawner = spawner();
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(spawner.refill(&mut rng), 3);
        assert_eq!(spawner.live_count(), 3);
        assert_eq!(spawner.free_lanes().len(), 2);

        for obstacle in spawner.obstacles() {
            assert_eq!(obstacle.kind, ObstacleKind::Regular);
            assert_eq!(obstacle.pos.y, -156.0);
            assert_eq!(obstacle.pos.x, obstacle.lane as f32 * 75.0);
            assert!(obstacle.speed >= 0.25 && obstacle.speed < 0.75);
            assert!(obstacle.sprite_variant < 6);
        }

        // Already at cap
        assert_eq!(spawner.refill(&mut rng), 0);
    }

    #[test]
    fn test_refill_full_table_is_noop() {
        let config = GameConfig {
            max_enemies: 10,
            ..Default::default()
        };
        let mut spawner = LaneSpawner::new(&config);
        let mut rng = Pcg32::seed_from_u64(1);
        // Cap exceeds lanes: stops once every lane is taken
        assert_eq!(spawner.refill(&mut rng), 5);
        assert_eq!(spawner.refill(&mut rng), 0);
        assert!(spawner.free_lanes().is_empty());
    }

    #[test]
    fn test_recycle_counts_only_regulars() {
        let mut spawner = spawner();
        spawner.place(0, ObstacleKind::Regular, 651.0, 0.5);
        spawner.place(1, ObstacleKind::Checkpoint, 700.0, 0.5);
        spawner.place(2, ObstacleKind::Regular, 650.0, 0.5);

        let recycled = spawner.recycle(650.0);
        assert_eq!(recycled, Recycled { regular: 1, checkpoints: 1 });
        assert_eq!(spawner.deleted_obstacle_count(), 1);
        // Exactly at the bottom edge stays
        assert!(spawner.obstacle_in_lane(2).is_some());
        assert_eq!(spawner.live_count(), 1);
    }

    #[test]
    fn test_checkpoint_after_cadence() {
        let mut spawner = spawner();
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..5 {
            spawner.place(0, ObstacleKind::Regular, 700.0, 0.5);
            spawner.recycle(650.0);
        }
        assert_eq!(spawner.deleted_obstacle_count(), 5);

        spawner.refill(&mut rng);
        let checkpoints = spawner.obstacles().filter(|o| o.is_checkpoint()).count();
        assert_eq!(checkpoints, 1);
        assert_eq!(spawner.deleted_obstacle_count(), 0);
        assert_eq!(spawner.checkpoints_spawned(), 1);
    }

    #[test]
    fn test_flush_checkpoints_frees_lanes() {
        let mut spawner = spawner();
        spawner.place(0, ObstacleKind::Checkpoint, 0.0, 0.5);
        spawner.place(3, ObstacleKind::Checkpoint, 100.0, 0.5);
        spawner.place(4, ObstacleKind::Regular, 100.0, 0.5);

        assert_eq!(spawner.flush_checkpoints(), 2);
        assert_eq!(spawner.free_lanes(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_place_out_of_range_ignored() {
        let mut spawner = spawner();
        assert_eq!(spawner.place(9, ObstacleKind::Regular, 0.0, 0.5), 0);
        assert_eq!(spawner.live_count(), 0);
    }

    /// Every occupied slot holds an obstacle that agrees with its lane
    fn assert_slots_consistent(spawner: &LaneSpawner) {
        for lane in 0..spawner.lane_count() {
            if let Some(obstacle) = spawner.obstacle_in_lane(lane) {
                assert_eq!(obstacle.lane, lane);
                assert_eq!(obstacle.pos.x, lane as f32 * 75.0);
            }
        }
    }

    #[test]
    fn test_surplus_recycles_carry_over() {
        let mut spawner = spawner();
        let mut rng = Pcg32::seed_from_u64(11);
        // 4 banked, then a frame that recycles 3 at once
        for _ in 0..4 {
            spawner.place(0, ObstacleKind::Regular, 700.0, 0.5);
            spawner.recycle(650.0);
        }
        for lane in 0..3 {
            spawner.place(lane, ObstacleKind::Regular, 700.0, 0.5);
        }
        assert_eq!(spawner.recycle(650.0).regular, 3);
        assert_eq!(spawner.deleted_obstacle_count(), 7);

        spawner.refill(&mut rng);
        assert_eq!(spawner.checkpoints_spawned(), 1);
        assert_eq!(spawner.deleted_obstacle_count(), 2);
        assert_slots_consistent(&spawner);
    }

    #[test]
    fn test_banked_cadences_spawn_several_checkpoints() {
        let mut spawner = spawner();
        let mut rng = Pcg32::seed_from_u64(12);
        for _ in 0..10 {
            spawner.place(4, ObstacleKind::Regular, 700.0, 0.5);
            spawner.recycle(650.0);
        }
        spawner.refill(&mut rng);
        let checkpoints = spawner.obstacles().filter(|o| o.is_checkpoint()).count();
        assert_eq!(checkpoints, 2);
        assert_eq!(spawner.deleted_obstacle_count(), 0);
    }

    proptest! {
        #[test]
        fn frames_keep_cap_and_consistent_slots(
            seed in any::<u64>(),
            steps in proptest::collection::vec(1.0f32..400.0, 1..200)
        ) {
            let mut spawner = spawner();
            let mut rng = Pcg32::seed_from_u64(seed);
            spawner.refill(&mut rng);
            for elapsed in steps {
                spawner.advance_all(elapsed);
                spawner.recycle(650.0);
                spawner.refill(&mut rng);

                prop_assert_eq!(spawner.live_count(), 3);
                assert_slots_consistent(&spawner);
                prop_assert!(spawner.deleted_obstacle_count() < 5);
            }
        }

        #[test]
        fn checkpoint_cadence_matches_recycled_total(
            seed in any::<u64>(),
            batches in proptest::collection::vec(1usize..=3, 0..40)
        ) {
            // Each frame recycles 1-3 regulars at once
            let mut spawner = spawner();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut total = 0u32;
            for batch in batches {
                for lane in 0..batch {
                    spawner.place(lane, ObstacleKind::Regular, 700.0, 0.5);
                }
                total += spawner.recycle(650.0).regular;
                spawner.refill(&mut rng);
                assert_slots_consistent(&spawner);
                // Empty the field so the next batch has room
                for lane in 0..spawner.lane_count() {
                    spawner.clear_lane(lane);
                }
            }
            prop_assert_eq!(spawner.checkpoints_spawned(), total / 5);
            prop_assert_eq!(spawner.deleted_obstacle_count(), total % 5);
        }
    }
}
