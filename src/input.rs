//! Direction input
//!
//! Key presses can arrive at any time between frames. They are buffered in an
//! [`InputQueue`] and drained exactly once at the start of the next frame.

use std::collections::VecDeque;

use crate::sim::Direction;

/// DOM key codes for the arrow keys
pub const LEFT_ARROW_CODE: u32 = 37;
pub const RIGHT_ARROW_CODE: u32 = 39;

/// Map a keyboard key code to a move (other keys are ignored)
pub fn direction_for_key_code(code: u32) -> Option<Direction> {
    match code {
        LEFT_ARROW_CODE => Some(Direction::Left),
        RIGHT_ARROW_CODE => Some(Direction::Right),
        _ => None,
    }
}

/// FIFO of pending moves
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    pending: VecDeque<Direction>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, direction: Direction) {
        self.pending.push_back(direction);
    }

    /// Take every pending move in arrival order, leaving the queue empty
    pub fn drain(&mut self) -> Vec<Direction> {
        self.pending.drain(..).collect()
    }

    /// Drop everything pending
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Source of discrete left/right events
pub trait InputSource {
    /// Push every event that arrived since the last poll
    fn poll(&mut self, queue: &mut InputQueue);
}

/// No input at all (autopilot or spectator runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self, _queue: &mut InputQueue) {}
}

/// Replays a fixed batch of events per poll, then goes quiet
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    batches: VecDeque<Vec<Direction>>,
}

impl ScriptedInput {
    pub fn new(batches: impl IntoIterator<Item = Vec<Direction>>) -> Self {
        Self {
            batches: batches.into_iter().collect(),
        }
    }

    /// Batches not yet delivered
    pub fn remaining(&self) -> usize {
        self.batches.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, queue: &mut InputQueue) {
        if let Some(batch) = self.batches.pop_front() {
            for direction in batch {
                queue.push(direction);
            }
        }
    }
}
