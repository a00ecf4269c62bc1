//! Host-facing game loop
//!
//! The host calls [`Engine::frame`] once per rendered frame (e.g. from its
//! animation callback). Each call samples the clock, drains queued input,
//! runs one simulation tick and draws the result. Once the run ends the
//! engine reports [`FrameStatus::Stopped`] and never ticks again.

use std::time::Instant;

use crate::config::{ConfigError, GameConfig};
use crate::input::{InputQueue, InputSource};
use crate::render::{AssetProvider, GameSummary, Renderer, render_frame, render_game_over};
use crate::sim::{Direction, GameState, TickInput, tick};

/// Monotonic millisecond clock
pub trait ClockSource {
    fn now_ms(&mut self) -> u64;
}

/// Wall clock backed by [`Instant`], counting from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSource for SystemClock {
    fn now_ms(&mut self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Clock moved by hand, optionally stepping a fixed amount per sample
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: u64,
    step: u64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: start_ms,
            step: 0,
        }
    }

    /// Clock that advances `step_ms` every time it is read
    pub fn stepping(step_ms: u64) -> Self {
        Self {
            now: 0,
            step: step_ms,
        }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }

    pub fn set(&mut self, ms: u64) {
        self.now = ms;
    }
}

impl ClockSource for ManualClock {
    fn now_ms(&mut self) -> u64 {
        let now = self.now;
        self.now += self.step;
        now
    }
}

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Stopped,
}

/// Owns the game state and drives it from clock and input
pub struct Engine<C: ClockSource, I: InputSource> {
    state: GameState,
    clock: C,
    input: I,
    queue: InputQueue,
    last_frame_ms: Option<u64>,
    idle_mode: bool,
    status: FrameStatus,
}

impl<C: ClockSource, I: InputSource> Engine<C, I> {
    /// Build a ready-to-start engine; fails on an invalid `config`
    pub fn new(config: GameConfig, seed: u64, clock: C, input: I) -> Result<Self, ConfigError> {
        Ok(Self {
            state: GameState::new(config, seed)?,
            clock,
            input,
            queue: InputQueue::new(),
            last_frame_ms: None,
            idle_mode: false,
            status: FrameStatus::Continue,
        })
    }

    /// Set the time marker; the first frame measures elapsed time from here
    pub fn start(&mut self) {
        let now = self.clock.now_ms();
        self.last_frame_ms = Some(now);
        log::info!("Engine started at {}ms (seed {})", now, self.state.seed);
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.idle_mode = idle;
    }

    /// Queue a move for the next frame; ignored once the run is over
    pub fn push_input(&mut self, direction: Direction) {
        if self.status == FrameStatus::Continue {
            self.queue.push(direction);
        }
    }

    /// Run one frame and draw it
    pub fn frame<R, A>(&mut self, renderer: &mut R, assets: &A) -> FrameStatus
    where
        R: Renderer + ?Sized,
        A: AssetProvider + ?Sized,
    {
        if self.status == FrameStatus::Stopped {
            self.discard_input();
            render_game_over(renderer, assets, &self.state);
            return FrameStatus::Stopped;
        }

        if self.last_frame_ms.is_none() {
            self.start();
        }
        let last = self.last_frame_ms.unwrap_or_default();
        let now = self.clock.now_ms();
        let elapsed_ms = now.checked_sub(last).unwrap_or_else(|| {
            log::warn!("Clock went backwards ({}ms -> {}ms); treating as no time", last, now);
            0
        });
        self.last_frame_ms = Some(now.max(last));

        self.input.poll(&mut self.queue);
        let input = TickInput {
            moves: self.queue.drain(),
            idle_mode: self.idle_mode,
        };
        tick(&mut self.state, &input, elapsed_ms);

        render_frame(renderer, assets, &self.state);

        if !self.state.is_alive() {
            self.status = FrameStatus::Stopped;
            self.discard_input();
        }
        self.status
    }

    /// Call `frame` until the run ends or `max_frames` is reached
    pub fn run<R, A>(&mut self, renderer: &mut R, assets: &A, max_frames: u64) -> GameSummary
    where
        R: Renderer + ?Sized,
        A: AssetProvider + ?Sized,
    {
        for _ in 0..max_frames {
            if self.frame(renderer, assets) == FrameStatus::Stopped {
                break;
            }
        }
        self.summary()
    }

    /// Draw the current state without advancing it
    pub fn render<R, A>(&self, renderer: &mut R, assets: &A)
    where
        R: Renderer + ?Sized,
        A: AssetProvider + ?Sized,
    {
        render_frame(renderer, assets, &self.state);
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary::from_state(&self.state)
    }

    pub fn status(&self) -> FrameStatus {
        self.status
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for hosts and tests that stage scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn pending_input(&self) -> usize {
        self.queue.len()
    }

    fn discard_input(&mut self) {
        self.input.poll(&mut self.queue);
        self.queue.clear();
    }
}
