//! Rendering capabilities consumed by the core
//!
//! The core never draws pixels itself. Each frame it resolves sprites through
//! an [`AssetProvider`] and hands positions and HUD data to a [`Renderer`].

use std::borrow::Cow;
use std::fmt::Write as _;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::REGULAR_SPRITE_VARIANTS;
use crate::sim::{DeathCause, GameState, ObstacleKind};

/// Opaque reference to a loaded image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteHandle(pub Cow<'static, str>);

/// What needs a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKey {
    Background,
    Player,
    Obstacle { kind: ObstacleKind, variant: u8 },
}

/// Resolves sprite keys to handles
pub trait AssetProvider {
    fn sprite(&self, key: SpriteKey) -> SpriteHandle;
}

/// The arcade's image set
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAssets;

impl DefaultAssets {
    const CARS: [&'static str; REGULAR_SPRITE_VARIANTS as usize] = [
        "images/car1.png",
        "images/car2.png",
        "images/car3.png",
        "images/car5.png",
        "images/car6.png",
        "images/car7.png",
    ];
}

impl AssetProvider for DefaultAssets {
    fn sprite(&self, key: SpriteKey) -> SpriteHandle {
        let path = match key {
            SpriteKey::Background => "images/stars.png",
            SpriteKey::Player => "images/player.png",
            SpriteKey::Obstacle {
                kind: ObstacleKind::Checkpoint,
                ..
            } => "images/gas.png",
            SpriteKey::Obstacle {
                kind: ObstacleKind::Regular,
                variant,
            } => Self::CARS[variant as usize % Self::CARS.len()],
        };
        SpriteHandle(Cow::Borrowed(path))
    }
}

/// Heads-up display values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub checkpoints: u32,
    /// Fuel left, whole seconds rounded up
    pub fuel_seconds: u64,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score(),
            checkpoints: state.checkpoints_collected,
            fuel_seconds: state.clock.fuel_seconds(),
        }
    }

    pub fn lines(&self) -> [String; 3] {
        [
            format!("$ {}", self.score),
            format!("{} GAS", self.checkpoints),
            format!("{} SEG", self.fuel_seconds),
        ]
    }
}

/// End-of-run report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub score: u64,
    pub checkpoints: u32,
    pub fuel_ms: u64,
    pub fuel_seconds: u64,
    /// `score * max(checkpoints, 1) * fuel_seconds`
    pub total_score: u64,
    pub frames: u64,
    pub cause: Option<DeathCause>,
}

impl GameSummary {
    pub fn from_state(state: &GameState) -> Self {
        let hud = Hud::from_state(state);
        Self {
            score: hud.score,
            checkpoints: hud.checkpoints,
            fuel_ms: state.fuel_remaining_ms(),
            fuel_seconds: hud.fuel_seconds,
            total_score: total_score(hud.score, hud.checkpoints, hud.fuel_seconds),
            frames: state.frame_count,
            cause: state.death_cause,
        }
    }

    pub fn lines(&self) -> [String; 5] {
        [
            format!("$ {}         GAME OVER", self.score),
            format!("{} GAS", self.checkpoints),
            format!("{} SEG", self.fuel_seconds),
            "_____________________".to_string(),
            format!("TOTAL SCORE:     $ {}", self.total_score),
        ]
    }
}

/// Final score: zero checkpoints counts as a multiplier of one
pub fn total_score(score: u64, checkpoints: u32, fuel_seconds: u64) -> u64 {
    score
        .saturating_mul(u64::from(checkpoints.max(1)))
        .saturating_mul(fuel_seconds)
}

/// Drawing primitives supplied by the host
pub trait Renderer {
    /// Called first every frame
    fn draw_background(&mut self, sprite: &SpriteHandle);
    /// Draw a sprite with its top-left corner at `pos`
    fn draw_sprite(&mut self, sprite: &SpriteHandle, pos: Vec2);
    fn draw_hud(&mut self, hud: &Hud);
    fn draw_game_over(&mut self, summary: &GameSummary);
}

/// Draw one frame: HUD while alive, the terminal screen once dead
pub fn render_frame<R, A>(renderer: &mut R, assets: &A, state: &GameState)
where
    R: Renderer + ?Sized,
    A: AssetProvider + ?Sized,
{
    if !state.is_alive() {
        render_game_over(renderer, assets, state);
        return;
    }
    draw_scene(renderer, assets, state);
    renderer.draw_hud(&Hud::from_state(state));
}

/// Draw the terminal screen: the frozen field plus the run summary.
///
/// Reads only the final state, so repeated calls draw the same frame.
pub fn render_game_over<R, A>(renderer: &mut R, assets: &A, state: &GameState)
where
    R: Renderer + ?Sized,
    A: AssetProvider + ?Sized,
{
    draw_scene(renderer, assets, state);
    renderer.draw_game_over(&GameSummary::from_state(state));
}

/// Background, obstacles, then the player on top
fn draw_scene<R, A>(renderer: &mut R, assets: &A, state: &GameState)
where
    R: Renderer + ?Sized,
    A: AssetProvider + ?Sized,
{
    renderer.draw_background(&assets.sprite(SpriteKey::Background));
    for obstacle in state.obstacles() {
        let key = SpriteKey::Obstacle {
            kind: obstacle.kind,
            variant: obstacle.sprite_variant,
        };
        renderer.draw_sprite(&assets.sprite(key), obstacle.pos);
    }
    renderer.draw_sprite(&assets.sprite(SpriteKey::Player), state.player.pos);
}

/// Renderer that records each frame as text (headless runs and tests)
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    frame: String,
    frames_drawn: u64,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the most recent frame
    pub fn output(&self) -> &str {
        &self.frame
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }
}

impl Renderer for TextRenderer {
    fn draw_background(&mut self, sprite: &SpriteHandle) {
        self.frame.clear();
        self.frames_drawn += 1;
        let _ = writeln!(self.frame, "bg {}", sprite.0);
    }

    fn draw_sprite(&mut self, sprite: &SpriteHandle, pos: Vec2) {
        let _ = writeln!(self.frame, "{} @ ({:.1}, {:.1})", sprite.0, pos.x, pos.y);
    }

    fn draw_hud(&mut self, hud: &Hud) {
        for line in hud.lines() {
            let _ = writeln!(self.frame, "{line}");
        }
    }

    fn draw_game_over(&mut self, summary: &GameSummary) {
        for line in summary.lines() {
            let _ = writeln!(self.frame, "{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::{TickInput, tick};

    #[test]
    fn test_default_assets() {
        let assets = DefaultAssets;
        assert_eq!(assets.sprite(SpriteKey::Player).0, "images/player.png");
        let gas = assets.sprite(SpriteKey::Obstacle {
            kind: ObstacleKind::Checkpoint,
            variant: 3,
        });
        assert_eq!(gas.0, "images/gas.png");
        let car = assets.sprite(SpriteKey::Obstacle {
            kind: ObstacleKind::Regular,
            variant: 3,
        });
        assert_eq!(car.0, "images/car5.png");
    }

    #[test]
    fn test_total_score() {
        assert_eq!(total_score(1_000, 0, 4), 4_000);
        assert_eq!(total_score(1_000, 3, 4), 12_000);
        assert_eq!(total_score(1_000, 3, 0), 0);
    }

    #[test]
    fn test_frame_draw_order() {
        let state = GameState::new(GameConfig::default(), 5).expect("default config");
        let mut renderer = TextRenderer::new();
        render_frame(&mut renderer, &DefaultAssets, &state);

        let lines: Vec<&str> = renderer.output().lines().collect();
        assert_eq!(lines[0], "bg images/stars.png");
        // 3 obstacles, then player, then HUD
        assert!(lines[4].starts_with("images/player.png @ (150.0, 540.0)"));
        assert_eq!(&lines[5..], &["$ 0", "0 GAS", "10 SEG"]);
    }

    #[test]
    fn test_game_over_text() {
        let mut state = GameState::new(GameConfig::default(), 5).expect("default config");
        state.checkpoints_collected = 2;
        state.clock.fuel_ms = 16;
        tick(&mut state, &TickInput::default(), 16);
        assert!(!state.is_alive());

        let mut renderer = TextRenderer::new();
        render_frame(&mut renderer, &DefaultAssets, &state);
        assert!(renderer.output().contains("$ 16         GAME OVER"));
        assert!(renderer.output().contains("2 GAS"));
        assert!(renderer.output().contains("TOTAL SCORE:     $ 0"));
        assert!(!renderer.output().contains("$ 16\n"));
    }

    #[test]
    fn test_game_over_screen_is_repeatable() {
        let mut state = GameState::new(GameConfig::default(), 9).expect("default config");
        state.clock.fuel_ms = 16;
        tick(&mut state, &TickInput::default(), 16);

        let mut renderer = TextRenderer::new();
        render_game_over(&mut renderer, &DefaultAssets, &state);
        let first = renderer.output().to_string();
        render_game_over(&mut renderer, &DefaultAssets, &state);
        assert_eq!(renderer.output(), first);
        assert_eq!(renderer.frames_drawn(), 2);

        // Field is drawn under the summary, and matches what render_frame shows
        let lines: Vec<&str> = first.lines().collect();
        assert_eq!(lines[0], "bg images/stars.png");
        assert_eq!(lines.last().copied(), Some("TOTAL SCORE:     $ 0"));
        render_frame(&mut renderer, &DefaultAssets, &state);
        assert_eq!(renderer.output(), first);
    }
}
