//! Fuel Dash entry point
//!
//! Runs an autopilot game and prints the final summary as JSON. By default
//! the game is stepped on a simulated 60 Hz clock as fast as possible; set
//! `FUEL_DASH_REALTIME=1` to pace frames against the wall clock instead.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use fuel_dash::{
    ClockSource, DefaultAssets, Engine, FrameStatus, GameConfig, GameSummary, ManualClock, NoInput, SystemClock,
    TextRenderer,
};

/// Frame length (~60 fps)
const FRAME_MS: u64 = 16;
/// Ten minutes of frames
const DEFAULT_MAX_FRAMES: u64 = 10 * 60 * 1000 / FRAME_MS;

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| matches!(v.trim(), "1" | "true" | "yes"))
}

/// Drive an engine frame by frame, sleeping between frames when `pace` is set
fn play<C: ClockSource>(
    mut engine: Engine<C, NoInput>,
    max_frames: u64,
    pace: Option<Duration>,
) -> GameSummary {
    engine.set_idle_mode(true);
    engine.start();

    let mut renderer = TextRenderer::new();
    match pace {
        None => {
            engine.run(&mut renderer, &DefaultAssets, max_frames);
        }
        Some(frame_time) => {
            for _ in 0..max_frames {
                std::thread::sleep(frame_time);
                if engine.frame(&mut renderer, &DefaultAssets) == FrameStatus::Stopped {
                    break;
                }
            }
        }
    }

    log::info!("Drew {} frames", renderer.frames_drawn());
    log::debug!("Last frame:\n{}", renderer.output());
    engine.summary()
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(path)?,
        None => {
            log::info!("No config file given, using defaults");
            GameConfig::default()
        }
    };

    let seed = env_u64("FUEL_DASH_SEED").unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    });
    let max_frames = env_u64("FUEL_DASH_MAX_FRAMES").unwrap_or(DEFAULT_MAX_FRAMES);

    let summary = if env_flag("FUEL_DASH_REALTIME") {
        log::info!("Pacing frames against the wall clock");
        let engine = Engine::new(config, seed, SystemClock::new(), NoInput)?;
        play(engine, max_frames, Some(Duration::from_millis(FRAME_MS)))
    } else {
        let engine = Engine::new(config, seed, ManualClock::stepping(FRAME_MS), NoInput)?;
        play(engine, max_frames, None)
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Fuel Dash (headless) starting...");

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
