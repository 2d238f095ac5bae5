//! Quantum Evasion entry point
//!
//! The native build is a headless runner: it drives a session at a fixed
//! 60 FPS with a simple autopilot and logs the outcome.
//!
//! Environment:
//! - `RUST_LOG`: log filter (env_logger)
//! - `QE_SETTINGS` / `QE_TUNING`: optional JSON files
//! - `QE_HIGHSCORE`: high score file (default in the working directory)
//! - `QE_FRAMES`: frames to simulate (default 3600)
//! - `QE_RUNS`: game overs before quitting (default 3)

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::Path;
    use std::time::{SystemTime, UNIX_EPOCH};

    use glam::Vec2;

    use quantum_evasion::audio::LogAudio;
    use quantum_evasion::consts::*;
    use quantum_evasion::highscores::{self, FileStore, HighScoreStore};
    use quantum_evasion::render::CommandList;
    use quantum_evasion::session::Finish;
    use quantum_evasion::sim::{World, WorldPhase};
    use quantum_evasion::{FrameInput, GameSession, Settings, Tuning, distance_2d};

    /// Frames between autopilot decisions
    const AUTOPILOT_INTERVAL: u64 = 15;
    /// Threats closer than this make the autopilot move
    const DANGER_RADIUS: f32 = 110.0;

    fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
        std::env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn time_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    /// Positions of everything that can hurt the player
    fn threats(world: &World) -> impl Iterator<Item = Vec2> + '_ {
        world
            .bullets
            .iter()
            .map(|b| b.pos)
            .chain(world.enemies.iter().filter(|e| !e.is_dead()).map(|e| e.pos))
    }

    fn nearest_threat(world: &World, pos: Vec2) -> f32 {
        threats(world)
            .map(|t| distance_2d(t, pos))
            .fold(f32::INFINITY, f32::min)
    }

    /// Tap the safest point on a coarse grid when something gets close
    fn autopilot(world: &World) -> Option<Vec2> {
        if !world.is_running() || world.frame % AUTOPILOT_INTERVAL != 0 {
            return None;
        }
        if nearest_threat(world, world.player.pos) > DANGER_RADIUS {
            return None;
        }

        let mut best = None;
        let mut best_clearance = f32::NEG_INFINITY;
        for row in 1..8 {
            for col in 1..5 {
                let candidate = Vec2::new(
                    SCREEN_WIDTH * col as f32 / 5.0,
                    SCREEN_HEIGHT * row as f32 / 8.0,
                );
                let clearance = nearest_threat(world, candidate);
                if clearance > best_clearance {
                    best_clearance = clearance;
                    best = Some(candidate);
                }
            }
        }
        best
    }

    pub fn run() {
        env_logger::init();

        let settings = std::env::var("QE_SETTINGS")
            .map(|p| Settings::load_from(Path::new(&p)))
            .unwrap_or_default();
        let tuning = std::env::var("QE_TUNING")
            .map(|p| Tuning::load_from(Path::new(&p)))
            .unwrap_or_default();
        let store: Box<dyn HighScoreStore> = match std::env::var("QE_HIGHSCORE") {
            Ok(path) => Box::new(FileStore::new(path)),
            Err(_) => highscores::default_store(),
        };
        let frames: u64 = env_or("QE_FRAMES", 3600);
        let max_runs: u32 = env_or("QE_RUNS", 3);
        let seed = settings.seed.unwrap_or_else(time_seed);

        log::info!("Quantum Evasion (headless) starting...");
        let mut session = GameSession::init(
            settings,
            tuning.clone(),
            store,
            Box::new(LogAudio),
            seed,
        );
        let mut canvas = CommandList::new();
        let mut runs = 0;

        for _ in 0..frames {
            let world = session.world();
            let mut input = FrameInput::default();

            match world.phase {
                WorldPhase::Paused => input.tap = Some(world.player.pos),
                WorldPhase::GameOver => {
                    if world.phase_frames == 1 {
                        runs += 1;
                    }
                    if runs >= max_runs {
                        input.exit = true;
                    } else if world.phase_frames >= tuning.restart_grace_frames {
                        input.tap = Some(world.player.pos);
                    }
                }
                WorldPhase::Running => input.tap = autopilot(world),
            }

            session.update(&input);
            canvas.clear_commands();
            session.draw(&mut canvas);

            if session.finish() == Finish::Ending {
                break;
            }
        }

        log::debug!("Last frame issued {} draw calls", canvas.len());
        let summary = session.unload();
        log::info!(
            "Done after {} frames: last score {:.0}, best {:.0}{}",
            summary.frames,
            summary.last_score,
            summary.high_score,
            if summary.new_record { " (new record)" } else { "" }
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser shell embeds the library directly
}
