//! Game session controller
//!
//! Owns the world, the cached high score and the collaborators (store, audio).
//! The screen shell drives it through a fixed lifecycle:
//!
//! ```text
//! init ──▶ (update ▶ draw)* ──▶ finish? ──▶ unload
//! ```

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{AudioSink, SoundEffect, mix_volume};
use crate::consts::FRAME_DT;
use crate::highscores::HighScoreStore;
use crate::render::{Canvas, GRID_SCROLL_SPEED, GRID_SPACING, View, draw_world};
use crate::settings::Settings;
use crate::sim::{GameEvent, TickInput, World, WorldPhase, tick};
use crate::tuning::Tuning;

/// Longest frame the session will simulate in one update
pub const MAX_FRAME_DT: f32 = 0.1;

/// Decorrelates the cosmetic RNG from the simulation RNG
const FX_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Shell input for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Elapsed seconds since the previous frame
    pub dt: f32,
    /// Tap position, if the player tapped this frame
    pub tap: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
    /// Leave the gameplay screen (honored while paused or after game over)
    pub exit: bool,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            dt: FRAME_DT,
            tap: None,
            pause: false,
            exit: false,
        }
    }
}

impl FrameInput {
    pub fn tap(pos: Vec2) -> Self {
        Self {
            tap: Some(pos),
            ..Default::default()
        }
    }
}

/// What the shell should do after this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    /// Keep running this screen
    Stay,
    /// Transition to the ending/score screen
    Ending,
}

impl Finish {
    /// Numeric screen code (0 = stay, 1 = ending)
    pub fn code(self) -> i32 {
        match self {
            Finish::Stay => 0,
            Finish::Ending => 1,
        }
    }
}

/// Returned by `unload`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    /// Score of the run in progress (or the last finished run)
    pub last_score: f32,
    pub high_score: f32,
    /// Some run beat the high score this session started with
    pub new_record: bool,
    /// Runs that ended in game over
    pub runs_finished: u32,
    /// Updates processed
    pub frames: u64,
}

pub struct GameSession {
    world: World,
    settings: Settings,
    high_score: f32,
    starting_high_score: f32,
    store: Box<dyn HighScoreStore>,
    audio: Box<dyn AudioSink>,
    finish: Finish,
    /// Cosmetic randomness only (flicker, telegraph colors)
    fx_rng: Pcg32,
    grid_offset: f32,
    runs_finished: u32,
    frames: u64,
}

impl GameSession {
    /// Set up a new session. The world starts paused or running per settings.
    pub fn init(
        settings: Settings,
        tuning: Tuning,
        store: Box<dyn HighScoreStore>,
        audio: Box<dyn AudioSink>,
        seed: u64,
    ) -> Self {
        let high_score = store.read_high_score();
        let phase = if settings.start_paused {
            WorldPhase::Paused
        } else {
            WorldPhase::Running
        };
        log::info!(
            "Session start: seed {}, {:?}, best {:.0}",
            seed,
            phase,
            high_score
        );

        Self {
            world: World::new(tuning, seed, phase),
            settings,
            high_score,
            starting_high_score: high_score,
            store,
            audio,
            finish: Finish::Stay,
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_SEED_SALT),
            grid_offset: 0.0,
            runs_finished: 0,
            frames: 0,
        }
    }

    /// Run one simulation step plus cosmetic updates
    pub fn update(&mut self, input: &FrameInput) {
        self.frames += 1;

        if input.exit && self.world.phase != WorldPhase::Running {
            if self.finish != Finish::Ending {
                log::info!("Leaving gameplay at score {:.0}", self.world.score);
            }
            self.finish = Finish::Ending;
            return;
        }

        let dt = input.dt.clamp(0.0, MAX_FRAME_DT);
        let tick_input = TickInput {
            tap: input.tap,
            pause: input.pause,
        };
        tick(&mut self.world, &tick_input, dt);

        for event in self.world.drain_events() {
            self.handle_event(&event);
        }

        if self.world.is_running() {
            self.grid_offset = (self.grid_offset + GRID_SCROLL_SPEED * dt).rem_euclid(GRID_SPACING);
        }
    }

    fn handle_event(&mut self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }

        match *event {
            GameEvent::GameOver { score } => {
                self.runs_finished += 1;
                self.record_score(score);
            }
            GameEvent::Restarted => {
                log::info!("Run {} starting", self.runs_finished + 1);
            }
            GameEvent::EnemiesCollided { count } => {
                log::debug!("{} enemies collided", count);
            }
            _ => {}
        }
    }

    fn play(&mut self, effect: SoundEffect) {
        if let Some(volume) = mix_volume(effect, &self.settings) {
            self.audio.play(effect, volume);
        }
    }

    /// Persist `score` if it beats the cached high score
    fn record_score(&mut self, score: f32) {
        if score <= self.high_score {
            return;
        }
        log::info!("New high score {:.0} (was {:.0})", score, self.high_score);
        self.high_score = score;
        self.store.set_high_score(score);
    }

    /// Read-only render of the current frame
    pub fn draw<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        let view = View {
            show_hud: self.settings.show_hud,
            show_bounds: self.settings.show_bounds,
            high_score: self.high_score,
            grid_offset: self.grid_offset,
        };
        draw_world(&self.world, &view, canvas, &mut self.fx_rng);
    }

    pub fn finish(&self) -> Finish {
        self.finish
    }

    /// Tear down; a run abandoned with a record score is saved now
    pub fn unload(mut self) -> SessionSummary {
        if self.world.player.is_live() {
            self.record_score(self.world.score);
        }
        let summary = SessionSummary {
            last_score: self.world.score,
            high_score: self.high_score,
            new_record: self.high_score > self.starting_high_score,
            runs_finished: self.runs_finished,
            frames: self.frames,
        };
        log::info!(
            "Session over: {} runs, best {:.0}",
            summary.runs_finished,
            summary.high_score
        );
        summary
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn high_score(&self) -> f32 {
        self.high_score
    }
}
