//! Data-driven game balance
//!
//! Every gameplay number that a designer might want to tweak lives here.
//! Defaults reproduce the shipped balance; a JSON document may override any
//! subset of fields.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Shields at the start of a run
    pub initial_shields: i32,
    /// Where the player appears on reset
    pub player_start: Vec2,
    /// Score gained every running frame
    pub score_per_frame: f32,
    /// Frames that must pass after game over before a tap restarts
    pub restart_grace_frames: u32,

    // === Spawning ===
    /// Maximum concurrent enemies
    pub max_enemies: usize,
    /// Delay before the first spawn of a run (seconds)
    pub initial_spawn_delay: f32,
    /// Spawn interval while few enemies are alive (seconds)
    pub early_spawn_interval: f32,
    /// Spawn interval once the arena is busy (seconds)
    pub spawn_interval: f32,
    /// Enemy count above which `spawn_interval` applies
    pub early_wave_size: usize,
    /// Telegraph duration before a fresh enemy becomes active (seconds)
    pub spawn_telegraph: f32,
    /// Minimum distance between a fresh spawn and any enemy or the player
    pub min_spawn_separation: f32,

    // === Shooters ===
    /// Maximum concurrent bullets
    pub max_bullets: usize,
    /// Starting fire cadence (frames between shots, higher = slower)
    pub fire_rate_start: u32,
    /// Fastest cadence the difficulty ramp can reach (frames between shots)
    pub fire_rate_floor: u32,
    /// Frames between cadence speed-ups
    pub fire_rate_ramp_interval: u64,
    /// Shots before a shooter reloads
    pub shots_per_round: u32,
    /// Bullet speed (pixels per frame)
    pub bullet_speed: f32,

    // === Movers ===
    /// Dash speed (pixels per frame)
    pub dasher_speed: f32,
    /// Homing speed (pixels per frame)
    pub homing_speed: f32,
    /// Reload duration, also the homing fuse length (seconds)
    pub reload_duration: f32,
    /// Blast radius of a detonating homer
    pub blast_radius: f32,
    /// Distance to the player at which a homer arms its fuse
    pub blast_trigger_distance: f32,

    // === Enemy vs enemy ===
    /// Enemies that run into each other both die
    pub enemy_collisions: bool,
    /// Score awarded per enemy destroyed by another enemy
    pub enemy_self_kill_bonus: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_shields: 3,
            player_start: Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT - 200.0),
            score_per_frame: 0.2,
            restart_grace_frames: 30,

            max_enemies: 10,
            initial_spawn_delay: 1.0,
            early_spawn_interval: 1.0,
            spawn_interval: 5.0,
            early_wave_size: 3,
            spawn_telegraph: 1.0,
            min_spawn_separation: 60.0,

            max_bullets: 100,
            fire_rate_start: 20,
            fire_rate_floor: 10,
            fire_rate_ramp_interval: 300,
            shots_per_round: 25,
            bullet_speed: 5.0,

            dasher_speed: 8.0,
            homing_speed: 2.0,
            reload_duration: 1.5,
            blast_radius: 60.0,
            blast_trigger_distance: 50.0,

            enemy_collisions: false,
            enemy_self_kill_bonus: 100.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load tuning from a JSON file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Spawn interval to wait after a spawn, given the enemies now alive
    pub fn next_spawn_interval(&self, enemy_count: usize) -> f32 {
        if enemy_count > self.early_wave_size {
            self.spawn_interval
        } else {
            self.early_spawn_interval
        }
    }
}
