//! World state and core simulation types
//!
//! The `World` owns every actor. It is mutated only by the frame step in
//! `tick` and read by the renderer.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::wrap_degrees;

/// RGBA color (8 bits per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(230, 41, 55);
    pub const YELLOW: Color = Color::rgb(253, 249, 0);
    pub const ORANGE: Color = Color::rgb(255, 161, 0);
    pub const GRAY: Color = Color::rgb(130, 130, 130);
    pub const GREEN: Color = Color::rgb(0, 228, 48);
    pub const DARKGREEN: Color = Color::rgb(0, 117, 44);
    pub const BLUE: Color = Color::rgb(0, 121, 241);
    pub const VIOLET: Color = Color::rgb(135, 60, 190);
    pub const GRID: Color = Color::rgb(15, 15, 15);
}

/// Current phase of the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldPhase {
    /// Active gameplay
    Running,
    /// Frozen until the next tap
    Paused,
    /// Player is out of shields; a tap restarts
    GameOver,
}

/// Player life-cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Live,
    Dead,
}

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Stationary, fires rounds of aimed bullets then reloads
    Shooter,
    /// Locks a direction toward the player and charges until leaving the inner bounds
    Dasher,
    /// Slowly chases the player, arms a fuse when close, then detonates
    Homing,
}

/// Enemy life-cycle.
///
/// The enemy `timer` is a single countdown whose meaning depends on the state:
/// - `Spawning`: telegraph time left before becoming `Live`
/// - `Reloading`: reload time left before returning to `Live`
/// - `Destruct`: fuse time left before detonation (an expired fuse means the
///   blast is active for one step, then the enemy goes `Dead`)
/// - `Live` / `Dead`: unused (zero)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Spawning,
    Live,
    Reloading,
    Destruct,
    Dead,
}

/// Bullet life-cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletState {
    Live,
    Dead,
}

/// Fixed-capacity ring of recent positions (oldest first)
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: VecDeque<Vec2>,
}

impl Trail {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(MAX_ENEMY_TRAIL),
        }
    }

    /// Append a position, evicting the oldest when full
    pub fn record(&mut self, pos: Vec2) {
        if self.points.len() == MAX_ENEMY_TRAIL {
            self.points.pop_front();
        }
        self.points.push_back(pos);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Vec2> + '_ {
        self.points.iter()
    }
}

/// The player avatar
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub color: Color,
    pub state: PlayerState,
    /// Hit points; dropping below zero ends the run
    pub shield: i32,
}

impl Player {
    pub fn is_live(&self) -> bool {
        self.state == PlayerState::Live
    }
}

/// An enemy actor
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub kind: EnemyKind,
    pub state: EnemyState,
    /// Frames between shots (decreases toward the tuning floor)
    pub fire_rate: u32,
    /// Shots since the last reload
    pub shots_fired: u32,
    /// Shots before a reload is forced
    pub shots_per_round: u32,
    /// State-dependent countdown in seconds (see `EnemyState`)
    pub timer: f32,
    pub trail: Trail,
    /// Cosmetic spin in degrees, [0, 360)
    pub rotation: f32,
}

impl Enemy {
    /// Collision box
    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, ENEMY_SIZE)
    }

    pub fn is_dead(&self) -> bool {
        self.state == EnemyState::Dead
    }

    /// Destruct with an expired fuse: the blast is live
    pub fn is_detonating(&self) -> bool {
        self.state == EnemyState::Destruct && self.timer <= 0.0
    }

    /// Advance the cosmetic spin
    pub fn spin(&mut self) {
        self.rotation = wrap_degrees(self.rotation + ENEMY_SPIN_DEGREES);
    }
}

/// An enemy projectile; velocity is fixed at creation
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub state: BulletState,
}

/// What hurt the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSource {
    Bullet,
    Blast,
    Enemy,
}

/// Side effects produced by a frame step, drained by the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Player teleported to a tap
    Teleported { pos: Vec2 },
    /// A shooter fired
    Shot,
    /// Player lost a shield
    PlayerHit { source: HitSource },
    /// Player touched a parked (reloading) enemy: free kill
    EnemyRammed,
    /// A homer's fuse burned down
    Explosion { pos: Vec2 },
    /// Two enemies destroyed each other
    EnemiesCollided { count: usize },
    /// Shields exhausted
    GameOver { score: f32 },
    /// World was reset after game over
    Restarted,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub player: Player,
    /// Spawn order
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub phase: WorldPhase,
    /// Seconds until the next spawn may happen (never negative)
    pub spawn_timer: f32,
    /// Monotonically non-decreasing while running
    pub score: f32,
    /// Enemies spawned this run; indexes the type rotation table
    pub total_spawned: u32,
    /// Running frames since reset
    pub frame: u64,
    /// Frames spent in the current phase
    pub phase_frames: u32,
    /// Balance parameters
    pub tuning: Tuning,
    /// Seeded randomness (spawn placement, colors)
    pub rng: Pcg32,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl World {
    /// Create a fresh world with the given seed
    pub fn new(tuning: Tuning, seed: u64, phase: WorldPhase) -> Self {
        let player = super::spawn::create_player(&tuning, tuning.player_start);
        Self {
            player,
            enemies: Vec::with_capacity(tuning.max_enemies),
            bullets: Vec::with_capacity(tuning.max_bullets),
            phase,
            spawn_timer: tuning.initial_spawn_delay,
            score: 0.0,
            total_spawned: 0,
            frame: 0,
            phase_frames: 0,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Reset for a new run; the RNG stream and tuning carry over
    pub fn reset(&mut self, phase: WorldPhase) {
        self.player = super::spawn::create_player(&self.tuning, self.tuning.player_start);
        self.enemies.clear();
        self.bullets.clear();
        self.spawn_timer = self.tuning.initial_spawn_delay;
        self.score = 0.0;
        self.total_spawned = 0;
        self.frame = 0;
        self.set_phase(phase);
    }

    /// Change phase and restart the phase frame count
    pub fn set_phase(&mut self, phase: WorldPhase) {
        self.phase = phase;
        self.phase_frames = 0;
    }

    pub fn is_running(&self) -> bool {
        self.phase == WorldPhase::Running
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop every dead enemy (idempotent)
    pub fn compact_enemies(&mut self) {
        self.enemies.retain(|e| !e.is_dead());
    }
}
