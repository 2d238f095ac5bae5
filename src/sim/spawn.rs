//! Actor factories
//!
//! Enemy pacing is encoded by a fixed type rotation: the n-th spawn of a run
//! takes `ENEMY_ORDER[n % ENEMY_ORDER.len()]`.

use glam::Vec2;
use rand::Rng;

use super::state::{
    Bullet, BulletState, Color, Enemy, EnemyKind, EnemyState, Player, PlayerState, Trail,
};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH, SPAWN_MARGIN};
use crate::tuning::Tuning;
use crate::{distance_2d, homing_velocity};

/// Type rotation: mostly dashers early, shooters and homers mixed in later
pub const ENEMY_ORDER: [EnemyKind; 10] = [
    EnemyKind::Dasher,
    EnemyKind::Dasher,
    EnemyKind::Dasher,
    EnemyKind::Homing,
    EnemyKind::Shooter,
    EnemyKind::Homing,
    EnemyKind::Homing,
    EnemyKind::Dasher,
    EnemyKind::Shooter,
    EnemyKind::Dasher,
];

/// Enemy palette
pub const ENEMY_COLORS: [Color; 3] = [Color::DARKGREEN, Color::BLUE, Color::VIOLET];

/// Player color
pub const PLAYER_COLOR: Color = Color::RED;

/// Bullet color
pub const BULLET_COLOR: Color = Color::BLACK;

/// Type of the n-th spawned enemy
pub fn enemy_kind_for(spawn_index: u32) -> EnemyKind {
    ENEMY_ORDER[spawn_index as usize % ENEMY_ORDER.len()]
}

/// Create a live player with full shields
pub fn create_player(tuning: &Tuning, pos: Vec2) -> Player {
    Player {
        pos,
        color: PLAYER_COLOR,
        state: PlayerState::Live,
        shield: tuning.initial_shields,
    }
}

/// Pick a spawn position for the given spawn index and kind
pub fn spawn_position(spawn_index: u32, kind: EnemyKind, rng: &mut impl Rng) -> Vec2 {
    let min = SPAWN_MARGIN as i32;
    let max_x = (SCREEN_WIDTH - SPAWN_MARGIN) as i32;
    let max_y = (SCREEN_HEIGHT - SPAWN_MARGIN) as i32;

    if spawn_index == 0 {
        // First enemy: near top center with a little jitter
        let x = SCREEN_WIDTH / 2.0 + rng.random_range(-100..=100) as f32;
        let y = 100.0 + rng.random_range(-25..=25) as f32;
        return Vec2::new(x, y);
    }

    match kind {
        // Shooters and dashers hug the left or right edge
        EnemyKind::Shooter | EnemyKind::Dasher => {
            let x = if rng.random_bool(0.5) {
                SPAWN_MARGIN
            } else {
                SCREEN_WIDTH - SPAWN_MARGIN
            };
            Vec2::new(x, rng.random_range(min..=max_y) as f32)
        }
        EnemyKind::Homing => Vec2::new(
            rng.random_range(min..=max_x) as f32,
            rng.random_range(min..=max_y) as f32,
        ),
    }
}

/// Create the `spawn_index`-th enemy of a run, telegraphing before it acts
pub fn create_enemy(tuning: &Tuning, spawn_index: u32, rng: &mut impl Rng) -> Enemy {
    let kind = enemy_kind_for(spawn_index);
    let pos = spawn_position(spawn_index, kind, rng);
    let color = ENEMY_COLORS[rng.random_range(0..ENEMY_COLORS.len())];

    Enemy {
        pos,
        vel: Vec2::ZERO,
        color,
        kind,
        state: EnemyState::Spawning,
        fire_rate: tuning.fire_rate_start,
        shots_fired: 0,
        shots_per_round: tuning.shots_per_round,
        timer: tuning.spawn_telegraph,
        trail: Trail::new(),
        rotation: 0.0,
    }
}

/// True if `pos` keeps the minimum separation from the player and every
/// enemy that is not dead
pub fn spawn_position_clear(pos: Vec2, player_pos: Vec2, enemies: &[Enemy], min_distance: f32) -> bool {
    distance_2d(pos, player_pos) >= min_distance
        && enemies
            .iter()
            .filter(|e| !e.is_dead())
            .all(|e| distance_2d(pos, e.pos) >= min_distance)
}

/// Create a bullet at the enemy, aimed at where the player is right now
pub fn create_bullet(tuning: &Tuning, enemy: &Enemy, player: &Player) -> Bullet {
    Bullet {
        pos: enemy.pos,
        vel: homing_velocity(player.pos, enemy.pos, tuning.bullet_speed),
        color: BULLET_COLOR,
        state: BulletState::Live,
    }
}
