//! Enemy behavior state machine
//!
//! ```text
//! Spawning ──▶ Live ──▶ Reloading ──▶ Live        (shooter, dasher)
//!              Live ──▶ Destruct ──▶ Dead         (homing)
//! ```
//!
//! Timers count down in seconds; shooter cadence counts frames.

use super::spawn::create_bullet;
use super::state::{Bullet, Enemy, EnemyKind, EnemyState, GameEvent, Player, World};
use crate::consts::DASHER_BOUNDS;
use crate::tuning::Tuning;
use crate::{distance_2d, homing_velocity};

/// Everything an enemy may read or produce while it acts
pub struct BehaviorContext<'a> {
    pub player: &'a Player,
    pub bullets: &'a mut Vec<Bullet>,
    pub events: &'a mut Vec<GameEvent>,
    pub tuning: &'a Tuning,
    /// Running frame counter
    pub frame: u64,
    /// Elapsed seconds this frame
    pub dt: f32,
}

/// Drive every enemy one frame. Dead enemies are skipped, not removed.
pub fn update_enemies(world: &mut World, dt: f32) {
    let World {
        player,
        enemies,
        bullets,
        tuning,
        events,
        frame,
        ..
    } = world;

    let mut ctx = BehaviorContext {
        player,
        bullets,
        events,
        tuning,
        frame: *frame,
        dt,
    };

    for enemy in enemies.iter_mut() {
        step_enemy(enemy, &mut ctx);
    }
}

/// Advance a single enemy
pub fn step_enemy(enemy: &mut Enemy, ctx: &mut BehaviorContext<'_>) {
    match enemy.state {
        EnemyState::Dead => return,
        EnemyState::Spawning => {
            enemy.timer -= ctx.dt;
            if enemy.timer <= 0.0 {
                enemy.state = EnemyState::Live;
                enemy.timer = 0.0;
            }
            return;
        }
        EnemyState::Reloading => {
            enemy.timer -= ctx.dt;
            if enemy.timer > 0.0 {
                return;
            }
            // Back to business this same frame
            enemy.state = EnemyState::Live;
            enemy.timer = 0.0;
        }
        EnemyState::Destruct => {
            if enemy.timer <= 0.0 {
                // Blast was live for one step; now it's gone
                enemy.state = EnemyState::Dead;
                ctx.events.push(GameEvent::Explosion { pos: enemy.pos });
                log::debug!("Homer detonated at ({:.0}, {:.0})", enemy.pos.x, enemy.pos.y);
            } else {
                enemy.timer -= ctx.dt;
            }
            return;
        }
        EnemyState::Live => {}
    }

    match enemy.kind {
        EnemyKind::Shooter => shoot(enemy, ctx),
        EnemyKind::Dasher => dash(enemy, ctx),
        EnemyKind::Homing => {
            enemy.vel = homing_velocity(ctx.player.pos, enemy.pos, ctx.tuning.homing_speed);
        }
    }

    // Runs even for an enemy that just started reloading (velocity is zero)
    enemy.trail.record(enemy.pos);
    enemy.pos += enemy.vel;
    enemy.spin();

    if enemy.kind == EnemyKind::Homing
        && distance_2d(ctx.player.pos, enemy.pos) <= ctx.tuning.blast_trigger_distance
    {
        enemy.state = EnemyState::Destruct;
        enemy.timer = ctx.tuning.reload_duration;
        enemy.trail.clear();
    }
}

/// Fire on cadence, reload after a full round, and speed up over time
fn shoot(enemy: &mut Enemy, ctx: &mut BehaviorContext<'_>) {
    let tuning = ctx.tuning;

    if ctx.frame % u64::from(enemy.fire_rate.max(1)) == 0 {
        if ctx.bullets.len() < tuning.max_bullets {
            ctx.bullets.push(create_bullet(tuning, enemy, ctx.player));
            enemy.shots_fired += 1;
            ctx.events.push(GameEvent::Shot);
        }
        if enemy.shots_fired >= enemy.shots_per_round {
            enemy.shots_fired = 0;
            enemy.state = EnemyState::Reloading;
            enemy.timer = tuning.reload_duration;
        }
    }

    if ctx.frame % tuning.fire_rate_ramp_interval.max(1) == 0 {
        enemy.fire_rate = enemy.fire_rate.saturating_sub(1).max(tuning.fire_rate_floor);
    }
}

/// Lock a dash direction once, park when leaving the inner bounds
fn dash(enemy: &mut Enemy, ctx: &mut BehaviorContext<'_>) {
    if enemy.vel == glam::Vec2::ZERO {
        enemy.vel = homing_velocity(ctx.player.pos, enemy.pos, ctx.tuning.dasher_speed);
    } else if !DASHER_BOUNDS.overlaps(&enemy.rect()) {
        enemy.vel = glam::Vec2::ZERO;
        enemy.state = EnemyState::Reloading;
        enemy.timer = ctx.tuning.reload_duration;
    }
}
