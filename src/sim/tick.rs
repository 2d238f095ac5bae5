//! Per-frame simulation step
//!
//! Order matters; each stage sees what the previous one did:
//! 1. score and spawn timer
//! 2. input (restart, unpause, teleport); a restart or unpause ends the step
//! 3. player collisions
//! 4. game over
//! 5. spawn policy
//! 6. enemy behavior
//! 7. enemy compaction
//! 8. bullet integration and culling

use glam::Vec2;

use super::behavior::update_enemies;
use super::collision::{bullet_hits_player, enemy_hits_enemy, enemy_hits_player, player_in_blast};
use super::spawn::{create_enemy, spawn_position_clear};
use super::state::{
    Bullet, BulletState, EnemyState, GameEvent, HitSource, PlayerState, World, WorldPhase,
};
use crate::consts::BULLET_BOUNDS;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap position this frame, if any
    pub tap: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    pub fn tap(pos: Vec2) -> Self {
        Self {
            tap: Some(pos),
            ..Default::default()
        }
    }
}

/// Advance the world by one frame of `dt` seconds
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    world.phase_frames = world.phase_frames.saturating_add(1);

    if world.is_running() {
        world.frame += 1;
        world.score += world.tuning.score_per_frame;
        world.spawn_timer = (world.spawn_timer - dt).max(0.0);
    }

    if handle_input(world, input) {
        return;
    }

    if !world.is_running() {
        return;
    }

    resolve_player_collisions(world);
    if world.tuning.enemy_collisions {
        resolve_enemy_collisions(world);
    }

    check_game_over(world);
    if !world.is_running() {
        return;
    }

    try_spawn(world);
    update_enemies(world, dt);
    world.compact_enemies();
    update_bullets(&mut world.bullets);
}

/// Apply taps and pause toggles. Returns true when the world was reset or
/// resumed; the world then waits for the next step.
fn handle_input(world: &mut World, input: &TickInput) -> bool {
    if input.pause {
        match world.phase {
            WorldPhase::Running => {
                world.set_phase(WorldPhase::Paused);
                log::info!("Paused at score {:.0}", world.score);
                return false;
            }
            WorldPhase::Paused => {
                world.set_phase(WorldPhase::Running);
                return true;
            }
            WorldPhase::GameOver => {}
        }
    }

    let Some(tap) = input.tap else {
        return false;
    };

    match world.phase {
        WorldPhase::GameOver => {
            if world.phase_frames >= world.tuning.restart_grace_frames {
                world.reset(WorldPhase::Running);
                world.events.push(GameEvent::Restarted);
                log::info!("World reset");
                return true;
            }
        }
        WorldPhase::Paused => {
            world.set_phase(WorldPhase::Running);
            return true;
        }
        WorldPhase::Running => {
            if world.player.is_live() {
                world.player.pos = tap;
                world.events.push(GameEvent::Teleported { pos: tap });
            }
        }
    }
    false
}

fn hurt_player(world: &mut World, source: HitSource) {
    world.player.shield -= 1;
    world.events.push(GameEvent::PlayerHit { source });
}

/// Each distinct hit source costs one shield
fn resolve_player_collisions(world: &mut World) {
    if bullet_hits_player(&world.player, &mut world.bullets) {
        hurt_player(world, HitSource::Bullet);
    }

    if player_in_blast(&world.player, &world.enemies, world.tuning.blast_radius) {
        hurt_player(world, HitSource::Blast);
    }

    for idx in enemy_hits_player(&world.player, &world.enemies) {
        let enemy = &mut world.enemies[idx];
        // Parked enemies are a free kill
        let parked = enemy.state == EnemyState::Reloading;
        enemy.state = EnemyState::Dead;
        if parked {
            world.events.push(GameEvent::EnemyRammed);
        } else {
            hurt_player(world, HitSource::Enemy);
        }
    }
}

/// Enemies that run into each other both die and pay a bonus
fn resolve_enemy_collisions(world: &mut World) {
    let hits = enemy_hits_enemy(&world.enemies);
    if hits.is_empty() {
        return;
    }
    for &idx in &hits {
        world.enemies[idx].state = EnemyState::Dead;
        world.score += world.tuning.enemy_self_kill_bonus;
    }
    world.events.push(GameEvent::EnemiesCollided { count: hits.len() });
}

fn check_game_over(world: &mut World) {
    if world.player.shield < 0 && world.player.state != PlayerState::Dead {
        world.player.state = PlayerState::Dead;
        world.set_phase(WorldPhase::GameOver);
        world.events.push(GameEvent::GameOver { score: world.score });
        log::info!(
            "Game over: score {:.0}, {} enemies spawned",
            world.score,
            world.total_spawned
        );
    }
}

/// Spawn one enemy if the cap, the timer and the separation rule allow it.
/// A blocked position skips this frame; the timer stays at zero so the next
/// frame tries again.
pub fn try_spawn(world: &mut World) -> bool {
    if world.enemies.len() >= world.tuning.max_enemies || world.spawn_timer > 0.0 {
        return false;
    }

    let enemy = create_enemy(&world.tuning, world.total_spawned, &mut world.rng);
    if !spawn_position_clear(
        enemy.pos,
        world.player.pos,
        &world.enemies,
        world.tuning.min_spawn_separation,
    ) {
        log::debug!("Spawn blocked at ({:.0}, {:.0})", enemy.pos.x, enemy.pos.y);
        return false;
    }

    log::debug!(
        "Spawned {:?} #{} at ({:.0}, {:.0})",
        enemy.kind,
        world.total_spawned,
        enemy.pos.x,
        enemy.pos.y
    );
    world.enemies.push(enemy);
    world.total_spawned += 1;
    world.spawn_timer = world.tuning.next_spawn_interval(world.enemies.len());
    true
}

/// Move live bullets; drop dead ones and any outside the cull bounds
pub fn update_bullets(bullets: &mut Vec<Bullet>) {
    bullets.retain_mut(|bullet| {
        if bullet.state == BulletState::Dead || !BULLET_BOUNDS.contains_point(bullet.pos) {
            return false;
        }
        bullet.pos += bullet.vel;
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::sim::spawn::{BULLET_COLOR, create_enemy};
    use crate::sim::state::EnemyKind;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn running_world(seed: u64) -> World {
        World::new(Tuning::default(), seed, WorldPhase::Running)
    }

    fn bullet(pos: Vec2, vel: Vec2) -> Bullet {
        Bullet {
            pos,
            vel,
            color: BULLET_COLOR,
            state: BulletState::Live,
        }
    }

    fn live_enemy(world: &mut World, index: u32, pos: Vec2) {
        let mut enemy = create_enemy(&world.tuning, index, &mut world.rng);
        enemy.pos = pos;
        enemy.state = EnemyState::Live;
        enemy.timer = 0.0;
        world.enemies.push(enemy);
    }

    #[test]
    fn test_score_advances_only_while_running() {
        let mut world = running_world(1);
        tick(&mut world, &TickInput::default(), FRAME_DT);
        assert!((world.score - 0.2).abs() < 1e-6);
        assert_eq!(world.frame, 1);

        world.set_phase(WorldPhase::Paused);
        tick(&mut world, &TickInput::default(), FRAME_DT);
        assert!((world.score - 0.2).abs() < 1e-6);
        assert_eq!(world.frame, 1);
    }

    #[test]
    fn test_teleport_on_tap() {
        let mut world = running_world(1);
        tick(&mut world, &TickInput::tap(Vec2::new(100.0, 200.0)), FRAME_DT);
        assert_eq!(world.player.pos, Vec2::new(100.0, 200.0));
        assert!(world.events.contains(&GameEvent::Teleported {
            pos: Vec2::new(100.0, 200.0)
        }));
    }

    #[test]
    fn test_tap_unpauses_without_teleport() {
        let mut world = World::new(Tuning::default(), 1, WorldPhase::Paused);
        let start = world.player.pos;
        tick(&mut world, &TickInput::tap(Vec2::new(10.0, 10.0)), FRAME_DT);
        assert_eq!(world.phase, WorldPhase::Running);
        assert_eq!(world.player.pos, start);
    }

    #[test]
    fn test_unpause_frame_is_idle() {
        let mut world = World::new(Tuning::default(), 1, WorldPhase::Paused);
        world.bullets.push(bullet(Vec2::new(100.0, 100.0), Vec2::new(5.0, 0.0)));
        live_enemy(&mut world, 4, Vec2::new(50.0, 300.0));

        tick(&mut world, &TickInput::tap(Vec2::new(10.0, 10.0)), FRAME_DT);
        assert_eq!(world.phase, WorldPhase::Running);
        assert_eq!(world.bullets[0].pos, Vec2::new(100.0, 100.0));
        assert_eq!(world.frame, 0);
        assert_eq!(world.score, 0.0);

        tick(&mut world, &TickInput::default(), FRAME_DT);
        assert_eq!(world.bullets[0].pos, Vec2::new(105.0, 100.0));
        assert_eq!(world.frame, 1);
    }

    #[test]
    fn test_spawning_enemy_is_harmless() {
        let mut world = running_world(1);
        world.spawn_timer = 1_000.0;
        let mut enemy = create_enemy(&world.tuning, 0, &mut world.rng);
        enemy.pos = Vec2::new(100.0, 100.0);
        world.enemies.push(enemy);
        assert_eq!(world.enemies[0].state, EnemyState::Spawning);

        tick(&mut world, &TickInput::tap(Vec2::new(100.0, 100.0)), FRAME_DT);
        assert_eq!(world.player.shield, 3);
        assert_eq!(world.enemies.len(), 1);
        assert!(
            !world
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::PlayerHit { .. }))
        );
    }

    #[test]
    fn test_touching_detonating_homer_still_explodes() {
        let mut world = running_world(1);
        let p = world.player.pos;
        live_enemy(&mut world, 3, p + Vec2::new(15.0, 0.0));
        world.enemies[0].state = EnemyState::Destruct;
        world.enemies[0].timer = 0.0;

        tick(&mut world, &TickInput::default(), FRAME_DT);
        assert_eq!(world.player.shield, 2);
        assert!(world.enemies.is_empty());
        assert_eq!(
            world.events,
            vec![
                GameEvent::PlayerHit {
                    source: HitSource::Blast
                },
                GameEvent::Explosion {
                    pos: p + Vec2::new(15.0, 0.0)
                },
            ]
        );
    }

    #[test]
    fn test_pause_toggle() {
        let mut world = running_world(1);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut world, &pause, FRAME_DT);
        assert_eq!(world.phase, WorldPhase::Paused);
        tick(&mut world, &pause, FRAME_DT);
        assert_eq!(world.phase, WorldPhase::Running);
    }

    #[test]
    fn test_restart_needs_grace_period() {
        let mut world = running_world(1);
        world.player.shield = 0;
        world.bullets.push(bullet(world.player.pos, Vec2::ZERO));
        tick(&mut world, &TickInput::default(), FRAME_DT);
        assert_eq!(world.phase, WorldPhase::GameOver);

        // Too early: ignored
        tick(&mut world, &TickInput::tap(Vec2::new(5.0, 5.0)), FRAME_DT);
        assert_eq!(world.phase, WorldPhase::GameOver);

        for _ in 0..world.tuning.restart_grace_frames {
            tick(&mut world, &TickInput::default(), FRAME_DT);
        }
        tick(&mut world, &TickInput::tap(Vec2::new(5.0, 5.0)), FRAME_DT);
        assert_eq!(world.phase, WorldPhase::Running);
        assert_eq!(world.player.shield, 3);
        assert_eq!(world.player.pos, Vec2::new(270.0, 760.0));
        assert!(world.bullets.is_empty());
        assert!(world.events.contains(&GameEvent::Restarted));
    }

    #[test]
    fn test_multiple_sources_stack() {
        let mut world = running_world(1);
        let p = world.player.pos;
        world.bullets.push(bullet(p, Vec2::ZERO));
        live_enemy(&mut world, 0, p + Vec2::new(15.0, 0.0));
        live_enemy(&mut world, 1, p + Vec2::new(-15.0, 0.0));

        tick(&mut world, &TickInput::default(), FRAME_DT);
        assert_eq!(world.player.shield, 0);
        assert!(world.enemies.is_empty());
        assert_eq!(world.phase, WorldPhase::Running);
    }

    #[test]
    fn test_reloading_enemy_is_free_kill() {
        let mut world = running_world(1);
        let p = world.player.pos;
        live_enemy(&mut world, 0, p + Vec2::new(15.0, 0.0));
        world.enemies[0].state = EnemyState::Reloading;
        world.enemies[0].timer = 1.0;

        tick(&mut world, &TickInput::default(), FRAME_DT);
        assert_eq!(world.player.shield, 3);
        assert!(world.enemies.is_empty());
        assert!(world.events.contains(&GameEvent::EnemyRammed));
    }

    #[test]
    fn test_blast_costs_shield_then_homer_is_gone() {
        let mut world = running_world(1);
        let p = world.player.pos;
        live_enemy(&mut world, 3, p + Vec2::new(50.0, 0.0));
        world.enemies[0].state = EnemyState::Destruct;
        world.enemies[0].timer = 0.0;

        tick(&mut world, &TickInput::default(), FRAME_DT);
        assert_eq!(world.player.shield, 2);
        assert!(world.enemies.is_empty());
        assert!(world.events.contains(&GameEvent::PlayerHit {
            source: HitSource::Blast
        }));
        assert!(
            world
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::Explosion { .. }))
        );
    }

    #[test]
    fn test_game_over_same_step() {
        let mut world = running_world(1);
        world.player.shield = 0;
        world.bullets.push(bullet(world.player.pos, Vec2::ZERO));
        tick(&mut world, &TickInput::default(), FRAME_DT);

        assert_eq!(world.player.shield, -1);
        assert_eq!(world.player.state, PlayerState::Dead);
        assert_eq!(world.phase, WorldPhase::GameOver);
        assert!(
            world
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }))
        );
    }

    #[test]
    fn test_first_spawn_after_initial_delay() {
        let mut world = running_world(3);
        for _ in 0..59 {
            tick(&mut world, &TickInput::default(), FRAME_DT);
        }
        assert!(world.enemies.is_empty());
        for _ in 0..2 {
            tick(&mut world, &TickInput::default(), FRAME_DT);
        }
        assert_eq!(world.enemies.len(), 1);
        assert_eq!(world.total_spawned, 1);
        assert_eq!(world.enemies[0].kind, EnemyKind::Dasher);
        assert_eq!(world.enemies[0].state, EnemyState::Spawning);
    }

    #[test]
    fn test_blocked_spawn_retries_next_frame() {
        let mut world = running_world(3);
        world.spawn_timer = 0.0;
        // Park the player on the only place the first enemy can spawn
        world.tuning.min_spawn_separation = 10_000.0;
        tick(&mut world, &TickInput::default(), FRAME_DT);
        assert!(world.enemies.is_empty());
        assert_eq!(world.total_spawned, 0);
        assert_eq!(world.spawn_timer, 0.0);

        world.tuning.min_spawn_separation = 0.0;
        tick(&mut world, &TickInput::default(), FRAME_DT);
        assert_eq!(world.enemies.len(), 1);
        assert_eq!(world.spawn_timer, world.tuning.early_spawn_interval);
    }

    #[test]
    fn test_enemy_collisions_toggle() {
        let mut world = running_world(1);
        live_enemy(&mut world, 4, Vec2::new(100.0, 100.0));
        live_enemy(&mut world, 8, Vec2::new(105.0, 105.0));

        tick(&mut world, &TickInput::default(), FRAME_DT);
        assert_eq!(world.enemies.len(), 2);

        world.tuning.enemy_collisions = true;
        let before = world.score;
        tick(&mut world, &TickInput::default(), FRAME_DT);
        assert!(world.enemies.is_empty());
        assert!(world.score >= before + 200.0);
    }

    #[test]
    fn test_bullets_cull_and_drop_dead() {
        let mut bullets = vec![
            bullet(Vec2::new(100.0, 100.0), Vec2::new(5.0, 0.0)),
            bullet(Vec2::new(-51.0, 100.0), Vec2::new(5.0, 0.0)),
            bullet(Vec2::new(100.0, 1010.0), Vec2::ZERO),
            bullet(Vec2::new(200.0, 100.0), Vec2::ZERO),
        ];
        bullets[3].state = BulletState::Dead;
        update_bullets(&mut bullets);
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].pos, Vec2::new(105.0, 100.0));
    }

    #[test]
    fn test_determinism() {
        let inputs: Vec<TickInput> = (0..600)
            .map(|i| {
                if i % 45 == 0 {
                    TickInput::tap(Vec2::new((i % 500) as f32, (i % 900) as f32))
                } else {
                    TickInput::default()
                }
            })
            .collect();

        let mut a = running_world(99999);
        let mut b = running_world(99999);
        for input in &inputs {
            tick(&mut a, input, FRAME_DT);
            tick(&mut b, input, FRAME_DT);
        }

        assert_eq!(a.frame, b.frame);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.bullets.len(), b.bullets.len());
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.pos, eb.pos);
            assert_eq!(ea.state, eb.state);
        }
        assert_eq!(a.player.shield, b.player.shield);
    }

    fn arb_inputs() -> impl Strategy<Value = Vec<Option<(f32, f32)>>> {
        prop::collection::vec(
            prop::option::weighted(0.05, (0.0f32..540.0, 0.0f32..960.0)),
            200..1500,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_caps_hold(seed in any::<u64>(), taps in arb_inputs(), max_enemies in 1usize..12, max_bullets in 0usize..20) {
            let tuning = Tuning {
                max_enemies,
                max_bullets,
                fire_rate_start: 3,
                fire_rate_floor: 1,
                spawn_interval: 0.2,
                early_spawn_interval: 0.1,
                ..Tuning::default()
            };
            let mut world = World::new(tuning, seed, WorldPhase::Running);
            for tap in taps {
                let input = TickInput { tap: tap.map(|(x, y)| Vec2::new(x, y)), pause: false };
                tick(&mut world, &input, FRAME_DT);
                prop_assert!(world.enemies.len() <= max_enemies);
                prop_assert!(world.bullets.len() <= max_bullets);
                prop_assert!(world.enemies.iter().all(|e| e.trail.len() <= crate::consts::MAX_ENEMY_TRAIL));
            }
        }

        #[test]
        fn prop_shield_never_increases_within_a_run(seed in any::<u64>(), taps in arb_inputs()) {
            let mut world = running_world(seed);
            let mut shield = world.player.shield;
            let mut score = world.score;
            for tap in taps {
                // Never restart, so the whole sequence is one run
                let tap = if world.phase == WorldPhase::GameOver { None } else { tap };
                let input = TickInput { tap: tap.map(|(x, y)| Vec2::new(x, y)), pause: false };
                tick(&mut world, &input, FRAME_DT);

                prop_assert!(world.player.shield <= shield);
                prop_assert!(world.score >= score);
                if world.player.shield < 0 {
                    prop_assert_eq!(world.player.state, PlayerState::Dead);
                    prop_assert_eq!(world.phase, WorldPhase::GameOver);
                }
                if shield < 0 {
                    prop_assert_eq!(world.player.state, PlayerState::Dead);
                }
                shield = world.player.shield;
                score = world.score;
            }
        }

        #[test]
        fn prop_compaction_idempotent(seed in any::<u64>(), dead_mask in prop::collection::vec(any::<bool>(), 0..10)) {
            let mut world = running_world(seed);
            for (i, dead) in dead_mask.iter().enumerate() {
                live_enemy(&mut world, i as u32, Vec2::new(60.0 + 40.0 * i as f32, 300.0));
                if *dead {
                    world.enemies[i].state = EnemyState::Dead;
                }
            }
            world.compact_enemies();
            let once: Vec<Vec2> = world.enemies.iter().map(|e| e.pos).collect();
            world.compact_enemies();
            let twice: Vec<Vec2> = world.enemies.iter().map(|e| e.pos).collect();
            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(once.len(), dead_mask.iter().filter(|d| !**d).count());
        }

        #[test]
        fn prop_bullets_outside_bounds_are_culled(x in -500.0f32..1000.0, y in -500.0f32..1500.0) {
            let outside = !BULLET_BOUNDS.contains_point(Vec2::new(x, y));
            let mut world = running_world(1);
            // Keep the player away from the bullet
            world.player.pos = Vec2::new(-10_000.0, -10_000.0);
            world.bullets.push(bullet(Vec2::new(x, y), Vec2::ZERO));
            tick(&mut world, &TickInput::default(), FRAME_DT);
            prop_assert_eq!(world.bullets.is_empty(), outside);
        }

        #[test]
        fn prop_dasher_direction_locked(x in 80.0f32..460.0, y in 80.0f32..880.0, px in 0.0f32..540.0, py in 0.0f32..960.0) {
            let mut world = running_world(1);
            world.spawn_timer = 1_000.0;
            world.player.pos = Vec2::new(px, py);
            live_enemy(&mut world, 0, Vec2::new(x, y));
            world.enemies[0].vel = Vec2::new(3.0, -4.0).normalize() * world.tuning.dasher_speed;
            let locked = world.enemies[0].vel;

            for _ in 0..200 {
                world.frame += 1;
                crate::sim::behavior::update_enemies(&mut world, FRAME_DT);
                let enemy = &world.enemies[0];
                if enemy.state != EnemyState::Live {
                    prop_assert_eq!(enemy.vel, Vec2::ZERO);
                    break;
                }
                prop_assert_eq!(enemy.vel, locked);
            }
        }
    }
}
