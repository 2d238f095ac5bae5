//! Collision queries between the player, bullets and enemies
//!
//! Queries read the actor lists and report hits; resolving them (shield loss,
//! kills) is the frame step's job. The one exception is `bullet_hits_player`,
//! which retires the bullet it hit.

use super::rect::{circle_rect_overlap, circles_overlap};
use super::state::{Bullet, BulletState, Enemy, EnemyState, Player};
use crate::consts::{BULLET_RADIUS, PLAYER_RADIUS};

/// Check the player against live bullets.
///
/// The first overlapping bullet is marked dead and `true` is returned; at most
/// one bullet is resolved per call even if several overlap the player.
pub fn bullet_hits_player(player: &Player, bullets: &mut [Bullet]) -> bool {
    for bullet in bullets.iter_mut() {
        if bullet.state == BulletState::Dead {
            continue;
        }
        if circles_overlap(player.pos, PLAYER_RADIUS, bullet.pos, BULLET_RADIUS) {
            bullet.state = BulletState::Dead;
            return true;
        }
    }
    false
}

/// Check whether the player is caught in the blast of a detonating homer
pub fn player_in_blast(player: &Player, enemies: &[Enemy], blast_radius: f32) -> bool {
    enemies
        .iter()
        .filter(|e| e.is_detonating())
        .any(|e| circles_overlap(player.pos, PLAYER_RADIUS, e.pos, blast_radius))
}

/// Indices of every solid enemy whose box overlaps the player circle.
///
/// Telegraphing (spawning) enemies are inert, and a detonating homer is
/// handled by the blast test and goes off in the behavior pass.
pub fn enemy_hits_player(player: &Player, enemies: &[Enemy]) -> Vec<usize> {
    enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| !matches!(e.state, EnemyState::Dead | EnemyState::Spawning))
        .filter(|(_, e)| !e.is_detonating())
        .filter(|(_, e)| circle_rect_overlap(player.pos, PLAYER_RADIUS, &e.rect()))
        .map(|(i, _)| i)
        .collect()
}

/// Indices of non-dead enemies whose boxes overlap another enemy's box.
///
/// Every unique pair is tested (O(n²), n is small and capped). Each index
/// appears at most once, in discovery order.
pub fn enemy_hits_enemy(enemies: &[Enemy]) -> Vec<usize> {
    let mut hits = Vec::new();
    for i in 0..enemies.len() {
        if enemies[i].is_dead() {
            continue;
        }
        let rect_i = enemies[i].rect();
        for j in (i + 1)..enemies.len() {
            if enemies[j].is_dead() || !rect_i.overlaps(&enemies[j].rect()) {
                continue;
            }
            if !hits.contains(&i) {
                hits.push(i);
            }
            if !hits.contains(&j) {
                hits.push(j);
            }
        }
    }
    hits
}
