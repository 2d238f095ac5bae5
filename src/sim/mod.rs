//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed frame step only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or storage dependencies

pub mod behavior;
pub mod collision;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{bullet_hits_player, enemy_hits_enemy, enemy_hits_player, player_in_blast};
pub use rect::{Rect, circle_rect_overlap, circles_overlap};
pub use spawn::{ENEMY_ORDER, create_bullet, create_enemy, create_player};
pub use state::{
    Bullet, BulletState, Color, Enemy, EnemyKind, EnemyState, GameEvent, HitSource, Player,
    PlayerState, Trail, World, WorldPhase,
};
pub use tick::{TickInput, tick};
