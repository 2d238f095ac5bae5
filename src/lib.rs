//! Quantum Evasion - A touch-driven arcade survival game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actors, collisions, enemy behavior, frame step)
//! - `session`: Game session controller (Init/Update/Draw/Finish lifecycle)
//! - `render`: Draw-call interface and read-only world renderer
//! - `audio`: Fire-and-forget sound effect sink
//! - `highscores`: Single scalar high score persistence
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod audio;
pub mod highscores;
pub mod render;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScoreStore, MemoryStore};
pub use session::{FrameInput, GameSession};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use crate::sim::Rect;

    /// Playfield dimensions (portrait)
    pub const SCREEN_WIDTH: f32 = 540.0;
    pub const SCREEN_HEIGHT: f32 = 960.0;

    /// Target frame rate; all per-frame velocities assume this cadence
    pub const FRAME_RATE: u32 = 60;
    /// Fixed frame step in seconds
    pub const FRAME_DT: f32 = 1.0 / FRAME_RATE as f32;

    /// Player collision circle
    pub const PLAYER_RADIUS: f32 = 20.0;
    /// Bullet collision circle
    pub const BULLET_RADIUS: f32 = 3.0;
    /// Enemies collide as a fixed square box centered on their position
    pub const ENEMY_SIZE: f32 = 20.0;

    /// Past positions kept per enemy for the movement trail
    pub const MAX_ENEMY_TRAIL: usize = 10;

    /// Cosmetic enemy spin (degrees per frame)
    pub const ENEMY_SPIN_DEGREES: f32 = 3.0;

    /// The visible playfield
    pub const PLAYFIELD: Rect = Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT);
    /// Dashers park once their box leaves this inner rectangle
    pub const DASHER_BOUNDS: Rect = PLAYFIELD.inset(50.0);
    /// Bullets are culled once they leave this outer rectangle
    pub const BULLET_BOUNDS: Rect = PLAYFIELD.inset(-50.0);

    /// Spawn margin from the playfield edges
    pub const SPAWN_MARGIN: f32 = 50.0;
}

/// Angle (radians) of the vector pointing from `b` to `a`
#[inline]
pub fn coordinate_angle(a: Vec2, b: Vec2) -> f32 {
    (a.y - b.y).atan2(a.x - b.x)
}

/// Euclidean distance between two points
#[inline]
pub fn distance_2d(a: Vec2, b: Vec2) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Velocity of magnitude `speed` pointing from `origin` toward `target`.
///
/// When both points coincide the direction falls back to angle 0 (+x), so the
/// result is always `speed` long.
#[inline]
pub fn homing_velocity(target: Vec2, origin: Vec2, speed: f32) -> Vec2 {
    let angle = if target == origin {
        0.0
    } else {
        coordinate_angle(target, origin)
    };
    Vec2::new(angle.cos() * speed, angle.sin() * speed)
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees % 360.0;
    if wrapped < 0.0 { wrapped + 360.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_coordinate_angle() {
        let origin = Vec2::new(10.0, 10.0);
        assert!((coordinate_angle(Vec2::new(20.0, 10.0), origin)).abs() < 1e-6);
        assert!((coordinate_angle(Vec2::new(10.0, 20.0), origin) - FRAC_PI_2).abs() < 1e-6);
        assert!((coordinate_angle(Vec2::new(0.0, 10.0), origin).abs() - PI).abs() < 1e-6);
    }

    #[test]
    fn test_distance_2d() {
        assert_eq!(distance_2d(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0)), 5.0);
        assert_eq!(distance_2d(Vec2::new(3.0, 4.0), Vec2::new(0.0, 0.0)), 5.0);
        assert_eq!(distance_2d(Vec2::new(7.0, 7.0), Vec2::new(7.0, 7.0)), 0.0);
    }

    #[test]
    fn test_homing_velocity_points_at_target() {
        let vel = homing_velocity(Vec2::new(100.0, 0.0), Vec2::ZERO, 5.0);
        assert!((vel.x - 5.0).abs() < 1e-5);
        assert!(vel.y.abs() < 1e-5);

        let vel = homing_velocity(Vec2::new(0.0, 0.0), Vec2::new(30.0, 40.0), 10.0);
        assert!((vel.x + 6.0).abs() < 1e-4);
        assert!((vel.y + 8.0).abs() < 1e-4);
        assert!((vel.length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_homing_velocity_degenerate_falls_back_to_angle_zero() {
        let p = Vec2::new(42.0, 17.0);
        let vel = homing_velocity(p, p, 8.0);
        assert_eq!(vel, Vec2::new(8.0, 0.0));
    }

    #[test]
    fn test_bounds_from_playfield() {
        use crate::consts::{BULLET_BOUNDS, DASHER_BOUNDS};
        use crate::sim::Rect;
        assert_eq!(DASHER_BOUNDS, Rect::new(50.0, 50.0, 440.0, 860.0));
        assert_eq!(BULLET_BOUNDS, Rect::new(-50.0, -50.0, 640.0, 1060.0));
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(361.0), 1.0);
        assert_eq!(wrap_degrees(720.0), 0.0);
        assert_eq!(wrap_degrees(-90.0), 270.0);
    }
}
