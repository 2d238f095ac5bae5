//! Drawing
//!
//! The renderer reads the `World` and issues primitive draw calls on a
//! `Canvas`. It never mutates simulation state; the only randomness it uses
//! (flicker and telegraph colors) comes from a separate cosmetic RNG.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

use crate::consts::{
    BULLET_RADIUS, DASHER_BOUNDS, ENEMY_SIZE, PLAYER_RADIUS, SCREEN_HEIGHT, SCREEN_WIDTH,
};
use crate::sim::spawn::ENEMY_COLORS;
use crate::sim::{Color, Enemy, EnemyKind, EnemyState, Rect, World, WorldPhase};

/// Background grid cell size in pixels
pub const GRID_SPACING: f32 = 40.0;
/// Background scroll speed in pixels per second
pub const GRID_SCROLL_SPEED: f32 = 30.0;

/// Primitive draw calls supplied by the platform
pub trait Canvas {
    fn clear(&mut self, color: Color);
    fn line(&mut self, from: Vec2, to: Vec2, color: Color);
    fn circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn circle_lines(&mut self, center: Vec2, radius: f32, color: Color);
    fn rect_lines(&mut self, rect: Rect, thickness: f32, color: Color);
    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color);

    /// Regular polygon outline; defaults to line segments
    fn poly_lines(&mut self, center: Vec2, sides: u32, radius: f32, rotation: f32, color: Color) {
        let points = polygon_points(center, sides, radius, rotation);
        for (i, &p) in points.iter().enumerate() {
            let next = points[(i + 1) % points.len()];
            self.line(p, next, color);
        }
    }
}

/// Corner points of a regular polygon, `rotation` in degrees
pub fn polygon_points(center: Vec2, sides: u32, radius: f32, rotation: f32) -> Vec<Vec2> {
    let sides = sides.max(3);
    let start = rotation.to_radians();
    (0..sides)
        .map(|i| {
            let theta = start + (i as f32 / sides as f32) * 2.0 * PI;
            Vec2::new(center.x + radius * theta.cos(), center.y + radius * theta.sin())
        })
        .collect()
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Line { from: Vec2, to: Vec2, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    CircleLines { center: Vec2, radius: f32, color: Color },
    RectLines { rect: Rect, thickness: f32, color: Color },
    PolyLines { center: Vec2, sides: u32, radius: f32, rotation: f32, color: Color },
    Text { text: String, pos: Vec2, size: f32, color: Color },
}

/// Canvas that records every call, for headless runs and tests
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    pub commands: Vec<DrawCommand>,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Every text string drawn, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Canvas for CommandList {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }

    fn circle_lines(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::CircleLines { center, radius, color });
    }

    fn rect_lines(&mut self, rect: Rect, thickness: f32, color: Color) {
        self.commands.push(DrawCommand::RectLines { rect, thickness, color });
    }

    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            size,
            color,
        });
    }

    // Recorded as one call rather than its segments
    fn poly_lines(&mut self, center: Vec2, sides: u32, radius: f32, rotation: f32, color: Color) {
        self.commands.push(DrawCommand::PolyLines {
            center,
            sides,
            radius,
            rotation,
            color,
        });
    }
}

/// Everything the renderer needs besides the world
#[derive(Debug, Clone, Copy)]
pub struct View {
    pub show_hud: bool,
    pub show_bounds: bool,
    pub high_score: f32,
    /// Vertical background scroll in pixels
    pub grid_offset: f32,
}

impl Default for View {
    fn default() -> Self {
        Self {
            show_hud: true,
            show_bounds: false,
            high_score: 0.0,
            grid_offset: 0.0,
        }
    }
}

/// Draw the whole frame
pub fn draw_world<C, R>(world: &World, view: &View, canvas: &mut C, rng: &mut R)
where
    C: Canvas + ?Sized,
    R: Rng,
{
    canvas.clear(Color::BLACK);
    draw_grid(canvas, view.grid_offset);

    if view.show_bounds {
        canvas.rect_lines(DASHER_BOUNDS, 2.0, Color::GREEN);
    }

    canvas.circle_lines(world.player.pos, PLAYER_RADIUS, world.player.color);

    for bullet in &world.bullets {
        canvas.circle(bullet.pos, BULLET_RADIUS, Color::YELLOW);
    }

    for enemy in &world.enemies {
        draw_enemy(enemy, world.tuning.reload_duration, world.tuning.blast_radius, canvas, rng);
    }

    if !world.player.is_live() {
        canvas.text(
            "You Died!",
            Vec2::new(SCREEN_WIDTH / 2.0 - 100.0, SCREEN_HEIGHT / 2.0 - 25.0),
            40.0,
            Color::YELLOW,
        );
    } else if world.phase == WorldPhase::Paused {
        canvas.text(
            "Paused",
            Vec2::new(SCREEN_WIDTH / 2.0 - 70.0, SCREEN_HEIGHT / 2.0 - 25.0),
            40.0,
            Color::YELLOW,
        );
    }

    if view.show_hud {
        draw_hud(world, view, canvas);
    }
}

fn draw_grid<C: Canvas + ?Sized>(canvas: &mut C, offset: f32) {
    let mut x = 0.0;
    while x <= SCREEN_WIDTH {
        canvas.line(Vec2::new(x, 0.0), Vec2::new(x, SCREEN_HEIGHT), Color::GRID);
        x += GRID_SPACING;
    }

    let mut y = offset.rem_euclid(GRID_SPACING);
    while y <= SCREEN_HEIGHT {
        canvas.line(Vec2::new(0.0, y), Vec2::new(SCREEN_WIDTH, y), Color::GRID);
        y += GRID_SPACING;
    }
}

fn draw_enemy<C, R>(enemy: &Enemy, reload: f32, blast_radius: f32, canvas: &mut C, rng: &mut R)
where
    C: Canvas + ?Sized,
    R: Rng,
{
    let color = match enemy.state {
        EnemyState::Dead => return,
        EnemyState::Reloading if rng.random_bool(0.5) => Color::RED,
        EnemyState::Spawning => ENEMY_COLORS[rng.random_range(0..ENEMY_COLORS.len())],
        _ => enemy.color,
    };

    canvas.rect_lines(enemy.rect(), 1.0, color);

    let sides = match enemy.kind {
        EnemyKind::Shooter => 3,
        EnemyKind::Dasher => 4,
        EnemyKind::Homing => 6,
    };
    canvas.poly_lines(enemy.pos, sides, ENEMY_SIZE / 4.0, enemy.rotation, color);

    // Fuse indicator grows toward the blast radius
    if enemy.state == EnemyState::Destruct && enemy.timer > 0.0 && reload > 0.0 {
        let radius = (1.0 - enemy.timer / reload) * blast_radius;
        canvas.circle_lines(enemy.pos, radius, Color::ORANGE);
    }

    if enemy.state == EnemyState::Live && enemy.vel != Vec2::ZERO {
        draw_trail(enemy, color, canvas);
    }
}

/// Newest first: each step shrinks by a pixel and halves alpha
fn draw_trail<C: Canvas + ?Sized>(enemy: &Enemy, color: Color, canvas: &mut C) {
    let mut alpha = color.a;
    for (i, &pos) in enemy.trail.iter().rev().enumerate() {
        alpha /= 2;
        if alpha == 0 {
            break;
        }
        let width = ENEMY_SIZE - 1.0 - i as f32;
        canvas.rect_lines(Rect::centered(pos, width), 1.0, color.with_alpha(alpha));
    }
}

fn draw_hud<C: Canvas + ?Sized>(world: &World, view: &View, canvas: &mut C) {
    canvas.text(
        &format!("Best: {:.0}", view.high_score),
        Vec2::new(10.0, 10.0),
        20.0,
        Color::GRAY,
    );
    canvas.text(
        &format!("Shields: {}", world.player.shield.max(0)),
        Vec2::new(SCREEN_WIDTH / 2.0 - 50.0, 10.0),
        20.0,
        Color::GRAY,
    );
    canvas.text(
        &format!("Score: {:.0}", world.score),
        Vec2::new(SCREEN_WIDTH - 120.0, 10.0),
        20.0,
        Color::ORANGE,
    );
}
