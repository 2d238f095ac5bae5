//! Sound effects
//!
//! Fire-and-forget: the session maps game events to effects and hands them to
//! an `AudioSink`. Repeated calls may overlap; nothing ever blocks.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player teleported
    Teleport,
    /// Homer detonated
    Explosion,
    /// Shooter fired
    Shoot,
    /// Player lost a shield
    Hit,
}

impl SoundEffect {
    /// Per-effect mix level before settings are applied
    pub fn default_volume(self) -> f32 {
        match self {
            SoundEffect::Teleport => 0.1,
            SoundEffect::Explosion => 1.0,
            // Shots are too frequent to be audible; kept for sinks that want them
            SoundEffect::Shoot => 0.0,
            SoundEffect::Hit => 0.7,
        }
    }

    /// Effect triggered by a game event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Teleported { .. } => Some(SoundEffect::Teleport),
            GameEvent::Shot => Some(SoundEffect::Shoot),
            GameEvent::PlayerHit { .. } => Some(SoundEffect::Hit),
            GameEvent::Explosion { .. } => Some(SoundEffect::Explosion),
            GameEvent::EnemyRammed
            | GameEvent::EnemiesCollided { .. }
            | GameEvent::GameOver { .. }
            | GameEvent::Restarted => None,
        }
    }
}

/// Something that can play sounds
pub trait AudioSink {
    /// Play `effect` at `volume` (0.0 - 1.0). Must not block.
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Final volume for an effect, or None if it would be silent
pub fn mix_volume(effect: SoundEffect, settings: &Settings) -> Option<f32> {
    let vol = effect.default_volume() * settings.effective_sfx_volume();
    (vol > 0.0).then_some(vol)
}

/// Sink for headless runs: logs what would have played
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::trace!("sfx {:?} @ {:.2}", effect, volume);
    }
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
}
