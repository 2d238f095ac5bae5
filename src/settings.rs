//! Player settings and preferences
//!
//! Loaded from an optional JSON file; anything missing takes its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Session ===
    /// Start each session paused until the first tap
    pub start_paused: bool,
    /// Fixed RNG seed (None = time based)
    pub seed: Option<u64>,

    // === HUD ===
    /// Show score/shield text
    pub show_hud: bool,
    /// Outline the dasher bounds (debug)
    pub show_bounds: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence everything
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_paused: false,
            seed: None,

            show_hud: true,
            show_bounds: false,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Effective sound effect gain (respects mute)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Parse a (possibly partial) JSON settings document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|json| Self::from_json(&json).map_err(|e| e.to_string()));
        match parsed {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }
}
