//! High score persistence
//!
//! The game only remembers a single best score. The stored value is lightly
//! obfuscated (scaled by a fixed factor) so it isn't a plain number in storage.
//! Backends: LocalStorage on wasm32, a JSON file on native, memory for tests.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Scale applied to the score before it is written
pub const SCORE_ENCODING_FACTOR: f64 = 0.123678459;

/// Encode a score for storage
pub fn encode_score(score: f32) -> f64 {
    f64::from(score) * SCORE_ENCODING_FACTOR
}

/// Decode a stored value; garbage decodes to 0
pub fn decode_score(encoded: f64) -> f32 {
    let score = (encoded / SCORE_ENCODING_FACTOR) as f32;
    if score.is_finite() && score > 0.0 { score } else { 0.0 }
}

/// A scalar key-value cell holding the best score.
///
/// Reads never fail: an absent or unreadable value is 0.
pub trait HighScoreStore {
    fn read_high_score(&self) -> f32;
    fn set_high_score(&mut self, score: f32);
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    encoded: Option<f64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: f32) -> Self {
        Self {
            encoded: Some(encode_score(score)),
        }
    }
}

impl HighScoreStore for MemoryStore {
    fn read_high_score(&self) -> f32 {
        self.encoded.map(decode_score).unwrap_or(0.0)
    }

    fn set_high_score(&mut self, score: f32) {
        self.encoded = Some(encode_score(score));
    }
}

/// On-disk document
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HighScoreFile {
    encoded: f64,
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HighScoreStore for FileStore {
    fn read_high_score(&self) -> f32 {
        let Ok(json) = std::fs::read_to_string(&self.path) else {
            log::info!("No high score at {}, starting fresh", self.path.display());
            return 0.0;
        };
        match serde_json::from_str::<HighScoreFile>(&json) {
            Ok(file) => decode_score(file.encoded),
            Err(e) => {
                log::warn!("Ignoring corrupt high score {}: {}", self.path.display(), e);
                0.0
            }
        }
    }

    fn set_high_score(&mut self, score: f32) {
        let file = HighScoreFile {
            encoded: encode_score(score),
        };
        let result = serde_json::to_string(&file)
            .map_err(std::io::Error::other)
            .and_then(|json| std::fs::write(&self.path, json));
        match result {
            Ok(()) => log::info!("High score {:.0} saved", score),
            Err(e) => log::warn!("Failed to save high score to {}: {}", self.path.display(), e),
        }
    }
}

/// Browser LocalStorage store
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "ac152700-b6e1-11eb-8529-0242ac130003";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn read_high_score(&self) -> f32 {
        Self::storage()
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten())
            .and_then(|v| v.parse::<f64>().ok())
            .map(decode_score)
            .unwrap_or(0.0)
    }

    fn set_high_score(&mut self, score: f32) {
        if let Some(storage) = Self::storage() {
            let value = encode_score(score).to_string();
            if storage.set_item(Self::STORAGE_KEY, &value).is_ok() {
                log::info!("High score {:.0} saved", score);
            }
        }
    }
}

/// Platform default store (LocalStorage)
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> Box<dyn HighScoreStore> {
    Box::new(LocalStorageStore)
}

/// Platform default store (file in the working directory)
#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> Box<dyn HighScoreStore> {
    Box::new(FileStore::new("quantum-evasion-highscore.json"))
}
