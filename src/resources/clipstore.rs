//! Animation clip registry.
//!
//! Clips are immutable external assets. The controller only needs their
//! native duration, stored in fixed-point [`Ticks`] so that blended playback
//! math stays exact.
//!
//! # Asset Format
//!
//! ```json
//! { "idle": { "duration_seconds": 2.0 }, "walk": { "duration_seconds": 1.0 } }
//! ```

use std::path::Path;

use bevy_ecs::prelude::Resource;
use log::info;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::ConfigurationError;
use crate::resources::drawtime::{Ticks, seconds_to_ticks};

/// Immutable clip description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationClip {
    /// Native clip length.
    pub duration: Ticks,
}

impl AnimationClip {
    pub fn from_seconds(seconds: f64) -> Self {
        Self {
            duration: seconds_to_ticks(seconds).max(0),
        }
    }
}

#[derive(Deserialize)]
struct ClipAsset {
    duration_seconds: f64,
}

/// Loaded clips keyed by name.
#[derive(Resource, Default, Debug)]
pub struct ClipStore {
    pub clips: FxHashMap<String, AnimationClip>,
}

impl ClipStore {
    pub fn insert(&mut self, key: impl Into<String>, clip: AnimationClip) {
        self.clips.insert(key.into(), clip);
    }

    /// Look up a clip required by a controller.
    pub fn resolve(&self, key: &str) -> Result<AnimationClip, ConfigurationError> {
        self.clips
            .get(key)
            .copied()
            .ok_or_else(|| ConfigurationError::MissingClip(key.to_string()))
    }

    /// Parse clips from a JSON string and add them to the store.
    pub fn load_json_str(&mut self, source: &str, path: &Path) -> Result<usize, ConfigurationError> {
        let parsed: FxHashMap<String, ClipAsset> =
            serde_json::from_str(source).map_err(|source| ConfigurationError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let count = parsed.len();
        for (key, asset) in parsed {
            self.insert(key, AnimationClip::from_seconds(asset.duration_seconds));
        }
        Ok(count)
    }

    /// Read and parse a JSON clip asset file.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize, ConfigurationError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let count = self.load_json_str(&source, path)?;
        info!("Loaded {} animation clip(s) from {:?}", count, path);
        Ok(count)
    }
}
