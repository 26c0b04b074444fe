//! Gravity curve registry.
//!
//! Jump arcs are shaped by author-supplied curves mapping normalized jump
//! progress in `[0, 1]` to a gravity scale. Curves are immutable once loaded
//! and shared between controllers through `Arc`.
//!
//! # Asset Format
//!
//! ```json
//! {
//!   "jump": { "keys": [ { "t": 0.0, "value": 0.2 }, { "t": 1.0, "value": 1.0 } ] }
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// One key of a piecewise-linear curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    /// Normalized position in `[0, 1]`.
    pub t: f32,
    /// Gravity scale at `t`.
    pub value: f32,
}

/// Piecewise-linear gravity scale curve.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GravityCurve {
    pub keys: Vec<CurveKey>,
}

impl GravityCurve {
    /// Build a curve from keys, sorting them by `t`.
    pub fn new(mut keys: Vec<CurveKey>) -> Self {
        keys.sort_by(|a, b| a.t.total_cmp(&b.t));
        Self { keys }
    }

    /// A curve that always returns `value`.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![CurveKey { t: 0.0, value }])
    }

    /// Sample the curve. Inputs are clamped to `[0, 1]` and values outside
    /// the key range hold the nearest end key. An empty curve samples as 1.0.
    pub fn sample(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 1.0;
        };
        if t <= first.t {
            return first.value;
        }
        if t >= last.t {
            return last.value;
        }
        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.t {
                let span = b.t - a.t;
                if span <= f32::EPSILON {
                    return b.value;
                }
                let f = (t - a.t) / span;
                return a.value + (b.value - a.value) * f;
            }
        }
        last.value
    }
}

/// Loaded gravity curves keyed by name.
#[derive(Resource, Default, Debug)]
pub struct CurveStore {
    pub curves: FxHashMap<String, Arc<GravityCurve>>,
}

impl CurveStore {
    /// Add or replace a curve. Keys are sorted on insertion.
    pub fn insert(&mut self, key: impl Into<String>, curve: GravityCurve) {
        let curve = GravityCurve::new(curve.keys);
        self.curves.insert(key.into(), Arc::new(curve));
    }

    /// Resolve a curve for a controller. Missing and empty curves are
    /// configuration errors.
    pub fn resolve(&self, key: &str) -> Result<Arc<GravityCurve>, ConfigurationError> {
        let curve = self
            .curves
            .get(key)
            .ok_or_else(|| ConfigurationError::MissingCurve(key.to_string()))?;
        if curve.keys.is_empty() {
            return Err(ConfigurationError::EmptyCurve(key.to_string()));
        }
        Ok(Arc::clone(curve))
    }

    /// Parse curves from a JSON string and add them to the store.
    pub fn load_json_str(&mut self, source: &str, path: &Path) -> Result<usize, ConfigurationError> {
        let parsed: FxHashMap<String, GravityCurve> =
            serde_json::from_str(source).map_err(|source| ConfigurationError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let count = parsed.len();
        for (key, curve) in parsed {
            self.insert(key, curve);
        }
        Ok(count)
    }

    /// Read and parse a JSON curve asset file.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize, ConfigurationError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let count = self.load_json_str(&source, path)?;
        info!("Loaded {} gravity curve(s) from {:?}", count, path);
        Ok(count)
    }
}
