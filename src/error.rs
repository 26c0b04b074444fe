//! Start-up error types.
//!
//! Everything here is fatal for the component that hit it: a controller that
//! fails to start never becomes active. Per-tick degenerate input (zero tick
//! duration, zero blended clip length) is not an error and never reaches
//! this module.

use std::path::PathBuf;

use thiserror::Error;

/// Missing or malformed author-time data detected while starting a component.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The movement controller references a gravity curve that is not loaded.
    #[error("gravity curve '{0}' is not loaded")]
    MissingCurve(String),
    /// A gravity curve asset has no keys to sample.
    #[error("gravity curve '{0}' has no keys")]
    EmptyCurve(String),
    /// The blend controller references an animation clip that is not loaded.
    #[error("animation clip '{0}' is not set")]
    MissingClip(String),
    /// An asset file could not be read.
    #[error("failed to read asset file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// An asset file could not be parsed.
    #[error("failed to parse asset file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
